// lanvakt-config/src/validation.rs
//! Custom validation functions for configuration.

use validator::ValidationError;

/// Validate that an interface name is something a capture backend could open.
///
/// Covers Linux (`eth0`, `wlp2s0`), macOS (`en0`), Windows friendly names
/// (`Wi-Fi`) and NPF device paths (`\Device\NPF_{GUID}`).
pub fn validate_interface(name: &str) -> Result<(), ValidationError> {
    let re = regex::Regex::new(r"^[A-Za-z0-9_.:\-\\{}]+$")
        .map_err(|_| ValidationError::new("invalid_regex"))?;

    if name.len() <= 255 && re.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_interface"))
    }
}

/// Validate a tracing level name.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid = ["trace", "debug", "info", "warn", "error"].contains(&level.to_lowercase().as_str());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}
