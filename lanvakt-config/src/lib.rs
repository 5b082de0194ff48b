//! # Lanvakt Configuration System
//!
//! Layered configuration for the classifier: capture parameters, cycle
//! scheduling, host identity override and telemetry.
//!
//! ## Hierarchy
//! 1. Built-in defaults
//! 2. `config/lanvakt.yaml`
//! 3. `config/<LANVAKT_ENV>.yaml`
//! 4. `LANVAKT_*` environment variables (`__` separates nesting levels)

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod capture;
mod error;
mod host;
mod schedule;
mod telemetry;
mod validation;

pub use capture::CaptureConfig;
pub use error::ConfigError;
pub use host::HostConfig;
pub use schedule::{ErrorPolicy, FirstTick, ScheduleConfig};
pub use telemetry::TelemetryConfig;

const BASE_FILE: &str = "config/lanvakt.yaml";
const ENV_PREFIX: &str = "LANVAKT_";

/// Top‑level configuration container.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct LanvaktConfig {
    /// Packet capture parameters.
    #[validate(nested)]
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Cycle timing and failure handling.
    #[validate(nested)]
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Local host identity.
    #[validate(nested)]
    #[serde(default)]
    pub host: HostConfig,

    /// Logging and metrics.
    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl LanvaktConfig {
    /// Load configuration from default files and environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(LanvaktConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        }

        let env = std::env::var("LANVAKT_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load configuration from a specific file, still honoring defaults and
    /// environment overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        Self::extract(
            Figment::from(Serialized::defaults(LanvaktConfig::default()))
                .merge(Yaml::file(path))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    /// Re-checks the configuration after programmatic overrides.
    pub fn ensure_valid(&self) -> Result<(), ConfigError> {
        Ok(self.validate()?)
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.ensure_valid()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn full_config_validation() {
        let config = LanvaktConfig::default();
        config.validate().expect("Default config should validate");
    }

    #[test]
    fn defaults_follow_the_classic_cadence() {
        let config = LanvaktConfig::default();
        assert_eq!(config.schedule.period_ms, 2000);
        assert_eq!(config.capture.timeout_ms, 5000);
        assert_eq!(config.schedule.first_tick, FirstTick::AfterPeriod);
        assert_eq!(config.schedule.on_error, ErrorPolicy::Continue);
    }

    #[test]
    fn environment_override() {
        Jail::expect_with(|jail| {
            jail.set_env("LANVAKT_CAPTURE__INTERFACE", "wlan0");
            jail.set_env("LANVAKT_SCHEDULE__ON_ERROR", "stop");
            let config = LanvaktConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.capture.interface, "wlan0");
            assert_eq!(config.schedule.on_error, ErrorPolicy::Stop);
            Ok(())
        });
    }

    #[test]
    fn base_file_is_merged() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file(
                "config/lanvakt.yaml",
                r#"
capture:
  interface: "enp3s0"
  timeout_ms: 1500
host:
  mac: "AA:BB:CC:DD:EE:FE"
  network_label: "Ethernet"
"#,
            )?;
            let config = LanvaktConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.capture.interface, "enp3s0");
            assert_eq!(config.capture.timeout_ms, 1500);
            assert!(config.capture.promiscuous);
            assert_eq!(
                config.host.mac.map(|m| m.to_string()).as_deref(),
                Some("aa:bb:cc:dd:ee:fe")
            );
            Ok(())
        });
    }

    #[test]
    fn malformed_mac_is_a_parse_error() {
        Jail::expect_with(|jail| {
            jail.create_file("lanvakt.yaml", "host:\n  mac: \"ff:ff:ff:ff:ff:ff\"\n")?;
            let err = LanvaktConfig::load_from_path("lanvakt.yaml").unwrap_err();
            assert!(matches!(err, ConfigError::Parsing(_)));
            Ok(())
        });
    }

    #[test]
    fn out_of_range_values_fail_validation() {
        Jail::expect_with(|jail| {
            jail.create_file("lanvakt.yaml", "schedule:\n  period_ms: 5\n")?;
            let err = LanvaktConfig::load_from_path("lanvakt.yaml").unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)));
            Ok(())
        });
    }

    #[test]
    fn missing_file_is_reported() {
        let err = LanvaktConfig::load_from_path("/nonexistent/lanvakt.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn overrides_are_rechecked() {
        let mut config = LanvaktConfig::default();
        config.schedule.period_ms = 10;
        assert!(matches!(
            config.ensure_valid(),
            Err(ConfigError::Validation(_))
        ));

        config.schedule.period_ms = 500;
        config.capture.interface = "en0".into();
        assert!(config.ensure_valid().is_ok());
    }
}
