use lanvakt_core::HostIdentity;
use serde::{Deserialize, Serialize};
use validator::{self, Validate};

/// Local host settings.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct HostConfig {
    /// Hardware address to use instead of the one read from the interface.
    #[serde(default)]
    pub mac: Option<HostIdentity>,

    /// Network name shown in the clean status line.
    #[validate(length(min = 1, max = 64))]
    #[serde(default = "default_network_label")]
    pub network_label: String,
}

fn default_network_label() -> String {
    "Wi-Fi".into()
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            mac: None,
            network_label: default_network_label(),
        }
    }
}
