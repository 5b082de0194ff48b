//! ## lanvakt-core::identity
//! **Local hardware address**
//!
//! Computed once at startup and shared read-only afterwards. Several filters
//! interpolate it to separate self-originated traffic from foreign traffic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Hardware (MAC) address of the monitored interface.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HostIdentity([u8; 6]);

impl HostIdentity {
    /// Builds an identity from raw octets, rejecting addresses that can never
    /// belong to a single host.
    pub fn new(octets: [u8; 6]) -> Result<Self, CoreError> {
        let input = format_octets(&octets);
        if octets == [0; 6] {
            return Err(CoreError::InvalidHostIdentity {
                input,
                reason: "all-zero address",
            });
        }
        // Group bit covers both multicast ranges and the broadcast address.
        if octets[0] & 0x01 != 0 {
            return Err(CoreError::InvalidHostIdentity {
                input,
                reason: "group (multicast/broadcast) address",
            });
        }
        Ok(Self(octets))
    }

    #[inline]
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

fn format_octets(octets: &[u8; 6]) -> String {
    octets
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

impl fmt::Display for HostIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_octets(&self.0))
    }
}

impl fmt::Debug for HostIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostIdentity({self})")
    }
}

impl FromStr for HostIdentity {
    type Err = CoreError;

    /// Accepts `aa:bb:cc:dd:ee:ff` and `AA-BB-CC-DD-EE-FF`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| CoreError::InvalidHostIdentity {
            input: s.to_string(),
            reason,
        };

        let trimmed = s.trim();
        let separator = if trimmed.contains('-') { '-' } else { ':' };
        let parts: Vec<&str> = trimmed.split(separator).collect();
        if parts.len() != 6 {
            return Err(invalid("expected six octets"));
        }

        let mut octets = [0u8; 6];
        for (slot, part) in octets.iter_mut().zip(parts) {
            if part.len() != 2 {
                return Err(invalid("octets must be two hex digits"));
            }
            *slot = u8::from_str_radix(part, 16).map_err(|_| invalid("non-hex octet"))?;
        }

        Self::new(octets)
    }
}

impl TryFrom<String> for HostIdentity {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HostIdentity> for String {
    fn from(identity: HostIdentity) -> Self {
        identity.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_and_formats_lowercase() {
        let id: HostIdentity = "AA:BB:CC:DD:EE:FE".parse().unwrap();
        assert_eq!(id.to_string(), "aa:bb:cc:dd:ee:fe");
    }

    #[test]
    fn accepts_dash_separators() {
        let id: HostIdentity = "aa-bb-cc-dd-ee-fe".parse().unwrap();
        assert_eq!(id.octets(), [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xfe]);
    }

    #[test]
    fn rejects_malformed_input() {
        for input in ["", "aa:bb:cc", "aa:bb:cc:dd:ee:ff:00", "aa:bb:cc:dd:ee:gg", "a:bb:cc:dd:ee:ff"] {
            assert!(input.parse::<HostIdentity>().is_err(), "{input} should be rejected");
        }
    }

    #[test]
    fn rejects_non_host_addresses() {
        assert!("00:00:00:00:00:00".parse::<HostIdentity>().is_err());
        assert!("ff:ff:ff:ff:ff:ff".parse::<HostIdentity>().is_err());
        assert!("01:00:5e:00:00:01".parse::<HostIdentity>().is_err());
        assert!("33:33:00:00:00:01".parse::<HostIdentity>().is_err());
    }

    proptest! {
        #[test]
        fn unicast_addresses_survive_display(octets in any::<[u8; 6]>()) {
            let mut octets = octets;
            octets[0] &= 0xfe;
            prop_assume!(octets != [0; 6]);
            let id = HostIdentity::new(octets).unwrap();
            prop_assert_eq!(id.to_string().parse::<HostIdentity>().unwrap(), id);
        }
    }
}
