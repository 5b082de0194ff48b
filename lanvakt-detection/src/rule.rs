//! ## lanvakt-detection::rule
//! **Filter rules and the canonical rule table**
//!
//! A rule pairs a packet-filter expression (libpcap grammar) with the
//! category it reports. Its priority is its position in the cascade.

use lanvakt_core::{Category, HostIdentity};

use crate::error::DetectionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    filter: String,
    category: Category,
}

impl Rule {
    /// Builds a rule, checking that the filter is plausibly well-formed.
    /// Full compilation happens in the capture backend.
    pub fn new(filter: impl Into<String>, category: Category) -> Result<Self, DetectionError> {
        let filter = filter.into();
        filter_check(&filter)?;
        Ok(Self { filter, category })
    }

    #[inline]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    #[inline]
    pub fn label(&self) -> &'static str {
        self.category.label()
    }
}

fn filter_check(filter: &str) -> Result<(), DetectionError> {
    if filter.trim().is_empty() {
        return Err(DetectionError::InvalidConfiguration(
            "empty filter expression".into(),
        ));
    }

    let mut depth = 0usize;
    for c in filter.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    DetectionError::InvalidConfiguration(format!(
                        "unbalanced parentheses in '{filter}'"
                    ))
                })?
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(DetectionError::InvalidConfiguration(format!(
            "unbalanced parentheses in '{filter}'"
        )));
    }
    Ok(())
}

/// The five canonical rules, highest priority first.
pub fn standard_rules(identity: &HostIdentity) -> Vec<Rule> {
    let mac = identity.to_string();
    vec![
        Rule {
            filter: "arp and (ether dst ff:ff:ff:ff:ff:ff or ether dst net 33:33 or ether dst net 01:00)"
                .into(),
            category: Category::BroadcastFlood,
        },
        Rule {
            filter: format!("arp and not ether src {mac} and ether dst {mac}"),
            category: Category::SpoofedArp,
        },
        Rule {
            filter: format!(
                "tcp and not ether src {mac} and (tcp dst port 80 or tcp dst port 443)"
            ),
            category: Category::WellKnownPort,
        },
        Rule {
            filter: "vlan and not ether dst broadcast".into(),
            category: Category::VlanTagging,
        },
        Rule {
            filter: "not arp and not ether dst broadcast".into(),
            category: Category::UncommonProtocol,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> HostIdentity {
        "aa:bb:cc:dd:ee:fe".parse().unwrap()
    }

    #[test]
    fn standard_table_is_ordered_by_category() {
        let categories: Vec<_> = standard_rules(&identity())
            .iter()
            .map(Rule::category)
            .collect();
        assert_eq!(categories, Category::ALL);
    }

    #[test]
    fn identity_is_interpolated() {
        let rules = standard_rules(&identity());
        assert_eq!(
            rules[1].filter(),
            "arp and not ether src aa:bb:cc:dd:ee:fe and ether dst aa:bb:cc:dd:ee:fe"
        );
        assert_eq!(
            rules[2].filter(),
            "tcp and not ether src aa:bb:cc:dd:ee:fe and (tcp dst port 80 or tcp dst port 443)"
        );
    }

    #[test]
    fn standard_filters_are_well_formed() {
        for rule in standard_rules(&identity()) {
            filter_check(rule.filter()).unwrap();
        }
    }

    #[test]
    fn malformed_filters_are_rejected() {
        assert!(Rule::new("", Category::VlanTagging).is_err());
        assert!(Rule::new("   ", Category::VlanTagging).is_err());
        assert!(Rule::new("arp and (ether dst", Category::BroadcastFlood).is_err());
        assert!(Rule::new("arp)", Category::BroadcastFlood).is_err());
        assert!(Rule::new("vlan", Category::VlanTagging).is_ok());
    }
}
