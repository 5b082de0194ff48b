//! Classification outcome types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The five traffic categories a cycle can report, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    BroadcastFlood,
    SpoofedArp,
    WellKnownPort,
    VlanTagging,
    UncommonProtocol,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::BroadcastFlood,
        Category::SpoofedArp,
        Category::WellKnownPort,
        Category::VlanTagging,
        Category::UncommonProtocol,
    ];

    /// Canonical short label, stable across releases.
    pub fn label(&self) -> &'static str {
        match self {
            Category::BroadcastFlood => "broadcast flood",
            Category::SpoofedArp => "spoofed arp",
            Category::WellKnownPort => "well-known port",
            Category::VlanTagging => "vlan tagging",
            Category::UncommonProtocol => "uncommon protocol",
        }
    }

    /// Operator-facing status message.
    pub fn description(&self) -> &'static str {
        match self {
            Category::BroadcastFlood => {
                "Packets being sent to broadcast addresses or unknown addresses on your network"
            }
            Category::SpoofedArp => {
                "Packets being sent with incorrect or invalid source or destination addresses"
            }
            Category::WellKnownPort => {
                "Packets being sent to well-known ports, such as port 80 (HTTP) or port 443 (HTTPS)"
            }
            Category::VlanTagging => "Packets being sent using VLAN tagging on your network",
            Category::UncommonProtocol => {
                "Packets being sent using protocols that are not commonly used on your network"
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one cascade evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleResult {
    Clean,
    Matched(Category),
}

impl CycleResult {
    #[inline]
    pub fn is_clean(&self) -> bool {
        matches!(self, CycleResult::Clean)
    }

    #[inline]
    pub fn category(&self) -> Option<Category> {
        match self {
            CycleResult::Clean => None,
            CycleResult::Matched(category) => Some(*category),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn labels_are_distinct() {
        let labels: HashSet<_> = Category::ALL.iter().map(Category::label).collect();
        assert_eq!(labels.len(), Category::ALL.len());
    }

    #[test]
    fn priority_order_matches_declaration() {
        let mut sorted = Category::ALL;
        sorted.sort();
        assert_eq!(sorted, Category::ALL);
    }

    #[test]
    fn matched_exposes_category() {
        assert_eq!(
            CycleResult::Matched(Category::WellKnownPort).category(),
            Some(Category::WellKnownPort)
        );
        assert!(CycleResult::Clean.is_clean());
        assert_eq!(CycleResult::Clean.category(), None);
    }
}
