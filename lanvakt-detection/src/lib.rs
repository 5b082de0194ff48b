//! # Lanvakt Detection Engine
//!
//! Deterministic rule cascade: an ordered table of packet-filter rules, each
//! tied to one traffic category, evaluated highest priority first until one
//! of them sees traffic.

pub mod cascade;
pub mod error;
pub mod rule;

pub use cascade::RuleCascade;
pub use error::DetectionError;
pub use rule::{standard_rules, Rule};
