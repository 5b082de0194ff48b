//! ## lanvakt-detection::cascade
//! **Prioritized, short-circuiting rule evaluation**
//!
//! Rules are queried strictly one after another in table order. The first
//! rule whose query returns a frame decides the cycle; rules after it are
//! never queried. A failed query aborts the whole cycle.

use lanvakt_capture::CaptureAdapter;
use lanvakt_core::{CycleResult, HostIdentity, SamplingWindow};
use tracing::{debug, instrument, trace};

use crate::error::DetectionError;
use crate::rule::{standard_rules, Rule};

#[derive(Debug, Clone)]
pub struct RuleCascade {
    identity: HostIdentity,
    rules: Vec<Rule>,
}

impl RuleCascade {
    /// Cascade over the five canonical rules.
    pub fn new(identity: HostIdentity) -> Self {
        Self {
            rules: standard_rules(&identity),
            identity,
        }
    }

    /// Cascade over a custom table. The table must not be empty.
    pub fn with_rules(identity: HostIdentity, rules: Vec<Rule>) -> Result<Self, DetectionError> {
        if rules.is_empty() {
            return Err(DetectionError::InvalidConfiguration(
                "rule cascade needs at least one rule".into(),
            ));
        }
        Ok(Self { identity, rules })
    }

    #[inline]
    pub fn identity(&self) -> HostIdentity {
        self.identity
    }

    #[inline]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Classifies the traffic of one cycle.
    #[instrument(skip_all, level = "debug", fields(interface = %window.interface))]
    pub fn evaluate<A>(
        &self,
        adapter: &A,
        window: &SamplingWindow,
    ) -> Result<CycleResult, DetectionError>
    where
        A: CaptureAdapter + ?Sized,
    {
        for (priority, rule) in self.rules.iter().enumerate() {
            trace!(priority, filter = rule.filter(), "Querying rule");

            let outcome = adapter.capture(rule.filter(), window).map_err(|source| {
                DetectionError::CaptureUnavailable {
                    category: rule.category(),
                    source,
                }
            })?;

            if let Some(frame) = outcome.frames.first() {
                debug!(
                    priority,
                    category = rule.label(),
                    frames = outcome.frames.len(),
                    first = %frame.summary(),
                    "Rule matched"
                );
                return Ok(CycleResult::Matched(rule.category()));
            }
        }

        debug!("No rule matched");
        Ok(CycleResult::Clean)
    }
}
