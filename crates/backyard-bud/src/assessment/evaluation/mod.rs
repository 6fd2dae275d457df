mod general;
mod overlays;
mod policy;
mod structure;

pub use policy::classify;

use std::sync::Arc;

use super::domain::{Property, Proposal};
use super::result::{AssessmentResult, AssessmentSummary, LegislationEntry};
use super::zoning::ZonePolicy;
use crate::rules::RuleTable;
use tracing::debug;

/// Stateless evaluator bound to one rule table snapshot.
#[derive(Debug, Clone)]
pub struct AssessmentEngine {
    rules: Arc<RuleTable>,
    zones: ZonePolicy,
}

impl AssessmentEngine {
    pub fn new(rules: Arc<RuleTable>) -> Self {
        Self::with_zone_policy(rules, ZonePolicy::standard())
    }

    pub fn with_zone_policy(rules: Arc<RuleTable>, zones: ZonePolicy) -> Self {
        Self { rules, zones }
    }

    pub fn assess(&self, property: &Property, proposal: &Proposal) -> AssessmentResult {
        let context = CheckContext {
            rules: &self.rules,
            zones: &self.zones,
            property,
            proposal,
        };

        let findings = [
            general::check(&context),
            overlays::check(&context),
            structure::check(&context),
        ]
        .into_iter()
        .fold(Findings::default(), Findings::merge);

        let classification = classify(&findings.issues, &findings.conditions);
        let summary = AssessmentSummary::tally(&findings.legislation);
        debug!(
            structure = %proposal.structure_type,
            zone = %property.zone_type,
            ?classification,
            issues = findings.issues.len(),
            conditions = findings.conditions.len(),
            cited = summary.total_checked,
            "assessment evaluated"
        );

        AssessmentResult {
            classification,
            issues: findings.issues,
            conditions: findings.conditions,
            legislation_applied: findings.legislation,
            summary,
        }
    }
}

/// Inputs shared by every check phase.
pub(crate) struct CheckContext<'a> {
    pub rules: &'a RuleTable,
    pub zones: &'a ZonePolicy,
    pub property: &'a Property,
    pub proposal: &'a Proposal,
}

/// Partial result produced by one check phase.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Findings {
    pub issues: Vec<String>,
    pub conditions: Vec<String>,
    pub legislation: Vec<LegislationEntry>,
}

impl Findings {
    pub fn issue(&mut self, message: impl Into<String>) {
        self.issues.push(message.into());
    }

    pub fn condition(&mut self, message: impl Into<String>) {
        self.conditions.push(message.into());
    }

    pub fn cite(&mut self, entry: LegislationEntry) {
        self.legislation.push(entry);
    }

    /// Concatenates in phase order.
    pub fn merge(mut self, next: Findings) -> Findings {
        self.issues.extend(next.issues);
        self.conditions.extend(next.conditions);
        self.legislation.extend(next.legislation);
        self
    }
}

/// Metres and square metres render to the centimetre, without trailing zeros.
pub(crate) fn metres(value: f64) -> String {
    format!("{}m", measure(value))
}

pub(crate) fn square_metres(value: f64) -> String {
    format!("{}m²", measure(value))
}

fn measure(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measurements_round_and_drop_trailing_zeros() {
        assert_eq!(metres(0.1 + 0.2), "0.3m");
        assert_eq!(metres(3.0), "3m");
        assert_eq!(metres(1.25), "1.25m");
        assert_eq!(metres(0.904), "0.9m");
        assert_eq!(square_metres(20.0), "20m²");
        assert_eq!(square_metres(45.678), "45.68m²");
        assert_eq!(metres(-0.001), "0m");
    }
}
