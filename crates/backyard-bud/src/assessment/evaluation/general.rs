use super::super::domain::AsbestosCategory;
use super::super::result::{ComplianceStatus, LegislationEntry};
use super::{CheckContext, Findings};
use crate::rules::{RuleCheck, StructureType};

/// Vegetation and hazardous-material requirements shared by every structure type.
pub(super) fn check(context: &CheckContext<'_>) -> Findings {
    let mut findings = Findings::default();
    let proposal = context.proposal;
    let general = StructureType::GeneralRequirements;

    let unpermitted_removal = proposal.tree_removal && !proposal.tree_permit;
    if unpermitted_removal {
        findings.issue("Tree removal without permit: a council permit is required before removing protected vegetation");
    }
    if let Some(rule) = context.rules.bound(general, RuleCheck::TreeRemoval).next() {
        let observed = match (proposal.tree_removal, proposal.tree_permit) {
            (false, _) => "No trees removed",
            (true, true) => "Tree removal with permit",
            (true, false) => "Tree removal without permit",
        };
        findings.cite(
            LegislationEntry::cite(rule, ComplianceStatus::passes(!unpermitted_removal)).observed(observed),
        );
    }

    let asbestos = proposal.asbestos_type;
    if asbestos == AsbestosCategory::C {
        findings.issue("Asbestos removal exceeds exempt limits: major bonded or friable asbestos requires approval");
    }
    for rule in context.rules.bound(general, RuleCheck::Asbestos) {
        let entry = match asbestos {
            AsbestosCategory::C => LegislationEntry::cite(rule, ComplianceStatus::Fails),
            AsbestosCategory::D => LegislationEntry::cite(rule, ComplianceStatus::Complies).noted("Licensed"),
            AsbestosCategory::A | AsbestosCategory::B => LegislationEntry::cite(rule, ComplianceStatus::Complies),
        };
        findings.cite(entry.observed(format!("Category {asbestos:?}")));
    }

    findings
}
