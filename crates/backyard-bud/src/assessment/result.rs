use serde::Serialize;

use crate::rules::Rule;

/// Three-way outcome of an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Approved,
    Conditional,
    NonExempt,
}

impl Classification {
    pub fn headline(self) -> &'static str {
        match self {
            Classification::Approved => "Likely Approved",
            Classification::Conditional => "Conditional Approval",
            Classification::NonExempt => "Development Approval Required",
        }
    }
}

/// Status attached to each cited rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComplianceStatus {
    #[serde(rename = "COMPLIES")]
    Complies,
    #[serde(rename = "FAILS")]
    Fails,
    #[serde(rename = "CONDITIONAL")]
    Conditional,
    #[serde(rename = "MORE INFO REQUIRED")]
    MoreInfoRequired,
    #[serde(rename = "INFORMATIONAL")]
    Informational,
}

impl ComplianceStatus {
    pub fn label(self) -> &'static str {
        match self {
            ComplianceStatus::Complies => "COMPLIES",
            ComplianceStatus::Fails => "FAILS",
            ComplianceStatus::Conditional => "CONDITIONAL",
            ComplianceStatus::MoreInfoRequired => "MORE INFO REQUIRED",
            ComplianceStatus::Informational => "INFORMATIONAL",
        }
    }

    pub fn passes(passed: bool) -> Self {
        if passed {
            ComplianceStatus::Complies
        } else {
            ComplianceStatus::Fails
        }
    }
}

/// One cited rule (or informational note) in the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegislationEntry {
    pub clause_reference: String,
    pub legislative_text: String,
    pub plain_text: String,
    pub status: ComplianceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl LegislationEntry {
    pub fn cite(rule: &Rule, status: ComplianceStatus) -> Self {
        Self {
            clause_reference: rule.clause_reference.clone(),
            legislative_text: rule.legislative_text.clone(),
            plain_text: rule.plain_text.clone(),
            status,
            observed_value: None,
            limit: None,
            note: None,
        }
    }

    /// Entry not backed by a table row; always `N/A` and informational.
    pub fn informational(legislative_text: impl Into<String>, plain_text: impl Into<String>) -> Self {
        Self {
            clause_reference: "N/A".to_string(),
            legislative_text: legislative_text.into(),
            plain_text: plain_text.into(),
            status: ComplianceStatus::Informational,
            observed_value: None,
            limit: None,
            note: None,
        }
    }

    pub fn measured(mut self, observed: impl Into<String>, limit: impl Into<String>) -> Self {
        self.observed_value = Some(observed.into());
        self.limit = Some(limit.into());
        self
    }

    pub fn observed(mut self, observed: impl Into<String>) -> Self {
        self.observed_value = Some(observed.into());
        self
    }

    pub fn noted(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Status counts over `legislation_applied`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSummary {
    pub total_checked: usize,
    pub complies: usize,
    pub fails: usize,
    pub conditional: usize,
}

impl AssessmentSummary {
    /// `MORE INFO REQUIRED` counts as conditional; informational entries only count in the total.
    pub fn tally(entries: &[LegislationEntry]) -> Self {
        entries.iter().fold(
            Self {
                total_checked: entries.len(),
                ..Self::default()
            },
            |mut summary, entry| {
                match entry.status {
                    ComplianceStatus::Complies => summary.complies += 1,
                    ComplianceStatus::Fails => summary.fails += 1,
                    ComplianceStatus::Conditional | ComplianceStatus::MoreInfoRequired => {
                        summary.conditional += 1
                    }
                    ComplianceStatus::Informational => {}
                }
                summary
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub classification: Classification,
    pub issues: Vec<String>,
    pub conditions: Vec<String>,
    pub legislation_applied: Vec<LegislationEntry>,
    pub summary: AssessmentSummary,
}

impl AssessmentResult {
    pub fn headline(&self) -> &'static str {
        self.classification.headline()
    }
}
