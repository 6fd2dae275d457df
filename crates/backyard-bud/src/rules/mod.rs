//! Legislative rule table: the five-column SEPP extract cited by every assessment.
//!
//! The table is loaded once and never mutated. A reload builds a new [`RuleTable`] and
//! swaps it into the [`RuleCatalog`], so assessments already holding the old table finish
//! against the citations they started with.

mod binding;
mod catalog;
mod parser;

pub use binding::RuleCheck;
pub use catalog::RuleCatalog;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Structure classes covered by the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureType {
    #[serde(rename = "Garden Structures & Storage")]
    GardenStructuresAndStorage,
    #[serde(rename = "Carports")]
    Carports,
    #[serde(rename = "Outdoor Entertainment Areas")]
    OutdoorEntertainmentAreas,
    #[serde(rename = "General Requirements")]
    GeneralRequirements,
}

impl StructureType {
    /// Structure types a proposal may name.
    pub const fn proposable() -> [Self; 3] {
        [
            Self::GardenStructuresAndStorage,
            Self::Carports,
            Self::OutdoorEntertainmentAreas,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::GardenStructuresAndStorage => "Garden Structures & Storage",
            Self::Carports => "Carports",
            Self::OutdoorEntertainmentAreas => "Outdoor Entertainment Areas",
            Self::GeneralRequirements => "General Requirements",
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::GardenStructuresAndStorage => "garden-structures-and-storage",
            Self::Carports => "carports",
            Self::OutdoorEntertainmentAreas => "outdoor-entertainment-areas",
            Self::GeneralRequirements => "general-requirements",
        }
    }

    /// Accepts the table label or the URL slug, ignoring case and surrounding whitespace.
    pub fn from_label(value: &str) -> Option<Self> {
        let value = value.trim();
        [
            Self::GardenStructuresAndStorage,
            Self::Carports,
            Self::OutdoorEntertainmentAreas,
            Self::GeneralRequirements,
        ]
        .into_iter()
        .find(|kind| kind.label().eq_ignore_ascii_case(value) || kind.slug().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rule grouping used by the table's `Category` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleCategory {
    #[serde(rename = "Size Limits")]
    SizeLimits,
    #[serde(rename = "Height & Dimensions")]
    HeightAndDimensions,
    #[serde(rename = "Boundary Setbacks")]
    BoundarySetbacks,
    #[serde(rename = "Bushfire Protection")]
    BushfireProtection,
    #[serde(rename = "Drainage")]
    Drainage,
    #[serde(rename = "Vegetation Protection")]
    VegetationProtection,
    #[serde(rename = "Hazardous Materials")]
    HazardousMaterials,
    #[serde(rename = "Heritage Conservation")]
    HeritageConservation,
    #[serde(rename = "Environmental Protection")]
    EnvironmentalProtection,
    #[serde(rename = "Other")]
    Other,
}

impl RuleCategory {
    const ALL: [Self; 10] = [
        Self::SizeLimits,
        Self::HeightAndDimensions,
        Self::BoundarySetbacks,
        Self::BushfireProtection,
        Self::Drainage,
        Self::VegetationProtection,
        Self::HazardousMaterials,
        Self::HeritageConservation,
        Self::EnvironmentalProtection,
        Self::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::SizeLimits => "Size Limits",
            Self::HeightAndDimensions => "Height & Dimensions",
            Self::BoundarySetbacks => "Boundary Setbacks",
            Self::BushfireProtection => "Bushfire Protection",
            Self::Drainage => "Drainage",
            Self::VegetationProtection => "Vegetation Protection",
            Self::HazardousMaterials => "Hazardous Materials",
            Self::HeritageConservation => "Heritage Conservation",
            Self::EnvironmentalProtection => "Environmental Protection",
            Self::Other => "Other",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(value))
    }
}

/// One row of the rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub structure_type: StructureType,
    pub category: RuleCategory,
    pub clause_reference: String,
    pub legislative_text: String,
    pub plain_text: String,
    pub check: RuleCheck,
}

#[derive(Debug, thiserror::Error)]
pub enum RuleTableError {
    #[error("failed to open rule table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed rule table: {0}")]
    Csv(#[from] csv::Error),
    #[error("rule table contains no rules")]
    Empty,
}

/// Outcome of a lenient load: the table to run with, plus the error that emptied it.
#[derive(Debug)]
pub struct RuleTableLoad {
    pub table: RuleTable,
    pub error: Option<RuleTableError>,
}

/// Immutable, ordered rule table.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
    source: Option<PathBuf>,
}

impl RuleTable {
    /// Table with no citations; assessments still apply every numeric threshold.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            source: None,
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RuleTableError> {
        let rules = parser::parse_rules(reader)?;
        if rules.is_empty() {
            return Err(RuleTableError::Empty);
        }
        Ok(Self::from_rules(rules))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RuleTableError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| RuleTableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut table = Self::from_reader(file)?;
        table.source = Some(path.to_path_buf());
        Ok(table)
    }

    /// Never fails: a missing or malformed table degrades to [`RuleTable::empty`].
    pub fn load<P: AsRef<Path>>(path: P) -> RuleTableLoad {
        let path = path.as_ref();
        match Self::from_path(path) {
            Ok(table) => {
                info!(path = %path.display(), rules = table.len(), "rule table loaded");
                RuleTableLoad { table, error: None }
            }
            Err(err) => {
                error!(
                    path = %path.display(),
                    error = %err,
                    "rule table unavailable; assessments will run without legislative citations"
                );
                RuleTableLoad {
                    table: Self::empty(),
                    error: Some(err),
                }
            }
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Rules for a structure type, optionally narrowed to one category, in table order.
    pub fn relevant(&self, structure: StructureType, category: Option<RuleCategory>) -> Vec<&Rule> {
        self.rules
            .iter()
            .filter(|rule| rule.structure_type == structure)
            .filter(|rule| category.map_or(true, |category| rule.category == category))
            .collect()
    }

    /// String-keyed variant for request paths; unknown labels match nothing.
    pub fn relevant_by_label(&self, structure: &str, category: Option<&str>) -> Vec<&Rule> {
        let Some(structure) = StructureType::from_label(structure) else {
            return Vec::new();
        };
        match category {
            None => self.relevant(structure, None),
            Some(label) => match RuleCategory::from_label(label) {
                Some(category) => self.relevant(structure, Some(category)),
                None => Vec::new(),
            },
        }
    }

    /// Rules bound to a specific check, in table order.
    pub fn bound(&self, structure: StructureType, check: RuleCheck) -> impl Iterator<Item = &Rule> {
        self.rules
            .iter()
            .filter(move |rule| rule.structure_type == structure && rule.check == check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TABLE: &str = "Structure Type,Category,Clause Reference,Exact Legislative Text,Plain English Explanation\n\
Carports,Size Limits,2.20(1)(b),\"not more than 20m2, or 25m2 if the lot is larger\",Small carports only\n\
Carports,Height & Dimensions,2.20(1)(c),\"not higher than 3m\",Max 3 metres\n\
General Requirements,Vegetation Protection,1.16(1)(e),\"the \"\"tree\"\" rule\",Permit needed\n\
Carports,Drainage,2.20(1)(i),roofwater to stormwater,Connect to stormwater\n";

    fn table() -> RuleTable {
        RuleTable::from_reader(Cursor::new(TABLE)).expect("table parses")
    }

    #[test]
    fn quoted_fields_keep_embedded_delimiters_and_quotes() {
        let table = table();
        assert_eq!(table.len(), 4);
        assert_eq!(
            table.rules()[0].legislative_text,
            "not more than 20m2, or 25m2 if the lot is larger"
        );
        assert_eq!(table.rules()[2].legislative_text, "the \"tree\" rule");
    }

    #[test]
    fn relevant_filters_in_table_order() {
        let table = table();
        let carports = table.relevant(StructureType::Carports, None);
        let clauses: Vec<_> = carports.iter().map(|rule| rule.clause_reference.as_str()).collect();
        assert_eq!(clauses, ["2.20(1)(b)", "2.20(1)(c)", "2.20(1)(i)"]);

        let drainage = table.relevant(StructureType::Carports, Some(RuleCategory::Drainage));
        assert_eq!(drainage.len(), 1);
        assert_eq!(drainage[0].check, RuleCheck::Stormwater);
    }

    #[test]
    fn unknown_structure_label_yields_no_rules() {
        let table = table();
        assert!(table.relevant_by_label("Swimming Pools", None).is_empty());
        assert_eq!(table.relevant_by_label("carports", Some("Size Limits")).len(), 1);
        assert!(table.relevant_by_label("Carports", Some("Landscaping")).is_empty());
    }

    #[test]
    fn load_degrades_to_empty_table_when_file_missing() {
        let load = RuleTable::load("./does-not-exist.csv");
        assert!(load.table.is_empty());
        match load.error {
            Some(RuleTableError::Io { path, .. }) => assert!(path.contains("does-not-exist")),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let malformed = "Structure Type,Category,Clause Reference,Exact Legislative Text,Plain English Explanation\n\
Carports,Size Limits,2.20(1)(b)\n";
        let error = RuleTable::from_reader(Cursor::new(malformed)).expect_err("ragged row");
        assert!(matches!(error, RuleTableError::Csv(_)));
    }

    #[test]
    fn header_only_table_is_reported_empty() {
        let header = "Structure Type,Category,Clause Reference,Exact Legislative Text,Plain English Explanation\n";
        let error = RuleTable::from_reader(Cursor::new(header)).expect_err("no rows");
        assert!(matches!(error, RuleTableError::Empty));
    }

    #[test]
    fn structure_labels_accept_slugs() {
        assert_eq!(
            StructureType::from_label("  garden-structures-and-storage "),
            Some(StructureType::GardenStructuresAndStorage)
        );
        assert_eq!(
            StructureType::from_label("OUTDOOR ENTERTAINMENT AREAS"),
            Some(StructureType::OutdoorEntertainmentAreas)
        );
        assert_eq!(StructureType::from_label("Decks"), None);
    }
}
