use super::binding::bind;
use super::{Rule, RuleCategory, StructureType};
use serde::Deserialize;
use std::io::Read;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct RuleRow {
    #[serde(rename = "Structure Type")]
    structure_type: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Clause Reference")]
    clause_reference: String,
    #[serde(rename = "Exact Legislative Text")]
    legislative_text: String,
    #[serde(rename = "Plain English Explanation")]
    plain_text: String,
}

pub(crate) fn parse_rules<R: Read>(reader: R) -> Result<Vec<Rule>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rules = Vec::new();

    for (index, record) in csv_reader.deserialize::<RuleRow>().enumerate() {
        let row = record?;
        let Some(structure_type) = StructureType::from_label(&row.structure_type) else {
            // Header is line 1, so data rows start at line 2.
            warn!(
                line = index + 2,
                structure_type = %row.structure_type,
                "skipping rule with unrecognised structure type"
            );
            continue;
        };
        let category = RuleCategory::from_label(&row.category).unwrap_or(RuleCategory::Other);
        let check = bind(structure_type, category, &row.clause_reference);

        rules.push(Rule {
            structure_type,
            category,
            clause_reference: row.clause_reference,
            legislative_text: row.legislative_text,
            plain_text: row.plain_text,
            check,
        });
    }

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleCheck;
    use std::io::Cursor;

    #[test]
    fn skips_rows_for_unknown_structures_and_defaults_category() {
        let csv = "Structure Type,Category,Clause Reference,Exact Legislative Text,Plain English Explanation\n\
Swimming Pools,Size Limits,3.1,pool text,pool plain\n\
Carports,Landscaping,2.20(1)(z),  padded text  ,plain\n";
        let rules = parse_rules(Cursor::new(csv)).expect("parses");

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].structure_type, StructureType::Carports);
        assert_eq!(rules[0].category, RuleCategory::Other);
        assert_eq!(rules[0].legislative_text, "padded text");
        assert_eq!(rules[0].check, RuleCheck::Citation);
    }
}
