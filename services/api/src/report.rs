use crate::infra::InMemoryAuditStore;
use backyard_bud::assessment::{
    AssessmentOutcome, AssessmentService, AssessmentSubmission, ValidationError,
};
use backyard_bud::audit::{AuditStore, FileAuditStore};
use backyard_bud::config::AppConfig;
use backyard_bud::error::AppError;
use backyard_bud::rules::{RuleCatalog, RuleTable};
use clap::Args;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// JSON file shaped like the body of POST /api/assess
    #[arg(long)]
    pub(crate) request: PathBuf,
    /// Override the configured rule table path
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Print the assessment as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
    /// Persist a checkpoint to CHECKPOINT_DIR
    #[arg(long)]
    pub(crate) checkpoint: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RulesListArgs {
    /// Structure type label or slug (e.g. `carports`)
    #[arg(long)]
    pub(crate) structure_type: Option<String>,
    /// Category label (e.g. `Size Limits`); requires --structure-type
    #[arg(long, requires = "structure_type")]
    pub(crate) category: Option<String>,
    /// Override the configured rule table path
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct CheckpointListArgs {
    /// Override the configured checkpoint directory
    #[arg(long)]
    pub(crate) dir: Option<PathBuf>,
    /// Maximum number of checkpoints to show
    #[arg(long, default_value_t = 20)]
    pub(crate) limit: usize,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let rules_path = args.rules.unwrap_or(config.data.rules_path);
    let (catalog, load_error) = RuleCatalog::open(&rules_path);
    if let Some(err) = load_error {
        eprintln!("warning: {err}; citations will be omitted");
    }
    let catalog = Arc::new(catalog);

    let body = std::fs::read(&args.request)?;
    let submission: AssessmentSubmission = serde_json::from_slice(&body)
        .map_err(|err| ValidationError::single("request", err.to_string()))?;

    let outcome = if args.checkpoint {
        assess_with(catalog, Arc::new(FileAuditStore::new(config.data.checkpoint_dir)), &submission)?
    } else {
        assess_with(catalog, Arc::new(InMemoryAuditStore::default()), &submission)?
    };

    if args.json {
        match serde_json::to_string_pretty(&outcome) {
            Ok(json) => println!("{json}"),
            Err(err) => eprintln!("assessment JSON unavailable: {err}"),
        }
    } else {
        print!("{}", render_assessment(&outcome));
    }
    Ok(())
}

/// The process exits right after, so the checkpoint is written before returning.
fn assess_with<S: AuditStore + 'static>(
    catalog: Arc<RuleCatalog>,
    audit: Arc<S>,
    submission: &AssessmentSubmission,
) -> Result<AssessmentOutcome, AppError> {
    AssessmentService::new(catalog, audit).assess_persisted(submission)
}

pub(crate) fn render_assessment(outcome: &AssessmentOutcome) -> String {
    let assessment = &outcome.assessment;
    let metadata = &outcome.metadata;
    let mut out = String::new();

    let _ = writeln!(out, "Assessment: {}", assessment.headline());
    if let Some(address) = &metadata.property_address {
        let _ = writeln!(out, "Property: {address}");
    }
    let _ = writeln!(out, "Structure: {}", metadata.structure_type);
    let _ = writeln!(out, "Checkpoint: {}", metadata.checkpoint_id);

    for (title, items) in [("Issues", &assessment.issues), ("Conditions", &assessment.conditions)] {
        if items.is_empty() {
            let _ = writeln!(out, "\n{title}: none");
        } else {
            let _ = writeln!(out, "\n{title}");
            for item in items.iter() {
                let _ = writeln!(out, "- {item}");
            }
        }
    }

    let summary = assessment.summary;
    let _ = writeln!(
        out,
        "\nLegislation applied ({} checked: {} comply, {} fail, {} conditional)",
        summary.total_checked, summary.complies, summary.fails, summary.conditional
    );
    for entry in &assessment.legislation_applied {
        let _ = write!(
            out,
            "  [{}] {} {}",
            entry.status.label(),
            entry.clause_reference,
            entry.plain_text
        );
        match (&entry.observed_value, &entry.limit) {
            (Some(observed), Some(limit)) => {
                let _ = write!(out, " (observed {observed}, limit {limit})");
            }
            (Some(observed), None) => {
                let _ = write!(out, " ({observed})");
            }
            _ => {}
        }
        if let Some(note) = &entry.note {
            let _ = write!(out, " - {note}");
        }
        out.push('\n');
    }
    out
}

pub(crate) fn run_rules_list(args: RulesListArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let path = args.rules.unwrap_or(config.data.rules_path);
    let table = RuleTable::from_path(&path)?;

    let rules = match args.structure_type.as_deref() {
        Some(structure) => table.relevant_by_label(structure, args.category.as_deref()),
        None => table.rules().iter().collect(),
    };
    if rules.is_empty() {
        return Err(AppError::NotFound(format!(
            "rules for {}",
            args.structure_type.as_deref().unwrap_or("any structure type")
        )));
    }

    println!("{} rule(s) from {}", rules.len(), path.display());
    for rule in rules {
        println!(
            "{:<16} {:<30} {:<26} {}",
            rule.clause_reference,
            rule.structure_type.label(),
            rule.category.label(),
            rule.plain_text
        );
    }
    Ok(())
}

pub(crate) fn run_checkpoints_list(args: CheckpointListArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = FileAuditStore::new(args.dir.unwrap_or(config.data.checkpoint_dir));
    let summaries = store.list()?;

    if summaries.is_empty() {
        println!("No checkpoints in {}", store.directory().display());
        return Ok(());
    }
    for summary in summaries.iter().take(args.limit) {
        println!(
            "{}  {}  {}",
            summary.id,
            summary.timestamp.to_rfc3339(),
            summary.classification.as_deref().unwrap_or("unknown")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/sepp-exempt-dev-rules.csv");
    const REQUEST: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/timber-shed-bushfire.json");

    fn outcome() -> AssessmentOutcome {
        let catalog = Arc::new(RuleCatalog::with_table(
            RULES,
            RuleTable::from_path(RULES).expect("rule table"),
        ));
        let body = std::fs::read(REQUEST).expect("demo request");
        let submission: AssessmentSubmission = serde_json::from_slice(&body).expect("request json");
        assess_with(catalog, Arc::new(InMemoryAuditStore::default()), &submission).expect("valid request")
    }

    #[test]
    fn checkpointed_assessments_land_on_disk() {
        let dir = std::env::temp_dir().join(format!("backyard-bud-report-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let store = Arc::new(FileAuditStore::new(&dir));
        let catalog = Arc::new(RuleCatalog::with_table(
            RULES,
            RuleTable::from_path(RULES).expect("rule table"),
        ));
        let body = std::fs::read(REQUEST).expect("demo request");
        let submission: AssessmentSubmission = serde_json::from_slice(&body).expect("request json");

        let outcome = assess_with(catalog, store.clone(), &submission).expect("valid request");
        let saved = store
            .load(&outcome.metadata.checkpoint_id)
            .expect("readable")
            .expect("written before returning");
        assert_eq!(saved.output["classification"], "conditional");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn text_report_lists_conditions_and_citations() {
        let report = render_assessment(&outcome());

        assert!(report.starts_with("Assessment: Conditional Approval\n"));
        assert!(report.contains("Property: 45 Table Top Road TABLE TOP NSW 2640"));
        assert!(report.contains("Issues: none"));
        assert!(report.contains("- Non-combustible materials mandatory"));
        assert!(report.contains("[CONDITIONAL] 2.18(1)(i)"));
        assert!(report.contains("(observed 45m², limit 50m²)"));
    }
}
