use std::io::Cursor;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Value};

use crate::assessment::{
    AssessmentEngine, AssessmentResult, AssessmentService, ComplianceStatus, LegislationEntry,
    Property, Proposal,
};
use crate::audit::{sort_newest_first, AuditError, AuditRecord, AuditStore, AuditSummary};
use crate::rules::{RuleCatalog, RuleTable, StructureType};

pub(super) const RULES_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/sepp-exempt-dev-rules.csv");

pub(super) fn rule_table() -> RuleTable {
    RuleTable::from_path(RULES_PATH).expect("bundled rule table")
}

pub(super) fn table_from(csv: &str) -> RuleTable {
    RuleTable::from_reader(Cursor::new(csv.to_string())).expect("inline rule table")
}

pub(super) fn engine() -> AssessmentEngine {
    AssessmentEngine::new(Arc::new(rule_table()))
}

pub(super) fn property(zone: &str, area: f64) -> Property {
    Property {
        zone_type: zone.to_string(),
        area_total: area,
        heritage_overlay: false,
        bushfire_prone: false,
        has_environmental_overlay: false,
        has_easement: false,
        flood_overlay: false,
    }
}

pub(super) fn urban_lot() -> Property {
    property("R1", 800.0)
}

pub(super) fn rural_bushfire_lot() -> Property {
    Property {
        bushfire_prone: true,
        ..property("RU4", 66_900.0)
    }
}

/// A proposal that passes every check on an urban lot.
pub(super) fn proposal(structure: StructureType) -> Proposal {
    Proposal {
        dwelling_distance: Some(10.0),
        ..Proposal::new(structure, 15.0, 2.5, 2.0)
    }
}

pub(super) fn garden() -> Proposal {
    proposal(StructureType::GardenStructuresAndStorage)
}

pub(super) fn entries<'a>(result: &'a AssessmentResult, clause: &str) -> Vec<&'a LegislationEntry> {
    result
        .legislation_applied
        .iter()
        .filter(|entry| entry.clause_reference == clause)
        .collect()
}

pub(super) fn status_of(result: &AssessmentResult, clause: &str) -> ComplianceStatus {
    let found = entries(result, clause);
    assert_eq!(found.len(), 1, "expected one entry for {clause}");
    found[0].status
}

pub(super) fn scenario_one_json() -> Value {
    json!({
        "property": {
            "short_address": "553 Kiewa Street ALBURY NSW 2640",
            "zone_type": "R1",
            "area_total": 800,
            "heritage_overlay": false,
            "bushfire_prone": false,
            "has_environmental_overlay": false,
            "has_easement": false,
            "flood_overlay": false
        },
        "userInputs": {
            "structure_type": "Garden Structures & Storage",
            "floor_area": 15,
            "height": 2.5,
            "boundary_distance": 2,
            "dwelling_distance": 10,
            "tree_removal": false,
            "asbestos_type": "A",
            "stormwater_connected": true
        }
    })
}

#[derive(Default)]
pub(super) struct MemoryAudit {
    pub records: Mutex<Vec<AuditRecord>>,
}

impl AuditStore for MemoryAudit {
    fn record(&self, record: &AuditRecord) -> Result<(), AuditError> {
        self.records
            .lock()
            .expect("audit lock")
            .push(record.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<AuditSummary>, AuditError> {
        let mut summaries: Vec<_> = self
            .records
            .lock()
            .expect("audit lock")
            .iter()
            .map(AuditRecord::summary)
            .collect();
        sort_newest_first(&mut summaries);
        Ok(summaries)
    }

    fn load(&self, id: &str) -> Result<Option<AuditRecord>, AuditError> {
        let records = self.records.lock().expect("audit lock");
        Ok(records.iter().find(|record| record.id == id).cloned())
    }
}

pub(super) struct UnavailableAudit;

impl AuditStore for UnavailableAudit {
    fn record(&self, _record: &AuditRecord) -> Result<(), AuditError> {
        Err(AuditError::Unavailable("disk full".to_string()))
    }

    fn list(&self) -> Result<Vec<AuditSummary>, AuditError> {
        Err(AuditError::Unavailable("disk full".to_string()))
    }

    fn load(&self, _id: &str) -> Result<Option<AuditRecord>, AuditError> {
        Err(AuditError::Unavailable("disk full".to_string()))
    }
}

pub(super) fn build_service() -> (Arc<AssessmentService<MemoryAudit>>, Arc<MemoryAudit>) {
    let audit = Arc::new(MemoryAudit::default());
    let catalog = Arc::new(RuleCatalog::with_table(RULES_PATH, rule_table()));
    let service = Arc::new(AssessmentService::new(catalog, audit.clone()));
    (service, audit)
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}
