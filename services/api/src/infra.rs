use backyard_bud::audit::{sort_newest_first, AuditError, AuditRecord, AuditStore, AuditSummary};
use backyard_bud::rules::RuleCatalog;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) catalog: Arc<RuleCatalog>,
}

/// Checkpoint store for `--ephemeral-checkpoints` runs and one-off CLI assessments.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAuditStore {
    records: Arc<Mutex<Vec<AuditRecord>>>,
}

impl AuditStore for InMemoryAuditStore {
    fn record(&self, record: &AuditRecord) -> Result<(), AuditError> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<AuditSummary>, AuditError> {
        let mut summaries: Vec<_> = self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(AuditRecord::summary)
            .collect();
        sort_newest_first(&mut summaries);
        Ok(summaries)
    }

    fn load(&self, id: &str) -> Result<Option<AuditRecord>, AuditError> {
        Ok(self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }
}
