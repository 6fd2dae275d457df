use super::{RuleTable, RuleTableError};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

/// Shared handle to the live rule table.
///
/// Readers clone the inner `Arc` and never hold the lock while assessing.
#[derive(Debug)]
pub struct RuleCatalog {
    path: PathBuf,
    current: RwLock<Arc<RuleTable>>,
}

impl RuleCatalog {
    /// Opens the catalog leniently, returning the load error alongside the (possibly empty)
    /// catalog so callers can surface it.
    pub fn open<P: Into<PathBuf>>(path: P) -> (Self, Option<RuleTableError>) {
        let path = path.into();
        let load = RuleTable::load(&path);
        (Self::with_table(path, load.table), load.error)
    }

    pub fn with_table<P: Into<PathBuf>>(path: P, table: RuleTable) -> Self {
        Self {
            path: path.into(),
            current: RwLock::new(Arc::new(table)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> Arc<RuleTable> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Builds a fresh table from the catalog path and swaps it in. On failure the
    /// previous table stays live.
    pub fn reload(&self) -> Result<Arc<RuleTable>, RuleTableError> {
        let table = match RuleTable::from_path(&self.path) {
            Ok(table) => Arc::new(table),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "rule reload failed; keeping current table");
                return Err(err);
            }
        };

        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = table.clone();
        info!(path = %self.path.display(), rules = table.len(), "rule table reloaded");
        Ok(table)
    }
}
