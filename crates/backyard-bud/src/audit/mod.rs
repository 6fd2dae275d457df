//! Checkpoint trail: one `{id, timestamp, input, output}` bundle per assessment.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path as FsPath, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::AppError;

const CHECKPOINT_SUFFIX: &str = ".checkpoint.json";

static CHECKPOINT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_checkpoint_id(timestamp: &DateTime<Utc>) -> String {
    let sequence = CHECKPOINT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}-{sequence:04}", timestamp.format("%Y%m%d%H%M%S"))
}

/// Opaque bundle handed to the store; the engine never reads it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub input: Value,
    pub output: Value,
}

impl AuditRecord {
    pub fn new<I: Serialize, O: Serialize>(input: &I, output: &O) -> Self {
        Self::at(Utc::now(), input, output)
    }

    pub fn at<I: Serialize, O: Serialize>(timestamp: DateTime<Utc>, input: &I, output: &O) -> Self {
        Self {
            id: next_checkpoint_id(&timestamp),
            timestamp,
            input: to_value(input),
            output: to_value(output),
        }
    }

    pub fn summary(&self) -> AuditSummary {
        AuditSummary {
            id: self.id.clone(),
            timestamp: self.timestamp,
            classification: self
                .output
                .get("classification")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|err| serde_json::json!({ "unserializable": err.to_string() }))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub classification: Option<String>,
}

/// Persistence seam for checkpoints so handlers can be exercised without a filesystem.
pub trait AuditStore: Send + Sync {
    fn record(&self, record: &AuditRecord) -> Result<(), AuditError>;

    /// Summaries, newest first.
    fn list(&self) -> Result<Vec<AuditSummary>, AuditError>;

    /// `Ok(None)` when no checkpoint carries `id`.
    fn load(&self, id: &str) -> Result<Option<AuditRecord>, AuditError>;
}

pub fn sort_newest_first(summaries: &mut [AuditSummary]) {
    summaries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id)));
}

/// Ids are `<yyyymmddHHMMSS>-<seq>`; anything else cannot name a checkpoint file.
fn is_checkpoint_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_digit() || c == '-')
}

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("checkpoint io failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("checkpoint encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("checkpoint store unavailable: {0}")]
    Unavailable(String),
}

/// Stores each checkpoint as pretty JSON under a directory, creating it on first write.
#[derive(Debug, Clone)]
pub struct FileAuditStore {
    directory: PathBuf,
}

impl FileAuditStore {
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &FsPath {
        &self.directory
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.directory.join(format!("{id}{CHECKPOINT_SUFFIX}"))
    }
}

fn read_record(path: &FsPath) -> Result<AuditRecord, AuditError> {
    let bytes = fs::read(path).map_err(|source| AuditError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_slice(&bytes)?)
}

impl AuditStore for FileAuditStore {
    fn record(&self, record: &AuditRecord) -> Result<(), AuditError> {
        fs::create_dir_all(&self.directory).map_err(|source| AuditError::Io {
            path: self.directory.display().to_string(),
            source,
        })?;
        let path = self.path_for(&record.id);
        let body = serde_json::to_vec_pretty(record)?;
        fs::write(&path, body).map_err(|source| AuditError::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), "checkpoint written");
        Ok(())
    }

    /// Unreadable files are skipped with a warning.
    fn list(&self) -> Result<Vec<AuditSummary>, AuditError> {
        if !self.directory.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.directory).map_err(|source| AuditError::Io {
            path: self.directory.display().to_string(),
            source,
        })?;

        let mut summaries = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let is_checkpoint = path
                .file_name()
                .and_then(|name| name.to_str())
                .map_or(false, |name| name.ends_with(CHECKPOINT_SUFFIX));
            if !is_checkpoint {
                continue;
            }
            match read_record(&path) {
                Ok(record) => summaries.push(record.summary()),
                Err(err) => warn!(path = %path.display(), error = %err, "skipping unreadable checkpoint"),
            }
        }

        sort_newest_first(&mut summaries);
        Ok(summaries)
    }

    fn load(&self, id: &str) -> Result<Option<AuditRecord>, AuditError> {
        if !is_checkpoint_id(id) {
            return Ok(None);
        }
        match read_record(&self.path_for(id)) {
            Ok(record) => Ok(Some(record)),
            Err(AuditError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Read-only routes over the checkpoint trail.
pub fn checkpoint_router<S>(store: Arc<S>) -> Router
where
    S: AuditStore + 'static,
{
    Router::new()
        .route("/api/checkpoints", get(list_handler::<S>))
        .route("/api/checkpoints/:id", get(load_handler::<S>))
        .with_state(store)
}

async fn blocking<S, T, F>(store: Arc<S>, read: F) -> Result<T, AuditError>
where
    S: AuditStore + 'static,
    T: Send + 'static,
    F: FnOnce(&S) -> Result<T, AuditError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || read(store.as_ref()))
        .await
        .map_err(|err| AuditError::Unavailable(err.to_string()))?
}

pub(crate) async fn list_handler<S>(State(store): State<Arc<S>>) -> Result<Response, AppError>
where
    S: AuditStore + 'static,
{
    let checkpoints = blocking(store, |store| store.list()).await?;
    let payload = json!({
        "success": true,
        "count": checkpoints.len(),
        "checkpoints": checkpoints,
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}

pub(crate) async fn load_handler<S>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<Response, AppError>
where
    S: AuditStore + 'static,
{
    let lookup = id.clone();
    match blocking(store, move |store| store.load(&lookup)).await? {
        Some(record) => Ok((StatusCode::OK, Json(json!({ "success": true, "checkpoint": record }))).into_response()),
        None => Err(AppError::NotFound(format!("checkpoint {id}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::TimeZone;
    use serde_json::json;
    use tower::ServiceExt;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("backyard-bud-audit-{}-{name}", std::process::id()))
    }

    #[test]
    fn ids_embed_timestamp_and_are_unique() {
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).single().expect("valid");
        let first = AuditRecord::at(at, &json!({}), &json!({}));
        let second = AuditRecord::at(at, &json!({}), &json!({}));
        assert!(first.id.starts_with("20250314092653-"));
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn file_store_round_trips_and_lists_newest_first() {
        let dir = temp_dir("list");
        let _ = fs::remove_dir_all(&dir);
        let store = FileAuditStore::new(&dir);

        let older = AuditRecord::at(
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().expect("valid"),
            &json!({"property": {"zone_type": "R1"}}),
            &json!({"classification": "approved"}),
        );
        let newer = AuditRecord::at(
            Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).single().expect("valid"),
            &json!({"property": {"zone_type": "RU4"}}),
            &json!({"classification": "non_exempt"}),
        );
        store.record(&older).expect("write older");
        store.record(&newer).expect("write newer");
        fs::write(dir.join("notes.txt"), "ignored").expect("stray file");

        let summaries = store.list().expect("list");
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, newer.id);
        assert_eq!(summaries[0].classification.as_deref(), Some("non_exempt"));
        assert_eq!(store.load(&older.id).expect("load"), Some(older));
        assert_eq!(store.load("20990101000000-0001").expect("load"), None);
        assert_eq!(store.load("../etc/passwd").expect("load"), None);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn listing_missing_directory_is_empty() {
        let store = FileAuditStore::new(temp_dir("missing"));
        assert!(store.list().expect("list").is_empty());
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn checkpoint_routes_list_and_load_records() {
        let dir = temp_dir("routes");
        let _ = fs::remove_dir_all(&dir);
        let store = Arc::new(FileAuditStore::new(&dir));
        let record = AuditRecord::at(
            Utc.with_ymd_and_hms(2025, 2, 1, 8, 30, 0).single().expect("valid"),
            &json!({"userInputs": {"structure_type": "carports"}}),
            &json!({"classification": "conditional"}),
        );
        store.record(&record).expect("write");
        let router = checkpoint_router(store);

        let (status, payload) = get_json(router.clone(), "/api/checkpoints").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["count"], 1);
        assert_eq!(payload["checkpoints"][0]["classification"], "conditional");

        let (status, payload) = get_json(router.clone(), &format!("/api/checkpoints/{}", record.id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["checkpoint"]["input"]["userInputs"]["structure_type"], "carports");

        let (status, _) = get_json(router, "/api/checkpoints/20990101000000-0001").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let _ = fs::remove_dir_all(&dir);
    }
}
