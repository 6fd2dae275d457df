//! Property lookup: the flat property table used to pre-fill assessment requests.

mod parser;

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Path as RoutePath, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::assessment::{Property, ValidationError};
use crate::error::AppError;

pub const SEARCH_LIMIT: usize = 10;
pub const MIN_QUERY_LEN: usize = 2;

/// One row of the property table, area already normalised to square metres.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyRecord {
    pub property_number: String,
    pub house_number: String,
    pub street_name: String,
    pub street_suffix: String,
    pub suburb: String,
    pub post_code: String,
    pub short_address: String,
    pub zone_type: String,
    pub zone_description: String,
    pub area_total: f64,
    pub heritage_overlay: bool,
    pub flood_overlay: bool,
    pub bushfire_prone: bool,
    pub has_environmental_overlay: bool,
    pub has_easement: bool,
}

impl PropertyRecord {
    /// The typed facts the engine consumes; display metadata is dropped.
    pub fn property(&self) -> Property {
        Property {
            zone_type: self.zone_type.clone(),
            area_total: self.area_total,
            heritage_overlay: self.heritage_overlay,
            bushfire_prone: self.bushfire_prone,
            has_environmental_overlay: self.has_environmental_overlay,
            has_easement: self.has_easement,
            flood_overlay: self.flood_overlay,
        }
    }

    fn matches(&self, needle: &str) -> bool {
        [
            &self.short_address,
            &self.street_name,
            &self.suburb,
            &self.house_number,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PropertyDirectoryError {
    #[error("failed to open property table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed property table: {0}")]
    Csv(#[from] csv::Error),
}

/// In-memory property table, loaded once.
#[derive(Debug, Clone, Default)]
pub struct PropertyDirectory {
    records: Vec<PropertyRecord>,
}

impl PropertyDirectory {
    pub fn from_records(records: Vec<PropertyRecord>) -> Self {
        Self { records }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PropertyDirectoryError> {
        Ok(Self::from_records(parser::parse_properties(reader)?))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PropertyDirectoryError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| PropertyDirectoryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let directory = Self::from_reader(file)?;
        info!(path = %path.display(), properties = directory.len(), "property table loaded");
        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Case-insensitive substring match, table order, at most [`SEARCH_LIMIT`] results.
    pub fn search(&self, query: &str) -> Vec<&PropertyRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.records
            .iter()
            .filter(|record| record.matches(&needle))
            .take(SEARCH_LIMIT)
            .collect()
    }

    pub fn find_by_property_number(&self, property_number: &str) -> Option<&PropertyRecord> {
        let wanted = property_number.trim();
        self.records
            .iter()
            .find(|record| record.property_number == wanted)
    }

    pub fn suburbs(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|record| record.suburb.as_str())
            .filter(|suburb| !suburb.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    q: String,
}

/// Router exposing property search, lookup and the suburb list.
pub fn property_router(directory: Arc<PropertyDirectory>) -> Router {
    Router::new()
        .route("/api/properties/search", get(search_handler))
        .route("/api/properties/suburbs", get(suburbs_handler))
        .route("/api/properties/number/:property_number", get(lookup_handler))
        .with_state(directory)
}

pub(crate) async fn search_handler(
    State(directory): State<Arc<PropertyDirectory>>,
    Query(params): Query<SearchParams>,
) -> Result<Response, AppError> {
    let query = params.q.trim();
    if query.chars().count() < MIN_QUERY_LEN {
        return Err(AppError::Validation(ValidationError::single(
            "q",
            format!("must be at least {MIN_QUERY_LEN} characters"),
        )));
    }

    let results = directory.search(query);
    let payload = json!({
        "query": query,
        "count": results.len(),
        "results": results,
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}

pub(crate) async fn suburbs_handler(State(directory): State<Arc<PropertyDirectory>>) -> Response {
    let suburbs = directory.suburbs();
    let payload = json!({
        "count": suburbs.len(),
        "suburbs": suburbs,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn lookup_handler(
    State(directory): State<Arc<PropertyDirectory>>,
    RoutePath(property_number): RoutePath<String>,
) -> Result<Response, AppError> {
    let record = directory
        .find_by_property_number(&property_number)
        .ok_or_else(|| AppError::NotFound(format!("property {property_number}")))?;
    let payload = json!({
        "property": record,
        "facts": record.property(),
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn directory() -> PropertyDirectory {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/properties.csv");
        PropertyDirectory::from_path(path).expect("bundled property table")
    }

    #[test]
    fn search_matches_address_fragments_case_insensitively() {
        let directory = directory();
        let hits = directory.search("kiewa");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].short_address, "553 Kiewa Street ALBURY NSW 2640");

        let albury: Vec<_> = directory
            .search("albury")
            .iter()
            .map(|record| record.property_number.as_str())
            .collect();
        assert_eq!(albury, ["100231", "100487", "306331"]);
    }

    #[test]
    fn search_is_capped() {
        let record = directory().records[0].clone();
        let many = PropertyDirectory::from_records(vec![record; 25]);
        assert_eq!(many.search("kiewa").len(), SEARCH_LIMIT);
        assert!(many.search("   ").is_empty());
    }

    #[test]
    fn records_expose_typed_property_facts() {
        let directory = directory();
        let record = directory.find_by_property_number("305920").expect("table top");
        let property = record.property();
        assert_eq!(property.zone_type, "RU4");
        assert!((property.area_total - 66_900.0).abs() < 1e-6);
        assert!(property.bushfire_prone);
        assert!(directory.find_by_property_number("999999").is_none());
    }

    #[test]
    fn suburbs_are_sorted_and_unique() {
        assert_eq!(
            directory().suburbs(),
            ["ALBURY", "EAST ALBURY", "LAVINGTON", "TABLE TOP", "THURGOONA"]
        );
    }

    #[tokio::test]
    async fn short_queries_are_rejected() {
        let router = property_router(Arc::new(directory()));
        let response = router
            .oneshot(
                Request::get("/api/properties/search?q=a")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(payload["details"][0]["field"], "q");
    }

    #[tokio::test]
    async fn search_route_returns_matches() {
        let router = property_router(Arc::new(directory()));
        let response = router
            .oneshot(
                Request::get("/api/properties/search?q=Lavington")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(payload["count"], 1);
        assert_eq!(payload["results"][0]["zone_type"], "R3");
        assert_eq!(payload["results"][0]["has_easement"], true);
    }

    #[tokio::test]
    async fn suburbs_route_lists_each_suburb_once() {
        let router = property_router(Arc::new(directory()));
        let response = router
            .oneshot(
                Request::get("/api/properties/suburbs")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(payload["count"], 5);
        assert_eq!(payload["suburbs"][0], "ALBURY");
    }

    #[tokio::test]
    async fn lookup_route_returns_record_or_not_found() {
        let router = property_router(Arc::new(directory()));
        let response = router
            .clone()
            .oneshot(
                Request::get("/api/properties/number/305920")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(payload["property"]["suburb"], "TABLE TOP");
        assert_eq!(payload["facts"]["zone_type"], "RU4");
        assert_eq!(payload["facts"]["bushfire_prone"], true);

        let response = router
            .oneshot(
                Request::get("/api/properties/number/999999")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
