use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::record::{FileDetails, FileListing};
use crate::server::AppState;
use crate::sheet;
use crate::storage::RegistryStore;
use crate::unify::Unifier;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Deserialize)]
pub struct UnifyParams {
    pub ids: String,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct FilterParams {
    pub columns: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type RouteError = (StatusCode, Json<ErrorResponse>);

fn internal_error(err: impl std::fmt::Display) -> RouteError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

fn not_found(message: &str) -> RouteError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

fn bad_request(message: &str) -> RouteError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

/// Request-scoped store connection, released when the handler returns.
fn open_store(state: &AppState) -> Result<RegistryStore, RouteError> {
    RegistryStore::open(&state.database_path).map_err(internal_error)
}

fn attachment(bytes: Vec<u8>, filename: &str) -> Response {
    let headers = [
        (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];
    (headers, bytes).into_response()
}

pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, RouteError> {
    let database = match open_store(&state).and_then(|store| store.ping().map_err(internal_error)) {
        Ok(()) => "connected",
        Err(_) => "error",
    };
    Ok(Json(serde_json::json!({
        "status": "ok",
        "database": database,
    })))
}

pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FileListing>>, RouteError> {
    let store = open_store(&state)?;
    let listings = store
        .list_all()
        .map_err(internal_error)?
        .iter()
        .map(|r| r.listing())
        .collect();
    Ok(Json(listings))
}

pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<FileDetails>, RouteError> {
    let store = open_store(&state)?;
    let record = store
        .find_by_id(id)
        .map_err(internal_error)?
        .ok_or_else(|| not_found("File not found"))?;
    Ok(Json(record.details()))
}

pub async fn search_files(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<FileListing>>, RouteError> {
    let term = match params.q.as_deref() {
        Some(q) if !q.trim().is_empty() => q.trim().to_string(),
        _ => return Err(bad_request("Missing search term")),
    };

    let store = open_store(&state)?;
    let listings = store
        .search_by_name(&term)
        .map_err(internal_error)?
        .iter()
        .map(|r| r.listing())
        .collect();
    Ok(Json(listings))
}

pub async fn file_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<crate::storage::RegistryStats>, RouteError> {
    let store = open_store(&state)?;
    let stats = store.stats().map_err(internal_error)?;
    Ok(Json(stats))
}

/// The merge endpoint. Keeps the inherited contract: a loadable selection
/// streams back as an xlsx attachment; an empty one answers 200 with the
/// `{"error": "No valid files"}` payload rather than an error status.
pub async fn unify_files(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UnifyParams>,
) -> Result<Response, RouteError> {
    let store = open_store(&state)?;
    let outcome = Unifier::new(&store)
        .unify(&params.ids)
        .map_err(internal_error)?;

    let Some(table) = outcome.table else {
        tracing::warn!(ids = %params.ids, "unify request matched no loadable files");
        return Ok(Json(ErrorResponse {
            error: "No valid files".to_string(),
        })
        .into_response());
    };

    tracing::info!(
        rows = table.row_count(),
        loaded = outcome.loaded.len(),
        skipped = outcome.skipped.len(),
        "unified selection"
    );

    let bytes = sheet::xlsx_bytes(&table).map_err(internal_error)?;
    Ok(attachment(bytes, "unified.xlsx"))
}

/// Dry-run of unify: same resolution and merge, answered as a JSON report
/// of what loaded and what was skipped instead of the binary.
pub async fn unify_report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UnifyParams>,
) -> Result<Json<serde_json::Value>, RouteError> {
    let store = open_store(&state)?;
    let outcome = Unifier::new(&store)
        .unify(&params.ids)
        .map_err(internal_error)?;

    let columns = outcome
        .table
        .as_ref()
        .map(|t| t.columns().to_vec())
        .unwrap_or_default();

    Ok(Json(serde_json::json!({
        "rows": outcome.row_count(),
        "columns": columns,
        "loaded": outcome.loaded,
        "skipped": outcome.skipped,
    })))
}

/// Project one registered file onto a subset of its columns.
pub async fn filter_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(params): Query<FilterParams>,
) -> Result<Response, RouteError> {
    let requested: Vec<&str> = params
        .columns
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if requested.is_empty() {
        return Err(bad_request("At least one column is required"));
    }

    let store = open_store(&state)?;
    let record = store
        .find_by_id(id)
        .map_err(internal_error)?
        .ok_or_else(|| not_found("File not found"))?;

    if !record.exists_on_disk() {
        return Err(not_found("File missing on disk"));
    }

    let table =
        sheet::load_table(std::path::Path::new(&record.filepath)).map_err(internal_error)?;
    let filtered = table
        .project(&requested)
        .map_err(|e| bad_request(&e.to_string()))?;
    let bytes = sheet::xlsx_bytes(&filtered).map_err(internal_error)?;

    let stem = std::path::Path::new(&record.filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("file");
    Ok(attachment(bytes, &format!("{}_filtered.xlsx", stem)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn seeded_state(dir: &TempDir) -> (Arc<AppState>, i64, i64) {
        let database_path = dir.path().join("registry.db");
        let store = RegistryStore::open(&database_path).unwrap();

        let csv_a = dir.path().join("a.csv");
        std::fs::File::create(&csv_a)
            .unwrap()
            .write_all(b"A,B\n1,2\n3,4\n5,6\n")
            .unwrap();
        let csv_b = dir.path().join("b.csv");
        std::fs::File::create(&csv_b)
            .unwrap()
            .write_all(b"A,B\n7,8\n9,10\n11,12\n13,14\n")
            .unwrap();

        let a = store.insert("a.csv", csv_a.to_str().unwrap()).unwrap();
        let b = store.insert("b.csv", csv_b.to_str().unwrap()).unwrap();
        (Arc::new(AppState { database_path }), a, b)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_list_files_hides_filepath() {
        let dir = tempfile::tempdir().unwrap();
        let (state, a, _) = seeded_state(&dir);

        let Json(listings) = list_files(State(state)).await.unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].id, a);

        let json = serde_json::to_value(&listings).unwrap();
        assert!(json[0].get("filepath").is_none());
    }

    #[tokio::test]
    async fn test_unify_returns_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let (state, a, b) = seeded_state(&dir);

        let response = unify_files(
            State(state),
            Query(UnifyParams {
                ids: format!("{},{}", a, b),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            XLSX_CONTENT_TYPE
        );
        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"unified.xlsx\""
        );
    }

    #[tokio::test]
    async fn test_unify_no_valid_files_payload() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _, _) = seeded_state(&dir);

        let response = unify_files(
            State(state),
            Query(UnifyParams {
                ids: "999".to_string(),
            }),
        )
        .await
        .unwrap();

        // inherited contract: 200 with an error body, not an error status
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!({"error": "No valid files"}));
    }

    #[tokio::test]
    async fn test_unify_report_lists_loaded_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let (state, a, _) = seeded_state(&dir);

        let Json(report) = unify_report(
            State(state),
            Query(UnifyParams {
                ids: format!("abc,,{}", a),
            }),
        )
        .await
        .unwrap();

        assert_eq!(report["rows"], 3);
        assert_eq!(report["loaded"].as_array().unwrap().len(), 1);
        assert_eq!(report["skipped"].as_array().unwrap().len(), 2);
        assert_eq!(report["skipped"][0]["reason"], "malformed_token");
    }

    #[tokio::test]
    async fn test_get_file_detail_and_404() {
        let dir = tempfile::tempdir().unwrap();
        let (state, a, _) = seeded_state(&dir);

        let Json(details) = get_file(State(state.clone()), Path(a)).await.unwrap();
        assert_eq!(details.filename, "a.csv");
        assert!(details.available);
        assert!(details.size > 0);

        let err = get_file(State(state), Path(999)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_search_requires_term() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _, _) = seeded_state(&dir);

        let err = search_files(State(state.clone()), Query(SearchParams { q: None }))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);

        let Json(hits) = search_files(
            State(state),
            Query(SearchParams {
                q: Some("a.csv".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_filter_projects_columns() {
        let dir = tempfile::tempdir().unwrap();
        let (state, a, _) = seeded_state(&dir);

        let response = filter_file(
            State(state.clone()),
            Path(a),
            Query(FilterParams {
                columns: "B".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"a_filtered.xlsx\""
        );

        let err = filter_file(
            State(state),
            Path(a),
            Query(FilterParams {
                columns: "nope".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_reports_database() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _, _) = seeded_state(&dir);

        let Json(body) = health(State(state)).await.unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_stats_route() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _, _) = seeded_state(&dir);

        let Json(stats) = file_stats(State(state)).await.unwrap();
        assert_eq!(stats.total, 2);
        assert!(stats.total_size > 0);
    }

    #[test]
    fn test_router_builds() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState {
            database_path: dir.path().join("registry.db"),
        });
        let _router = crate::server::build_router(state);
    }
}
