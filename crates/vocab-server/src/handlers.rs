use std::io::ErrorKind;
use std::path::Path as FsPath;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tracing::{error, warn};
use vocab_corpus::{COMBINED_SECTION, Catalog, DataRoot, is_valid_section_name};
use vocab_types::{Dialect, Variety};

const NOT_FOUND_BODY: &str = "File not found";
const INTERNAL_BODY: &str = "Error reading/parsing file";

#[derive(Clone)]
pub struct AppState {
    pub root: Arc<DataRoot>,
    pub catalog: Arc<Catalog>,
    pub disable_cache: bool,
}

#[derive(Serialize)]
pub struct DialectListing {
    dialect: Dialect,
    variety: Variety,
    sections: Vec<String>,
    merged: bool,
}

#[derive(Serialize)]
pub struct CatalogResponse {
    dialects: Vec<DialectListing>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    let vocab = Router::new()
        .route("/vocab", get(catalog))
        .route("/vocab/{section}", get(legacy_section))
        .route("/vocab/{dialect}/{section}", get(dialect_section))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/robots.txt", get(robots))
        .route("/healthz", get(healthz))
        .merge(vocab)
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn robots(State(state): State<AppState>) -> Response {
    let headers = axum::http::HeaderMap::from_iter([
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        ),
        (
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=86400, immutable"),
        ),
    ]);
    if state.disable_cache {
        return "User-agent: *\nDisallow: /".into_response();
    }
    (headers, "User-agent: *\nDisallow: /").into_response()
}

/// Sections on the legacy flat namespace, `<root>/json/<section>.json`.
async fn legacy_section(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Result<Response, ApiError> {
    check_section(&section)?;
    let body = read_json(&state.root.legacy_json(&section)).await?;
    Ok(with_cache_headers(&state, Json(body)))
}

async fn dialect_section(
    State(state): State<AppState>,
    Path((dialect, section)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let dialect = Dialect::from_slug(&dialect)
        .filter(|d| state.catalog.contains(*d))
        .ok_or_else(|| {
            warn!("unknown dialect `{dialect}`");
            ApiError::NotFound
        })?;
    check_section(&section)?;
    let body = read_json(&state.root.section_json(dialect, &section)).await?;
    Ok(with_cache_headers(&state, Json(body)))
}

async fn catalog(State(state): State<AppState>) -> Result<Response, ApiError> {
    let root = Arc::clone(&state.root);
    let catalog = Arc::clone(&state.catalog);
    let dialects = tokio::task::spawn_blocking(move || list_dialects(&root, &catalog))
        .await
        .map_err(|err| {
            error!("catalog listing task failed: {err}");
            ApiError::Internal
        })?;
    Ok(with_cache_headers(&state, Json(CatalogResponse { dialects })))
}

fn list_dialects(root: &DataRoot, catalog: &Catalog) -> Vec<DialectListing> {
    catalog
        .dialects()
        .into_iter()
        .map(|dialect| {
            let sections = match catalog.sections_for(dialect) {
                Some(listed) => listed.to_vec(),
                None => root.discover_sections(dialect).unwrap_or_default(),
            };
            DialectListing {
                dialect,
                variety: dialect.variety(),
                sections,
                merged: root.section_json(dialect, COMBINED_SECTION).is_file(),
            }
        })
        .collect()
}

fn check_section(section: &str) -> Result<(), ApiError> {
    if is_valid_section_name(section) {
        Ok(())
    } else {
        Err(ApiError::bad_request(
            "section names may only contain letters, digits, '_' and '-'",
        ))
    }
}

async fn read_json(path: &FsPath) -> Result<Value, ApiError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!("{} not found", path.display());
            return Err(ApiError::NotFound);
        }
        Err(err) => {
            error!("failed to read {}: {err}", path.display());
            return Err(ApiError::Internal);
        }
    };
    serde_json::from_slice(&bytes).map_err(|err| {
        error!("failed to parse {}: {err}", path.display());
        ApiError::Internal
    })
}

fn with_cache_headers(state: &AppState, body: impl IntoResponse) -> Response {
    if state.disable_cache {
        return body.into_response();
    }
    (
        [(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=300"),
        )],
        body,
    )
        .into_response()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("file not found")]
    NotFound,
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                let body = Json(ErrorResponse { error: msg });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response(),
            ApiError::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_BODY).into_response()
            }
        }
    }
}
