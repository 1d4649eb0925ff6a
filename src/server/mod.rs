//! JSON content API with a static asset fallback

use axum::{
    extract::{Path as UrlPath, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::content::{query, ContentItem, ContentStore, SnapshotCache};
use crate::helpers::lang::ext_to_mime;
use crate::Folio;

/// Server state shared across handlers. The snapshot cache lives here -
/// it spans requests but dies with the process.
struct AppState {
    store: ContentStore,
    cache: SnapshotCache,
}

/// API failures that map straight to HTTP responses
#[derive(Debug, Error)]
enum ApiError {
    #[error("{0} not found")]
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    /// Comma-separated tag set; items must carry every tag
    tags: Option<String>,
    slug: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FilesQuery {
    dir: Option<String>,
}

/// Start the content API server
pub async fn start(folio: &Folio, ip: &str, port: u16) -> anyhow::Result<()> {
    let state = Arc::new(AppState {
        store: folio.store(),
        cache: SnapshotCache::new(),
    });

    let mut app = Router::new()
        .route("/api/files", get(list_files))
        .route("/api/:category", get(list_category))
        .route("/api/:category/:slug", get(get_item))
        .route("/api/:category/:slug/raw", get(get_item_raw))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if folio.public_dir.is_dir() {
        let assets = ServeDir::new(&folio.public_dir).append_index_html_on_directories(true);
        app = app.fallback_service(assets);
    }

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Content API running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// GET /api/:category - date-sorted snapshot with optional filters
async fn list_category(
    State(state): State<Arc<AppState>>,
    UrlPath(category): UrlPath<String>,
    Query(params): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let snapshot = state.cache.get(&state.store, &category);
    let items = query::sort_by_date(&snapshot);

    if let Some(slug) = &params.slug {
        let item = query::find_by_slug(&items, slug)
            .ok_or_else(|| ApiError::NotFound(format!("item '{}'", slug)))?;
        return Ok(Json(item).into_response());
    }

    let items = query::filter_by_date(&items, params.year, params.month, params.day);
    let items = match &params.tags {
        Some(raw) => {
            let wanted: Vec<String> = raw
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
            query::filter_by_tags(&items, &wanted)
        }
        None => items,
    };

    Ok(Json(items).into_response())
}

/// GET /api/:category/:slug - one item
async fn get_item(
    State(state): State<Arc<AppState>>,
    UrlPath((category, slug)): UrlPath<(String, String)>,
) -> Result<Json<ContentItem>, ApiError> {
    let snapshot = state.cache.get(&state.store, &category);
    let item = query::find_by_slug(&snapshot, &slug)
        .ok_or_else(|| ApiError::NotFound(format!("item '{}'", slug)))?;
    Ok(Json(item.clone()))
}

/// GET /api/:category/:slug/raw - unparsed source with its MIME type
async fn get_item_raw(
    State(state): State<Arc<AppState>>,
    UrlPath((category, slug)): UrlPath<(String, String)>,
) -> Result<Response, ApiError> {
    let snapshot = state.cache.get(&state.store, &category);
    let item = query::find_by_slug(&snapshot, &slug)
        .ok_or_else(|| ApiError::NotFound(format!("item '{}'", slug)))?;

    let ext = item
        .path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let raw = state.store.read_file(&item.path).raw;

    Ok(([(header::CONTENT_TYPE, ext_to_mime(ext))], raw).into_response())
}

/// GET /api/files - recursive content path enumeration
async fn list_files(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilesQuery>,
) -> Json<Vec<String>> {
    Json(state.store.walk_files(params.dir.as_deref().unwrap_or("")))
}
