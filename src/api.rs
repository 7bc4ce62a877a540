use crate::document::SearchHit;
use crate::error::IndexError;
use crate::index::{Index, IndexStats, SearchOptions};
use crate::tools::{count_characters, ReaderClient};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared, read-only server state
pub struct AppState {
    pub index: Index,
    pub reader: ReaderClient,
    pub default_results: usize,
}

// ========== Request/Response Types ==========

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub filters: HashMap<String, String>,
    #[serde(default)]
    pub boosts: HashMap<String, f64>,
    #[serde(default)]
    pub num_results: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
pub struct CountRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub url: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

impl ApiResponse<()> {
    fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

// ========== Error Handling ==========

struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<IndexError>() {
            Some(IndexError::MissingField { .. }) => StatusCode::BAD_REQUEST,
            Some(IndexError::NotFitted) => StatusCode::SERVICE_UNAVAILABLE,
            None => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = format!("{:#}", self.0);
        tracing::error!("API error: {}", message);

        (status, Json(ApiResponse::error(message))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// ========== Handlers ==========

async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::success("OK"))
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<IndexStats>> {
    Json(ApiResponse::success(state.index.stats()))
}

async fn search_documents(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<ApiResponse<SearchResponse>>, AppError> {
    let options = SearchOptions {
        filters: req.filters,
        boosts: req.boosts,
        num_results: req.num_results.unwrap_or(state.default_results),
    };

    let results = state.index.search(&req.query, &options)?;

    Ok(Json(ApiResponse::success(SearchResponse {
        query: req.query,
        total: results.len(),
        results,
    })))
}

async fn count_characters_tool(Json(req): Json<CountRequest>) -> Json<ApiResponse<CountResponse>> {
    Json(ApiResponse::success(CountResponse {
        count: count_characters(&req.text),
    }))
}

async fn download_content_tool(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DownloadRequest>,
) -> Result<Json<ApiResponse<DownloadResponse>>, AppError> {
    let content = state.reader.download_content(&req.url).await?;

    Ok(Json(ApiResponse::success(DownloadResponse {
        url: req.url,
        content,
    })))
}

// ========== Router ==========

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/stats", get(get_stats))
        .route("/search", post(search_documents))
        .route("/tools/count_characters", post(count_characters_tool))
        .route("/tools/download_content", post(download_content_tool))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
