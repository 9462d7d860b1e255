// REST API with Axum
// POST /generate-article, GET /articles, GET /articles/:id

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::article::{AnalysisRequest, StoredArticle};
use crate::error::AppError;
use crate::service::ArticleService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: ArticleService,
}

impl AppState {
    pub fn new(service: ArticleService) -> Self {
        Self { service }
    }
}

/// Error body: `{"detail": "..."}`
#[derive(Debug, Serialize)]
struct ErrorDetail {
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorDetail {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /generate-article
async fn generate_article(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<(StatusCode, Json<StoredArticle>), AppError> {
    let article = state.service.generate_article(request).await?;
    Ok((StatusCode::CREATED, Json(article)))
}

/// GET /articles
async fn list_articles(State(state): State<AppState>) -> Result<Json<Vec<StoredArticle>>, AppError> {
    Ok(Json(state.service.list_articles().await?))
}

/// GET /articles/:id
async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredArticle>, AppError> {
    Ok(Json(state.service.get_article(&id).await?))
}

// ============================================================================
// Router
// ============================================================================

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/generate-article", post(generate_article))
        .route("/articles", get(list_articles))
        .route("/articles/:id", get(get_article))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ModelError, StorageError};

    #[test]
    fn test_not_found_maps_to_404() {
        let response = AppError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_errors_map_to_500() {
        let model = AppError::from(ModelError::EmptyResponse).into_response();
        assert_eq!(model.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let storage = AppError::from(StorageError::Poisoned).into_response();
        assert_eq!(storage.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_error_body_exposes_message() {
        let response = AppError::NotFound.into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["detail"], "Article not found");
    }
}
