//! Router, shared state and handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use config::Settings;
use prompt_template::{function_docs, PreviewRequest, TemplateEngine};
use serde_json::json;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::response::ApiError;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// State shared by all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub engine: TemplateEngine,
    pub max_template_bytes: usize,
}

/// Builds the router for `settings`, rendering with `engine`.
pub fn app(settings: &Settings, engine: TemplateEngine) -> Router {
    let state = Arc::new(AppState {
        engine,
        max_template_bytes: settings.max_template_bytes,
    });
    Router::new()
        .route(&settings.route("/control/template/preview"), post(preview))
        .route(&settings.route("/control/template/functions"), get(functions))
        .route(&settings.route("/health"), get(health))
        .fallback(not_found)
        .layer(TimeoutLayer::new(settings.request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn preview(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!("preview_request", %request_id);

    async move {
        let Json(request) = payload.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::too_large(rejection.body_text())
            } else {
                ApiError::bad_request(rejection.body_text())
            }
        })?;

        let size = request.effective_template().len();
        if size > state.max_template_bytes {
            return Err(ApiError::too_large(format!(
                "template is {} bytes, limit is {} bytes",
                size, state.max_template_bytes
            )));
        }

        let operation_type = request.operation_type.clone();
        let engine = state.engine.clone();
        let render_span = tracing::Span::current();
        let response = tokio::task::spawn_blocking(move || {
            let _entered = render_span.enter();
            engine.preview(&request)
        })
        .await
        .map_err(|e| ApiError::internal(format!("render task failed: {}", e)))?;
        tracing::info!(
            operation_type = operation_type.as_deref().unwrap_or(""),
            success = response.success,
            "preview rendered"
        );
        Ok(([(REQUEST_ID_HEADER, request_id)], Json(response)).into_response())
    }
    .instrument(span)
    .await
}

async fn functions() -> impl IntoResponse {
    Json(function_docs())
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> ApiError {
    ApiError::not_found("no such route")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_is_shareable() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<Arc<AppState>>();
    }

    #[test]
    fn app_builds_with_base_path() {
        let settings = Settings {
            base_path: "/api".into(),
            ..Settings::default()
        };
        let _router = app(&settings, TemplateEngine::new());
    }
}
