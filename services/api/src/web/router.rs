//! services/api/src/web/router.rs
//!
//! Assembles the complete Axum application: API routes, middleware, and Swagger UI.

use crate::error::ApiError;
use crate::web::{middleware::request_id, rest, state::AppState};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa_swagger_ui::SwaggerUi;

/// Recorded audio arrives inline as a data URI, so bodies can be large.
pub const BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Builds the router. Fails only if the configured CORS origin is not a valid header value.
pub fn create_router(app_state: Arc<AppState>) -> Result<Router, ApiError> {
    let origin = app_state
        .config
        .allowed_origin
        .parse::<HeaderValue>()
        .map_err(|e| {
            ApiError::Internal(format!(
                "Invalid ALLOWED_ORIGIN '{}': {}",
                app_state.config.allowed_origin, e
            ))
        })?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    let api_router = Router::new()
        .route("/api/answer", post(rest::answer_handler))
        .route("/api/adapt-to-emotion", post(rest::adapt_to_emotion_handler))
        .route("/api/summarize", post(rest::summarize_handler))
        .route("/api/imagine", post(rest::imagine_handler))
        .route("/api/speech-to-text", post(rest::speech_to_text_handler))
        .route("/api/text-to-speech", post(rest::text_to_speech_handler))
        .route("/api/translate", post(rest::translate_handler))
        .route("/api/usage-history", get(rest::usage_history_handler))
        .route("/api/languages", get(rest::languages_handler))
        .route("/health", get(rest::health_handler))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(request_id))
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    Ok(Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", rest::openapi_document())))
}
