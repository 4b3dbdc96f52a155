use std::path::Path;

use axum::Router;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware::map_response;
use axum::response::{IntoResponse, Response};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use axum::routing::{delete, get, post};

use crate::config::CorsConfig;
use crate::error::ApiError;
use crate::server::routes;
use crate::server::state::AppState;
use crate::uploads::UPLOAD_MAX_BYTES;

pub fn build_router(state: AppState, public_dir: Option<&Path>) -> Router {
    let mut app = Router::new()
        .route("/health", get(routes::health))
        .route("/api/config", get(routes::config))
        .route("/api/send", post(routes::send))
        .route("/api/history", get(routes::history))
        .route("/api/history/{id}", delete(routes::delete_history));

    if let Some(dir) = public_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    let cors_layer = build_cors_layer(
        state
            .server_config
            .as_ref()
            .and_then(|config| config.cors.as_ref()),
    );

    let app = app
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Upload cap plus headroom for the multipart framing.
        .layer(RequestBodyLimitLayer::new(UPLOAD_MAX_BYTES + 1024 * 1024))
        .layer(map_response(oversize_body_as_json));
    app.layer(cors_layer)
}

/// The body-limit layer answers with a bare 413; rewrite it into the same
/// JSON error shape the upload checks use.
async fn oversize_body_as_json(response: Response) -> Response {
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::Upload("uploaded file is too large; the limit is 5MB".to_string())
            .into_response();
    }
    response
}

fn build_cors_layer(config: Option<&CorsConfig>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);
    let Some(config) = config else {
        return layer.allow_origin(Any);
    };
    if config.allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let origins = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    layer.allow_origin(origins)
}
