//! Admin HTTP surface over the auth config model.
//!
//! Routes:
//! - `GET /sources`: sources accepted by the active registry
//! - `GET /configs`: stored configs, secrets redacted
//! - `POST /configs/validate`: decode a submitted record
//! - `POST /registry/reload`: re-read the registry file and swap it in
//!
//! Handlers never authenticate anyone; they only expose the model.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, routing::get, routing::post};
use serde_json::{Value, json};

use crate::auth::{
    AuthConfigSet, AuthSourceRegistry, SharedRegistry, decode_with, encode, encode_redacted,
};

/// Shared state of the admin routes.
#[derive(Clone)]
pub struct AppState {
    /// Active source registry, swapped on reload.
    pub registry: Arc<SharedRegistry>,
    /// Stored configs loaded at startup.
    pub configs: Arc<AuthConfigSet>,
    /// Registry file re-read on reload; `None` means the built-in registry.
    pub registry_file: Option<PathBuf>,
}

/// Build the admin router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/sources", get(list_sources))
        .route("/configs", get(list_configs))
        .route("/configs/validate", post(validate_config))
        .route("/registry/reload", post(reload_registry))
        .with_state(state)
}

type ApiResponse = (StatusCode, Json<Value>);

fn error_response(status: StatusCode, message: &str) -> ApiResponse {
    (status, Json(json!({ "error": message })))
}

pub async fn list_sources(State(state): State<AppState>) -> Json<Vec<&'static str>> {
    Json(state.registry.snapshot().known_sources())
}

pub async fn list_configs(State(state): State<AppState>) -> Json<Vec<Value>> {
    Json(state.configs.iter().map(encode_redacted).collect())
}

pub async fn validate_config(
    State(state): State<AppState>,
    Json(record): Json<Value>,
) -> ApiResponse {
    let registry = state.registry.snapshot();
    match decode_with(&registry, &record) {
        Ok(config) => (StatusCode::OK, Json(encode(&config))),
        Err(e) => {
            tracing::warn!("rejected submitted auth config: {e}");
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
    }
}

#[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected
pub async fn reload_registry(State(state): State<AppState>) -> ApiResponse {
    let Some(path) = state.registry_file.clone() else {
        state.registry.reload(AuthSourceRegistry::builtin());
        return (
            StatusCode::OK,
            Json(json!(state.registry.snapshot().known_sources())),
        );
    };

    let registry = Arc::clone(&state.registry);
    let result = tokio::task::spawn_blocking(move || registry.reload_from(&path)).await;

    match result {
        Ok(Ok(current)) => (StatusCode::OK, Json(json!(current.known_sources()))),
        Ok(Err(e)) => {
            tracing::error!("Failed to reload auth source registry: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
        Err(e) => {
            tracing::error!("Registry reload task failed: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "registry reload failed")
        }
    }
}
