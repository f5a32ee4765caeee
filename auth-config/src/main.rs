#![cfg_attr(test, allow(clippy::disallowed_methods))]
// Forbid unwrap() in production code to prevent panics from bad config files.
// Test code is allowed to use unwrap() for convenience.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use std::net::SocketAddr;
use std::sync::Arc;

use auth_config::{
    admin::{self, AppState},
    auth::{AuthSourceRegistry, SharedRegistry},
    config::ServerConfig,
    store,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_config=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: config_file={}, listen_port={}",
        config.config_file.display(),
        config.listen_port
    );

    let registry = match &config.registry_file {
        Some(path) => match AuthSourceRegistry::load(path) {
            Ok(registry) => registry,
            Err(e) => {
                tracing::error!("Failed to load auth source registry: {e}");
                std::process::exit(1);
            }
        },
        None => AuthSourceRegistry::builtin(),
    };
    tracing::info!(
        "Auth source registry: {}",
        registry.known_sources().join(", ")
    );

    // Stored configs are decoded once against the startup registry
    let configs = match store::load_config_set(&config.config_file, &registry) {
        Ok(configs) => configs,
        Err(e) => {
            tracing::error!("Failed to load auth configs: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(
        "Loaded {} auth configs ({} enabled)",
        configs.len(),
        configs.enabled().count()
    );

    let listen_port = config.listen_port;
    let state = AppState {
        registry: Arc::new(SharedRegistry::new(registry)),
        configs: Arc::new(configs),
        registry_file: config.registry_file,
    };

    let app = admin::router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], listen_port));
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind: {e}");
            std::process::exit(1);
        });

    axum::serve(listener, app).await.unwrap_or_else(|e| {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    });
}
