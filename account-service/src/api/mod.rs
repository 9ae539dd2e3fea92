//! HTTP API module
//!
//! JSON endpoints used by trading terminals to sync accounts, push metric
//! snapshots and fetch their current strategy.

pub mod error;
pub mod handlers;
pub mod payload;

use std::sync::Arc;

use account::{StrategyGenerator, SyncMode};
use axum::{
    routing::{get, post},
    Router,
};
use log::{error, info};
use tower_http::cors::CorsLayer;

use crate::config::ServiceConfig;
use crate::error::Result;
use crate::generator::build_generator;
use crate::registry::{AccountRegistry, SharedRegistry};

pub use error::ApiError;

/// Request handling switches derived from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerSettings {
    pub sync_mode: SyncMode,
    pub allow_zero_metrics: bool,
    pub regenerate_on_update: bool,
}

impl HandlerSettings {
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            sync_mode: config.strategy.sync_mode(),
            allow_zero_metrics: config.validation.allow_zero_metrics,
            regenerate_on_update: config.strategy.regenerates_on_update(),
        }
    }
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self::from_config(&ServiceConfig::default())
    }
}

// App State to share with routes
#[derive(Clone)]
pub struct AppState {
    pub registry: SharedRegistry,
    pub generator: Arc<dyn StrategyGenerator>,
    pub settings: HandlerSettings,
}

impl AppState {
    pub fn new(
        registry: SharedRegistry,
        generator: Arc<dyn StrategyGenerator>,
        settings: HandlerSettings,
    ) -> Self {
        Self {
            registry,
            generator,
            settings,
        }
    }

    /// Fresh, empty registry with the generator and switches from `config`.
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(
            AccountRegistry::new().into_shared(),
            build_generator(&config.strategy),
            HandlerSettings::from_config(config),
        )
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/sync", post(handlers::sync_account))
        .route("/api/sync/:account_number", post(handlers::record_dynamic_data))
        .route(
            "/api/dataSync/:account_number",
            post(handlers::record_dynamic_data),
        )
        .route("/api/strategy/:account_number", get(handlers::get_strategy))
        .route("/api/accounts", get(handlers::list_accounts))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the API until Ctrl-C.
pub async fn serve(config: &ServiceConfig, state: AppState) -> Result<()> {
    let addr = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API Server listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => {
            error!("Cannot listen for Ctrl-C, running until killed: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
