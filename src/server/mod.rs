//! HTTP API
//!
//! `axum` router serving health, coaching and resource endpoints. The
//! composition root ([`serve`]) builds the coaching gateway once and shares
//! it with every handler through [`AppState`].

pub mod coaching;
pub mod error;
pub mod resources;

pub use error::{ApiError, ErrorBody};

use crate::catalog::Catalog;
use crate::coaching::CoachingGateway;
use crate::config::Config;
use crate::error::{Result, SaathiError};
use crate::language::Language;
use axum::extract::{OriginalUri, Request};
use axum::http::Method;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<CoachingGateway>,
    pub catalog: Arc<Catalog>,
    /// Hide internal error detail from clients
    pub production: bool,
}

impl AppState {
    pub fn new(gateway: CoachingGateway, catalog: Catalog, production: bool) -> Self {
        Self {
            gateway: Arc::new(gateway),
            catalog: Arc::new(catalog),
            production,
        }
    }
}

/// `?language=` query shared by the localized endpoints
#[derive(Debug, Default, Deserialize)]
pub struct LanguageQuery {
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReply {
    pub status: &'static str,
    pub message: &'static str,
    pub message_hi: &'static str,
    pub timestamp: DateTime<Utc>,
}

async fn health() -> Json<HealthReply> {
    Json(HealthReply {
        status: "ok",
        message: "Shikshak Saathi API is running",
        message_hi: "शिक्षक साथी API चल रही है",
        timestamp: Utc::now(),
    })
}

/// Unmatched paths and unsupported methods on known paths
pub(crate) async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::not_found(
        format!("Route {} {} not found", method, uri.path()),
        "रास्ता नहीं मिला",
    )
}

async fn log_request(request: Request, next: Next) -> Response {
    tracing::info!("{} {}", request.method(), request.uri().path());
    next.run(request).await
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    }
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    let production = state.production;
    let on_panic = move |panic: Box<dyn Any + Send + 'static>| {
        let detail = panic_message(panic.as_ref());
        tracing::error!("Handler panicked: {}", detail);
        ApiError::internal(detail, production).into_response()
    };

    Router::new()
        .route("/api/health", get(health).fallback(not_found))
        .nest("/api/coaching", coaching::routes())
        .nest("/api/resources", resources::routes())
        .fallback(not_found)
        .layer(middleware::from_fn(log_request))
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::custom(on_panic))
        .with_state(state)
}

/// Build the gateway from configuration and run the server until Ctrl+C
///
/// # Errors
///
/// Returns an error if the catalog fails to load or the address cannot be
/// bound
pub async fn serve(config: &Config) -> Result<()> {
    let mut gateway = CoachingGateway::new(config.provider.gemini.clone());
    let ready = gateway.initialize(config.provider.gemini.api_key.as_deref());
    if !ready {
        tracing::warn!("Running without AI - offline responses will be used");
    }

    let catalog = Catalog::embedded()?;
    let state = AppState::new(gateway, catalog, config.server.is_production());
    let app = router(state);

    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| SaathiError::Config(format!("Failed to bind {}: {}", address, e)))?;

    tracing::info!(
        ai_ready = ready,
        environment = %config.server.environment,
        "Shikshak Saathi server running on http://{}",
        address
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
