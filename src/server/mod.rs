//! HTTP surface: routing, shared state and middleware

mod cors;
mod handlers;
mod request_tracing;

pub use cors::CorsPolicy;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, MethodRouter};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::services::InsightsService;
use crate::types::{Result, API_TITLE, API_VERSION};

/// State shared by every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub insights: InsightsService,
    pub cors: Arc<CorsPolicy>,
}

impl AppState {
    pub fn new(insights: InsightsService, cors: CorsPolicy) -> Self {
        Self {
            insights,
            cors: Arc::new(cors),
        }
    }
}

fn get_only<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: axum::handler::Handler<T, AppState>,
    T: 'static,
{
    get(handler).fallback(handlers::method_not_allowed_handler)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get_only(handlers::health_handler))
        .route("/api/kpis", get_only(handlers::kpis_handler))
        .route(
            "/api/revenue/monthly",
            get_only(handlers::revenue_monthly_handler),
        )
        .route(
            "/api/revenue/region",
            get_only(handlers::revenue_region_handler),
        )
        .route(
            "/api/customers/trend",
            get_only(handlers::customer_trend_handler),
        )
        .fallback(handlers::not_found_handler)
        .layer(from_fn_with_state(state.clone(), cors::cors_middleware))
        .layer(from_fn(request_tracing::request_tracing_middleware))
        .with_state(state)
}

/// Serve until SIGINT/SIGTERM, then drain in-flight requests
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let app = build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Bind the configured address and serve the given dataset
pub async fn run(config: &ServerConfig, insights: InsightsService) -> Result<()> {
    let state = AppState::new(insights, CorsPolicy::new(config.allowed_origins.clone()));
    let listener = TcpListener::bind(config.bind).await?;
    info!(
        title = API_TITLE,
        version = API_VERSION,
        bind = %config.bind,
        records = state.insights.dataset().len(),
        origins = ?state.cors.allowed_origins(),
        "listening"
    );
    serve(listener, state).await
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("shutdown signal received, draining");
}
