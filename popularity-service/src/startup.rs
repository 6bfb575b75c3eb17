//! Application startup and lifecycle management.

use crate::config::PopularityConfig;
use crate::handlers::{
    health_check, metrics_endpoint, predict_popularity, readiness_check, reference_observations,
};
use crate::services::PopularityService;
use crate::{ApiDoc, AppState};
use axum::{
    body::Body,
    http::Request,
    middleware::from_fn,
    routing::get,
    Json, Router,
};
use service_core::error::AppError;
use service_core::middleware::{make_request_span, metrics_middleware, request_id_middleware};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub fn build_router(state: AppState, docs_enabled: bool) -> Router {
    let router = Router::new()
        .route("/predict/", get(predict_popularity))
        .route("/predict", get(predict_popularity))
        .route("/predict/observaciones", get(reference_observations))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_endpoint));

    let router = if docs_enabled {
        router.merge(SwaggerUi::new("/docs").url("/swagger.json", ApiDoc::openapi()))
    } else {
        router.route("/swagger.json", get(|| async { Json(ApiDoc::openapi()) }))
    };

    router
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| make_request_span(request)),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Load the artifacts and bind the listener. Any artifact problem aborts
    /// here, before a single request is accepted.
    pub async fn build(config: PopularityConfig) -> Result<Self, AppError> {
        let popularity = PopularityService::from_artifacts(&config.artifacts).map_err(|e| {
            tracing::error!("Failed to load model artifacts: {}", e);
            AppError::ConfigError(anyhow::Error::new(e))
        })?;

        let router = build_router(AppState::new(popularity), config.docs.enabled);

        // port 0 = random port for testing
        let address = config.common.bind_address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Popularity service: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
