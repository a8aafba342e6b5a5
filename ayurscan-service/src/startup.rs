//! Application startup and lifecycle management.

use crate::config::{AyurscanConfig, HttpSettings};
use crate::handlers;
use crate::services::providers::gemini::{GeminiConfig, GeminiVisionProvider};
use crate::services::providers::VisionProvider;
use crate::services::{init_metrics, Analyzer};
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
}

impl AppState {
    pub fn new(analyzer: Analyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
        }
    }
}

/// API routes, with the static client as the fallback for everything else,
/// including non-POST requests to `/api/analyze`. Unknown paths get
/// `index.html` so client-side routes survive a reload.
pub fn build_router(state: AppState, http: &HttpSettings) -> Router {
    let index = http.static_dir.join("index.html");
    let static_files = ServeDir::new(&http.static_dir).fallback(ServeFile::new(index));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route(
            "/api/analyze",
            post(handlers::analyze_food).fallback_service(static_files.clone()),
        )
        .fallback_service(static_files)
        .layer(DefaultBodyLimit::max(http.max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| make_request_span(request)),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

fn build_provider(config: &AyurscanConfig) -> Result<Option<Arc<dyn VisionProvider>>, AppError> {
    let Some(gemini) = GeminiConfig::from_settings(&config.gemini) else {
        tracing::warn!("GEMINI_API_KEY not set; analysis requests will be rejected");
        return Ok(None);
    };

    let model = gemini.model.clone();
    let provider = GeminiVisionProvider::new(gemini).map_err(|e| {
        tracing::error!("Failed to initialize Gemini provider: {}", e);
        AppError::ConfigError(anyhow::anyhow!(e))
    })?;
    tracing::info!(model = %model, "Gemini provider initialized");

    let provider: Arc<dyn VisionProvider> = Arc::new(provider);
    Ok(Some(provider))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    ///
    /// Binds the listener immediately; port 0 picks a free port (tests).
    pub async fn build(config: AyurscanConfig) -> Result<Self, AppError> {
        init_metrics();

        let analyzer = Analyzer::new(build_provider(&config)?);
        let router = build_router(AppState::new(analyzer), &config.http);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            static_dir = %config.http.static_dir.display(),
            "Listening"
        );

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn run_until<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }
}
