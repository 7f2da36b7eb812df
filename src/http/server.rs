//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build backend clients and shared handler state from the config
//! - Create the Axum router (API routes mounted under the path prefix)
//! - Wire up middleware (request ID, tracing)
//! - Serve until the shutdown signal fires

use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::api;
use crate::backend::{BackendEndpoint, CallTimeouts, ForwardClient, SimpleClient};
use crate::config::{validate_config, ProxyConfig};
use crate::http::request::request_span;
use crate::lifecycle::{ShutdownSignal, StartupError};
use crate::output::OutputDir;

/// Application state injected into handlers.
///
/// Nothing in here is mutated after startup; every field is cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    /// GET/DELETE calls without a body.
    pub simple: SimpleClient,
    /// POST/PUT/PATCH calls forwarding the inbound payload.
    pub forward: ForwardClient,
    pub timeouts: CallTimeouts,
    pub output: Arc<OutputDir>,
    /// UI page; `None` when the file was missing at startup.
    pub ui_page: Option<Arc<PathBuf>>,
    pub max_body_size: usize,
}

impl AppState {
    /// Build handler state from a validated configuration.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, StartupError> {
        let endpoint = Arc::new(BackendEndpoint::parse(config.backend.trimmed_base_url())?);
        let timeouts = CallTimeouts::from_config(&config.backend);

        let ui_file = config.ui.html_file();
        let ui_page = if ui_file.is_file() {
            Some(Arc::new(ui_file))
        } else {
            tracing::warn!(
                path = %ui_file.display(),
                "UI page not found; /ui endpoint will not be available"
            );
            None
        };

        Ok(Self {
            simple: SimpleClient::new(endpoint.clone(), timeouts.simple)?,
            forward: ForwardClient::new(endpoint)?,
            timeouts,
            output: Arc::new(OutputDir::new(config.output.gcodes_dir())),
            ui_page,
            max_body_size: config.api.max_body_size,
        })
    }
}

/// HTTP server for the slicer proxy.
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, StartupError> {
        validate_config(&config).map_err(StartupError::Config)?;
        let state = AppState::from_config(&config)?;
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let api = api::setup_api_router(state.ui_page.is_some());
        let prefix = config.api.path_prefix.as_str();
        let app = if prefix.is_empty() {
            api
        } else {
            Router::new().nest(prefix, api)
        };

        app.with_state(state).layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            prefix = %self.config.api.path_prefix,
            backend = %self.config.backend.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
