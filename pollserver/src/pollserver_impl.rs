//! Main poll server implementation
//!
//! Wires the session manager, the response collector and the HTTP router
//! together, serves until shutdown and then releases device resources.

use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::{PollServerError, PollServerResult};
use crate::services::ResponseCollector;
use crate::session_manager::SessionManager;
use crate::traits::DeviceAdapter;
use crate::types::ResponseReceiver;
use crate::web::handlers::api;
use shared::{Source, logging, source_info};

/// Poll server with an injected device adapter
pub struct PollServer<D: DeviceAdapter> {
    manager: SessionManager<D>,
    responses: Option<ResponseReceiver>,
    shutdown_tx: mpsc::Sender<()>,
    shutdown_rx: Option<mpsc::Receiver<()>>,
}

impl<D: DeviceAdapter + 'static> PollServer<D> {
    pub fn new(manager: SessionManager<D>, responses: ResponseReceiver) -> Self {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        Self {
            manager,
            responses: Some(responses),
            shutdown_tx,
            shutdown_rx: Some(shutdown_rx),
        }
    }

    pub fn manager(&self) -> &SessionManager<D> {
        &self.manager
    }

    /// Get shutdown sender for external shutdown requests
    pub fn get_shutdown_sender(&self) -> mpsc::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Build the Axum router with all routes
    pub fn build_router(&self) -> Router {
        Router::new()
            .route("/class/setup", post(api::setup_class::<D>))
            .route("/poll/start", post(api::start_poll::<D>))
            .route("/poll/stop", post(api::stop_poll::<D>))
            .route("/poll/results", get(api::get_results::<D>))
            .route("/status", get(api::get_status::<D>))
            .route("/health", get(api::health_check))
            .fallback(api::not_found)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive())
                    .into_inner(),
            )
            .with_state(self.manager.clone())
    }

    /// Bind `addr` and serve until shutdown
    pub async fn run(&mut self, addr: SocketAddr) -> PollServerResult<()> {
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                self.manager.shutdown().await;
                return Err(PollServerError::ServerStartup(format!("Failed to bind to {addr}: {e}")));
            }
        };
        self.run_with_listener(listener).await
    }

    /// Serve on an already bound listener until Ctrl+C or the shutdown
    /// sender fires, then tear down the device session
    pub async fn run_with_listener(&mut self, listener: TcpListener) -> PollServerResult<()> {
        let mut shutdown_rx = self
            .shutdown_rx
            .take()
            .ok_or_else(|| PollServerError::ServerStartup("server has already been run".to_string()))?;
        let local_addr = listener.local_addr()?;
        let router = self.build_router();

        let collector = self
            .responses
            .take()
            .map(|rx| ResponseCollector::new(self.manager.clone()).spawn(rx));

        logging::log_startup(Source::Server, &format!("poll server on http://{local_addr}"));

        let served = axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        logging::log_shutdown(Source::Server, "shutdown requested");
                    }
                    result = tokio::signal::ctrl_c() => {
                        if let Err(e) = result {
                            logging::log_error(Source::Server, "Signal handling", &e);
                        } else {
                            logging::log_shutdown(Source::Server, "Received Ctrl+C signal");
                        }
                    }
                }
            })
            .await;

        self.manager.shutdown().await;
        if let Some(collector) = collector {
            collector.abort();
        }
        source_info!(Source::Server, "HTTP server on {} closed", local_addr);

        Ok(served?)
    }
}
