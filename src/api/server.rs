use crate::api::{routes, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Starts and runs the HTTP server until it is shut down
///
/// # Arguments
/// * `port` - Port number to listen on for incoming HTTP connections
/// * `state` - Shared engine and search index
///
/// # Example
/// ```no_run
/// # async fn run(state: std::sync::Arc<notus::api::AppState>) -> std::io::Result<()> {
/// notus::api::server::launch_server(8001, state).await
/// # }
/// ```
pub async fn launch_server(port: u16, state: Arc<AppState>) -> std::io::Result<()> {
    let app = routes::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API listening on {}", addr);
    axum::serve(listener, app).await
}
