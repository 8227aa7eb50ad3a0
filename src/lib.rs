pub mod auth;
pub mod cli;
pub mod gate;
pub mod jwt;
pub mod pages;
pub mod routes;

use axum::{Router, middleware};
use gate::GateConfig;
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub struct ServerConfig {
    /// Whether to set Secure flag on cleared cookies (should be true in production with HTTPS)
    pub secure_cookies: bool,
}

/// Create the application router with the given configuration.
///
/// The authorization gate is layered over everything; requests it exempts
/// (assets, `/api`, file-like paths) pass straight through to their handlers.
pub fn create_app(config: &ServerConfig) -> Router {
    let gate_config = GateConfig {
        secure_cookies: config.secure_cookies,
    };

    Router::new()
        .merge(pages::page_router())
        .nest(routes::API_PREFIX, pages::api_router())
        .fallback(pages::not_found)
        .layer(middleware::from_fn_with_state(gate_config, gate::authorize))
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    axum::serve(listener, app).await
}

/// Start the server on the given port in a background task. Use port 0 to let the OS choose a random port.
/// Returns the actual address the server is listening on.
/// Note: For production use, prefer `run_server` directly in main.
pub async fn start_server(
    config: ServerConfig,
    port: u16,
) -> (tokio::task::JoinHandle<()>, SocketAddr) {
    let addr = format!("127.0.0.1:{}", port);
    let listener = TcpListener::bind(&addr).await.expect("Failed to bind");
    let local_addr = listener.local_addr().expect("Failed to get local address");

    let handle = tokio::spawn(async move {
        run_server(config, listener).await.ok();
    });

    (handle, local_addr)
}
