//! Web server for the scan interface.
//!
//! Serves a single page with a file picker, a Scan trigger, and three
//! read-only output fields, backed by a small JSON API. All state lives in
//! one shared `Scanner`.

mod assets;
mod handlers;
mod routes;
mod templates;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Config;
use crate::extraction::{GeminiClient, Scanner};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<Scanner>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let client = GeminiClient::new(config.gemini.clone());
        Self {
            scanner: Arc::new(Scanner::new(Arc::new(client))),
        }
    }
}

/// Start the web server.
pub async fn serve(config: &Config, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(config);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
