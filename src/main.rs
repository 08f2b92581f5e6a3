//! idscan - identity card scanning and field extraction.
//!
//! Uploads an image of an identity document to Gemini Vision and extracts
//! the holder's name, identifier number, and residential address.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use idscan::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "idscan=info"
    } else {
        "idscan=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Run CLI
    cli::run().await
}
