//! CLI commands implementation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::extraction::{GeminiClient, Scanner};
use crate::models::UploadedDocument;

#[derive(Parser)]
#[command(name = "idscan")]
#[command(about = "Identity card scanning and field extraction via Gemini Vision")]
#[command(version)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a card image and print the extracted fields
    Scan {
        /// Image file to scan
        image: PathBuf,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the web interface
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default: 127.0.0.1:3030)
        #[arg(default_value = "127.0.0.1:3030")]
        bind: String,
    },

    /// Check whether the remote backend is usable
    Check,
}

/// Parse CLI arguments and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).await;

    match cli.command {
        Commands::Scan { image, json } => cmd_scan(&config, &image, json).await,
        Commands::Serve { bind } => cmd_serve(&config, &bind).await,
        Commands::Check => cmd_check(&config),
    }
}

/// One-shot extraction from a file on disk.
async fn cmd_scan(config: &Config, image: &PathBuf, json: bool) -> anyhow::Result<()> {
    let content = tokio::fs::read(image)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", image.display(), e))?;

    let declared_mime = mime_guess::from_path(image).first_or_octet_stream();
    let filename = image
        .file_name()
        .and_then(|n| n.to_str())
        .map(|s| s.to_string());

    let client = GeminiClient::new(config.gemini.clone());
    let scanner = Scanner::new(Arc::new(client));
    scanner
        .select_document(UploadedDocument::new(
            content,
            declared_mime.essence_str(),
            filename,
        ))
        .await;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Processing...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = scanner.scan().await;
    spinner.finish_and_clear();

    match result {
        Ok(fields) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&fields)?);
            } else {
                println!(
                    "{} {}",
                    style("Full Name:").bold(),
                    if fields.name.is_empty() { "-" } else { &fields.name }
                );
                println!(
                    "{} {}",
                    style("Aadhaar Number:").bold(),
                    if fields.identifier_number.is_empty() {
                        "-"
                    } else {
                        &fields.identifier_number
                    }
                );
                println!(
                    "{} {}",
                    style("Residential Address:").bold(),
                    if fields.address.is_empty() {
                        "-"
                    } else {
                        &fields.address
                    }
                );
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", style("✗").red(), e.user_message());
            tracing::debug!("Scan failed: {}", e);
            Err(anyhow::anyhow!("scan failed"))
        }
    }
}

/// Start the web server.
async fn cmd_serve(config: &Config, bind: &str) -> anyhow::Result<()> {
    // Config file bind wins over the default argument, not over an explicit one
    let bind = if bind == "127.0.0.1:3030" {
        config.bind.clone().unwrap_or_else(|| bind.to_string())
    } else {
        bind.to_string()
    };
    let (host, port) = parse_bind_address(&bind)?;

    println!(
        "{} Starting idscan server at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(config, &host, port).await
}

/// Report whether the extraction backend is usable.
fn cmd_check(config: &Config) -> anyhow::Result<()> {
    let client = GeminiClient::new(config.gemini.clone());

    if client.is_available() {
        println!("{} {}", style("✓").green(), client.availability_hint());
        Ok(())
    } else {
        println!("{} {}", style("✗").red(), client.availability_hint());
        Err(anyhow::anyhow!("extraction backend not available"))
    }
}

/// Split a bind argument into host and port. Accepts a bare port
/// ("8080"), a bare host ("0.0.0.0"), or "host:port"; missing pieces get
/// the loopback host and port 3030.
fn parse_bind_address(bind: &str) -> anyhow::Result<(String, u16)> {
    if let Ok(port) = bind.parse::<u16>() {
        return Ok(("127.0.0.1".to_string(), port));
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
    }

    // Bare host
    Ok((bind.to_string(), 3030))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bind_address() {
        // Bare port keeps the scanner on loopback
        assert_eq!(
            parse_bind_address("8080").unwrap(),
            ("127.0.0.1".to_string(), 8080)
        );
        // Bare host gets the default port
        assert_eq!(
            parse_bind_address("0.0.0.0").unwrap(),
            ("0.0.0.0".to_string(), 3030)
        );
        assert_eq!(
            parse_bind_address("localhost").unwrap(),
            ("localhost".to_string(), 3030)
        );
        assert_eq!(
            parse_bind_address("0.0.0.0:8080").unwrap(),
            ("0.0.0.0".to_string(), 8080)
        );
    }

    #[test]
    fn test_cli_parses_scan_command() {
        let cli = Cli::try_parse_from(["idscan", "scan", "card.png", "--json"]).unwrap();
        match cli.command {
            Commands::Scan { image, json } => {
                assert_eq!(image, PathBuf::from("card.png"));
                assert!(json);
            }
            _ => panic!("expected scan command"),
        }
    }

    #[test]
    fn test_cli_parses_serve_default_bind() {
        let cli = Cli::try_parse_from(["idscan", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { bind } => assert_eq!(bind, "127.0.0.1:3030"),
            _ => panic!("expected serve command"),
        }
    }
}
