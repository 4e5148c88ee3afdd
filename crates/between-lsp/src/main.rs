//! Between Language Server - Main entry point
//!
//! Speaks LSP over stdin/stdout and provides:
//! - Diagnostics for lex, parse and semantic errors
//! - Semantic tokens for syntax highlighting

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Context;
use between_lsp::config::DEFAULT_LOG_FILTER;
use between_lsp::{BetweenLanguageServer, ServerConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();
    init_tracing(&config)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Between Language Server");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut server = BetweenLanguageServer::new();
    server
        .run(stdin.lock(), stdout.lock())
        .context("language server transport failed")?;

    Ok(())
}

/// Logs go to stderr or a file; stdout carries the protocol.
fn init_tracing(config: &ServerConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|e| {
        eprintln!("invalid log filter {:?}: {e}; using {DEFAULT_LOG_FILTER}", config.log_filter);
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });

    match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
    Ok(())
}
