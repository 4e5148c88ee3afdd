//! Server configuration, read from the environment at start-up.

use std::path::PathBuf;

/// Filter used when neither `BETWEEN_LSP_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "between_lsp=info,between_core=info";

/// Environment variable holding the `EnvFilter` directive.
pub const LOG_ENV: &str = "BETWEEN_LSP_LOG";

/// Environment variable naming a log file to use instead of stderr.
pub const LOG_FILE_ENV: &str = "BETWEEN_LSP_LOG_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
    /// Log destination; stderr when `None`. Stdout carries the protocol and
    /// is never used for logs.
    pub log_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_file: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let log_filter = non_empty(LOG_ENV)
            .or_else(|| non_empty("RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let log_file = non_empty(LOG_FILE_ENV).map(PathBuf::from);

        Self {
            log_filter,
            log_file,
        }
    }
}
