//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! The registry is an explicit value shared behind an `Arc`; every
//! handler sees the same instance and the registry does its own locking.

use std::path::PathBuf;
use std::sync::Arc;

use evreg_registry::EvidenceRegistry;

/// Log output format for the server binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Application configuration.
///
/// Custom `Debug` redacts `auth_token` to prevent credential leakage in logs.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Shared bearer secret. If `None`, the bearer value is taken as the
    /// caller identity without a secret (development mode).
    pub auth_token: Option<String>,
    /// Where to load the registry from at startup and save it at shutdown.
    /// If `None`, the registry lives only in memory.
    pub snapshot_path: Option<PathBuf>,
    /// Log output format.
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Build configuration from process environment variables.
    ///
    /// `PORT` (default 8080), `AUTH_TOKEN`, `SNAPSHOT_PATH`, `LOG_FORMAT`.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| format!("PORT must be a port number, got {raw:?}: {e}"))?,
            None => 8080,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("") | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(format!(
                    "LOG_FORMAT must be 'text' or 'json', got {other:?}"
                ))
            }
        };

        Ok(Self {
            port,
            auth_token: lookup("AUTH_TOKEN").filter(|t| !t.is_empty()),
            snapshot_path: lookup("SNAPSHOT_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            log_format,
        })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("snapshot_path", &self.snapshot_path)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
            snapshot_path: None,
            log_format: LogFormat::Text,
        }
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The registry every handler operates on. Clones share it.
    pub registry: Arc<EvidenceRegistry>,
    /// Configuration the server was started with.
    pub config: AppConfig,
}

impl AppState {
    /// Empty registry, default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Empty registry with the given configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self::with_registry(config, EvidenceRegistry::new())
    }

    /// Serve an existing registry, e.g. one restored from a snapshot.
    pub fn with_registry(config: AppConfig, registry: EvidenceRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
