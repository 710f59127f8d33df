//! Configuration loaded once at process start.

use std::collections::HashSet;

use thiserror::Error;

/// Default per-request timeout when `OFFBOARD_REQUEST_TIMEOUT_SECS` is unset.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors raised during startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent.
    #[error("missing required environment variable: {0}")]
    MissingVar(String),

    /// A variable is present but unparseable.
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Settings for one reconciliation pass.
///
/// There is no ambient state: the token, base URL, and domain set live here
/// and are handed to [`crate::client::DirectoryClient`] explicitly.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Base URL of the directory API, e.g. `https://api.example.com/2.0`.
    pub base_url: String,

    /// Bearer token for the directory API. Absence is fatal at startup.
    pub api_token: String,

    /// Domains whose users this organization controls. Identities outside
    /// these domains are never invited.
    pub controlled_domains: HashSet<String>,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl DirectoryConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Load configuration from a custom variable reader.
    ///
    /// This allows tests to supply variables without mutating process-global
    /// environment state.
    pub fn from_reader<F>(reader: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let base_url = reader("OFFBOARD_BASE_URL")
            .map_err(|_| ConfigError::MissingVar("OFFBOARD_BASE_URL".into()))?;

        let api_token = reader("OFFBOARD_API_TOKEN")
            .map_err(|_| ConfigError::MissingVar("OFFBOARD_API_TOKEN".into()))?;

        let controlled_domains = reader("OFFBOARD_DOMAINS")
            .map(|raw| parse_domains(&raw))
            .unwrap_or_default();

        let request_timeout_secs = match reader("OFFBOARD_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidValue("OFFBOARD_REQUEST_TIMEOUT_SECS".into(), e.to_string())
            })?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            api_token,
            controlled_domains,
            request_timeout_secs,
        })
    }
}

/// Split a comma-separated domain list, trimming blanks.
fn parse_domains(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|d| d.to_ascii_lowercase())
        .collect()
}
