//! API Configuration Module
//!
//! Server, CORS, cache-expiry and provider settings. Everything is read from
//! environment variables once at startup; `from_vars` takes an explicit
//! lookup so the parsing is testable without touching the process env.

use labs_core::ConfigError;
use labs_llm::DEFAULT_OPENAI_MODEL;
use labs_storage::Freshness;
use std::net::SocketAddr;

/// Default market-insights expiry, in days.
pub const DEFAULT_INSIGHTS_EXPIRY_DAYS: u64 = 3;

/// Public Omen subgraph on Gnosis Chain.
pub const DEFAULT_OMEN_SUBGRAPH_URL: &str =
    "https://api.thegraph.com/subgraphs/name/protofire/omen-xdai";

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// HTTP server and cache configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind host (`LABS_HOST`).
    pub host: String,

    /// Bind port (`LABS_PORT`, then `PORT`).
    pub port: u16,

    // ========================================================================
    // CORS Configuration
    // ========================================================================
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins.
    pub cors_origins: Vec<String>,

    /// Whether to allow credentials in CORS requests.
    pub cors_allow_credentials: bool,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    // ========================================================================
    // Cache expiry
    // ========================================================================
    /// Freshness window for market insights.
    pub insights_freshness: Freshness,

    /// Freshness window for market and question invalidity.
    pub invalid_freshness: Freshness,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: Vec::new(),
            cors_allow_credentials: false,
            cors_max_age_secs: 86400,
            insights_freshness: Freshness::from_days(Some(DEFAULT_INSIGHTS_EXPIRY_DAYS)),
            invalid_freshness: Freshness::unbounded(),
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `LABS_HOST`: Bind host (default: 0.0.0.0)
    /// - `LABS_PORT` or `PORT`: Bind port (default: 8080)
    /// - `LABS_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `LABS_CORS_ALLOW_CREDENTIALS`: "true" or "false" (default: false)
    /// - `LABS_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `LABS_INSIGHTS_CACHE_EXPIRY_DAYS`: days, or "none" (default: 3)
    /// - `LABS_INVALID_CACHE_EXPIRY_DAYS`: days, or "none" (default: none)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = var("LABS_HOST").unwrap_or(defaults.host);

        let port = match var("LABS_PORT").or_else(|| var("PORT")) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                field: "LABS_PORT".to_string(),
                value: raw.clone(),
                reason: "expected a port number".to_string(),
            })?,
            None => defaults.port,
        };

        let cors_origins = var("LABS_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_allow_credentials = var("LABS_CORS_ALLOW_CREDENTIALS")
            .map(|s| s.to_lowercase() == "true")
            .unwrap_or(false);

        let cors_max_age_secs = var("LABS_CORS_MAX_AGE_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.cors_max_age_secs);

        let insights_freshness = parse_expiry_days(
            "LABS_INSIGHTS_CACHE_EXPIRY_DAYS",
            var("LABS_INSIGHTS_CACHE_EXPIRY_DAYS"),
            Some(DEFAULT_INSIGHTS_EXPIRY_DAYS),
        )?;
        let invalid_freshness = parse_expiry_days(
            "LABS_INVALID_CACHE_EXPIRY_DAYS",
            var("LABS_INVALID_CACHE_EXPIRY_DAYS"),
            None,
        )?;

        Ok(Self {
            host,
            port,
            cors_origins,
            cors_allow_credentials,
            cors_max_age_secs,
            insights_freshness,
            invalid_freshness,
        })
    }

    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                field: "LABS_HOST".to_string(),
                value: addr,
                reason: e.to_string(),
            })
    }

    /// Check if a given origin is allowed.
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        if self.cors_origins.is_empty() {
            return true;
        }

        self.cors_origins.iter().any(|allowed| {
            if allowed == origin {
                return true;
            }
            // Wildcard subdomains: *.gnosis.io
            if let Some(pattern) = allowed.strip_prefix("*.") {
                if let Some(origin_domain) = origin.strip_prefix("https://") {
                    return origin_domain
                        .strip_suffix(pattern)
                        .is_some_and(|sub| sub.ends_with('.'));
                }
            }
            false
        })
    }
}

/// Parse an expiry in whole days; `none` (any case) or an empty value disables expiry.
fn parse_expiry_days(
    field: &str,
    raw: Option<String>,
    default: Option<u64>,
) -> Result<Freshness, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Freshness::from_days(default));
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(Freshness::unbounded());
    }
    let days = trimmed.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        value: raw.clone(),
        reason: "expected a number of days or \"none\"".to_string(),
    })?;
    Ok(Freshness::from_days(Some(days)))
}

// ============================================================================
// PROVIDER CONFIGURATION
// ============================================================================

/// Credentials and endpoints of the external services behind the producers.
#[derive(Clone)]
pub struct ProviderConfig {
    pub openai_api_key: String,
    pub openai_model: String,
    pub tavily_api_key: String,
    pub omen_subgraph_url: String,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("openai_api_key", &"[REDACTED]")
            .field("openai_model", &self.openai_model)
            .field("tavily_api_key", &"[REDACTED]")
            .field("omen_subgraph_url", &self.omen_subgraph_url)
            .finish()
    }
}

impl ProviderConfig {
    /// Environment variables:
    /// - `OPENAI_API_KEY` (required)
    /// - `OPENAI_MODEL` (default: gpt-4o-2024-08-06)
    /// - `TAVILY_API_KEY` (required)
    /// - `OMEN_SUBGRAPH_URL` (default: public Omen subgraph)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            var(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingRequired {
                    field: key.to_string(),
                })
        };

        Ok(Self {
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            tavily_api_key: required("TAVILY_API_KEY")?,
            omen_subgraph_url: var("OMEN_SUBGRAPH_URL")
                .unwrap_or_else(|| DEFAULT_OMEN_SUBGRAPH_URL.to_string()),
        })
    }
}
