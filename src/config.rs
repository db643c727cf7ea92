//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup, validated, and handed to the
//! strategies as immutable values. Strategies never read the environment.
//!
//! ## Server
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:5000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//!
//! ## Resolution Chain
//!
//! - `STRATEGY_ORDER` - Comma-separated chain (default: `structured_query,scrape,direct_fetch`)
//! - `STRATEGY_TIMEOUT_SECS` - Per-attempt deadline (default: 20, range: 1-120)
//!
//! ## Upstream
//!
//! - `WEB_BASE_URL` - Post page host (default: `https://www.instagram.com`)
//! - `GRAPHQL_BASE_URL` - Query endpoint host (default: `https://www.instagram.com`)
//! - `GRAPHQL_QUERY_HASH` - Query hash for the shortcode media query
//! - `IG_APP_ID` - Value of the `X-IG-App-ID` header
//! - `UPSTREAM_USER_AGENT` / `UPSTREAM_ACCEPT_LANGUAGE` - Browser identity
//! - `MEDIA_HOSTS` - Domains treated as media hosts
//!   (default: `cdninstagram.com,fbcdn.net,instagram.com`)
//!
//! ## Relay (optional)
//!
//! ```bash
//! export RELAY_URL="https://relay.example.com/api/instagram"
//! export RELAY_API_KEY="secret"
//! export RELAY_KEY_HEADER="X-API-Key"   # default
//! export STRATEGY_ORDER="structured_query,scrape,direct_fetch,relay"
//! ```
//!
//! ## Request Handling
//!
//! - `ACCEPTED_HOSTS` - Hosts accepted in inbound references
//!   (default: `instagram.com,www.instagram.com`)

use anyhow::{Context, Result};
use reqwest::header::HeaderName;
use std::collections::HashSet;
use std::env;
use std::time::Duration;

use crate::infrastructure::http::BrowserIdentity;
use crate::infrastructure::strategies::{
    RelayConfig, StrategyKind, StructuredQueryConfig, UpstreamSettings,
};
use crate::utils::media_extract::MediaFilter;

const DEFAULT_STRATEGY_ORDER: &str = "structured_query,scrape,direct_fetch";
const DEFAULT_QUERY_HASH: &str = "b3055c01b9479c0110c9a45a5e7d5c0d";
const DEFAULT_APP_ID: &str = "936619743392459";
const DEFAULT_BASE_URL: &str = "https://www.instagram.com";

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,

    /// Strategy names in chain order, as written in `STRATEGY_ORDER`.
    pub strategy_order: Vec<String>,
    /// Per-attempt deadline in seconds.
    pub strategy_timeout_secs: u64,

    // ── Upstream ────────────────────────────────────────────────────────────
    pub web_base_url: String,
    pub graphql_base_url: String,
    pub graphql_query_hash: String,
    pub ig_app_id: String,
    pub user_agent: String,
    pub accept_language: String,
    pub media_hosts: Vec<String>,

    // ── Relay ───────────────────────────────────────────────────────────────
    pub relay_url: Option<String>,
    /// Credential for the relay host. Never logged.
    pub relay_api_key: Option<String>,
    pub relay_key_header: String,

    /// Hosts the request handler accepts references for.
    pub accepted_hosts: Vec<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but unparsable.
    pub fn from_env() -> Result<Self> {
        let identity = BrowserIdentity::default();

        let strategy_timeout_secs = match env::var("STRATEGY_TIMEOUT_SECS") {
            Ok(v) => v
                .parse()
                .with_context(|| format!("STRATEGY_TIMEOUT_SECS must be a number, got '{v}'"))?,
            Err(_) => 20,
        };

        let relay_url = env::var("RELAY_URL").ok().filter(|v| !v.trim().is_empty());
        let relay_api_key = env::var("RELAY_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty());

        Ok(Self {
            listen_addr: env_or("LISTEN", "0.0.0.0:5000"),
            log_level: env_or("RUST_LOG", "info"),
            log_format: env_or("LOG_FORMAT", "text"),
            strategy_order: parse_list(&env_or("STRATEGY_ORDER", DEFAULT_STRATEGY_ORDER)),
            strategy_timeout_secs,
            web_base_url: env_or("WEB_BASE_URL", DEFAULT_BASE_URL),
            graphql_base_url: env_or("GRAPHQL_BASE_URL", DEFAULT_BASE_URL),
            graphql_query_hash: env_or("GRAPHQL_QUERY_HASH", DEFAULT_QUERY_HASH),
            ig_app_id: env_or("IG_APP_ID", DEFAULT_APP_ID),
            user_agent: env_or("UPSTREAM_USER_AGENT", &identity.user_agent),
            accept_language: env_or("UPSTREAM_ACCEPT_LANGUAGE", &identity.accept_language),
            media_hosts: parse_list(&env_or(
                "MEDIA_HOSTS",
                "cdninstagram.com,fbcdn.net,instagram.com",
            )),
            relay_url,
            relay_api_key,
            relay_key_header: env_or("RELAY_KEY_HEADER", "X-API-Key"),
            accepted_hosts: parse_list(&env_or(
                "ACCEPTED_HOSTS",
                "instagram.com,www.instagram.com",
            )),
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not `host:port`
    /// - `strategy_timeout_secs` is outside 1-120
    /// - the strategy order is empty, has unknown or duplicate names,
    ///   or lists `relay` without relay credentials
    /// - a base URL is not http(s)
    /// - the relay key header is not a valid header name
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if self.strategy_timeout_secs == 0 || self.strategy_timeout_secs > 120 {
            anyhow::bail!(
                "STRATEGY_TIMEOUT_SECS must be between 1 and 120, got {}",
                self.strategy_timeout_secs
            );
        }

        let kinds = self.strategy_kinds()?;
        if kinds.contains(&StrategyKind::Relay) && self.relay_config().is_none() {
            anyhow::bail!("STRATEGY_ORDER lists 'relay' but RELAY_URL or RELAY_API_KEY is missing");
        }

        for (name, url) in [
            ("WEB_BASE_URL", &self.web_base_url),
            ("GRAPHQL_BASE_URL", &self.graphql_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with 'http://' or 'https://', got '{}'", name, url);
            }
        }

        if let Some(ref relay_url) = self.relay_url
            && !relay_url.starts_with("http://")
            && !relay_url.starts_with("https://")
        {
            anyhow::bail!(
                "RELAY_URL must start with 'http://' or 'https://', got '{}'",
                relay_url
            );
        }

        HeaderName::from_bytes(self.relay_key_header.as_bytes()).with_context(|| {
            format!(
                "RELAY_KEY_HEADER is not a valid header name: '{}'",
                self.relay_key_header
            )
        })?;

        if self.accepted_hosts.is_empty() {
            anyhow::bail!("ACCEPTED_HOSTS must list at least one host");
        }

        Ok(())
    }

    /// Parses the configured strategy order.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty list, an unknown name or a duplicate.
    pub fn strategy_kinds(&self) -> Result<Vec<StrategyKind>> {
        if self.strategy_order.is_empty() {
            anyhow::bail!("STRATEGY_ORDER must name at least one strategy");
        }

        let mut seen = HashSet::new();
        self.strategy_order
            .iter()
            .map(|name| {
                let kind: StrategyKind = name
                    .parse()
                    .map_err(|e: String| anyhow::anyhow!("STRATEGY_ORDER: {}", e))?;
                if !seen.insert(kind.as_str()) {
                    anyhow::bail!("STRATEGY_ORDER lists '{}' more than once", kind);
                }
                Ok(kind)
            })
            .collect()
    }

    pub fn strategy_timeout(&self) -> Duration {
        Duration::from_secs(self.strategy_timeout_secs)
    }

    /// Relay settings, present only when both endpoint and key are set.
    pub fn relay_config(&self) -> Option<RelayConfig> {
        Some(RelayConfig {
            endpoint: self.relay_url.clone()?,
            api_key: self.relay_api_key.clone()?,
            key_header: self.relay_key_header.clone(),
        })
    }

    pub fn browser_identity(&self) -> BrowserIdentity {
        BrowserIdentity {
            user_agent: self.user_agent.clone(),
            accept_language: self.accept_language.clone(),
            ..BrowserIdentity::default()
        }
    }

    pub fn upstream_settings(&self) -> UpstreamSettings {
        UpstreamSettings {
            web_base: self.web_base_url.clone(),
            structured_query: StructuredQueryConfig {
                base_url: self.graphql_base_url.clone(),
                query_hash: self.graphql_query_hash.clone(),
                app_id: self.ig_app_id.clone(),
            },
            relay: self.relay_config(),
            media_filter: MediaFilter::new(self.media_hosts.iter().cloned()),
        }
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Strategy order: {}", self.strategy_order.join(" -> "));
        tracing::info!("  Attempt timeout: {}s", self.strategy_timeout_secs);
        tracing::info!("  Web base: {}", self.web_base_url);
        tracing::info!("  GraphQL base: {}", self.graphql_base_url);

        match (&self.relay_url, &self.relay_api_key) {
            (Some(url), Some(key)) => tracing::info!(
                "  Relay: {} ({}: {})",
                url,
                self.relay_key_header,
                mask_secret(key)
            ),
            _ => tracing::info!("  Relay: disabled"),
        }

        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Masks a credential for logging, keeping only its last four characters.
///
/// - `sk_live_abcdef1234` → `***1234`
/// - `abc` → `***`
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "***".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("***{}", tail)
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable is malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
