//! Outbound HTTP client shared by all strategies.

use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, RequestBuilder, StatusCode, redirect};
use tracing::debug;

use crate::domain::{ExecutionContext, StrategyFailure};

/// Upstream documents larger than this are not worth parsing.
pub const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Browser-like identity presented on every outbound request.
///
/// Bare requests are rejected by the upstream, so these headers are required
/// rather than cosmetic.
#[derive(Debug, Clone)]
pub struct BrowserIdentity {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
}

impl Default for BrowserIdentity {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36"
                .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                .to_string(),
            accept_language: "en-US,en;q=0.5".to_string(),
        }
    }
}

/// Thin wrapper over [`reqwest::Client`] that maps transport problems to
/// [`StrategyFailure`] values.
///
/// The client is built once and cloned cheaply into each strategy; it holds
/// a connection pool but no per-resolution state.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    /// Builds the client with the identity installed as default headers.
    ///
    /// # Errors
    ///
    /// Returns an error if a header value is not valid ASCII or the TLS
    /// backend fails to initialize.
    pub fn new(identity: &BrowserIdentity) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&identity.user_agent).context("Invalid user agent")?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&identity.accept).context("Invalid accept header")?,
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&identity.accept_language)
                .context("Invalid accept-language header")?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .redirect(redirect::Policy::limited(5))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        })
    }

    /// Overrides the response body cap.
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Starts a GET request; callers add strategy-specific headers.
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    /// Sends the request within the context deadline and returns the body.
    ///
    /// # Errors
    ///
    /// - [`StrategyFailure::Timeout`] when the deadline has passed or expires in flight
    /// - [`StrategyFailure::Blocked`] on 401, 403, 429 or a redirect to the login page
    /// - [`StrategyFailure::Status`] on any other non-success status
    /// - [`StrategyFailure::Malformed`] when the body exceeds the size cap
    /// - [`StrategyFailure::Network`] on connection or body read errors, or when
    ///   the attempt was already cancelled
    pub async fn fetch_text(
        &self,
        request: RequestBuilder,
        ctx: &ExecutionContext,
    ) -> Result<String, StrategyFailure> {
        if ctx.is_expired() {
            return Err(StrategyFailure::Timeout);
        }
        if ctx.cancellation().is_cancelled() {
            return Err(StrategyFailure::Network("request cancelled".to_string()));
        }

        let mut response = request
            .timeout(ctx.remaining())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        debug!("Upstream responded {} for {}", status, response.url());

        if matches!(
            status,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
        ) {
            return Err(StrategyFailure::Blocked(format!("HTTP {}", status.as_u16())));
        }

        if !status.is_success() {
            return Err(StrategyFailure::Status(status.as_u16()));
        }

        if response.url().path().starts_with("/accounts/login") {
            return Err(StrategyFailure::Blocked("login wall".to_string()));
        }

        if response
            .content_length()
            .is_some_and(|len| len > self.max_body_bytes as u64)
        {
            return Err(self.oversized());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(map_reqwest_error)? {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(self.oversized());
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn oversized(&self) -> StrategyFailure {
        StrategyFailure::Malformed(format!(
            "response body exceeds {} bytes",
            self.max_body_bytes
        ))
    }
}

fn map_reqwest_error(e: reqwest::Error) -> StrategyFailure {
    if e.is_timeout() {
        StrategyFailure::Timeout
    } else {
        StrategyFailure::Network(e.to_string())
    }
}
