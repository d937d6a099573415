// Error types for lookup strategies and the resolver

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use super::models::ResolveReport;

lazy_static! {
    /// "429" as a standalone status token, not a digit run inside an id
    static ref STATUS_429_RE: Regex = Regex::new(r"\b429\b").expect("status regex is valid");
}

/// Why a single lookup strategy produced no video URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Post exists but carries no video (photo or photo-only carousel)
    #[error("Post has no video")]
    NoVideo,

    /// Post deleted, never existed, or the shortcode is malformed
    #[error("Post not found")]
    PostNotFound,

    /// Instagram wants a logged-in session (private account, checkpoint)
    #[error("Login required: post is private or access is restricted")]
    LoginRequired,

    /// Instagram throttled the request (429 or "please wait")
    #[error("Rate limited by Instagram")]
    RateLimited,

    /// Request did not complete within the configured timeout
    #[error("Network timeout: Instagram is not responding")]
    NetworkTimeout,

    /// Unexpected HTTP status from the upstream endpoint
    #[error("Unexpected HTTP status {0}")]
    Http(u16),

    /// Connection-level failure (DNS, TLS, refused, proxy)
    #[error("Network error: {0}")]
    Network(String),

    /// Response body was not the JSON shape we expect
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Strategy could not be set up (bad proxy URL, bad endpoint)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LookupError {
    /// Transport-level errors are worth another connection attempt
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NetworkTimeout | Self::Network(_))
    }

    /// Map a non-success HTTP status onto the taxonomy
    pub fn from_status(status: u16) -> Self {
        match status {
            404 | 410 => Self::PostNotFound,
            401 | 403 => Self::LoginRequired,
            429 => Self::RateLimited,
            other => Self::Http(other),
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return Self::NetworkTimeout;
        }

        if let Some(status) = e.status() {
            return Self::from_status(status.as_u16());
        }

        if e.is_builder() {
            return Self::InvalidConfig(e.to_string());
        }

        if e.is_decode() || e.is_body() {
            return Self::ParseError(e.to_string());
        }

        Self::Network(e.to_string())
    }
}

// Upstream error bodies are free-form text; classify what we can
impl From<String> for LookupError {
    fn from(s: String) -> Self {
        let lower = s.to_lowercase();

        if lower.contains("timeout") || lower.contains("timed out") {
            return Self::NetworkTimeout;
        }

        if lower.contains("please wait")
            || STATUS_429_RE.is_match(&lower)
            || lower.contains("rate limit")
        {
            return Self::RateLimited;
        }

        if lower.contains("login_required")
            || lower.contains("checkpoint_required")
            || lower.contains("login required")
        {
            return Self::LoginRequired;
        }

        if lower.contains("not found")
            || lower.contains("not available")
            || lower.contains("media unavailable")
        {
            return Self::PostNotFound;
        }

        if lower.contains("parse") || lower.contains("json") {
            return Self::ParseError(s);
        }

        Self::Network(s)
    }
}

/// Outcome of a failed `Resolver::resolve` call
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// No shortcode supplied (absent, empty or whitespace)
    #[error("Missing shortcode")]
    MissingInput,

    /// Every active strategy came back empty-handed
    #[error("Video URL not found")]
    NotFound(ResolveReport),
}

impl ResolveError {
    /// Per-strategy failures, empty for `MissingInput`
    pub fn report(&self) -> Option<&ResolveReport> {
        match self {
            Self::MissingInput => None,
            Self::NotFound(report) => Some(report),
        }
    }
}
