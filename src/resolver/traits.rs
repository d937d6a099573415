// LookupStrategy trait and resolver configuration

use async_trait::async_trait;

use super::errors::LookupError;
use super::models::{Shortcode, StrategyKind, VideoUrl};

/// Web GraphQL endpoint serving post metadata
pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "https://www.instagram.com/api/graphql";

/// Base for `/p/<shortcode>/?__a=1&__d=dis`
pub const DEFAULT_MEDIA_API_BASE: &str = "https://www.instagram.com";

/// Persisted query id for the post-by-shortcode query (rotates every few weeks)
pub const DEFAULT_DOC_ID: &str = "8845758582119845";

/// Connection attempts per request, matching the lookup-only client setup
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// Configuration for the resolver and its strategies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Active strategies, tried in this order
    pub strategies: Vec<StrategyKind>,
    /// Connection attempts per request (at least 1)
    pub max_attempts: u32,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    /// SOCKS5/HTTP proxy URL
    pub proxy: Option<String>,
    /// GraphQL persisted query id
    pub doc_id: String,
    /// GraphQL endpoint URL
    pub graphql_endpoint: String,
    /// Scheme and host for the media-info endpoint
    pub media_api_base: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            strategies: vec![StrategyKind::Graphql],
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout_seconds: 30,
            proxy: None,
            doc_id: DEFAULT_DOC_ID.to_string(),
            graphql_endpoint: DEFAULT_GRAPHQL_ENDPOINT.to_string(),
            media_api_base: DEFAULT_MEDIA_API_BASE.to_string(),
        }
    }
}

impl ResolverConfig {
    /// Replace the strategy list; an empty list keeps the default order
    pub fn with_strategies(mut self, strategies: Vec<StrategyKind>) -> Self {
        if !strategies.is_empty() {
            let mut unique = Vec::with_capacity(strategies.len());
            for kind in strategies {
                if !unique.contains(&kind) {
                    unique.push(kind);
                }
            }
            self.strategies = unique;
        }
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_timeout(mut self, seconds: u32) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy.filter(|p| !p.trim().is_empty());
        self
    }

    pub fn with_doc_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = doc_id.into();
        self
    }

    pub fn with_graphql_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.graphql_endpoint = endpoint.into();
        self
    }

    pub fn with_media_api_base(mut self, base: impl Into<String>) -> Self {
        self.media_api_base = base.into().trim_end_matches('/').to_string();
        self
    }
}

/// One self-contained way of turning a shortcode into a video URL
#[async_trait]
pub trait LookupStrategy: Send + Sync {
    /// Name of the strategy (for logging and reports)
    fn name(&self) -> &'static str;

    /// Resolve the shortcode; every failure comes back as a `LookupError`
    async fn lookup(&self, shortcode: &Shortcode) -> Result<VideoUrl, LookupError>;
}
