// Failure diagnostics - turns a ResolveReport into something a user can act on
//
// Every strategy failure is classified into a FailureReason. The overall
// reason is the most specific one across attempts, so "photo post" wins over
// "network hiccup on the fallback".

use super::errors::LookupError;
use super::models::ResolveReport;

/// Why a post could not be resolved to a video URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Post exists, no video in it
    NoVideo,
    /// Deleted, never existed, or malformed shortcode
    PostUnavailable,
    /// Private account or checkpoint
    LoginRequired,
    /// Instagram throttling (429 / "please wait")
    RateLimited,
    /// Timeout or connection failure
    NetworkProblem,
    /// Endpoint answered with something we could not read
    UnexpectedResponse,
    /// Bad proxy URL, bad endpoint
    Misconfigured,
}

impl FailureReason {
    pub fn from_error(error: &LookupError) -> Self {
        match error {
            LookupError::NoVideo => Self::NoVideo,
            LookupError::PostNotFound => Self::PostUnavailable,
            LookupError::LoginRequired => Self::LoginRequired,
            LookupError::RateLimited => Self::RateLimited,
            LookupError::NetworkTimeout | LookupError::Network(_) => Self::NetworkProblem,
            LookupError::Http(_) | LookupError::ParseError(_) => Self::UnexpectedResponse,
            LookupError::InvalidConfig(_) => Self::Misconfigured,
        }
    }

    /// Lower is more specific about the post itself
    fn rank(&self) -> u8 {
        match self {
            Self::NoVideo => 0,
            Self::PostUnavailable => 1,
            Self::LoginRequired => 2,
            Self::RateLimited => 3,
            Self::Misconfigured => 4,
            Self::UnexpectedResponse => 5,
            Self::NetworkProblem => 6,
        }
    }

    /// Retrying later (same settings) might succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::NetworkProblem | Self::UnexpectedResponse
        )
    }

    /// Nothing the caller can change will produce a URL
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::NoVideo | Self::PostUnavailable)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::NoVideo => "Post has no video",
            Self::PostUnavailable => "Post not found or no longer available",
            Self::LoginRequired => "Post is private or requires login",
            Self::RateLimited => "Rate limited by Instagram",
            Self::NetworkProblem => "Network problem while contacting Instagram",
            Self::UnexpectedResponse => "Instagram returned an unexpected response",
            Self::Misconfigured => "Resolver is misconfigured",
        }
    }

    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NoVideo | Self::PostUnavailable => None,
            Self::LoginRequired => Some(
                "Anonymous lookups only work for public posts. Check the post opens in a private browser window.",
            ),
            Self::RateLimited => Some(
                "Wait 10-15 minutes, or route requests through a different IP with --proxy.",
            ),
            Self::NetworkProblem => Some(
                "Check your connection, raise --timeout, or try again with --proxy.",
            ),
            Self::UnexpectedResponse => Some(
                "The GraphQL doc_id may have rotated. Pass a fresh one with --doc-id or INSTAGRAM_DOC_ID, or add --strategy media-api.",
            ),
            Self::Misconfigured => Some("Check the --proxy value."),
        }
    }
}

/// Most specific reason across all attempts
pub fn diagnose_report(report: &ResolveReport) -> Option<FailureReason> {
    report
        .attempts
        .iter()
        .map(|attempt| FailureReason::from_error(&attempt.error))
        .min_by_key(FailureReason::rank)
}

/// Multi-line explanation for stderr
pub fn explain(report: &ResolveReport) -> String {
    let mut lines = Vec::new();

    for attempt in &report.attempts {
        lines.push(format!("  {}: {}", attempt.strategy, attempt.error));
    }

    if let Some(reason) = diagnose_report(report) {
        lines.push(format!("Reason: {}", reason.description()));
        if reason.is_permanent() {
            lines.push("This will not change on retry.".to_string());
        } else if reason.is_retryable() {
            lines.push("Retrying later may succeed.".to_string());
        }
        if let Some(suggestion) = reason.suggestion() {
            lines.push(suggestion.to_string());
        }
    }

    lines.join("\n")
}
