// Common data models for the resolver

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use super::errors::LookupError;

lazy_static! {
    /// Post, reel and IGTV links, optionally with a username segment before the kind
    static ref POST_URL_RE: Regex = Regex::new(
        r"(?i)instagram\.com/(?:[a-z0-9._]+/)?(?:p|reel|reels|tv)/([A-Za-z0-9_-]+)"
    )
    .expect("post URL regex is valid");
}

/// Opaque post identifier used as the lookup key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shortcode(String);

impl Shortcode {
    /// Accept a bare shortcode or a post URL.
    ///
    /// Returns `None` for empty or whitespace-only input. A bare code is
    /// passed through as-is: the upstream API is the one that rejects
    /// malformed codes.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Some(caps) = POST_URL_RE.captures(trimmed) {
            return Some(Self(caps[1].to_string()));
        }

        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Shortcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Direct URL of a post's video asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoUrl(String);

impl VideoUrl {
    /// Empty strings are not URLs; upstream sends `""` for some photo posts
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        if url.trim().is_empty() {
            None
        } else {
            Some(Self(url))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Available lookup strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Structured post metadata via the web GraphQL endpoint
    Graphql,
    /// Raw media-info JSON (`?__a=1`), `items[0].video_versions[0].url`
    MediaApi,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Graphql => "graphql",
            Self::MediaApi => "media-api",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "graphql" => Ok(Self::Graphql),
            "media-api" | "media_api" | "api" => Ok(Self::MediaApi),
            other => Err(format!(
                "unknown strategy '{}' (expected 'graphql' or 'media-api')",
                other
            )),
        }
    }
}

/// `data.xdt_shortcode_media` from the GraphQL post query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostMedia {
    #[serde(default)]
    pub is_video: bool,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub edge_sidecar_to_children: Option<SidecarEdges>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SidecarEdges {
    #[serde(default)]
    pub edges: Vec<SidecarEdge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SidecarEdge {
    pub node: SidecarNode,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SidecarNode {
    #[serde(default)]
    pub is_video: bool,
    #[serde(default)]
    pub video_url: Option<String>,
}

impl PostMedia {
    /// Video of a single-item post, else the first video in a carousel
    pub fn video_url(&self) -> Option<VideoUrl> {
        if self.is_video {
            if let Some(url) = self.video_url.clone().and_then(VideoUrl::new) {
                return Some(url);
            }
        }

        self.edge_sidecar_to_children
            .as_ref()?
            .edges
            .iter()
            .filter(|edge| edge.node.is_video)
            .find_map(|edge| edge.node.video_url.clone().and_then(VideoUrl::new))
    }
}

/// Body of the media-info endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaInfoResponse {
    #[serde(default)]
    pub items: Vec<MediaInfoItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaInfoItem {
    #[serde(default)]
    pub video_versions: Vec<VideoVersion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoVersion {
    pub url: String,
}

/// One failed strategy attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyAttempt {
    pub strategy: &'static str,
    pub error: LookupError,
}

/// Everything the resolver tried before giving up
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveReport {
    pub shortcode: String,
    pub attempts: Vec<StrategyAttempt>,
}

impl ResolveReport {
    pub fn new(shortcode: &Shortcode) -> Self {
        Self {
            shortcode: shortcode.to_string(),
            attempts: Vec::new(),
        }
    }

    pub fn record(&mut self, strategy: &'static str, error: LookupError) {
        self.attempts.push(StrategyAttempt { strategy, error });
    }

    /// Post was reachable and simply has no video
    pub fn is_photo_only(&self) -> bool {
        !self.attempts.is_empty()
            && self
                .attempts
                .iter()
                .all(|attempt| attempt.error == LookupError::NoVideo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcode_bare() {
        let code = Shortcode::parse("  CabC123xyz\n").unwrap();
        assert_eq!(code.as_str(), "CabC123xyz");
    }

    #[test]
    fn test_shortcode_empty() {
        assert!(Shortcode::parse("").is_none());
        assert!(Shortcode::parse("   ").is_none());
    }

    #[test]
    fn test_shortcode_from_post_url() {
        let code = Shortcode::parse("https://www.instagram.com/p/DEF456/").unwrap();
        assert_eq!(code.as_str(), "DEF456");
    }

    #[test]
    fn test_shortcode_from_reel_url_with_query() {
        let code = Shortcode::parse("https://instagram.com/reel/ABC123xyz/?igsh=abc").unwrap();
        assert_eq!(code.as_str(), "ABC123xyz");
    }

    #[test]
    fn test_shortcode_from_url_with_username_prefix() {
        let code = Shortcode::parse("https://www.instagram.com/someone/reel/GHI_78-9/").unwrap();
        assert_eq!(code.as_str(), "GHI_78-9");
    }

    #[test]
    fn test_shortcode_non_post_url_passes_through() {
        let code = Shortcode::parse("https://www.instagram.com/someone/").unwrap();
        assert_eq!(code.as_str(), "https://www.instagram.com/someone/");
    }

    #[test]
    fn test_video_url_rejects_blank() {
        assert!(VideoUrl::new("").is_none());
        assert!(VideoUrl::new("  ").is_none());
        assert_eq!(
            VideoUrl::new("https://cdn.example/v.mp4").unwrap().as_str(),
            "https://cdn.example/v.mp4"
        );
    }

    #[test]
    fn test_strategy_kind_parse() {
        assert_eq!("graphql".parse::<StrategyKind>(), Ok(StrategyKind::Graphql));
        assert_eq!("Media-API".parse::<StrategyKind>(), Ok(StrategyKind::MediaApi));
        assert!("instaloader".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn test_post_media_single_video() {
        let media: PostMedia = serde_json::from_str(
            r#"{"shortcode":"x","is_video":true,"video_url":"https://cdn.example/v.mp4"}"#,
        )
        .unwrap();
        assert_eq!(media.video_url().unwrap().as_str(), "https://cdn.example/v.mp4");
    }

    #[test]
    fn test_post_media_photo() {
        let media: PostMedia =
            serde_json::from_str(r#"{"is_video":false,"display_url":"https://cdn.example/p.jpg"}"#)
                .unwrap();
        assert!(media.video_url().is_none());
    }

    #[test]
    fn test_post_media_carousel_first_video() {
        let media: PostMedia = serde_json::from_str(
            r#"{
                "is_video": false,
                "edge_sidecar_to_children": {"edges": [
                    {"node": {"is_video": false}},
                    {"node": {"is_video": true, "video_url": "https://cdn.example/2.mp4"}},
                    {"node": {"is_video": true, "video_url": "https://cdn.example/3.mp4"}}
                ]}
            }"#,
        )
        .unwrap();
        assert_eq!(media.video_url().unwrap().as_str(), "https://cdn.example/2.mp4");
    }

    #[test]
    fn test_report_photo_only() {
        let code = Shortcode::parse("abc").unwrap();
        let mut report = ResolveReport::new(&code);
        assert!(!report.is_photo_only());

        report.record("graphql", LookupError::NoVideo);
        assert!(report.is_photo_only());

        report.record("media-api", LookupError::RateLimited);
        assert!(!report.is_photo_only());
    }
}
