// Media API strategy - raw JSON lookup
//
// GET <base>/p/<shortcode>/?__a=1&__d=dis and read
// items[0].video_versions[0].url. Off by default; the endpoint is
// undocumented and regularly answers with a login page.

use async_trait::async_trait;

use crate::resolver::errors::LookupError;
use crate::resolver::models::{MediaInfoResponse, Shortcode, VideoUrl};
use crate::resolver::traits::{LookupStrategy, ResolverConfig};
use crate::resolver::utils::{build_http_client, error_for_status, send_with_attempts, snippet};

const IG_APP_ID: &str = "936619743392459";

/// Secondary strategy: raw media-info JSON
pub struct MediaApiStrategy {
    client: reqwest::Client,
    base: String,
    max_attempts: u32,
}

impl MediaApiStrategy {
    pub fn new(config: &ResolverConfig) -> Result<Self, LookupError> {
        Ok(Self {
            client: build_http_client(config)?,
            base: config.media_api_base.trim_end_matches('/').to_string(),
            max_attempts: config.max_attempts,
        })
    }

    /// Endpoint URL with the shortcode embedded as a path segment
    pub fn endpoint(&self, shortcode: &Shortcode) -> String {
        format!(
            "{}/p/{}/?__a=1&__d=dis",
            self.base,
            urlencoding::encode(shortcode.as_str())
        )
    }

    fn parse_body(text: &str) -> Result<VideoUrl, LookupError> {
        let body: MediaInfoResponse = serde_json::from_str(text).map_err(|e| {
            if text.contains("<html") || text.contains("<!DOCTYPE") {
                log::debug!("[MediaApiStrategy] HTML instead of JSON: {}", snippet(text));
                LookupError::LoginRequired
            } else {
                LookupError::ParseError(format!("Invalid JSON: {}", e))
            }
        })?;

        let item = body.items.first().ok_or(LookupError::PostNotFound)?;

        item.video_versions
            .first()
            .and_then(|version| VideoUrl::new(version.url.clone()))
            .ok_or(LookupError::NoVideo)
    }
}

#[async_trait]
impl LookupStrategy for MediaApiStrategy {
    fn name(&self) -> &'static str {
        "media-api"
    }

    async fn lookup(&self, shortcode: &Shortcode) -> Result<VideoUrl, LookupError> {
        let url = self.endpoint(shortcode);
        log::debug!("[MediaApiStrategy] GET {}", url);

        let response = send_with_attempts("MediaApiStrategy", self.max_attempts, || {
            self.client
                .get(&url)
                .header("X-IG-App-ID", IG_APP_ID)
                .header("Accept", "application/json")
        })
        .await?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }

        let text = response.text().await.map_err(LookupError::from)?;
        Self::parse_body(&text)
    }
}
