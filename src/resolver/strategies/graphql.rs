// GraphQL strategy - structured post metadata lookup
//
// Posts the persisted "post by shortcode" query to the web GraphQL endpoint
// and reads `video_url` from the returned media object. Lookup only: nothing
// is downloaded and nothing is written to disk.

use async_trait::async_trait;
use serde_json::Value;

use crate::resolver::errors::LookupError;
use crate::resolver::models::{PostMedia, Shortcode, VideoUrl};
use crate::resolver::traits::{LookupStrategy, ResolverConfig};
use crate::resolver::utils::{build_http_client, error_for_status, send_with_attempts, snippet};

/// Instagram web app ID (public, embedded in the web app)
const IG_APP_ID: &str = "936619743392459";

/// Facebook LSD token (public static value accepted for anonymous queries)
const FB_LSD_TOKEN: &str = "AVqbxe3J_YA";

/// Facebook ASBD ID (public, embedded in the web app)
const FB_ASBD_ID: &str = "129477";

/// Primary strategy: structured metadata via GraphQL
pub struct GraphqlStrategy {
    client: reqwest::Client,
    endpoint: String,
    doc_id: String,
    max_attempts: u32,
}

impl GraphqlStrategy {
    pub fn new(config: &ResolverConfig) -> Result<Self, LookupError> {
        Ok(Self {
            client: build_http_client(config)?,
            endpoint: config.graphql_endpoint.clone(),
            doc_id: config.doc_id.clone(),
            max_attempts: config.max_attempts,
        })
    }

    /// Form fields for the persisted query
    fn form_fields(&self, shortcode: &Shortcode) -> [(&'static str, String); 3] {
        let variables = serde_json::json!({ "shortcode": shortcode.as_str() }).to_string();
        [
            ("doc_id", self.doc_id.clone()),
            ("variables", variables),
            ("lsd", FB_LSD_TOKEN.to_string()),
        ]
    }

    fn request(&self, shortcode: &Shortcode) -> reqwest::RequestBuilder {
        self.client
            .post(&self.endpoint)
            .header("X-IG-App-ID", IG_APP_ID)
            .header("X-FB-LSD", FB_LSD_TOKEN)
            .header("X-ASBD-ID", FB_ASBD_ID)
            .header("X-Requested-With", "XMLHttpRequest")
            .header("Referer", "https://www.instagram.com/")
            .header("Origin", "https://www.instagram.com")
            .form(&self.form_fields(shortcode))
    }

    /// Map an upstream error message; unrecognised ones mean the query itself broke
    fn classify_message(message: &str) -> LookupError {
        if message.contains("doc_id") || message.contains("useragent mismatch") {
            log::warn!("[GraphqlStrategy] doc_id may be expired: {}", message);
            return LookupError::ParseError(format!("doc_id may be expired: {}", message));
        }

        match LookupError::from(message.to_string()) {
            LookupError::Network(_) => LookupError::ParseError(format!("GraphQL error: {}", message)),
            classified => classified,
        }
    }

    /// Extract the video URL from a GraphQL response body
    fn parse_body(text: &str) -> Result<VideoUrl, LookupError> {
        let body: Value = match serde_json::from_str(text) {
            Ok(body) => body,
            Err(e) => {
                // Blocked or anonymous-unfriendly requests get the HTML login page
                if text.contains("<html") || text.contains("<!DOCTYPE") {
                    log::debug!("[GraphqlStrategy] HTML instead of JSON: {}", snippet(text));
                    return Err(LookupError::LoginRequired);
                }
                return Err(LookupError::ParseError(format!("Invalid JSON: {}", e)));
            }
        };

        let data_is_object = body.get("data").map_or(false, Value::is_object);

        // Error envelopes: {"message": "...", "status": "fail"}
        if !data_is_object {
            if let Some(message) = body.get("message").and_then(Value::as_str) {
                return Err(Self::classify_message(message));
            }
        }

        let media = body
            .pointer("/data/xdt_shortcode_media")
            .filter(|v| !v.is_null())
            .or_else(|| body.pointer("/data/shortcode_media").filter(|v| !v.is_null()));

        let media = match media {
            Some(media) => media,
            None => {
                // {"data": null, "errors": [{"message": "..."}]}
                if let Some(message) = body.pointer("/errors/0/message").and_then(Value::as_str) {
                    return Err(Self::classify_message(message));
                }
                if data_is_object {
                    return Err(LookupError::PostNotFound);
                }
                return Err(LookupError::ParseError(
                    "No data object in GraphQL response".to_string(),
                ));
            }
        };

        let media: PostMedia = serde_json::from_value(media.clone())
            .map_err(|e| LookupError::ParseError(format!("Unexpected media shape: {}", e)))?;

        media.video_url().ok_or(LookupError::NoVideo)
    }
}

#[async_trait]
impl LookupStrategy for GraphqlStrategy {
    fn name(&self) -> &'static str {
        "graphql"
    }

    async fn lookup(&self, shortcode: &Shortcode) -> Result<VideoUrl, LookupError> {
        log::debug!("[GraphqlStrategy] Querying {} for {}", self.endpoint, shortcode);

        let response =
            send_with_attempts("GraphqlStrategy", self.max_attempts, || self.request(shortcode))
                .await?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }

        let text = response.text().await.map_err(LookupError::from)?;
        Self::parse_body(&text)
    }
}
