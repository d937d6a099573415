// Helper functions shared by the HTTP strategies

use std::time::Duration;

use super::errors::LookupError;
use super::traits::ResolverConfig;

/// Desktop browser UA; the web endpoints answer bare clients with a login page
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Build the HTTP client for a strategy (timeout + optional proxy)
pub fn build_http_client(config: &ResolverConfig) -> Result<reqwest::Client, LookupError> {
    let mut builder = reqwest::Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .timeout(Duration::from_secs(config.timeout_seconds.max(1) as u64))
        .connect_timeout(Duration::from_secs(15));

    if let Some(proxy_url) = config.proxy.as_deref() {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| LookupError::InvalidConfig(format!("Invalid proxy URL {}: {}", proxy_url, e)))?;
        log::debug!("[Http] Using proxy {}", proxy_url);
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| LookupError::InvalidConfig(format!("Failed to build HTTP client: {}", e)))
}

/// Send a request, retrying transport failures up to `max_attempts` times.
///
/// `make_request` is called once per attempt since a `RequestBuilder` is
/// consumed by `send`. HTTP error statuses are not retried here.
pub async fn send_with_attempts<F>(
    label: &str,
    max_attempts: u32,
    make_request: F,
) -> Result<reqwest::Response, LookupError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let attempts = max_attempts.max(1);
    let mut last_error = LookupError::Network("No attempts made".to_string());

    for attempt in 1..=attempts {
        log::debug!("[{}] Attempt {}/{}", label, attempt, attempts);

        match make_request().send().await {
            Ok(response) => return Ok(response),
            Err(e) => {
                let error = LookupError::from(e);
                log::debug!("[{}] Attempt {} failed: {}", label, attempt, error);
                if !error.is_transient() {
                    return Err(error);
                }
                last_error = error;
            }
        }
    }

    Err(last_error)
}

/// Turn a non-success response into a `LookupError`, reading the body for hints
pub async fn error_for_status(response: reqwest::Response) -> LookupError {
    let status = response.status().as_u16();
    let classified = LookupError::from_status(status);
    if !matches!(classified, LookupError::Http(_)) {
        return classified;
    }

    let body = response.text().await.unwrap_or_default();
    match LookupError::from(body) {
        LookupError::Network(_) | LookupError::ParseError(_) => classified,
        hint => hint,
    }
}

/// First characters of a body, for log lines
pub fn snippet(text: &str) -> String {
    text.chars().take(300).collect()
}
