// End-to-end resolver scenarios: recording test doubles and mock HTTP upstreams

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use post_to_src_lib::cli::{report_outcome, EXIT_NOT_FOUND, EXIT_OK};
use post_to_src_lib::resolver::{
    LookupError, LookupStrategy, ResolveError, Resolver, ResolverConfig, Shortcode, StrategyKind,
    VideoUrl,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Answers from a fixed table and records every shortcode it was asked about
struct RecordingStrategy {
    name: &'static str,
    posts: HashMap<String, Result<VideoUrl, LookupError>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingStrategy {
    fn new(name: &'static str, calls: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name,
            posts: HashMap::new(),
            calls,
        }
    }

    fn with_post(mut self, shortcode: &str, result: Result<VideoUrl, LookupError>) -> Self {
        self.posts.insert(shortcode.to_string(), result);
        self
    }
}

#[async_trait]
impl LookupStrategy for RecordingStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn lookup(&self, shortcode: &Shortcode) -> Result<VideoUrl, LookupError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, shortcode));
        self.posts
            .get(shortcode.as_str())
            .cloned()
            .unwrap_or(Err(LookupError::PostNotFound))
    }
}

fn video(url: &str) -> Result<VideoUrl, LookupError> {
    Ok(VideoUrl::new(url).unwrap())
}

fn single_strategy_resolver() -> (Resolver, Arc<Mutex<Vec<String>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let primary = RecordingStrategy::new("primary", calls.clone())
        .with_post("CabC123xyz", video("https://cdn.example/v.mp4"))
        .with_post("photo01", Err(LookupError::NoVideo))
        .with_post("deadpost", Err(LookupError::PostNotFound));

    let mut resolver = Resolver::new();
    resolver.add_strategy(Box::new(primary));
    (resolver, calls)
}

async fn run(resolver: &Resolver, input: &str) -> (u8, String, String) {
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let outcome = resolver.resolve(input).await;
    let code = report_outcome(&outcome, false, &mut out, &mut err);
    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[tokio::test]
async fn video_post_prints_exact_url() {
    let (resolver, _) = single_strategy_resolver();

    let (code, stdout, stderr) = run(&resolver, "CabC123xyz").await;

    assert_eq!(code, EXIT_OK);
    assert_eq!(stdout, "https://cdn.example/v.mp4");
    assert_eq!(stderr, "");
}

#[tokio::test]
async fn empty_input_makes_no_lookup() {
    let (resolver, calls) = single_strategy_resolver();

    let (code, stdout, stderr) = run(&resolver, "").await;

    assert_eq!(code, EXIT_NOT_FOUND);
    assert_eq!(stdout, "");
    assert!(stderr.contains("Missing shortcode"));
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn dead_post_reports_on_stderr_only() {
    let (resolver, _) = single_strategy_resolver();

    let (code, stdout, stderr) = run(&resolver, "deadpost").await;

    assert_eq!(code, EXIT_NOT_FOUND);
    assert_eq!(stdout, "");
    assert_eq!(stderr, "Video URL not found\n");
}

#[tokio::test]
async fn photo_post_and_dead_post_look_the_same() {
    let (resolver, _) = single_strategy_resolver();

    let photo = run(&resolver, "photo01").await;
    let dead = run(&resolver, "deadpost").await;

    assert_eq!(photo, dead);
}

#[tokio::test]
async fn primary_failure_falls_through_to_secondary() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let primary = RecordingStrategy::new("primary", calls.clone())
        .with_post("CabC123xyz", Err(LookupError::Network("connection reset".to_string())));
    let secondary = RecordingStrategy::new("secondary", calls.clone())
        .with_post("CabC123xyz", video("https://cdn.example/fallback.mp4"));

    let mut resolver = Resolver::new();
    resolver.add_strategy(Box::new(primary));
    resolver.add_strategy(Box::new(secondary));

    let url = resolver.resolve("CabC123xyz").await.unwrap();

    assert_eq!(url.as_str(), "https://cdn.example/fallback.mp4");
    assert_eq!(
        *calls.lock().unwrap(),
        vec!["primary:CabC123xyz", "secondary:CabC123xyz"]
    );
}

#[tokio::test]
async fn post_url_input_resolves_like_shortcode() {
    let (resolver, calls) = single_strategy_resolver();

    let url = resolver
        .resolve("https://www.instagram.com/reel/CabC123xyz/?igsh=xyz")
        .await
        .unwrap();

    assert_eq!(url.as_str(), "https://cdn.example/v.mp4");
    assert_eq!(*calls.lock().unwrap(), vec!["primary:CabC123xyz"]);
}

#[tokio::test]
async fn repeated_resolution_is_stable() {
    let (resolver, calls) = single_strategy_resolver();

    let first = resolver.resolve("CabC123xyz").await.unwrap();
    let second = resolver.resolve("CabC123xyz").await.unwrap();
    assert_eq!(first, second);

    let first = resolver.resolve("deadpost").await.unwrap_err();
    let second = resolver.resolve("deadpost").await.unwrap_err();
    assert_eq!(first.report(), second.report());

    // No caching: every call reaches the strategy
    assert_eq!(calls.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn configured_strategies_against_mock_upstream() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/graphql"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/p/CabC123xyz/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"items":[{"video_versions":[{"url":"https://cdn.example/v.mp4"}]}]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let config = ResolverConfig::default()
        .with_strategies(vec![StrategyKind::Graphql, StrategyKind::MediaApi])
        .with_graphql_endpoint(format!("{}/api/graphql", server.uri()))
        .with_media_api_base(server.uri())
        .with_timeout(5);
    let resolver = Resolver::from_config(&config).unwrap();

    let url = resolver.resolve("CabC123xyz").await.unwrap();
    assert_eq!(url.as_str(), "https://cdn.example/v.mp4");
}

#[tokio::test]
async fn default_config_leaves_media_api_disabled() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/graphql"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"data":{"xdt_shortcode_media":null},"status":"ok"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = ResolverConfig::default()
        .with_graphql_endpoint(format!("{}/api/graphql", server.uri()))
        .with_media_api_base(server.uri());
    let resolver = Resolver::from_config(&config).unwrap();

    let err = resolver.resolve("deadpost").await.unwrap_err();
    match err {
        ResolveError::NotFound(report) => {
            assert_eq!(report.attempts.len(), 1);
            assert_eq!(report.attempts[0].strategy, "graphql");
            assert_eq!(report.attempts[0].error, LookupError::PostNotFound);
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
}
