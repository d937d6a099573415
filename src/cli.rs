// Command-line surface
//
// stdout carries exactly one thing: the resolved URL, without a trailing
// newline. Everything else (errors, explanations, logs) goes to stderr.

use std::io::Write;

use clap::Parser;

use crate::resolver::traits::{DEFAULT_DOC_ID, DEFAULT_MAX_ATTEMPTS};
use crate::resolver::{explain, ResolveError, Resolver, ResolverConfig, StrategyKind, VideoUrl};

pub const EXIT_OK: u8 = 0;
pub const EXIT_NOT_FOUND: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "post-to-src")]
#[command(version, about = "Print the direct video URL of an Instagram post", long_about = None)]
pub struct Cli {
    /// Post shortcode (e.g. CabC123xyz) or a post/reel URL
    pub shortcode: Option<String>,

    /// Lookup strategy, repeatable; tried in the given order (graphql, media-api)
    #[arg(long = "strategy", value_name = "STRATEGY", value_delimiter = ',')]
    pub strategies: Vec<StrategyKind>,

    /// Connection attempts per request
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u32,

    /// HTTP or SOCKS5 proxy URL (e.g. socks5h://127.0.0.1:1080)
    #[arg(long)]
    pub proxy: Option<String>,

    /// GraphQL persisted query id
    #[arg(long, env = "INSTAGRAM_DOC_ID", default_value = DEFAULT_DOC_ID)]
    pub doc_id: String,

    /// On failure, list what each strategy ran into
    #[arg(long)]
    pub explain: bool,

    /// Debug logging to stderr (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn config(&self) -> ResolverConfig {
        ResolverConfig::default()
            .with_strategies(self.strategies.clone())
            .with_max_attempts(self.max_attempts)
            .with_timeout(self.timeout)
            .with_proxy(self.proxy.clone())
            .with_doc_id(self.doc_id.clone())
    }
}

/// Logger on stderr: warn by default, debug for this crate with `-v`
pub fn init_logging(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(log::LevelFilter::Warn);
    if verbose {
        builder.filter_module("post_to_src_lib", log::LevelFilter::Debug);
    }
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    let _ = builder.try_init();
}

/// Write the outcome to the two channels and pick the exit code
pub fn report_outcome<O: Write, E: Write>(
    outcome: &Result<VideoUrl, ResolveError>,
    explain_failure: bool,
    out: &mut O,
    err: &mut E,
) -> u8 {
    match outcome {
        Ok(url) => match write!(out, "{}", url).and_then(|_| out.flush()) {
            Ok(()) => EXIT_OK,
            Err(e) => {
                log::error!("[Cli] Failed to write result: {}", e);
                EXIT_NOT_FOUND
            }
        },
        Err(ResolveError::MissingInput) => {
            let _ = writeln!(err, "Missing shortcode");
            EXIT_NOT_FOUND
        }
        Err(ResolveError::NotFound(report)) => {
            let _ = writeln!(err, "Video URL not found");
            if explain_failure && !report.attempts.is_empty() {
                if report.is_photo_only() {
                    let _ = writeln!(err, "Post {} was found but has no video", report.shortcode);
                } else {
                    let _ = writeln!(err, "No strategy could resolve {}:", report.shortcode);
                }
                let _ = writeln!(err, "{}", explain(report));
            }
            EXIT_NOT_FOUND
        }
    }
}

/// Build the resolver from flags, resolve, and report
pub async fn run<O: Write, E: Write>(cli: &Cli, out: &mut O, err: &mut E) -> u8 {
    let config = cli.config();
    log::debug!("[Cli] {:?}", config);

    let resolver = match Resolver::from_config(&config) {
        Ok(resolver) => resolver,
        Err(e) => {
            let _ = writeln!(err, "{}", e);
            return EXIT_USAGE;
        }
    };
    log::debug!("[Cli] Strategies: {}", resolver.strategy_names().join(", "));

    let input = cli.shortcode.as_deref().unwrap_or("");
    let outcome = resolver.resolve(input).await;
    report_outcome(&outcome, cli.explain, out, err)
}
