// Resolver with fallback logic
//
// Strategies are tried in order; the first URL wins. Strategy failures are
// values, collected into a ResolveReport and never propagated individually.

use super::errors::{LookupError, ResolveError};
use super::models::{ResolveReport, Shortcode, VideoUrl};
use super::strategies::build_strategy;
use super::traits::{LookupStrategy, ResolverConfig};

pub struct Resolver {
    strategies: Vec<Box<dyn LookupStrategy>>,
}

impl Resolver {
    /// Resolver without strategies; every lookup ends in `NotFound`
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Build the configured strategies in configured order
    pub fn from_config(config: &ResolverConfig) -> Result<Self, LookupError> {
        let mut resolver = Self::new();
        for kind in &config.strategies {
            resolver.add_strategy(build_strategy(*kind, config)?);
        }
        Ok(resolver)
    }

    pub fn add_strategy(&mut self, strategy: Box<dyn LookupStrategy>) {
        self.strategies.push(strategy);
    }

    /// Names of the active strategies, in order
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Resolve raw user input (bare shortcode or post URL) to a video URL
    pub async fn resolve(&self, input: &str) -> Result<VideoUrl, ResolveError> {
        let shortcode = Shortcode::parse(input).ok_or(ResolveError::MissingInput)?;
        self.resolve_shortcode(&shortcode).await
    }

    pub async fn resolve_shortcode(&self, shortcode: &Shortcode) -> Result<VideoUrl, ResolveError> {
        let mut report = ResolveReport::new(shortcode);

        for strategy in &self.strategies {
            log::debug!("[Resolver] Trying strategy: {}", strategy.name());

            match strategy.lookup(shortcode).await {
                Ok(url) => {
                    log::info!("[Resolver] ✓ {} resolved {}", strategy.name(), shortcode);
                    return Ok(url);
                }
                Err(e) => {
                    log::info!("[Resolver] ✗ {} failed for {}: {}", strategy.name(), shortcode, e);
                    report.record(strategy.name(), e);
                }
            }
        }

        Err(ResolveError::NotFound(report))
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}
