// Lookup strategies

mod graphql;
mod media_api;

pub use graphql::GraphqlStrategy;
pub use media_api::MediaApiStrategy;

use super::errors::LookupError;
use super::models::StrategyKind;
use super::traits::{LookupStrategy, ResolverConfig};

/// Instantiate the strategy for a configured kind
pub fn build_strategy(
    kind: StrategyKind,
    config: &ResolverConfig,
) -> Result<Box<dyn LookupStrategy>, LookupError> {
    Ok(match kind {
        StrategyKind::Graphql => Box::new(GraphqlStrategy::new(config)?),
        StrategyKind::MediaApi => Box::new(MediaApiStrategy::new(config)?),
    })
}
