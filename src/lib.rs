pub mod cli;
pub mod resolver;

pub use resolver::{LookupError, ResolveError, Resolver, ResolverConfig, VideoUrl};
