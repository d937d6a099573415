// Resolver module - shortcode to video URL
//
// A Resolver owns an ordered list of LookupStrategy implementations and
// returns the first video URL any of them produces.

pub mod diagnostics;
pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod strategies;
pub mod traits;
pub mod utils;

pub use diagnostics::{diagnose_report, explain, FailureReason};
pub use errors::{LookupError, ResolveError};
pub use models::{ResolveReport, Shortcode, StrategyAttempt, StrategyKind, VideoUrl};
pub use orchestrator::Resolver;
pub use traits::{LookupStrategy, ResolverConfig};
