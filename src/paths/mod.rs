//! Movement path resolution.
//!
//! Three interchangeable tiers implement [`PathResolver`]:
//!
//! 1. [`SlidingFastPath`]: bitboard rays for sliders on boards of at most
//!    128 tiles.
//! 2. [`CompiledPatternResolver`]: per-piece pattern IR over the indexed
//!    relation table.
//! 3. [`LegacyPatternResolver`]: a visitor over raw patterns with linear
//!    lookups.
//!
//! [`ResolverChain`] tries them in that order. Whenever more than one tier
//! applies they return identical paths, so the chain's answer never depends
//! on which tier produced it. [`PathMetrics`] counts which branch ended each
//! attempt.

mod bitboard;
mod chain;
mod compiled;
mod legacy;
mod metrics;
mod path;
mod resolver;
mod sliding;

pub use bitboard::{AttackRays, Bitboard, BitboardServices, BoardShape, Occupancy, MAX_TILES};
pub use chain::ResolverChain;
pub use compiled::{CompiledPattern, CompiledPatternResolver, CompiledPatternTable};
pub use legacy::LegacyPatternResolver;
pub use metrics::{PathMetrics, PathMetricsSnapshot, ResolutionOutcome};
pub use path::{PathError, TilePath};
pub use resolver::{PathResolver, ResolverTier, SkipReason, TierOutcome};
pub use sliding::SlidingFastPath;
