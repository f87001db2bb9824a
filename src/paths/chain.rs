//! Ordered list of resolver tiers evaluated with early return.

use std::sync::Arc;

use tracing::trace;

use crate::board::{Game, Piece};
use crate::core::{EngineConfig, GameState, TileId};

use super::compiled::CompiledPatternResolver;
use super::legacy::LegacyPatternResolver;
use super::metrics::{PathMetrics, PathMetricsSnapshot, ResolutionOutcome};
use super::path::TilePath;
use super::resolver::{PathResolver, ResolverTier, SkipReason, TierOutcome};
use super::sliding::SlidingFastPath;

/// The resolution pipeline: fast path, compiled patterns, legacy visitor.
///
/// The first tier to produce a path wins; results of different tiers are
/// never combined.
#[derive(Debug)]
pub struct ResolverChain {
    tiers: Vec<Box<dyn PathResolver>>,
    metrics: Option<Arc<PathMetrics>>,
}

impl ResolverChain {
    /// Build the tiers enabled by `config` for one game.
    #[must_use]
    pub fn for_game(game: Arc<Game>, config: &EngineConfig) -> Self {
        let mut tiers: Vec<Box<dyn PathResolver>> = Vec::with_capacity(3);
        if config.sliding_fast_path {
            tiers.push(Box::new(SlidingFastPath::new(Arc::clone(&game))));
        }
        if config.compiled_patterns {
            tiers.push(Box::new(CompiledPatternResolver::new(Arc::clone(&game))));
        }
        tiers.push(Box::new(LegacyPatternResolver::new(game)));

        let metrics = config.path_metrics.then(|| Arc::new(PathMetrics::new()));
        Self { tiers, metrics }
    }

    /// A chain over caller-supplied tiers, evaluated in the given order.
    #[must_use]
    pub fn with_tiers(tiers: Vec<Box<dyn PathResolver>>) -> Self {
        Self {
            tiers,
            metrics: Some(Arc::new(PathMetrics::new())),
        }
    }

    /// Tiers in evaluation order.
    pub fn tiers(&self) -> impl Iterator<Item = ResolverTier> + '_ {
        self.tiers.iter().map(|t| t.tier())
    }

    /// Resolve a path, `None` if no tier finds one.
    #[must_use]
    pub fn resolve(&self, piece: &Piece, from: &TileId, to: &TileId, state: &GameState) -> Option<TilePath> {
        self.resolve_traced(piece, from, to, state).0
    }

    /// Resolve a path and report which branch terminated the attempt.
    pub fn resolve_traced(
        &self,
        piece: &Piece,
        from: &TileId,
        to: &TileId,
        state: &GameState,
    ) -> (Option<TilePath>, ResolutionOutcome) {
        let mut fast_path_skip = None;
        let mut result = None;

        for tier in &self.tiers {
            match tier.try_resolve(piece, from, to, state) {
                TierOutcome::Resolved(path) => {
                    result = Some((path, tier.tier()));
                    break;
                }
                TierOutcome::Skipped(reason) => {
                    trace!(tier = ?tier.tier(), ?reason, "tier skipped");
                    if tier.tier() == ResolverTier::SlidingFastPath {
                        fast_path_skip = Some(reason);
                    }
                }
                TierOutcome::NotFound => {
                    trace!(tier = ?tier.tier(), "tier found no path");
                }
            }
        }

        let (path, outcome) = match result {
            Some((path, ResolverTier::SlidingFastPath)) => (Some(path), ResolutionOutcome::FastPathHit),
            Some((path, ResolverTier::CompiledPatterns)) => (Some(path), ResolutionOutcome::CompiledHit),
            Some((path, ResolverTier::LegacyVisitor)) => (Some(path), ResolutionOutcome::LegacyHit),
            None => (
                None,
                ResolutionOutcome::Skipped(fast_path_skip.unwrap_or(SkipReason::NoServices)),
            ),
        };

        if let Some(metrics) = &self.metrics {
            metrics.record(outcome);
        }
        (path, outcome)
    }

    /// Live counters, `None` when metrics are disabled.
    #[must_use]
    pub fn metrics(&self) -> Option<&Arc<PathMetrics>> {
        self.metrics.as_ref()
    }

    /// Current counts, `None` when metrics are disabled.
    #[must_use]
    pub fn metrics_snapshot(&self) -> Option<PathMetricsSnapshot> {
        self.metrics.as_ref().map(|m| m.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{GameBuilder, GridDirections, Pattern};
    use crate::core::{PieceId, PlayerId};

    fn game() -> (Arc<Game>, GameState) {
        let (game, state) = GameBuilder::new("grid")
            .grid(4, 4, GridDirections::All)
            .with_player("white")
            .with_piece(Piece::new("rook", PlayerId::new(0)).with_pattern(Pattern::rays(["north", "east"])))
            .with_piece(Piece::new("king", PlayerId::new(0)).with_pattern(Pattern::steps_any(["north", "east"])))
            .place("rook", "a1")
            .place("king", "d4")
            .build()
            .unwrap();
        (Arc::new(game), state)
    }

    fn piece(game: &Game, id: &str) -> Piece {
        game.piece(&PieceId::new(id)).unwrap().clone()
    }

    #[test]
    fn test_terminal_outcomes() {
        let (game, state) = game();
        let chain = ResolverChain::for_game(Arc::clone(&game), &EngineConfig::default());
        let rook = piece(&game, "rook");
        let king = piece(&game, "king");

        let (_, outcome) = chain.resolve_traced(&rook, &TileId::new("a1"), &TileId::new("a4"), &state);
        assert_eq!(outcome, ResolutionOutcome::FastPathHit);

        let (_, outcome) = chain.resolve_traced(&king, &TileId::new("d4"), &TileId::new("d3"), &state);
        assert_eq!(outcome, ResolutionOutcome::Skipped(SkipReason::NotSlider));

        let moved = state.next([crate::core::ArtifactState::piece("king", "c3")]);
        let (path, outcome) = chain.resolve_traced(&king, &TileId::new("c3"), &TileId::new("c4"), &moved);
        assert!(path.is_some());
        assert_eq!(outcome, ResolutionOutcome::CompiledHit);

        let (_, outcome) = chain.resolve_traced(&rook, &TileId::new("a1"), &TileId::new("b2"), &state);
        assert_eq!(outcome, ResolutionOutcome::Skipped(SkipReason::RayMiss));

        let snapshot = chain.metrics_snapshot().unwrap();
        assert_eq!(snapshot.attempts, 4);
        assert!(snapshot.is_conserved());
    }

    #[test]
    fn test_legacy_only_chain() {
        let (game, state) = game();
        let chain = ResolverChain::for_game(Arc::clone(&game), &EngineConfig::legacy_only());
        assert_eq!(chain.tiers().collect::<Vec<_>>(), vec![ResolverTier::LegacyVisitor]);

        let rook = piece(&game, "rook");
        let (path, outcome) = chain.resolve_traced(&rook, &TileId::new("a1"), &TileId::new("d1"), &state);
        assert_eq!(path.unwrap().distance(), 3);
        assert_eq!(outcome, ResolutionOutcome::LegacyHit);

        let (path, outcome) = chain.resolve_traced(&rook, &TileId::new("a1"), &TileId::new("c3"), &state);
        assert!(path.is_none());
        assert_eq!(outcome, ResolutionOutcome::Skipped(SkipReason::NoServices));
    }

    #[test]
    fn test_metrics_disabled() {
        let (game, _) = game();
        let chain = ResolverChain::for_game(game, &EngineConfig::default().with_path_metrics(false));
        assert!(chain.metrics_snapshot().is_none());
    }
}
