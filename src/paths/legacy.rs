//! Tier 3: walks raw patterns with a [`PatternVisitor`] and linear relation
//! lookups. Slow, but needs nothing precomputed and handles every pattern.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use tracing::trace;

use crate::board::{Board, Game, PatternVisitor, Piece};
use crate::core::{DirectionId, GameState, TileId};

use super::path::TilePath;
use super::resolver::{keep_shortest, Occupants, PathResolver, ResolverTier, TierOutcome};

/// Tier 3 resolver.
#[derive(Debug)]
pub struct LegacyPatternResolver {
    game: Arc<Game>,
}

impl LegacyPatternResolver {
    #[must_use]
    pub fn new(game: Arc<Game>) -> Self {
        Self { game }
    }
}

impl PathResolver for LegacyPatternResolver {
    fn tier(&self) -> ResolverTier {
        ResolverTier::LegacyVisitor
    }

    fn try_resolve(&self, piece: &Piece, from: &TileId, to: &TileId, state: &GameState) -> TierOutcome {
        if from == to {
            return TierOutcome::NotFound;
        }
        let occupants = Occupants::for_mover(&self.game, state, piece.owner);
        let mut visitor = PathVisitor {
            board: self.game.board(),
            occupants: &occupants,
            from,
            to,
        };
        let mut best = None;
        for pattern in &piece.patterns {
            keep_shortest(&mut best, pattern.accept(&mut visitor));
        }
        trace!(piece = %piece.id, %from, %to, found = best.is_some(), "legacy visitor");
        best.map_or(TierOutcome::NotFound, TierOutcome::Resolved)
    }
}

struct PathVisitor<'a> {
    board: &'a Board,
    occupants: &'a Occupants,
    from: &'a TileId,
    to: &'a TileId,
}

impl PathVisitor<'_> {
    fn step(&self, direction: &DirectionId) -> Option<TilePath> {
        let relation = self.board.relation_scan(self.from, direction)?;
        if &relation.to != self.to || self.occupants.is_own(self.to) {
            return None;
        }
        TilePath::new([relation.clone()])
    }

    fn slide(&self, direction: &DirectionId) -> Option<TilePath> {
        let mut visited = FxHashSet::default();
        visited.insert(self.from.clone());
        let mut relations = Vec::new();
        let mut cur = self.from.clone();
        while let Some(relation) = self.board.relation_scan(&cur, direction) {
            if !visited.insert(relation.to.clone()) {
                break;
            }
            relations.push(relation.clone());
            if &relation.to == self.to {
                return if self.occupants.is_own(self.to) {
                    None
                } else {
                    TilePath::new(relations)
                };
            }
            if self.occupants.is_occupied(&relation.to) {
                break;
            }
            cur = relation.to.clone();
        }
        None
    }
}

impl PatternVisitor for PathVisitor<'_> {
    type Output = Option<TilePath>;

    fn visit_null(&mut self) -> Self::Output {
        None
    }

    fn visit_fixed(&mut self, steps: &[DirectionId]) -> Self::Output {
        let mut relations = Vec::with_capacity(steps.len());
        let mut cur = self.from.clone();
        for direction in steps {
            let relation = self.board.relation_scan(&cur, direction)?;
            relations.push(relation.clone());
            cur = relation.to.clone();
        }
        if &cur != self.to || self.occupants.is_own(self.to) {
            return None;
        }
        TilePath::new(relations)
    }

    fn visit_direction(&mut self, direction: &DirectionId, repeatable: bool) -> Self::Output {
        if repeatable {
            self.slide(direction)
        } else {
            self.step(direction)
        }
    }

    fn visit_multi_direction(&mut self, directions: &[DirectionId], repeatable: bool) -> Self::Output {
        let mut best = None;
        for direction in directions {
            keep_shortest(&mut best, self.visit_direction(direction, repeatable));
        }
        best
    }
}
