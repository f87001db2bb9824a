//! Tier 1: bitboard sliding fast path.
//!
//! Only sliders qualify. For each declared ray direction the precomputed
//! empty-board ray from the origin is tested for the target bit; a matching ray
//! is then walked through the neighbor table against the occupancy masks, and
//! the walked indices are turned back into board relations.

use std::sync::Arc;

use tracing::trace;

use crate::board::{Game, Piece};
use crate::core::{GameState, TileId};

use super::bitboard::{Bitboard, BitboardServices, Occupancy};
use super::path::TilePath;
use super::resolver::{PathResolver, ResolverTier, SkipReason, TierOutcome};

/// Tier 1 resolver.
#[derive(Debug)]
pub struct SlidingFastPath {
    game: Arc<Game>,
    services: Option<BitboardServices>,
}

enum RayWalk {
    Reached(Vec<usize>),
    Blocked,
}

impl SlidingFastPath {
    /// Precompute services for the game's board. Boards too large for a
    /// bitboard get none and every attempt reports `NoServices`.
    #[must_use]
    pub fn new(game: Arc<Game>) -> Self {
        let services = BitboardServices::new(game.board());
        Self { game, services }
    }

    #[must_use]
    pub fn has_services(&self) -> bool {
        self.services.is_some()
    }

    fn walk(
        services: &BitboardServices,
        occupancy: &Occupancy,
        own: Bitboard,
        direction: usize,
        from: usize,
        to: usize,
    ) -> RayWalk {
        let mut visited = Bitboard::single(from);
        let mut walked = vec![from];
        let mut cur = from;
        while let Some(next) = services.shape.neighbor(direction, cur) {
            if visited.contains(next) {
                break;
            }
            visited = visited.with(next);
            walked.push(next);
            if next == to {
                if own.contains(to) {
                    break;
                }
                return RayWalk::Reached(walked);
            }
            if occupancy.all.contains(next) {
                break;
            }
            cur = next;
        }
        RayWalk::Blocked
    }

    fn reconstruct(&self, services: &BitboardServices, direction: usize, walked: &[usize]) -> Option<TilePath> {
        let board = self.game.board();
        let direction = services.direction(direction)?;
        let mut relations = Vec::with_capacity(walked.len().saturating_sub(1));
        for pair in walked.windows(2) {
            let from = services.tile(pair[0])?;
            let to = services.tile(pair[1])?;
            let relation = board.relation(from, direction)?;
            if &relation.to != to {
                return None;
            }
            relations.push(relation.clone());
        }
        TilePath::new(relations)
    }
}

impl PathResolver for SlidingFastPath {
    fn tier(&self) -> ResolverTier {
        ResolverTier::SlidingFastPath
    }

    fn try_resolve(&self, piece: &Piece, from: &TileId, to: &TileId, state: &GameState) -> TierOutcome {
        let Some(services) = &self.services else {
            return TierOutcome::Skipped(SkipReason::NoServices);
        };
        if !piece.is_slider() {
            return TierOutcome::Skipped(SkipReason::NotSlider);
        }
        let board = self.game.board();
        let (Some(from_index), Some(to_index)) = (board.tile_index(from), board.tile_index(to)) else {
            return TierOutcome::Skipped(SkipReason::RayMiss);
        };
        if from_index == to_index {
            return TierOutcome::Skipped(SkipReason::RayMiss);
        }

        let occupancy = Occupancy::from_state(&self.game, state);
        let own = occupancy.by_player.get(piece.owner).copied().unwrap_or_default();
        let mut best: Option<TilePath> = None;
        let mut reconstruction_failed = false;

        for direction in piece.patterns.iter().flat_map(|p| p.directions()) {
            let Some(dir) = board.direction_index(direction) else {
                continue;
            };
            if !services.rays.ray(dir, from_index).contains(to_index) {
                continue;
            }
            let RayWalk::Reached(walked) = Self::walk(services, &occupancy, own, dir, from_index, to_index) else {
                continue;
            };
            match self.reconstruct(services, dir, &walked) {
                Some(path) if best.as_ref().map_or(true, |b| path.distance() < b.distance()) => {
                    best = Some(path);
                }
                Some(_) => {}
                None => reconstruction_failed = true,
            }
        }

        trace!(piece = %piece.id, %from, %to, found = best.is_some(), "sliding fast path");
        match best {
            Some(path) => TierOutcome::Resolved(path),
            None if reconstruction_failed => TierOutcome::Skipped(SkipReason::ReconstructionFailure),
            None => TierOutcome::Skipped(SkipReason::RayMiss),
        }
    }
}
