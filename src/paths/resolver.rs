//! The resolver interface shared by every tier.
//!
//! All tiers apply the same movement semantics:
//! - moving onto the starting tile is never a path;
//! - a ray stops at the first occupied tile, which it may enter only if that
//!   tile is the target and holds no piece of the mover's owner;
//! - a ray never revisits a tile;
//! - fixed step sequences ignore intermediate occupancy and must land exactly
//!   on the target;
//! - across patterns, the shortest path wins and ties keep the earlier
//!   declaration.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::board::{Game, Piece};
use crate::core::{GameState, PieceState, PlayerId, TileId};

use super::path::TilePath;

/// The three resolution strategies, fastest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolverTier {
    SlidingFastPath,
    CompiledPatterns,
    LegacyVisitor,
}

/// Why the sliding fast path did not produce a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkipReason {
    /// Bitboard services unavailable (disabled, or board too large).
    NoServices,
    /// The piece has a pattern that is not a repeatable ray.
    NotSlider,
    /// No ray reaches the target, or every matching ray is blocked.
    RayMiss,
    /// A ray reached the target but its relations could not be rebuilt.
    ReconstructionFailure,
}

/// Result of asking one tier for a path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TierOutcome {
    Resolved(TilePath),
    /// The tier does not apply; later tiers should try.
    Skipped(SkipReason),
    /// The tier applies and found nothing.
    NotFound,
}

impl TierOutcome {
    #[must_use]
    pub fn into_path(self) -> Option<TilePath> {
        match self {
            Self::Resolved(path) => Some(path),
            Self::Skipped(_) | Self::NotFound => None,
        }
    }
}

/// A path resolution strategy.
pub trait PathResolver: Send + Sync + fmt::Debug {
    fn tier(&self) -> ResolverTier;

    fn try_resolve(&self, piece: &Piece, from: &TileId, to: &TileId, state: &GameState) -> TierOutcome;
}

/// Tiles holding any piece, and tiles holding a piece of the mover's owner.
#[derive(Debug, Default)]
pub(crate) struct Occupants {
    occupied: FxHashSet<TileId>,
    own: FxHashSet<TileId>,
}

impl Occupants {
    pub(crate) fn for_mover(game: &Game, state: &GameState, owner: PlayerId) -> Self {
        let mut occupants = Self::default();
        for piece in state.get_states::<PieceState>() {
            occupants.occupied.insert(piece.tile.clone());
            if game.owner_of(&piece.piece) == Some(owner) {
                occupants.own.insert(piece.tile.clone());
            }
        }
        occupants
    }

    pub(crate) fn is_occupied(&self, tile: &TileId) -> bool {
        self.occupied.contains(tile)
    }

    pub(crate) fn is_own(&self, tile: &TileId) -> bool {
        self.own.contains(tile)
    }
}

/// Replace `best` if `candidate` is strictly shorter.
pub(crate) fn keep_shortest(best: &mut Option<TilePath>, candidate: Option<TilePath>) {
    let Some(candidate) = candidate else {
        return;
    };
    match best {
        Some(current) if current.distance() <= candidate.distance() => {}
        _ => *best = Some(candidate),
    }
}
