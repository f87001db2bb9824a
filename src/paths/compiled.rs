//! Tier 2: compiled pattern IR walked over the board's relation index.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::board::{Board, Game, Pattern, Piece};
use crate::core::{DirectionId, GameState, PieceId, TileId};

use super::path::TilePath;
use super::resolver::{keep_shortest, Occupants, PathResolver, ResolverTier, TierOutcome};

/// Movement IR. Single steps compile to one-step `Fixed` sequences.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompiledPattern {
    Fixed { steps: Arc<[DirectionId]> },
    Ray { direction: DirectionId },
    MultiRay { directions: Arc<[DirectionId]> },
}

impl CompiledPattern {
    /// Lower one declared pattern, preserving direction order.
    #[must_use]
    pub fn lower(pattern: &Pattern) -> Vec<CompiledPattern> {
        match pattern {
            Pattern::Null => Vec::new(),
            Pattern::Fixed { steps } => vec![Self::Fixed {
                steps: steps.as_slice().into(),
            }],
            Pattern::Direction {
                direction,
                repeatable: true,
            } => vec![Self::Ray {
                direction: direction.clone(),
            }],
            Pattern::Direction {
                direction,
                repeatable: false,
            } => vec![Self::Fixed {
                steps: Arc::from(vec![direction.clone()]),
            }],
            Pattern::MultiDirection {
                directions,
                repeatable: true,
            } => vec![Self::MultiRay {
                directions: directions.as_slice().into(),
            }],
            Pattern::MultiDirection {
                directions,
                repeatable: false,
            } => directions
                .iter()
                .map(|d| Self::Fixed {
                    steps: Arc::from(vec![d.clone()]),
                })
                .collect(),
        }
    }
}

/// Compiled patterns for every piece of a game.
#[derive(Clone, Debug, Default)]
pub struct CompiledPatternTable {
    pieces: FxHashMap<PieceId, Arc<[CompiledPattern]>>,
}

impl CompiledPatternTable {
    #[must_use]
    pub fn compile(game: &Game) -> Self {
        let pieces = game
            .pieces()
            .iter()
            .map(|piece| (piece.id.clone(), Self::compile_piece(piece)))
            .collect();
        Self { pieces }
    }

    #[must_use]
    pub fn compile_piece(piece: &Piece) -> Arc<[CompiledPattern]> {
        piece.patterns.iter().flat_map(CompiledPattern::lower).collect()
    }

    #[must_use]
    pub fn get(&self, piece: &PieceId) -> Option<&Arc<[CompiledPattern]>> {
        self.pieces.get(piece)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

/// Tier 2 resolver.
#[derive(Debug)]
pub struct CompiledPatternResolver {
    game: Arc<Game>,
    table: CompiledPatternTable,
}

impl CompiledPatternResolver {
    #[must_use]
    pub fn new(game: Arc<Game>) -> Self {
        let table = CompiledPatternTable::compile(&game);
        Self { game, table }
    }

    #[must_use]
    pub fn table(&self) -> &CompiledPatternTable {
        &self.table
    }
}

impl PathResolver for CompiledPatternResolver {
    fn tier(&self) -> ResolverTier {
        ResolverTier::CompiledPatterns
    }

    fn try_resolve(&self, piece: &Piece, from: &TileId, to: &TileId, state: &GameState) -> TierOutcome {
        if from == to {
            return TierOutcome::NotFound;
        }
        let patterns = match self.table.get(&piece.id) {
            Some(patterns) => Arc::clone(patterns),
            None => CompiledPatternTable::compile_piece(piece),
        };

        let board = self.game.board();
        let occupants = Occupants::for_mover(&self.game, state, piece.owner);
        let mut best = None;
        for pattern in patterns.iter() {
            match pattern {
                CompiledPattern::Fixed { steps } => {
                    keep_shortest(&mut best, walk_fixed(board, &occupants, steps, from, to));
                }
                CompiledPattern::Ray { direction } => {
                    keep_shortest(&mut best, walk_ray(board, &occupants, direction, from, to));
                }
                CompiledPattern::MultiRay { directions } => {
                    for direction in directions.iter() {
                        keep_shortest(&mut best, walk_ray(board, &occupants, direction, from, to));
                    }
                }
            }
        }

        trace!(piece = %piece.id, %from, %to, found = best.is_some(), "compiled patterns");
        best.map_or(TierOutcome::NotFound, TierOutcome::Resolved)
    }
}

fn walk_fixed(
    board: &Board,
    occupants: &Occupants,
    steps: &[DirectionId],
    from: &TileId,
    to: &TileId,
) -> Option<TilePath> {
    let mut relations = Vec::with_capacity(steps.len());
    let mut cur = from;
    for direction in steps {
        let relation = board.relation(cur, direction)?;
        cur = &relation.to;
        relations.push(relation.clone());
    }
    if cur != to || occupants.is_own(to) {
        return None;
    }
    TilePath::new(relations)
}

fn walk_ray(
    board: &Board,
    occupants: &Occupants,
    direction: &DirectionId,
    from: &TileId,
    to: &TileId,
) -> Option<TilePath> {
    let mut visited = FxHashSet::default();
    visited.insert(from);
    let mut relations = Vec::new();
    let mut cur = from;
    loop {
        let relation = board.relation(cur, direction)?;
        if !visited.insert(&relation.to) {
            return None;
        }
        relations.push(relation.clone());
        if &relation.to == to {
            if occupants.is_own(to) {
                return None;
            }
            return TilePath::new(relations);
        }
        if occupants.is_occupied(&relation.to) {
            return None;
        }
        cur = &relation.to;
    }
}
