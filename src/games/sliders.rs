//! Sliding pieces on an 8x8 board.
//!
//! Rooks, bishops and queens are sliders and resolve on the bitboard fast
//! path; knights jump with fixed patterns; kings step once in any direction.
//! Moving onto an opposing piece captures it. There is no check, castling or
//! promotion: this is a movement test bed, not chess.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::board::{Game, GameBuilder, GridDirections, Pattern, Piece};
use crate::conditions::{
    CompositeEventCondition, DestinationNotOwnOccupied, EventCondition, FromMatchesPieceTile, PathExists,
    PieceOwnedByActivePlayer, StateCondition,
};
use crate::core::{BuildError, EngineConfig, EngineError, GameState, PieceId, PlayerId, TileId};
use crate::engine::{GameEngine, GameProgress};
use crate::events::MovePieceEvent;
use crate::phases::GamePhase;
use crate::rules::{GameEventRule, MovePieceMutator, MutatorChain, NextPlayerMutator};

const ORTHOGONAL: [&str; 4] = ["north", "east", "south", "west"];
const DIAGONAL: [&str; 4] = ["north-east", "south-east", "south-west", "north-west"];

/// Kinds of piece on the slider board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Rook,
    Bishop,
    Queen,
    Knight,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 5] = [Self::Rook, Self::Bishop, Self::Queen, Self::Knight, Self::King];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Rook => "rook",
            Self::Bishop => "bishop",
            Self::Queen => "queen",
            Self::Knight => "knight",
            Self::King => "king",
        }
    }

    /// Movement patterns, in declaration order.
    #[must_use]
    pub fn patterns(self) -> Vec<Pattern> {
        match self {
            Self::Rook => vec![Pattern::rays(ORTHOGONAL)],
            Self::Bishop => vec![Pattern::rays(DIAGONAL)],
            Self::Queen => vec![Pattern::rays(ORTHOGONAL), Pattern::rays(DIAGONAL)],
            Self::King => vec![Pattern::steps_any(ORTHOGONAL.iter().chain(DIAGONAL.iter()).copied())],
            Self::Knight => {
                let mut jumps = Vec::with_capacity(8);
                for (long, sides) in [
                    ("north", ["east", "west"]),
                    ("south", ["east", "west"]),
                    ("east", ["north", "south"]),
                    ("west", ["north", "south"]),
                ] {
                    for side in sides {
                        jumps.push(Pattern::fixed([long, long, side]));
                    }
                }
                jumps
            }
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Id of the `ordinal`-th piece of `kind` owned by `owner` (0-based).
#[must_use]
pub fn piece_id(owner: PlayerId, kind: PieceKind, ordinal: usize) -> PieceId {
    let side = if owner.index() == 0 { "white" } else { "black" };
    PieceId::new(format!("{side}-{kind}-{ordinal}"))
}

/// Builder for a slider board.
#[derive(Clone, Debug, Default)]
pub struct SlidersBuilder {
    placements: Vec<(PieceKind, PlayerId, TileId)>,
}

impl SlidersBuilder {
    /// An empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// One of each kind per side on the back ranks.
    pub fn standard() -> Self {
        let white = PlayerId::new(0);
        let black = PlayerId::new(1);
        Self::new()
            .with(PieceKind::Rook, white, "a1")
            .with(PieceKind::Knight, white, "b1")
            .with(PieceKind::Bishop, white, "c1")
            .with(PieceKind::Queen, white, "d1")
            .with(PieceKind::King, white, "e1")
            .with(PieceKind::Rook, black, "h8")
            .with(PieceKind::Knight, black, "g8")
            .with(PieceKind::Bishop, black, "f8")
            .with(PieceKind::Queen, black, "d8")
            .with(PieceKind::King, black, "e8")
    }

    /// Add a piece. Ordinals count per owner and kind in insertion order.
    #[must_use]
    pub fn with(mut self, kind: PieceKind, owner: PlayerId, tile: impl Into<TileId>) -> Self {
        self.placements.push((kind, owner, tile.into()));
        self
    }

    pub fn build(&self) -> Result<(Game, GameState), BuildError> {
        let mut builder = GameBuilder::new("sliders")
            .grid(8, 8, GridDirections::All)
            .with_player("white")
            .with_player("black");
        let mut ordinals: FxHashMap<(PlayerId, PieceKind), usize> = FxHashMap::default();
        for (kind, owner, tile) in &self.placements {
            let ordinal = ordinals.entry((*owner, *kind)).or_insert(0);
            let id = piece_id(*owner, *kind, *ordinal);
            *ordinal += 1;
            builder = builder
                .with_piece(Piece::new(id.clone(), *owner).with_patterns(kind.patterns()))
                .place(id, tile.clone());
        }
        builder.build()
    }

    /// Alternate moves; capture by displacement.
    #[must_use]
    pub fn phases(&self) -> GamePhase {
        let legal: Vec<Arc<dyn EventCondition<MovePieceEvent>>> = vec![
            Arc::new(PieceOwnedByActivePlayer),
            Arc::new(FromMatchesPieceTile),
            Arc::new(PathExists),
            Arc::new(DestinationNotOwnOccupied),
        ];
        GamePhase::composite(0, "turn", StateCondition::Always).with_child(
            GamePhase::new(1, "move", StateCondition::Always).with_rule(GameEventRule::<MovePieceEvent>::new(
                "move",
                CompositeEventCondition::all(legal),
                MutatorChain::<MovePieceEvent>::new()
                    .then(MovePieceMutator::capturing())
                    .then(NextPlayerMutator),
            )),
        )
    }

    pub fn start(&self, config: EngineConfig) -> Result<GameProgress, EngineError> {
        let (game, state) = self.build()?;
        let engine = GameEngine::new(game, self.phases(), config)?;
        Ok(GameProgress::new(Arc::new(engine), state))
    }
}
