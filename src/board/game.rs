//! Pieces, dice and the compiled game definition.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{DiceId, Player, PlayerId, PieceId};

use super::pattern::Pattern;
use super::topology::Board;

/// A piece definition: who owns it and how it may move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub owner: PlayerId,
    pub patterns: Vec<Pattern>,
}

impl Piece {
    /// Create a piece without movement patterns.
    pub fn new(id: impl Into<PieceId>, owner: PlayerId) -> Self {
        Self {
            id: id.into(),
            owner,
            patterns: Vec::new(),
        }
    }

    /// Add a movement pattern.
    #[must_use]
    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Add several movement patterns.
    #[must_use]
    pub fn with_patterns(mut self, patterns: impl IntoIterator<Item = Pattern>) -> Self {
        self.patterns.extend(patterns);
        self
    }

    /// A slider moves only along repeatable rays.
    ///
    /// ```
    /// use rust_boards::board::{Pattern, Piece};
    /// use rust_boards::core::PlayerId;
    ///
    /// let rook = Piece::new("rook", PlayerId::new(0))
    ///     .with_pattern(Pattern::rays(["north", "east", "south", "west"]));
    /// assert!(rook.is_slider());
    ///
    /// let knight = Piece::new("knight", PlayerId::new(0))
    ///     .with_pattern(Pattern::fixed(["north", "north", "east"]));
    /// assert!(!knight.is_slider());
    /// ```
    #[must_use]
    pub fn is_slider(&self) -> bool {
        !self.patterns.is_empty() && self.patterns.iter().all(Pattern::is_ray)
    }
}

/// A die definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dice {
    pub id: DiceId,
    pub sides: u32,
}

impl Dice {
    pub fn new(id: impl Into<DiceId>, sides: u32) -> Self {
        Self { id: id.into(), sides }
    }
}

/// Immutable game definition: board, players, pieces and dice.
///
/// The engine reads a `Game` but never modifies it. Build one with
/// [`GameBuilder`](super::GameBuilder).
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    players: Vec<Player>,
    pieces: Vec<Piece>,
    piece_index: FxHashMap<PieceId, usize>,
    dice: Vec<Dice>,
    dice_index: FxHashMap<DiceId, usize>,
}

impl Game {
    pub(crate) fn from_parts(board: Board, players: Vec<Player>, pieces: Vec<Piece>, dice: Vec<Dice>) -> Self {
        let piece_index = pieces.iter().enumerate().map(|(i, p)| (p.id.clone(), i)).collect();
        let dice_index = dice.iter().enumerate().map(|(i, d)| (d.id.clone(), i)).collect();
        Self {
            board,
            players,
            pieces,
            piece_index,
            dice,
            dice_index,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Pieces in declaration order.
    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Look up a piece definition.
    #[must_use]
    pub fn piece(&self, id: &PieceId) -> Option<&Piece> {
        self.piece_index.get(id).map(|&i| &self.pieces[i])
    }

    /// Owner of a piece.
    #[must_use]
    pub fn owner_of(&self, id: &PieceId) -> Option<PlayerId> {
        self.piece(id).map(|p| p.owner)
    }

    /// Dice in declaration order.
    #[must_use]
    pub fn dice(&self) -> &[Dice] {
        &self.dice
    }

    /// Look up a die definition.
    #[must_use]
    pub fn die(&self, id: &DiceId) -> Option<&Dice> {
        self.dice_index.get(id).map(|&i| &self.dice[i])
    }
}
