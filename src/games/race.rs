//! Dice race.
//!
//! Each player owns one runner on a private lane of a `track_length x players`
//! grid and moves it east by exactly the rolled value. A turn is roll, then
//! move or `pass`. Moving clears the die and hands the turn over.

use std::sync::Arc;

use crate::board::{grid_tile_name, Game, GameBuilder, GridDirections, Pattern, Piece};
use crate::conditions::{
    CompositeEventCondition, CustomNameIs, DiceValuesInRange, DistanceMatchesDice, EventCondition,
    FromMatchesPieceTile, PathExists, PieceOwnedByActivePlayer, StateCondition,
};
use crate::core::{BuildError, EngineConfig, EngineError, GameState, PieceId, PlayerId};
use crate::engine::{GameEngine, GameProgress};
use crate::events::{CustomEvent, MovePieceEvent, RollDiceEvent};
use crate::phases::GamePhase;
use crate::rules::{ClearDiceMutator, GameEventRule, MovePieceMutator, MutatorChain, NextPlayerMutator, RollDiceMutator};

/// Id of the shared die.
pub const DIE: &str = "d6";

/// Phase numbers of the race's turn.
pub mod phase {
    pub const TURN: u32 = 0;
    pub const ROLL: u32 = 1;
    pub const MOVE: u32 = 2;
    pub const PASS: u32 = 3;
}

/// Runner id of `player`.
#[must_use]
pub fn runner(player: PlayerId) -> PieceId {
    PieceId::new(format!("runner-{}", player.index()))
}

/// Builder for a dice race.
#[derive(Clone, Debug)]
pub struct RaceBuilder {
    players: usize,
    track_length: usize,
    sides: u32,
}

impl Default for RaceBuilder {
    fn default() -> Self {
        Self {
            players: 2,
            track_length: 12,
            sides: 6,
        }
    }
}

impl RaceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn players(mut self, count: usize) -> Self {
        self.players = count;
        self
    }

    #[must_use]
    pub fn track_length(mut self, length: usize) -> Self {
        self.track_length = length;
        self
    }

    #[must_use]
    pub fn sides(mut self, sides: u32) -> Self {
        self.sides = sides;
        self
    }

    /// Board, runners on their starting tiles and the die.
    pub fn build(&self) -> Result<(Game, GameState), BuildError> {
        let mut builder = GameBuilder::new("race")
            .grid(self.track_length, self.players, GridDirections::Orthogonal)
            .with_dice(DIE, self.sides);
        for lane in 0..self.players {
            let player = PlayerId::new(lane as u8);
            builder = builder
                .with_player(format!("runner {lane}"))
                .with_piece(Piece::new(runner(player), player).with_pattern(Pattern::ray("east")))
                .place(runner(player), grid_tile_name(0, lane));
        }
        builder.build()
    }

    /// The race's phase tree.
    #[must_use]
    pub fn phases(&self) -> GamePhase {
        let legal_move: Vec<Arc<dyn EventCondition<MovePieceEvent>>> = vec![
            Arc::new(PieceOwnedByActivePlayer),
            Arc::new(FromMatchesPieceTile),
            Arc::new(PathExists),
            Arc::new(DistanceMatchesDice::new([DIE])),
        ];

        GamePhase::composite(phase::TURN, "turn", StateCondition::Always)
            .with_child(
                GamePhase::new(phase::ROLL, "roll", StateCondition::dice_not_rolled(DIE))
                    .with_rule(GameEventRule::<RollDiceEvent>::new("roll", DiceValuesInRange, RollDiceMutator)),
            )
            .with_child(
                GamePhase::new(phase::MOVE, "move", StateCondition::dice_rolled(DIE)).with_rule(
                    GameEventRule::<MovePieceEvent>::new(
                        "advance",
                        CompositeEventCondition::all(legal_move),
                        MutatorChain::<MovePieceEvent>::new()
                            .then(MovePieceMutator::new())
                            .then(ClearDiceMutator::new([DIE]))
                            .then(NextPlayerMutator),
                    ),
                ),
            )
            .with_child(
                GamePhase::new(phase::PASS, "pass", StateCondition::dice_rolled(DIE))
                    .with_rule(GameEventRule::<CustomEvent>::new(
                        "pass",
                        CustomNameIs::new("pass"),
                        MutatorChain::<CustomEvent>::new()
                            .then(ClearDiceMutator::new([DIE]))
                            .then(NextPlayerMutator),
                    )),
            )
    }

    /// A ready-to-play race.
    pub fn start(&self, config: EngineConfig) -> Result<GameProgress, EngineError> {
        let (game, state) = self.build()?;
        let engine = GameEngine::new(game, self.phases(), config)?;
        Ok(GameProgress::new(Arc::new(engine), state))
    }
}
