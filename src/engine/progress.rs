//! A game in flight: engine, current state and applied events.

use std::sync::Arc;

use tracing::debug;

use crate::board::Game;
use crate::core::{DiceId, EngineError, EventChain, EventRejectionReason, GameRng, GameState, PieceId, TileId};
use crate::events::{GameEvent, MovePieceEvent, RollDiceEvent};

use super::{EventResult, GameEngine};

/// Immutable snapshot of a running game.
///
/// Handling an event never changes `self`; an applied event returns a new
/// `GameProgress` whose chain ends with that event. Clones are cheap.
#[derive(Clone, Debug)]
pub struct GameProgress {
    engine: Arc<GameEngine>,
    state: GameState,
    events: EventChain,
}

impl GameProgress {
    pub fn new(engine: Arc<GameEngine>, state: GameState) -> Self {
        Self {
            engine,
            state,
            events: EventChain::new(),
        }
    }

    #[must_use]
    pub fn engine(&self) -> &Arc<GameEngine> {
        &self.engine
    }

    #[must_use]
    pub fn game(&self) -> &Game {
        self.engine.game()
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn events(&self) -> &EventChain {
        &self.events
    }

    /// Dispatch `event`, returning the next progress and the full result.
    ///
    /// The progress is `self` (cloned) unless the event was applied.
    pub fn try_handle_event(&self, event: &GameEvent) -> Result<(GameProgress, EventResult), EngineError> {
        let (result, prepared) = self.engine.dispatch(&self.state, event.clone())?;
        if !result.applied {
            return Ok((self.clone(), result));
        }
        let next = Self {
            engine: Arc::clone(&self.engine),
            state: result.state.clone(),
            events: self.events.append(prepared),
        };
        Ok((next, result))
    }

    /// Dispatch `event`, treating every domain rejection as a value.
    pub fn handle_event_result(&self, event: &GameEvent) -> Result<EventResult, EngineError> {
        self.try_handle_event(event).map(|(_, result)| result)
    }

    /// Dispatch `event`.
    ///
    /// `PhaseClosed` and `NotApplicable` return an unchanged progress; other
    /// rejections are [`EngineError::RuleRejected`].
    pub fn handle_event(&self, event: &GameEvent) -> Result<GameProgress, EngineError> {
        let (next, result) = self.try_handle_event(event)?;
        if result.applied || result.is_benign() {
            return Ok(next);
        }
        debug!(reason = %result.reason, "event refused");
        Err(EngineError::rejected(result.reason, result.message.unwrap_or_default()))
    }

    /// Move `piece` from its recorded tile to `to`.
    pub fn move_piece(&self, piece: impl Into<PieceId>, to: impl Into<TileId>) -> Result<GameProgress, EngineError> {
        let piece = piece.into();
        let from = self.state.piece_tile(&piece).cloned().ok_or_else(|| {
            EngineError::rejected(EventRejectionReason::InvalidEvent, format!("{piece} is not on the board"))
        })?;
        self.handle_event(&MovePieceEvent::new(piece, from, to).into())
    }

    /// Roll `dice` with `rng` and dispatch the result.
    pub fn roll_dice(&self, rng: &mut GameRng, dice: &[DiceId]) -> Result<GameProgress, EngineError> {
        let mut rolls = Vec::with_capacity(dice.len());
        for id in dice {
            let die = self
                .game()
                .die(id)
                .ok_or_else(|| EngineError::UnknownArtifact(id.to_string()))?;
            rolls.push((id.clone(), rng.roll(die.sides)));
        }
        self.handle_event(&RollDiceEvent::new(rolls).into())
    }
}
