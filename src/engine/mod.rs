//! Event dispatch over a compiled decision plan.
//!
//! [`GameEngine`] owns everything that is fixed for a game definition: the
//! [`Game`], the compiled [`DecisionPlan`] and the path [`ResolverChain`].
//! It is immutable and `Send + Sync`; callers share it through an `Arc` and
//! advance their own [`GameProgress`].
//!
//! ## Dispatch
//!
//! For each event the plan entries are scanned in compiled order:
//!
//! 1. entries whose event kind cannot match are skipped,
//! 2. entries whose exclusivity group already produced a candidate are skipped,
//! 3. the entry's phase gates and condition must be `Valid`,
//! 4. the entry's rule check must be `Valid` to become a candidate.
//!
//! A movement event gets its path from the [`ResolverChain`] just before the
//! first open entry checks it, so closed phases cost no path resolution.
//!
//! The conflict policy picks one candidate and its rule mutates the state.
//! With no candidate the first rule rejection is reported; failing that
//! `NotApplicable` if some phase was open, else `PhaseClosed`.

mod progress;

pub use progress::GameProgress;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::board::Game;
use crate::conditions::{ConditionResponse, ConditionResult};
use crate::core::{EngineConfig, EngineError, GameState, PieceId, TileId};
use crate::events::GameEvent;
use crate::paths::{PathMetricsSnapshot, ResolverChain, TilePath};
use crate::phases::GamePhase;
use crate::plan::{select, Candidate, DecisionPlan};

pub use crate::core::EventRejectionReason;

/// Outcome of dispatching one event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventResult {
    /// The new state if applied, otherwise the original.
    pub state: GameState,
    pub applied: bool,
    pub reason: EventRejectionReason,
    pub message: Option<String>,
}

impl EventResult {
    #[must_use]
    pub fn applied(state: GameState) -> Self {
        Self {
            state,
            applied: true,
            reason: EventRejectionReason::None,
            message: None,
        }
    }

    pub fn rejected(state: GameState, reason: EventRejectionReason, message: impl Into<String>) -> Self {
        Self {
            state,
            applied: false,
            reason,
            message: Some(message.into()),
        }
    }

    /// `PhaseClosed` and `NotApplicable` leave the game where it was without
    /// being errors.
    #[must_use]
    pub fn is_benign(&self) -> bool {
        matches!(
            self.reason,
            EventRejectionReason::PhaseClosed | EventRejectionReason::NotApplicable
        )
    }
}

/// Immutable engine for one game definition.
#[derive(Debug)]
pub struct GameEngine {
    game: Arc<Game>,
    plan: DecisionPlan,
    resolver: ResolverChain,
    config: EngineConfig,
}

impl GameEngine {
    /// Compile `root` and set up path resolution for `game`.
    pub fn new(game: Game, root: GamePhase, config: EngineConfig) -> Result<Self, EngineError> {
        let plan = DecisionPlan::compile(&root, &config)?;
        let game = Arc::new(game);
        let resolver = ResolverChain::for_game(Arc::clone(&game), &config);
        debug!(
            entries = plan.len(),
            tiers = resolver.tiers().count(),
            "engine ready"
        );
        Ok(Self {
            game,
            plan,
            resolver,
            config,
        })
    }

    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    #[must_use]
    pub fn plan(&self) -> &DecisionPlan {
        &self.plan
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn resolver(&self) -> &ResolverChain {
        &self.resolver
    }

    /// Counters of the path resolver, `None` when metrics are disabled.
    #[must_use]
    pub fn path_metrics(&self) -> Option<PathMetricsSnapshot> {
        self.resolver.metrics_snapshot()
    }

    /// Resolve a movement path for `piece`; unknown pieces have none.
    #[must_use]
    pub fn resolve_path(&self, piece: &PieceId, from: &TileId, to: &TileId, state: &GameState) -> Option<TilePath> {
        let piece = self.game.piece(piece)?;
        self.resolver.resolve(piece, from, to, state)
    }

    /// Attach the board's path to a movement event.
    ///
    /// Any path the event already carries is discarded: rules only ever see
    /// what the resolver chain produced, or `None` when no tier found one.
    #[must_use]
    pub fn prepare_event(&self, state: &GameState, event: GameEvent) -> GameEvent {
        match event {
            GameEvent::Move(mut mv) => {
                mv.path = self.resolve_path(&mv.piece, &mv.from, &mv.to, state);
                GameEvent::Move(mv)
            }
            other => other,
        }
    }

    /// Dispatch `event` against `state`.
    ///
    /// Domain rejections come back as an [`EventResult`]; only fatal errors
    /// (conflicts and broken definitions) are `Err`.
    pub fn evaluate(&self, state: &GameState, event: &GameEvent) -> Result<EventResult, EngineError> {
        self.dispatch(state, event.clone()).map(|(result, _)| result)
    }

    /// Like [`evaluate`](Self::evaluate), also returning the prepared event.
    pub(crate) fn dispatch(&self, state: &GameState, event: GameEvent) -> Result<(EventResult, GameEvent), EngineError> {
        let mut event = event;
        // Paths are resolved once, at the first open entry that can take the move.
        let mut prepared = !matches!(event, GameEvent::Move(_));
        let kinds = self.plan.event_kinds();
        let groups = self.plan.exclusivity_groups();
        let roots = self.plan.group_roots();

        let mut satisfied = vec![false; self.plan.len()];
        let mut candidates = Vec::new();
        let mut any_open = false;
        let mut rejection: Option<ConditionResponse> = None;

        for (index, entry) in self.plan.entries().iter().enumerate() {
            if !kinds[index].accepts(&event) {
                continue;
            }
            let grouped = groups[index].is_some();
            if grouped && satisfied[roots[index]] {
                trace!(phase = entry.phase_number, "group already satisfied");
                continue;
            }
            if !entry.is_open(state).is_valid() {
                continue;
            }
            any_open = true;
            if !prepared {
                event = self.prepare_event(state, event);
                prepared = true;
            }

            let response = entry.rule.check(self, state, &event);
            trace!(phase = entry.phase_number, result = ?response.result, "rule check");
            match response.result {
                ConditionResult::Valid => {
                    if grouped {
                        satisfied[roots[index]] = true;
                    }
                    candidates.push(Candidate::from_entry(index, entry));
                }
                ConditionResult::Invalid => {
                    rejection.get_or_insert(response);
                }
                ConditionResult::Ignore => {}
            }
        }

        let Some(index) = select(&candidates)? else {
            let result = match rejection {
                Some(response) => EventResult::rejected(state.clone(), response.rejection_reason(), response.message()),
                None if any_open => EventResult::rejected(
                    state.clone(),
                    EventRejectionReason::NotApplicable,
                    "no rule accepts the event",
                ),
                None => EventResult::rejected(
                    state.clone(),
                    EventRejectionReason::PhaseClosed,
                    "no open phase accepts the event",
                ),
            };
            debug!(kind = ?event.kind(), reason = %result.reason, "event rejected");
            return Ok((result, event));
        };

        let entry = self
            .plan
            .entry(index)
            .ok_or_else(|| EngineError::Invariant(format!("selected entry {index} is out of range")))?;
        let result = match entry.rule.handle_event(self, state, &event) {
            Ok(next) if next == *state => EventResult::rejected(
                state.clone(),
                EventRejectionReason::NotApplicable,
                format!("{} left the state unchanged", entry.rule.name()),
            ),
            Ok(next) => EventResult::applied(next),
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => EventResult::rejected(
                state.clone(),
                err.rejection_reason().unwrap_or(EventRejectionReason::InvalidEvent),
                err.detail(),
            ),
        };
        debug!(
            kind = ?event.kind(),
            phase = entry.phase_number,
            candidates = candidates.len(),
            reason = %result.reason,
            "event dispatched"
        );
        Ok((result, event))
    }
}
