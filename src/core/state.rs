//! Immutable game state snapshots.
//!
//! ## GameState
//!
//! A `GameState` maps every stateful artifact to exactly one
//! [`ArtifactState`]. Snapshots are never modified: [`GameState::next`]
//! returns a new snapshot that shares all untouched entries with its parent
//! through `im::OrdMap`.
//!
//! Two notions of equality exist:
//! - [`GameState::is_same`]: the very same snapshot (pointer identity). The
//!   engine uses it to tell "a rule changed nothing" from "a rule rebuilt an
//!   equal state".
//! - `PartialEq`: same content.
//!
//! ## Typed queries
//!
//! Outcome and scoring collaborators read state through
//! [`GameState::get_state`] / [`GameState::get_states`], typed by the
//! [`StateKind`] projections below.

use std::hash::Hasher;
use std::sync::Arc;

use im::OrdMap;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use super::ids::{ArtifactId, CustomId, DiceId, PieceId, TileId};
use super::player::PlayerId;

/// A piece standing on a tile.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceState {
    pub piece: PieceId,
    pub tile: TileId,
}

/// A piece removed from the board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapturedPieceState {
    pub piece: PieceId,
}

/// A die and its current face. `None` until rolled (or after being cleared).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceState {
    pub dice: DiceId,
    pub value: Option<u32>,
}

/// Whether a player currently holds the turn.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivePlayerState {
    pub player: PlayerId,
    pub active: bool,
}

/// A game-defined integer value (score, counter, flag as 0/1).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomState {
    pub key: CustomId,
    pub value: i64,
}

/// State of a single artifact.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactState {
    Piece(PieceState),
    Captured(CapturedPieceState),
    Dice(DiceState),
    ActivePlayer(ActivePlayerState),
    Custom(CustomState),
}

impl ArtifactState {
    /// A piece on a tile.
    pub fn piece(piece: impl Into<PieceId>, tile: impl Into<TileId>) -> Self {
        Self::Piece(PieceState {
            piece: piece.into(),
            tile: tile.into(),
        })
    }

    /// A captured piece.
    pub fn captured(piece: impl Into<PieceId>) -> Self {
        Self::Captured(CapturedPieceState {
            piece: piece.into(),
        })
    }

    /// A die showing `value`.
    pub fn dice(dice: impl Into<DiceId>, value: Option<u32>) -> Self {
        Self::Dice(DiceState {
            dice: dice.into(),
            value,
        })
    }

    /// A player's turn flag.
    pub fn active_player(player: PlayerId, active: bool) -> Self {
        Self::ActivePlayer(ActivePlayerState { player, active })
    }

    /// A custom value.
    pub fn custom(key: impl Into<CustomId>, value: i64) -> Self {
        Self::Custom(CustomState {
            key: key.into(),
            value,
        })
    }

    /// The artifact this state belongs to.
    ///
    /// `Piece` and `Captured` share the piece's identity, so capturing a piece
    /// replaces its on-board state.
    #[must_use]
    pub fn artifact(&self) -> ArtifactId {
        match self {
            Self::Piece(s) => ArtifactId::Piece(s.piece.clone()),
            Self::Captured(s) => ArtifactId::Piece(s.piece.clone()),
            Self::Dice(s) => ArtifactId::Dice(s.dice.clone()),
            Self::ActivePlayer(s) => ArtifactId::Player(s.player),
            Self::Custom(s) => ArtifactId::Custom(s.key.clone()),
        }
    }
}

/// Typed projection of an [`ArtifactState`].
pub trait StateKind: Sized {
    /// Borrow the typed state if `state` is of this kind.
    fn project(state: &ArtifactState) -> Option<&Self>;
}

macro_rules! state_kind {
    ($ty:ty, $variant:ident) => {
        impl StateKind for $ty {
            fn project(state: &ArtifactState) -> Option<&Self> {
                match state {
                    ArtifactState::$variant(s) => Some(s),
                    _ => None,
                }
            }
        }
    };
}

state_kind!(PieceState, Piece);
state_kind!(CapturedPieceState, Captured);
state_kind!(DiceState, Dice);
state_kind!(ActivePlayerState, ActivePlayer);
state_kind!(CustomState, Custom);

/// Immutable snapshot of every artifact's state.
///
/// Serializes as the ordered list of states.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(into = "Vec<ArtifactState>", from = "Vec<ArtifactState>")]
pub struct GameState {
    states: Arc<OrdMap<ArtifactId, ArtifactState>>,
}

impl GameState {
    /// Create a snapshot from a set of states.
    ///
    /// If two states name the same artifact, the later one wins.
    pub fn new(states: impl IntoIterator<Item = ArtifactState>) -> Self {
        let map = states
            .into_iter()
            .map(|s| (s.artifact(), s))
            .collect::<OrdMap<_, _>>();
        Self {
            states: Arc::new(map),
        }
    }

    /// Create an empty snapshot.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Produce the successor snapshot with `states` replacing the current
    /// state of their artifacts. `self` is left untouched.
    #[must_use]
    pub fn next(&self, states: impl IntoIterator<Item = ArtifactState>) -> Self {
        let mut map = (*self.states).clone();
        for state in states {
            map.insert(state.artifact(), state);
        }
        Self {
            states: Arc::new(map),
        }
    }

    /// Is `other` this very snapshot (not merely equal content)?
    #[must_use]
    pub fn is_same(&self, other: &GameState) -> bool {
        Arc::ptr_eq(&self.states, &other.states)
    }

    /// Number of artifacts with state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the snapshot holds no state at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Iterate all states in artifact order.
    pub fn iter(&self) -> impl Iterator<Item = &ArtifactState> {
        self.states.values()
    }

    /// Raw state of an artifact.
    #[must_use]
    pub fn get(&self, artifact: &ArtifactId) -> Option<&ArtifactState> {
        self.states.get(artifact)
    }

    /// Typed state of an artifact.
    ///
    /// ```
    /// use rust_boards::core::{ArtifactId, ArtifactState, GameState, PieceId, PieceState};
    ///
    /// let state = GameState::new([ArtifactState::piece("rook", "a1")]);
    /// let rook = state
    ///     .get_state::<PieceState>(&ArtifactId::from(PieceId::new("rook")))
    ///     .unwrap();
    /// assert_eq!(rook.tile.as_str(), "a1");
    /// ```
    #[must_use]
    pub fn get_state<T: StateKind>(&self, artifact: &ArtifactId) -> Option<&T> {
        self.states.get(artifact).and_then(T::project)
    }

    /// All states of one kind, in artifact order.
    pub fn get_states<'a, T: StateKind + 'a>(&'a self) -> impl Iterator<Item = &'a T> + 'a {
        self.states.values().filter_map(T::project)
    }

    /// Tile a piece stands on, `None` if unknown or captured.
    #[must_use]
    pub fn piece_tile(&self, piece: &PieceId) -> Option<&TileId> {
        self.get_state::<PieceState>(&ArtifactId::Piece(piece.clone()))
            .map(|s| &s.tile)
    }

    /// Pieces standing on a tile, in id order.
    pub fn pieces_on<'a>(&'a self, tile: &'a TileId) -> impl Iterator<Item = &'a PieceId> + 'a {
        self.get_states::<PieceState>()
            .filter(move |s| &s.tile == tile)
            .map(|s| &s.piece)
    }

    /// Whether a piece has been captured.
    #[must_use]
    pub fn is_captured(&self, piece: &PieceId) -> bool {
        self.get_state::<CapturedPieceState>(&ArtifactId::Piece(piece.clone()))
            .is_some()
    }

    /// Current face of a die, `None` if unrolled or unknown.
    #[must_use]
    pub fn dice_value(&self, dice: &DiceId) -> Option<u32> {
        self.get_state::<DiceState>(&ArtifactId::Dice(dice.clone()))
            .and_then(|s| s.value)
    }

    /// The player holding the turn, if any. The lowest index wins if a
    /// malformed state flags several.
    #[must_use]
    pub fn active_player(&self) -> Option<PlayerId> {
        self.get_states::<ActivePlayerState>()
            .find(|s| s.active)
            .map(|s| s.player)
    }

    /// A custom value with default.
    #[must_use]
    pub fn custom_value(&self, key: &CustomId, default: i64) -> i64 {
        self.get_state::<CustomState>(&ArtifactId::Custom(key.clone()))
            .map_or(default, |s| s.value)
    }

    /// Content hash of the snapshot.
    ///
    /// Computed over the `bincode` encoding of the ordered state map with
    /// `FxHasher`. Equal content gives equal hashes on the same target width.
    pub fn state_hash(&self) -> Result<u64, bincode::Error> {
        let bytes = bincode::serialize(&*self.states)?;
        let mut hasher = FxHasher::default();
        hasher.write(&bytes);
        Ok(hasher.finish())
    }
}

impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other) || *self.states == *other.states
    }
}

impl Eq for GameState {}

impl From<GameState> for Vec<ArtifactState> {
    fn from(state: GameState) -> Self {
        state.states.values().cloned().collect()
    }
}

impl From<Vec<ArtifactState>> for GameState {
    fn from(states: Vec<ArtifactState>) -> Self {
        GameState::new(states)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GameState {
        GameState::new([
            ArtifactState::piece("rook", "a1"),
            ArtifactState::piece("bishop", "c1"),
            ArtifactState::dice("d6", None),
            ArtifactState::active_player(PlayerId::new(0), true),
            ArtifactState::active_player(PlayerId::new(1), false),
        ])
    }

    #[test]
    fn test_one_state_per_artifact() {
        let state = GameState::new([
            ArtifactState::piece("rook", "a1"),
            ArtifactState::piece("rook", "a2"),
        ]);
        assert_eq!(state.len(), 1);
        assert_eq!(state.piece_tile(&PieceId::new("rook")), Some(&TileId::new("a2")));
    }

    #[test]
    fn test_next_leaves_parent_untouched() {
        let state = sample();
        let next = state.next([ArtifactState::piece("rook", "a4")]);

        assert_eq!(state.piece_tile(&PieceId::new("rook")), Some(&TileId::new("a1")));
        assert_eq!(next.piece_tile(&PieceId::new("rook")), Some(&TileId::new("a4")));
        assert_eq!(next.piece_tile(&PieceId::new("bishop")), Some(&TileId::new("c1")));
        assert!(!state.is_same(&next));
    }

    #[test]
    fn test_identity_versus_equality() {
        let state = sample();
        let clone = state.clone();
        let rebuilt = state.next(std::iter::empty());

        assert!(state.is_same(&clone));
        assert!(!state.is_same(&rebuilt));
        assert_eq!(state, rebuilt);
    }

    #[test]
    fn test_capture_replaces_piece_state() {
        let state = sample().next([ArtifactState::captured("bishop")]);
        assert!(state.is_captured(&PieceId::new("bishop")));
        assert_eq!(state.piece_tile(&PieceId::new("bishop")), None);
    }

    #[test]
    fn test_typed_queries() {
        let state = sample();
        assert_eq!(state.get_states::<PieceState>().count(), 2);
        assert_eq!(state.get_states::<ActivePlayerState>().count(), 2);
        assert_eq!(state.active_player(), Some(PlayerId::new(0)));
        assert_eq!(state.dice_value(&DiceId::new("d6")), None);

        let rolled = state.next([ArtifactState::dice("d6", Some(4))]);
        assert_eq!(rolled.dice_value(&DiceId::new("d6")), Some(4));
    }

    #[test]
    fn test_pieces_on() {
        let state = sample().next([ArtifactState::piece("knight", "a1")]);
        let tile = TileId::new("a1");
        let on: Vec<_> = state.pieces_on(&tile).map(PieceId::as_str).collect();
        assert_eq!(on, vec!["knight", "rook"]);
    }

    #[test]
    fn test_custom_value_default() {
        let state = sample();
        let score = CustomId::new("score");
        assert_eq!(state.custom_value(&score, 10), 10);
        let state = state.next([ArtifactState::custom("score", 3)]);
        assert_eq!(state.custom_value(&score, 10), 3);
    }

    #[test]
    fn test_state_hash_tracks_content() {
        let a = sample();
        let b = sample();
        assert_eq!(a.state_hash().unwrap(), b.state_hash().unwrap());

        let moved = a.next([ArtifactState::piece("rook", "a2")]);
        assert_ne!(a.state_hash().unwrap(), moved.state_hash().unwrap());
    }

    #[test]
    fn test_serialization() {
        let state = sample();
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
