//! Artifact identifiers.
//!
//! Every identity-bearing game object (tile, piece, direction, dice) is named
//! by a cheap-to-clone string id. Ids order lexically, which gives the state
//! map a deterministic iteration order.
//!
//! ```
//! use rust_boards::core::{ArtifactId, PieceId, TileId};
//!
//! let tile = TileId::new("a1");
//! assert_eq!(tile.as_str(), "a1");
//! assert_eq!(format!("{}", tile), "Tile(a1)");
//!
//! let artifact = ArtifactId::from(PieceId::new("white-rook"));
//! assert!(matches!(artifact, ArtifactId::Piece(_)));
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(Arc<str>);

        impl $name {
            /// Create a new id.
            #[must_use]
            pub fn new(id: impl AsRef<str>) -> Self {
                Self(Arc::from(id.as_ref()))
            }

            /// Get the raw id string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(Arc::from(id))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $label, self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a board.
    BoardId,
    "Board"
);

string_id!(
    /// Identifier of a tile on the board.
    TileId,
    "Tile"
);

string_id!(
    /// Identifier of a movement direction (`north`, `clockwise`, ...).
    DirectionId,
    "Direction"
);

string_id!(
    /// Identifier of a piece.
    PieceId,
    "Piece"
);

string_id!(
    /// Identifier of a die.
    DiceId,
    "Dice"
);

string_id!(
    /// Key of a game-defined integer value (scores, counters).
    CustomId,
    "Custom"
);

string_id!(
    /// Exclusivity group tag. At most one entry of a group applies per event.
    ExclusivityGroup,
    "Group"
);

/// Identity of anything that can carry state in a [`GameState`](super::GameState).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ArtifactId {
    Piece(PieceId),
    Dice(DiceId),
    Player(PlayerId),
    Custom(CustomId),
}

impl From<PieceId> for ArtifactId {
    fn from(id: PieceId) -> Self {
        Self::Piece(id)
    }
}

impl From<DiceId> for ArtifactId {
    fn from(id: DiceId) -> Self {
        Self::Dice(id)
    }
}

impl From<PlayerId> for ArtifactId {
    fn from(id: PlayerId) -> Self {
        Self::Player(id)
    }
}

impl From<CustomId> for ArtifactId {
    fn from(id: CustomId) -> Self {
        Self::Custom(id)
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Piece(id) => id.fmt(f),
            Self::Dice(id) => id.fmt(f),
            Self::Player(id) => id.fmt(f),
            Self::Custom(id) => id.fmt(f),
        }
    }
}
