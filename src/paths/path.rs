//! Resolved movement paths.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::board::TileRelation;
use crate::core::TileId;

/// Why a relation list is not a path.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("a path needs at least one relation")]
    Empty,

    #[error("relation {index} does not start where the previous one ends")]
    Broken { index: usize },
}

/// An ordered, contiguous sequence of relations from one tile to another.
///
/// Most moves are short, so the relations live inline. Serialized as the bare
/// relation list; deserializing re-validates it and recomputes the distance.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<TileRelation>", into = "Vec<TileRelation>")]
pub struct TilePath {
    relations: SmallVec<[TileRelation; 8]>,
    distance: u32,
}

impl TilePath {
    /// Build a path, `None` if `relations` is empty or not contiguous.
    ///
    /// ```
    /// use rust_boards::board::TileRelation;
    /// use rust_boards::paths::TilePath;
    ///
    /// let path = TilePath::new([
    ///     TileRelation::new("a1", "north", "a2"),
    ///     TileRelation::new("a2", "north", "a3"),
    /// ])
    /// .unwrap();
    /// assert_eq!(path.distance(), 2);
    /// assert_eq!(path.to().map(|t| t.as_str()), Some("a3"));
    ///
    /// assert!(TilePath::new([
    ///     TileRelation::new("a1", "north", "a2"),
    ///     TileRelation::new("c1", "north", "c2"),
    /// ])
    /// .is_none());
    /// ```
    pub fn new(relations: impl IntoIterator<Item = TileRelation>) -> Option<Self> {
        Self::try_new(relations).ok()
    }

    /// Like [`new`](Self::new), saying what is wrong.
    pub fn try_new(relations: impl IntoIterator<Item = TileRelation>) -> Result<Self, PathError> {
        let relations: SmallVec<[TileRelation; 8]> = relations.into_iter().collect();
        if relations.is_empty() {
            return Err(PathError::Empty);
        }
        if let Some(index) = relations.windows(2).position(|pair| pair[0].to != pair[1].from) {
            return Err(PathError::Broken { index: index + 1 });
        }
        let distance = relations.iter().map(|r| r.distance).sum();
        Ok(Self { relations, distance })
    }

    /// Sum of relation distances.
    #[must_use]
    pub fn distance(&self) -> u32 {
        self.distance
    }

    /// Relations in walking order.
    #[must_use]
    pub fn relations(&self) -> &[TileRelation] {
        &self.relations
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    /// Always false: a path has at least one step.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Starting tile.
    #[must_use]
    pub fn from(&self) -> Option<&TileId> {
        self.relations.first().map(|r| &r.from)
    }

    /// Final tile.
    #[must_use]
    pub fn to(&self) -> Option<&TileId> {
        self.relations.last().map(|r| &r.to)
    }

    /// Every tile stepped onto, excluding the start.
    pub fn tiles(&self) -> impl Iterator<Item = &TileId> {
        self.relations.iter().map(|r| &r.to)
    }
}

impl TryFrom<Vec<TileRelation>> for TilePath {
    type Error = PathError;

    fn try_from(relations: Vec<TileRelation>) -> Result<Self, PathError> {
        Self::try_new(relations)
    }
}

impl From<TilePath> for Vec<TileRelation> {
    fn from(path: TilePath) -> Self {
        path.relations.into_vec()
    }
}
