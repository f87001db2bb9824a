//! Declarative movement patterns.
//!
//! A pattern describes how a piece may move in terms of board directions,
//! never in terms of concrete tiles. Resolvers turn a pattern plus a
//! `(from, to)` pair into a [`TilePath`](crate::paths::TilePath).

use serde::{Deserialize, Serialize};

use crate::core::DirectionId;

/// A movement pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pattern {
    /// The piece cannot move.
    Null,

    /// An exact sequence of steps. Intermediate tiles may be occupied; the
    /// walk must land exactly on the target.
    Fixed { steps: Vec<DirectionId> },

    /// One direction: a single step, or a ray when `repeatable`.
    Direction {
        direction: DirectionId,
        repeatable: bool,
    },

    /// Any one of several directions, each a single step or a ray.
    MultiDirection {
        directions: Vec<DirectionId>,
        repeatable: bool,
    },
}

impl Pattern {
    /// A fixed step sequence.
    pub fn fixed(steps: impl IntoIterator<Item = impl Into<DirectionId>>) -> Self {
        Self::Fixed {
            steps: steps.into_iter().map(Into::into).collect(),
        }
    }

    /// A single step in one direction.
    pub fn step(direction: impl Into<DirectionId>) -> Self {
        Self::Direction {
            direction: direction.into(),
            repeatable: false,
        }
    }

    /// A ray in one direction.
    pub fn ray(direction: impl Into<DirectionId>) -> Self {
        Self::Direction {
            direction: direction.into(),
            repeatable: true,
        }
    }

    /// A single step in any of the directions.
    pub fn steps_any(directions: impl IntoIterator<Item = impl Into<DirectionId>>) -> Self {
        Self::MultiDirection {
            directions: directions.into_iter().map(Into::into).collect(),
            repeatable: false,
        }
    }

    /// A ray in any of the directions.
    pub fn rays(directions: impl IntoIterator<Item = impl Into<DirectionId>>) -> Self {
        Self::MultiDirection {
            directions: directions.into_iter().map(Into::into).collect(),
            repeatable: true,
        }
    }

    /// Whether this pattern is a repeatable ray.
    #[must_use]
    pub fn is_ray(&self) -> bool {
        matches!(
            self,
            Self::Direction { repeatable: true, .. } | Self::MultiDirection { repeatable: true, .. }
        )
    }

    /// Every direction this pattern mentions, in declaration order.
    pub fn directions(&self) -> impl Iterator<Item = &DirectionId> {
        let slice: &[DirectionId] = match self {
            Self::Null => &[],
            Self::Fixed { steps } => steps,
            Self::Direction { direction, .. } => std::slice::from_ref(direction),
            Self::MultiDirection { directions, .. } => directions,
        };
        slice.iter()
    }

    /// Dispatch to the visitor method for this pattern's shape.
    pub fn accept<V: PatternVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Self::Null => visitor.visit_null(),
            Self::Fixed { steps } => visitor.visit_fixed(steps),
            Self::Direction {
                direction,
                repeatable,
            } => visitor.visit_direction(direction, *repeatable),
            Self::MultiDirection {
                directions,
                repeatable,
            } => visitor.visit_multi_direction(directions, *repeatable),
        }
    }
}

/// Visitor over [`Pattern`] shapes.
pub trait PatternVisitor {
    type Output;

    fn visit_null(&mut self) -> Self::Output;
    fn visit_fixed(&mut self, steps: &[DirectionId]) -> Self::Output;
    fn visit_direction(&mut self, direction: &DirectionId, repeatable: bool) -> Self::Output;
    fn visit_multi_direction(&mut self, directions: &[DirectionId], repeatable: bool) -> Self::Output;
}
