//! Board topology: tiles, directions and the directed relations between them.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{BoardId, BuildError, DirectionId, TileId};

/// A directed edge of the board graph: stepping `direction` from `from`
/// reaches `to`, covering `distance`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRelation {
    pub from: TileId,
    pub to: TileId,
    pub direction: DirectionId,
    pub distance: u32,
}

impl TileRelation {
    /// A unit-distance relation.
    pub fn new(from: impl Into<TileId>, direction: impl Into<DirectionId>, to: impl Into<TileId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            direction: direction.into(),
            distance: 1,
        }
    }

    /// Set the distance covered by this relation.
    #[must_use]
    pub fn with_distance(mut self, distance: u32) -> Self {
        self.distance = distance;
        self
    }
}

/// Validated, immutable board graph.
///
/// At most one relation leaves a tile in a given direction. Lookups through
/// [`Board::relation`] use a hash index; [`Board::relation_scan`] walks the
/// relation list and exists for the legacy resolver.
#[derive(Clone, Debug)]
pub struct Board {
    id: BoardId,
    tiles: Vec<TileId>,
    directions: Vec<DirectionId>,
    relations: Vec<TileRelation>,
    tile_index: FxHashMap<TileId, usize>,
    direction_index: FxHashMap<DirectionId, usize>,
    relation_index: FxHashMap<(TileId, DirectionId), usize>,
}

impl Board {
    /// Build and validate a board.
    pub fn new(
        id: impl Into<BoardId>,
        tiles: Vec<TileId>,
        directions: Vec<DirectionId>,
        relations: Vec<TileRelation>,
    ) -> Result<Self, BuildError> {
        let mut tile_index = FxHashMap::default();
        for (i, tile) in tiles.iter().enumerate() {
            if tile_index.insert(tile.clone(), i).is_some() {
                return Err(BuildError::duplicate("tile", tile.as_str()));
            }
        }

        let mut direction_index = FxHashMap::default();
        for (i, direction) in directions.iter().enumerate() {
            if direction_index.insert(direction.clone(), i).is_some() {
                return Err(BuildError::duplicate("direction", direction.as_str()));
            }
        }

        let mut relation_index = FxHashMap::default();
        for (i, relation) in relations.iter().enumerate() {
            if !tile_index.contains_key(&relation.from) {
                return Err(BuildError::unknown("tile", relation.from.as_str()));
            }
            if !tile_index.contains_key(&relation.to) {
                return Err(BuildError::unknown("tile", relation.to.as_str()));
            }
            if !direction_index.contains_key(&relation.direction) {
                return Err(BuildError::unknown("direction", relation.direction.as_str()));
            }
            if relation.distance == 0 {
                return Err(BuildError::ZeroDistance(relation.from.as_str().to_string()));
            }
            let key = (relation.from.clone(), relation.direction.clone());
            if relation_index.insert(key, i).is_some() {
                return Err(BuildError::DuplicateRelation {
                    from: relation.from.as_str().to_string(),
                    direction: relation.direction.as_str().to_string(),
                });
            }
        }

        Ok(Self {
            id: id.into(),
            tiles,
            directions,
            relations,
            tile_index,
            direction_index,
            relation_index,
        })
    }

    #[must_use]
    pub fn id(&self) -> &BoardId {
        &self.id
    }

    /// Tiles in declaration order.
    #[must_use]
    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    /// Directions in declaration order.
    #[must_use]
    pub fn directions(&self) -> &[DirectionId] {
        &self.directions
    }

    /// Relations in declaration order.
    #[must_use]
    pub fn relations(&self) -> &[TileRelation] {
        &self.relations
    }

    /// Dense index of a tile.
    #[must_use]
    pub fn tile_index(&self, tile: &TileId) -> Option<usize> {
        self.tile_index.get(tile).copied()
    }

    /// Dense index of a direction.
    #[must_use]
    pub fn direction_index(&self, direction: &DirectionId) -> Option<usize> {
        self.direction_index.get(direction).copied()
    }

    #[must_use]
    pub fn contains_tile(&self, tile: &TileId) -> bool {
        self.tile_index.contains_key(tile)
    }

    #[must_use]
    pub fn contains_direction(&self, direction: &DirectionId) -> bool {
        self.direction_index.contains_key(direction)
    }

    /// The relation leaving `from` in `direction` (hash lookup).
    #[must_use]
    pub fn relation(&self, from: &TileId, direction: &DirectionId) -> Option<&TileRelation> {
        self.relation_index
            .get(&(from.clone(), direction.clone()))
            .map(|&i| &self.relations[i])
    }

    /// The relation leaving `from` in `direction` (linear scan).
    #[must_use]
    pub fn relation_scan(&self, from: &TileId, direction: &DirectionId) -> Option<&TileRelation> {
        self.relations
            .iter()
            .find(|r| &r.from == from && &r.direction == direction)
    }

    /// All relations leaving `from`.
    pub fn relations_from<'a>(&'a self, from: &'a TileId) -> impl Iterator<Item = &'a TileRelation> + 'a {
        self.relations.iter().filter(move |r| &r.from == from)
    }
}

/// Directions generated by [`GameBuilder::grid`](super::GameBuilder::grid).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridDirections {
    /// `north`, `east`, `south`, `west`.
    Orthogonal,
    /// Orthogonal plus `north-east`, `south-east`, `south-west`, `north-west`.
    All,
}

impl GridDirections {
    /// `(name, dx, dy)` for every generated direction.
    #[must_use]
    pub fn offsets(self) -> &'static [(&'static str, i32, i32)] {
        const ALL: [(&str, i32, i32); 8] = [
            ("north", 0, 1),
            ("east", 1, 0),
            ("south", 0, -1),
            ("west", -1, 0),
            ("north-east", 1, 1),
            ("south-east", 1, -1),
            ("south-west", -1, -1),
            ("north-west", -1, 1),
        ];
        match self {
            Self::Orthogonal => &ALL[..4],
            Self::All => &ALL,
        }
    }
}

/// Name of the grid tile at column `x`, row `y` (both 0-based): `a1`, `b3`, ...
#[must_use]
pub fn grid_tile_name(x: usize, y: usize) -> String {
    let file = char::from(b'a' + (x % 26) as u8);
    format!("{}{}", file, y + 1)
}
