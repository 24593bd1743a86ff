//! Doorway geometry: cardinal edges, directionality, and door openings.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Pos;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DoorError {
    #[error("unrecognized door edge ordinal {0}")]
    UnrecognizedEdge(u8),
    #[error("unrecognized door edge name `{0}`")]
    UnrecognizedEdgeName(String),
    #[error("unrecognized door directionality ordinal {0}")]
    UnrecognizedDirectionality(u8),
}

/// Side of a room's rectangle a door sits on, pointing outward.
///
/// The ordinals are part of the contract: `opposite` is computed as
/// `3 - ordinal`, which only pairs North/South and East/West with this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DoorEdge {
    North = 0,
    East = 1,
    West = 2,
    South = 3,
}

pub const EDGE_COUNT: usize = 4;

/// Unit vectors indexed by edge ordinal.
const EDGE_DIRECTIONS: [Pos; EDGE_COUNT] = [
    Pos::new(0, 1),  // North
    Pos::new(1, 0),  // East
    Pos::new(-1, 0), // West
    Pos::new(0, -1), // South
];

impl DoorEdge {
    pub const ALL: [DoorEdge; EDGE_COUNT] =
        [DoorEdge::North, DoorEdge::East, DoorEdge::West, DoorEdge::South];

    pub const fn ordinal(self) -> usize {
        self as usize
    }

    pub const fn opposite(self) -> Self {
        // `ALL` is ordered by ordinal.
        Self::ALL[EDGE_COUNT - 1 - self.ordinal()]
    }

    pub const fn as_vector(self) -> Pos {
        EDGE_DIRECTIONS[self.ordinal()]
    }

    /// Axis along which a door on this edge widens from its anchor.
    pub const fn grow_direction(self) -> Pos {
        match self {
            DoorEdge::East | DoorEdge::West => Pos::new(0, 1),
            DoorEdge::North | DoorEdge::South => Pos::new(1, 0),
        }
    }
}

impl TryFrom<u8> for DoorEdge {
    type Error = DoorError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DoorEdge::North),
            1 => Ok(DoorEdge::East),
            2 => Ok(DoorEdge::West),
            3 => Ok(DoorEdge::South),
            other => Err(DoorError::UnrecognizedEdge(other)),
        }
    }
}

impl FromStr for DoorEdge {
    type Err = DoorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(DoorEdge::North),
            "east" | "e" => Ok(DoorEdge::East),
            "west" | "w" => Ok(DoorEdge::West),
            "south" | "s" => Ok(DoorEdge::South),
            _ => Err(DoorError::UnrecognizedEdgeName(value.to_string())),
        }
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum DoorDirectionality {
    #[default]
    Bidirectional = 0,
    EntranceOnly = 1,
    ExitOnly = 2,
}

impl DoorDirectionality {
    /// Whether a connecting room may enter through this door.
    pub const fn is_entrance(self) -> bool {
        matches!(self, DoorDirectionality::Bidirectional | DoorDirectionality::EntranceOnly)
    }

    /// Whether this door may lead on to a further room.
    pub const fn is_exit(self) -> bool {
        matches!(self, DoorDirectionality::Bidirectional | DoorDirectionality::ExitOnly)
    }
}

impl TryFrom<u8> for DoorDirectionality {
    type Error = DoorError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DoorDirectionality::Bidirectional),
            1 => Ok(DoorDirectionality::EntranceOnly),
            2 => Ok(DoorDirectionality::ExitOnly),
            other => Err(DoorError::UnrecognizedDirectionality(other)),
        }
    }
}

pub const DEFAULT_DOOR_WIDTH: u32 = 2;

fn default_door_width() -> u32 {
    DEFAULT_DOOR_WIDTH
}

/// A doorway in a room template, anchored at its lowest tile.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomDoor {
    pub local_position: Pos,
    pub edge: DoorEdge,
    #[serde(default)]
    pub directionality: DoorDirectionality,
    /// Opening size in tiles, measured perpendicular to `edge`.
    #[serde(default = "default_door_width")]
    pub width: u32,
}

impl RoomDoor {
    pub fn new(local_position: Pos, edge: DoorEdge) -> Self {
        Self {
            local_position,
            edge,
            directionality: DoorDirectionality::default(),
            width: DEFAULT_DOOR_WIDTH,
        }
    }

    pub fn with_directionality(mut self, directionality: DoorDirectionality) -> Self {
        self.directionality = directionality;
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Tiles covered by the opening, starting at the anchor.
    ///
    /// Stops early if the opening runs past the `i32` coordinate range.
    pub fn cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.width).map_while(move |i| self.cell_at(i32::try_from(i).ok()?))
    }

    /// Far tile of the opening, `None` for zero width or past the coordinate range.
    pub fn last_cell(&self) -> Option<Pos> {
        let span = i32::try_from(self.width.checked_sub(1)?).ok()?;
        self.cell_at(span)
    }

    fn cell_at(&self, step_count: i32) -> Option<Pos> {
        let step = self.edge.grow_direction();
        let anchor = self.local_position;
        Some(Pos::new(
            anchor.x.checked_add(step.x * step_count)?,
            anchor.y.checked_add(step.y * step_count)?,
        ))
    }
}
