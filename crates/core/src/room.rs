//! Room templates, their bounding rectangles, and named template collections.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::door::{DoorEdge, RoomDoor};
use crate::types::Pos;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("room `{room}` door {door_index} has zero width")]
    ZeroWidthDoor { room: String, door_index: usize },
    #[error("room `{room}` rect does not fit in i32 tile coordinates")]
    RectOutOfRange { room: String },
    #[error("room `{room}` door {door_index} extends past i32 tile coordinates")]
    DoorOutOfRange { room: String, door_index: usize },
}

/// Inclusive tile rectangle. A zero width or height marks an empty rect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl RoomRect {
    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Last column. Saturates for rects that fail `in_range`.
    pub fn right(self) -> i32 {
        self.x.saturating_add(self.width.saturating_sub(1))
    }

    /// Last row. Saturates for rects that fail `in_range`.
    pub fn top(self) -> i32 {
        self.y.saturating_add(self.height.saturating_sub(1))
    }

    /// Whether the far edges are representable as `i32` coordinates.
    pub fn in_range(self) -> bool {
        self.is_empty()
            || (self.x.checked_add(self.width - 1).is_some()
                && self.y.checked_add(self.height - 1).is_some())
    }

    pub fn contains(self, pos: Pos) -> bool {
        !self.is_empty()
            && pos.x >= self.x
            && pos.x <= self.right()
            && pos.y >= self.y
            && pos.y <= self.top()
    }

    /// Smallest rect covering both; an empty rect contributes nothing.
    pub fn merged(self, other: Self) -> Self {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => Self::default(),
            (true, false) => other,
            (false, true) => self,
            (false, false) => {
                let x = self.x.min(other.x);
                let y = self.y.min(other.y);
                let right = self.right().max(other.right());
                let top = self.top().max(other.top());
                Self {
                    x,
                    y,
                    width: right.saturating_sub(x).saturating_add(1),
                    height: top.saturating_sub(y).saturating_add(1),
                }
            }
        }
    }

    /// Bounding rect of a set of wall tiles; empty when there are none.
    pub fn enclosing(cells: impl IntoIterator<Item = Pos>) -> Self {
        cells
            .into_iter()
            .map(|cell| Self { x: cell.x, y: cell.y, width: 1, height: 1 })
            .fold(Self::default(), Self::merged)
    }
}

/// A concrete, door-annotated room definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomTemplate {
    name: String,
    doors: Vec<RoomDoor>,
    rect: RoomRect,
    allow_mirror: bool,
}

impl RoomTemplate {
    pub fn new(
        name: impl Into<String>,
        rect: RoomRect,
        doors: Vec<RoomDoor>,
    ) -> Result<Self, RoomError> {
        let name = name.into();
        if !rect.in_range() {
            return Err(RoomError::RectOutOfRange { room: name });
        }
        if let Some(door_index) = doors.iter().position(|door| door.width == 0) {
            return Err(RoomError::ZeroWidthDoor { room: name, door_index });
        }
        if let Some(door_index) = doors.iter().position(|door| door.last_cell().is_none()) {
            return Err(RoomError::DoorOutOfRange { room: name, door_index });
        }
        Ok(Self { name, doors, rect, allow_mirror: false })
    }

    /// Builds a template whose rectangle is derived from its wall tiles.
    pub fn from_wall_cells(
        name: impl Into<String>,
        wall_cells: impl IntoIterator<Item = Pos>,
        doors: Vec<RoomDoor>,
    ) -> Result<Self, RoomError> {
        Self::new(name, RoomRect::enclosing(wall_cells), doors)
    }

    pub fn with_allow_mirror(mut self, allow_mirror: bool) -> Self {
        self.allow_mirror = allow_mirror;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doors(&self) -> &[RoomDoor] {
        &self.doors
    }

    pub fn rect(&self) -> RoomRect {
        self.rect
    }

    pub fn allow_mirror(&self) -> bool {
        self.allow_mirror
    }

    /// Whether the door's anchor sits on the side of the room rect its edge names.
    ///
    /// Advisory: malformed doors are still indexed by `RoomLookup`.
    pub fn is_door_valid(&self, door: &RoomDoor) -> bool {
        let rect = self.rect;
        let pos = door.local_position;
        if !rect.contains(pos) {
            return false;
        }
        match door.edge {
            DoorEdge::North => pos.y == rect.top(),
            DoorEdge::South => pos.y == rect.y,
            DoorEdge::East => pos.x == rect.right(),
            DoorEdge::West => pos.x == rect.x,
        }
    }

    /// Indices of doors failing `is_door_valid`, in door order.
    pub fn invalid_doors(&self) -> Vec<usize> {
        self.doors
            .iter()
            .enumerate()
            .filter(|(_, door)| !self.is_door_valid(door))
            .map(|(index, _)| index)
            .collect()
    }
}

/// A named, ordered group of interchangeable room templates.
#[derive(Clone, Debug)]
pub struct RoomTemplateCollection {
    name: String,
    templates: Vec<Arc<RoomTemplate>>,
}

pub type CollectionRef = Arc<RoomTemplateCollection>;

impl RoomTemplateCollection {
    pub fn new(name: impl Into<String>, templates: Vec<RoomTemplate>) -> Self {
        Self { name: name.into(), templates: templates.into_iter().map(Arc::new).collect() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn templates(&self) -> &[Arc<RoomTemplate>] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn into_shared(self) -> CollectionRef {
        Arc::new(self)
    }
}
