//! JSON manifests describing a room template collection.
//!
//! ```json
//! { "name": "corridors",
//!   "rooms": [ { "name": "hall",
//!                "rect": { "x": 0, "y": 0, "width": 8, "height": 6 },
//!                "doors": [ { "local_position": { "x": 0, "y": 2 }, "edge": "West" } ] } ] }
//! ```
//!
//! A room gives its bounds either as `rect` or as `wall_cells`, from which the
//! enclosing rectangle is derived. Door `directionality` defaults to
//! `Bidirectional` and `width` to 2.

use std::fs;
use std::io;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::door::RoomDoor;
use crate::room::{RoomError, RoomRect, RoomTemplate, RoomTemplateCollection};
use crate::types::Pos;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CollectionManifest {
    pub name: String,
    #[serde(default)]
    pub rooms: Vec<RoomManifest>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RoomManifest {
    pub name: String,
    #[serde(default)]
    pub allow_mirror: bool,
    #[serde(default)]
    pub rect: Option<RoomRect>,
    #[serde(default)]
    pub wall_cells: Vec<Pos>,
    #[serde(default)]
    pub doors: Vec<RoomDoor>,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] io::Error),
    #[error("invalid manifest JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("room `{room}` has neither `rect` nor `wall_cells`")]
    MissingBounds { room: String },
    #[error(transparent)]
    Room(#[from] RoomError),
}

impl RoomManifest {
    fn into_template(self) -> Result<RoomTemplate, ManifestError> {
        let template = match self.rect {
            Some(rect) => RoomTemplate::new(self.name, rect, self.doors)?,
            None if !self.wall_cells.is_empty() => {
                RoomTemplate::from_wall_cells(self.name, self.wall_cells, self.doors)?
            }
            None => return Err(ManifestError::MissingBounds { room: self.name }),
        };
        Ok(template.with_allow_mirror(self.allow_mirror))
    }
}

impl CollectionManifest {
    pub fn into_collection(self) -> Result<RoomTemplateCollection, ManifestError> {
        let templates = self
            .rooms
            .into_iter()
            .map(RoomManifest::into_template)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RoomTemplateCollection::new(self.name, templates))
    }
}

pub fn parse_collection(json: &str) -> Result<RoomTemplateCollection, ManifestError> {
    let manifest: CollectionManifest = serde_json::from_str(json)?;
    manifest.into_collection()
}

pub fn load_collection_from_file(path: &Path) -> Result<RoomTemplateCollection, ManifestError> {
    let content = fs::read_to_string(path)?;
    let collection = parse_collection(&content)?;
    debug!(
        "loaded collection `{}` with {} rooms from {}",
        collection.name(),
        collection.len(),
        path.display()
    );
    Ok(collection)
}
