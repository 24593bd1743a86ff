pub mod door;
pub mod graph;
pub mod lookup;
pub mod manifest;
pub mod room;
pub mod types;

pub use door::{DoorDirectionality, DoorEdge, DoorError, RoomDoor};
pub use graph::{
    BuilderError, GraphError, LevelGraph, LevelGraphBuilder, LevelGraphNode, NodeId, SharedGraph,
};
pub use lookup::{LookupError, LookupOptions, RoomCandidate, RoomLookup};
pub use manifest::{ManifestError, load_collection_from_file, parse_collection};
pub use room::{CollectionRef, RoomError, RoomRect, RoomTemplate, RoomTemplateCollection};
pub use types::*;
