//! Per-edge index of rooms that can be entered through a doorway.
//!
//! Built once per [`RoomTemplateCollection`] so placement can pick candidate
//! rooms for an open door without rescanning every template.

use std::sync::Arc;

use log::debug;
use thiserror::Error;

use crate::door::{DoorDirectionality, DoorEdge, EDGE_COUNT};
use crate::room::{RoomTemplate, RoomTemplateCollection};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("mirrored candidates are not supported (room `{room}`)")]
    MirroringUnsupported { room: String },
}

/// A room seen from one edge: the doors on that edge usable as an entrance.
#[derive(Clone, Debug)]
pub struct RoomCandidate {
    room: Arc<RoomTemplate>,
    mirrored: bool,
    entrance_door_indices: Vec<usize>,
    exit_count_estimate: i32,
}

impl RoomCandidate {
    pub fn room(&self) -> &Arc<RoomTemplate> {
        &self.room
    }

    pub fn mirrored(&self) -> bool {
        self.mirrored
    }

    /// Indices into the room's door list, all on this candidate's edge.
    pub fn entrance_door_indices(&self) -> &[usize] {
        &self.entrance_door_indices
    }

    /// Upper bound on exits left once one entrance is used. Confirm before relying on it.
    pub fn exit_count_estimate(&self) -> i32 {
        self.exit_count_estimate
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LookupOptions {
    /// Also index mirrored variants of rooms that allow mirroring.
    pub include_mirrored: bool,
}

#[derive(Clone, Debug, Default)]
pub struct RoomLookup {
    candidates: [Vec<RoomCandidate>; EDGE_COUNT],
}

impl RoomLookup {
    pub fn new(collection: &RoomTemplateCollection) -> Self {
        let mut lookup = Self::default();
        for room in collection.templates() {
            lookup.index_room(room);
        }
        lookup.log_summary(collection);
        lookup
    }

    pub fn with_options(
        collection: &RoomTemplateCollection,
        options: LookupOptions,
    ) -> Result<Self, LookupError> {
        let mut lookup = Self::default();
        for room in collection.templates() {
            lookup.add_room(room, false)?;
            if options.include_mirrored && room.allow_mirror() {
                lookup.add_room(room, true)?;
            }
        }
        lookup.log_summary(collection);
        Ok(lookup)
    }

    fn add_room(&mut self, room: &Arc<RoomTemplate>, mirrored: bool) -> Result<(), LookupError> {
        if mirrored {
            return Err(LookupError::MirroringUnsupported { room: room.name().to_string() });
        }
        self.index_room(room);
        Ok(())
    }

    fn index_room(&mut self, room: &Arc<RoomTemplate>) {
        let mut entrances: [Vec<usize>; EDGE_COUNT] = Default::default();
        let mut entrance_flag = 0;
        let mut exit_tally = 0;
        for (index, door) in room.doors().iter().enumerate() {
            if door.directionality == DoorDirectionality::EntranceOnly {
                entrance_flag = 1;
            }
            if door.directionality.is_exit() {
                exit_tally += 1;
            }
            if door.directionality.is_entrance() {
                entrances[door.edge.ordinal()].push(index);
            }
        }
        // Counted across all edges, so rooms with several doors on the
        // entrance edge are overestimated.
        let exit_count_estimate = entrance_flag + exit_tally - 1;

        for (bucket, entrance_door_indices) in self.candidates.iter_mut().zip(entrances) {
            if entrance_door_indices.is_empty() {
                continue;
            }
            bucket.push(RoomCandidate {
                room: Arc::clone(room),
                mirrored: false,
                entrance_door_indices,
                exit_count_estimate,
            });
        }
    }

    fn log_summary(&self, collection: &RoomTemplateCollection) {
        debug!(
            "indexed {} rooms from `{}`: north={} east={} west={} south={}",
            collection.len(),
            collection.name(),
            self.candidate_count(DoorEdge::North),
            self.candidate_count(DoorEdge::East),
            self.candidate_count(DoorEdge::West),
            self.candidate_count(DoorEdge::South),
        );
    }

    /// Candidates entered through `edge` whose exit estimate is at least
    /// `min_exit_count`, in collection order. No best-first ordering is implied.
    pub fn candidates_for_edge(
        &self,
        edge: DoorEdge,
        min_exit_count: i32,
    ) -> impl Iterator<Item = &RoomCandidate> + '_ {
        self.candidates[edge.ordinal()]
            .iter()
            .filter(move |candidate| candidate.exit_count_estimate >= min_exit_count)
    }

    pub fn candidate_count(&self, edge: DoorEdge) -> usize {
        self.candidates[edge.ordinal()].len()
    }
}
