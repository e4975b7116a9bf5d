//! Error types for rejected placements, object edits and catalog loading.
//!
//! Every variant carries structured fields only. Hosts turn them into
//! user-facing text; nothing here is meant to be shown verbatim.

use thiserror::Error;

use crate::objects::ObjectId;
use crate::room::{RoomId, RoomType};

/// Why a room could not be placed or moved.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    #[error("footprint {width}×{depth} exceeds the placement grid")]
    TooLargeForGrid { width: f64, depth: f64 },
    #[error("no free position found after {attempts} attempts")]
    NoValidPosition { attempts: u32 },
    #[error("room #{room} would overlap room #{other}")]
    WouldOverlap { room: RoomId, other: RoomId },
    #[error("room #{0} does not exist")]
    RoomNotFound(RoomId),
}

/// Why an object could not be added or moved.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ObjectError {
    #[error("unknown object type `{0}`")]
    UnknownObject(String),
    #[error("object `{object}` cannot be placed in a {room_type} room")]
    Incompatible { object: String, room_type: RoomType },
    #[error("object #{object} not found in room #{room}")]
    ObjectNotFound { room: RoomId, object: ObjectId },
}

/// Why a catalog failed to load.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("object id `{0}` appears more than once")]
    DuplicateObject(String),
    #[error("object `{0}` has non-positive dimensions")]
    InvalidDimensions(String),
    #[error("object `{0}` lists no compatible room types")]
    NoCompatibleRooms(String),
    #[error("mission `{0}` is invalid: {1}")]
    InvalidMission(String, &'static str),
    #[error("catalog has no crew names")]
    NoCrewNames,
}
