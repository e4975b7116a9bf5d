//! Commands that mutate session state, and what comes back.
//!
//! Every host-side change goes through [`Command`]; the engine answers with
//! a [`Notice`] on success or a [`Rejection`] that leaves state untouched.
//! Clock-driven changes (ticks, crew motion) are internal and never appear
//! here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use habsim_logic::crew::{CrewId, CrewStatus};
use habsim_logic::error::{ObjectError, PlacementError};
use habsim_logic::habitat::MissionScenario;
use habsim_logic::objects::ObjectId;
use habsim_logic::projection::CameraKey;
use habsim_logic::room::{Position, RoomId, RoomType, Rotation};

use crate::state::SimSpeed;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Start a catalog mission by id.
    StartMission { mission_id: String },
    /// Start a user-authored mission.
    StartCustomMission { mission: MissionScenario },
    /// Discard habitat, crew and progress. The camera survives.
    Reset,

    Play,
    Pause,
    Resume,
    SetSpeed { speed: SimSpeed },

    /// Add a room sized for the crew at the first free position.
    AddRoom { room_type: RoomType },
    RemoveRoom { room: RoomId },
    MoveRoom {
        room: RoomId,
        position: Position,
        rotation: Rotation,
    },
    AutoArrange,
    /// Replace a room's adjacency list.
    SetAdjacency { room: RoomId, adjacent: Vec<RoomId> },
    SelectRoom { room: Option<RoomId> },

    /// Add a catalog object to the selected room.
    AddObject { object_type: String },
    MoveObject {
        room: RoomId,
        object: ObjectId,
        position: Position,
    },
    RemoveObject { room: RoomId, object: ObjectId },
    SelectObject { object: Option<ObjectId> },

    SetCrewStatus { crew: CrewId, status: CrewStatus },

    CameraKey { key: CameraKey },
    /// Wheel notches; negative zooms in.
    CameraWheel { notches: f64 },
    CameraPan { dx: f64, dy: f64 },
}

/// What an accepted command did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notice {
    MissionStarted { mission: String, crew: u32 },
    Reset,
    PlaybackChanged { playing: bool, paused: bool },
    SpeedChanged { speed: SimSpeed },
    RoomAdded { room: RoomId, position: Position },
    RoomRemoved { room: RoomId },
    RoomMoved { room: RoomId, position: Position },
    /// Rooms the arrangement could not place validly.
    Arranged { invalid: Vec<RoomId> },
    AdjacencyChanged { room: RoomId },
    ObjectAdded { room: RoomId, object: ObjectId },
    ObjectMoved { object: ObjectId, position: Position },
    ObjectRemoved { object: ObjectId },
    SelectionChanged,
    CrewStatusChanged { crew: CrewId },
    CameraChanged,
}

/// Why a command was refused. State is unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error(transparent)]
    Object(#[from] ObjectError),
    #[error("no habitat; start a mission first")]
    NoHabitat,
    #[error("no room selected")]
    NoRoomSelected,
    #[error("unknown mission `{0}`")]
    UnknownMission(String),
    #[error("crew member #{0} not found")]
    CrewNotFound(CrewId),
    #[error("the mission has failed; reset or start a new one")]
    MissionFailed,
}
