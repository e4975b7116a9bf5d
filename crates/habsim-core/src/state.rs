//! The session state owned by the engine.

use serde::{Deserialize, Serialize};

use habsim_logic::crew::CrewMember;
use habsim_logic::habitat::{HabitatDesign, MissionScenario};
use habsim_logic::objects::ObjectId;
use habsim_logic::projection::Camera;
use habsim_logic::resources::{ResourceKind, Resources};
use habsim_logic::room::RoomId;
use habsim_logic::simulation::SimSnapshot;

/// Discrete speed multipliers. Serialized as the multiplier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SimSpeed {
    #[default]
    X1,
    X2,
    X3,
    X4,
    X8,
    X12,
}

impl SimSpeed {
    pub const ALL: [SimSpeed; 6] = [
        Self::X1,
        Self::X2,
        Self::X3,
        Self::X4,
        Self::X8,
        Self::X12,
    ];

    pub fn multiplier(self) -> u32 {
        match self {
            Self::X1 => 1,
            Self::X2 => 2,
            Self::X3 => 3,
            Self::X4 => 4,
            Self::X8 => 8,
            Self::X12 => 12,
        }
    }

    pub fn from_multiplier(m: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.multiplier() == m)
    }
}

impl TryFrom<u32> for SimSpeed {
    type Error = String;

    fn try_from(m: u32) -> Result<Self, Self::Error> {
        Self::from_multiplier(m).ok_or_else(|| format!("unsupported speed multiplier {m}"))
    }
}

impl From<SimSpeed> for u32 {
    fn from(s: SimSpeed) -> u32 {
        s.multiplier()
    }
}

/// Why and when the mission ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionFailure {
    pub depleted: Vec<ResourceKind>,
    pub day: f64,
}

/// Everything a host reads to render the session.
///
/// `version` increments on every accepted transition, whether it came from
/// a command or a clock event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub version: u64,
    pub habitat: Option<HabitatDesign>,
    pub mission: Option<MissionScenario>,
    pub crew: Vec<CrewMember>,
    pub resources: Resources,
    pub days_passed: f64,
    pub score: u64,
    pub is_playing: bool,
    pub is_paused: bool,
    pub speed: SimSpeed,
    pub camera: Camera,
    pub selected_room: Option<RoomId>,
    pub selected_object: Option<ObjectId>,
    pub failure: Option<MissionFailure>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            version: 0,
            habitat: None,
            mission: None,
            crew: Vec::new(),
            resources: Resources::default(),
            days_passed: 0.0,
            score: 0,
            is_playing: false,
            is_paused: false,
            speed: SimSpeed::X1,
            camera: Camera::default(),
            selected_room: None,
            selected_object: None,
            failure: None,
        }
    }
}

impl GameState {
    /// Whether clock events should mutate state.
    pub fn is_running(&self) -> bool {
        self.is_playing && !self.is_paused && self.habitat.is_some() && self.failure.is_none()
    }

    /// Copy out the parts a simulation tick works on.
    pub fn snapshot(&self) -> Option<SimSnapshot> {
        Some(SimSnapshot {
            habitat: self.habitat.clone()?,
            crew: self.crew.clone(),
            resources: self.resources,
            days_passed: self.days_passed,
            score: self.score,
        })
    }

    /// Replace the tick-owned parts with a tick's result.
    pub(crate) fn commit_snapshot(&mut self, snap: SimSnapshot) {
        self.habitat = Some(snap.habitat);
        self.crew = snap.crew;
        self.resources = snap.resources;
        self.days_passed = snap.days_passed;
        self.score = snap.score;
    }
}
