//! Rooms — grid positions, dimensions, rotation, and the closed set of room types.
//!
//! Room-type rules (per-crew area, incompatibilities, noise) are an exhaustive
//! `match` on [`RoomType`], so adding a variant without rules fails to compile.

use serde::{Deserialize, Serialize};

use crate::constants::habitat::{DEFAULT_ROOM_DEPTH, DEFAULT_ROOM_HEIGHT};
use crate::objects::PlacedObject;

pub type RoomId = u32;

/// Grid coordinates. `z` is the elevation layer and defaults to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// A position on the ground layer.
    pub fn flat(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// Room or object extent. `depth` falls back to `width` (square footprint).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
}

impl Dimensions {
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width,
            height,
            depth: Some(depth),
        }
    }

    /// Square-footprint dimensions.
    pub fn square(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            depth: None,
        }
    }

    pub fn depth(&self) -> f64 {
        self.depth.unwrap_or(self.width)
    }

    pub fn floor_area(&self) -> f64 {
        self.width * self.depth()
    }

    pub fn volume(&self) -> f64 {
        self.width * self.height * self.depth()
    }

    /// Footprint with width and depth exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            width: self.depth(),
            height: self.height,
            depth: Some(self.width),
        }
    }

    /// Effective dimensions once `rotation` is applied.
    pub fn rotated(&self, rotation: Rotation) -> Self {
        if rotation.swaps_axes() {
            self.swapped()
        } else {
            *self
        }
    }
}

/// Quarter-turn room rotation. Serialized as degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    pub fn from_degrees(deg: u16) -> Option<Self> {
        match deg {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }

    /// Whether width and depth trade places for bounds purposes.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }

    /// Next quarter turn clockwise.
    pub fn turned(self) -> Self {
        match self {
            Self::Deg0 => Self::Deg90,
            Self::Deg90 => Self::Deg180,
            Self::Deg180 => Self::Deg270,
            Self::Deg270 => Self::Deg0,
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(deg: u16) -> Result<Self, Self::Error> {
        Self::from_degrees(deg).ok_or_else(|| format!("rotation must be 0/90/180/270, got {deg}"))
    }
}

impl From<Rotation> for u16 {
    fn from(r: Rotation) -> u16 {
        r.degrees()
    }
}

/// The twelve room categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoomType {
    Sleep,
    Hygiene,
    Exercise,
    Food,
    Medical,
    Research,
    Storage,
    LifeSupport,
    Recreation,
    Communication,
    Maintenance,
    Airlock,
}

/// Static placement and design rules for one room type.
#[derive(Debug, Clone, Copy)]
pub struct RoomRules {
    /// Minimum floor area per crew member, in m².
    pub min_area_per_crew: f64,
    pub incompatible_with: &'static [RoomType],
    /// 1 (quiet) to 5 (loud).
    pub noise_level: u8,
    pub description: &'static str,
}

impl RoomType {
    pub const ALL: [RoomType; 12] = [
        Self::Sleep,
        Self::Hygiene,
        Self::Exercise,
        Self::Food,
        Self::Medical,
        Self::Research,
        Self::Storage,
        Self::LifeSupport,
        Self::Recreation,
        Self::Communication,
        Self::Maintenance,
        Self::Airlock,
    ];

    /// Types every habitat must contain at least once.
    pub const REQUIRED: [RoomType; 4] = [Self::Sleep, Self::Hygiene, Self::Food, Self::LifeSupport];

    pub fn rules(self) -> RoomRules {
        use RoomType::*;
        match self {
            Sleep => RoomRules {
                min_area_per_crew: 4.5,
                incompatible_with: &[Exercise, Maintenance, LifeSupport],
                noise_level: 1,
                description: "Quiet sleeping quarters for crew rest",
            },
            Hygiene => RoomRules {
                min_area_per_crew: 2.5,
                incompatible_with: &[Food, Research],
                noise_level: 2,
                description: "Bathroom and hygiene facilities",
            },
            Exercise => RoomRules {
                min_area_per_crew: 5.0,
                incompatible_with: &[Sleep, Medical],
                noise_level: 4,
                description: "Fitness equipment and exercise area",
            },
            Food => RoomRules {
                min_area_per_crew: 3.0,
                incompatible_with: &[Hygiene, Maintenance],
                noise_level: 3,
                description: "Food preparation and dining area",
            },
            Medical => RoomRules {
                min_area_per_crew: 4.0,
                incompatible_with: &[Exercise],
                noise_level: 1,
                description: "Medical care and health monitoring",
            },
            Research => RoomRules {
                min_area_per_crew: 6.0,
                incompatible_with: &[Hygiene],
                noise_level: 2,
                description: "Scientific research and experiments",
            },
            Storage => RoomRules {
                min_area_per_crew: 2.0,
                incompatible_with: &[],
                noise_level: 1,
                description: "Equipment and supply storage",
            },
            LifeSupport => RoomRules {
                min_area_per_crew: 8.0,
                incompatible_with: &[Sleep],
                noise_level: 3,
                description: "Environmental control systems",
            },
            Recreation => RoomRules {
                min_area_per_crew: 5.0,
                incompatible_with: &[],
                noise_level: 3,
                description: "Crew relaxation and entertainment",
            },
            Communication => RoomRules {
                min_area_per_crew: 3.0,
                incompatible_with: &[],
                noise_level: 2,
                description: "Communications equipment",
            },
            Maintenance => RoomRules {
                min_area_per_crew: 4.0,
                incompatible_with: &[Sleep, Food],
                noise_level: 4,
                description: "Tools and repair workspace",
            },
            Airlock => RoomRules {
                min_area_per_crew: 3.0,
                incompatible_with: &[],
                noise_level: 2,
                description: "Entry/exit and suit storage",
            },
        }
    }

    /// Human-readable label used for generated room names.
    pub fn label(self) -> &'static str {
        match self {
            Self::Sleep => "Sleep",
            Self::Hygiene => "Hygiene",
            Self::Exercise => "Exercise",
            Self::Food => "Food",
            Self::Medical => "Medical",
            Self::Research => "Research",
            Self::Storage => "Storage",
            Self::LifeSupport => "Life-support",
            Self::Recreation => "Recreation",
            Self::Communication => "Communication",
            Self::Maintenance => "Maintenance",
            Self::Airlock => "Airlock",
        }
    }

    /// Minimum floor area for the whole crew.
    pub fn required_area(self, crew_size: u32) -> f64 {
        self.rules().min_area_per_crew * crew_size as f64
    }

    /// Dimensions of a freshly added room: `ceil(area / 3) × 3 × 3`.
    pub fn default_dimensions(self, crew_size: u32) -> Dimensions {
        let width = (self.required_area(crew_size) / DEFAULT_ROOM_DEPTH).ceil();
        Dimensions::new(width, DEFAULT_ROOM_HEIGHT, DEFAULT_ROOM_DEPTH)
    }
}

impl std::fmt::Display for RoomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Sleep => "sleep",
            Self::Hygiene => "hygiene",
            Self::Exercise => "exercise",
            Self::Food => "food",
            Self::Medical => "medical",
            Self::Research => "research",
            Self::Storage => "storage",
            Self::LifeSupport => "life-support",
            Self::Recreation => "recreation",
            Self::Communication => "communication",
            Self::Maintenance => "maintenance",
            Self::Airlock => "airlock",
        };
        f.write_str(s)
    }
}

/// A placed room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub room_type: RoomType,
    pub name: String,
    pub position: Position,
    pub dimensions: Dimensions,
    #[serde(default)]
    pub rotation: Rotation,
    pub is_valid: bool,
    pub required_area: f64,
    pub actual_area: f64,
    /// Owner-populated adjacency; never derived from geometry here.
    #[serde(default)]
    pub adjacent_rooms: Vec<RoomId>,
    #[serde(default)]
    pub incompatible_with: Vec<RoomType>,
    #[serde(default)]
    pub objects: Vec<PlacedObject>,
    pub noise_level: u8,
}

impl Room {
    /// Build a room of `room_type` sized for `crew_size`, with rules copied
    /// from the type table.
    pub fn from_type(
        id: RoomId,
        room_type: RoomType,
        name: String,
        position: Position,
        crew_size: u32,
    ) -> Self {
        let rules = room_type.rules();
        let area = room_type.required_area(crew_size);
        Self {
            id,
            room_type,
            name,
            position,
            dimensions: room_type.default_dimensions(crew_size),
            rotation: Rotation::Deg0,
            is_valid: true,
            required_area: area,
            actual_area: area,
            adjacent_rooms: Vec::new(),
            incompatible_with: rules.incompatible_with.to_vec(),
            objects: Vec::new(),
            noise_level: rules.noise_level,
        }
    }

    /// Dimensions after rotation.
    pub fn effective_dimensions(&self) -> Dimensions {
        self.dimensions.rotated(self.rotation)
    }

    pub fn volume(&self) -> f64 {
        self.dimensions.volume()
    }

    pub fn is_incompatible_with(&self, other: RoomType) -> bool {
        self.incompatible_with.contains(&other)
    }
}
