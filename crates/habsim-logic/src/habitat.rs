//! Habitat designs and the mission presets that seed them.

use serde::{Deserialize, Serialize};

use crate::constants::habitat::{ENVELOPE_DEPTH, ENVELOPE_HEIGHT, ENVELOPE_WIDTH};
use crate::objects::ObjectId;
use crate::room::{Dimensions, Position, Room, RoomId, RoomType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HabitatType {
    Lunar,
    Mars,
    Orbital,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HabitatShape {
    #[default]
    Cylinder,
    Sphere,
    Dome,
    Modular,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionConstraints {
    /// Design volume ceiling in m³.
    pub max_volume: f64,
    pub budget_limit: f64,
    pub required_rooms: Vec<RoomType>,
}

/// A mission preset. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionScenario {
    pub id: String,
    pub name: String,
    pub description: String,
    pub habitat_type: HabitatType,
    pub crew_size: u32,
    /// Days.
    pub mission_duration: u32,
    #[serde(default)]
    pub objectives: Vec<String>,
    pub constraints: MissionConstraints,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitatDesign {
    pub id: String,
    pub name: String,
    pub habitat_type: HabitatType,
    pub shape: HabitatShape,
    pub dimensions: Dimensions,
    pub max_volume: f64,
    /// Sum of room volumes. May exceed `max_volume`; that is a finding, not
    /// a rejection.
    pub used_volume: f64,
    pub rooms: Vec<Room>,
    pub crew_size: u32,
    pub mission_duration: u32,
    pub compliance_score: u8,
    pub validation_errors: Vec<String>,
}

impl HabitatDesign {
    /// Empty design sized from a mission preset.
    pub fn from_mission(mission: &MissionScenario) -> Self {
        Self {
            id: format!("habitat-{}", mission.id),
            name: mission.name.clone(),
            habitat_type: mission.habitat_type,
            shape: HabitatShape::Cylinder,
            dimensions: Dimensions::new(ENVELOPE_WIDTH, ENVELOPE_HEIGHT, ENVELOPE_DEPTH),
            max_volume: mission.constraints.max_volume,
            used_volume: 0.0,
            rooms: Vec::new(),
            crew_size: mission.crew_size,
            mission_duration: mission.mission_duration,
            compliance_score: 0,
            validation_errors: Vec::new(),
        }
    }

    pub fn recompute_used_volume(&mut self) {
        self.used_volume = self.rooms.iter().map(Room::volume).sum();
    }

    /// `used / max`, or 0 when the ceiling is not positive.
    pub fn utilization(&self) -> f64 {
        if self.max_volume > 0.0 {
            self.used_volume / self.max_volume
        } else {
            0.0
        }
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|r| r.id == id)
    }

    pub fn has_room_type(&self, room_type: RoomType) -> bool {
        self.rooms.iter().any(|r| r.room_type == room_type)
    }

    pub fn next_room_id(&self) -> RoomId {
        self.rooms.iter().map(|r| r.id + 1).max().unwrap_or(1)
    }

    /// Object ids are unique across the whole habitat.
    pub fn next_object_id(&self) -> ObjectId {
        self.rooms
            .iter()
            .flat_map(|r| r.objects.iter())
            .map(|o| o.id + 1)
            .max()
            .unwrap_or(1)
    }

    /// A new room of `room_type` sized for this crew, named `"<Label> <n>"`.
    /// Not inserted.
    pub fn new_room(&self, room_type: RoomType, position: Position) -> Room {
        let n = self
            .rooms
            .iter()
            .filter(|r| r.room_type == room_type)
            .count()
            + 1;
        Room::from_type(
            self.next_room_id(),
            room_type,
            format!("{} {n}", room_type.label()),
            position,
            self.crew_size,
        )
    }

    /// Remove a room and every adjacency reference to it.
    pub fn remove_room(&mut self, id: RoomId) -> Option<Room> {
        let idx = self.rooms.iter().position(|r| r.id == id)?;
        let removed = self.rooms.remove(idx);
        for room in &mut self.rooms {
            room.adjacent_rooms.retain(|&adj| adj != id);
        }
        self.recompute_used_volume();
        Some(removed)
    }
}

/// Mission-required room types the design does not contain yet.
pub fn missing_mission_rooms(habitat: &HabitatDesign, mission: &MissionScenario) -> Vec<RoomType> {
    mission
        .constraints
        .required_rooms
        .iter()
        .copied()
        .filter(|&t| !habitat.has_room_type(t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mission() -> MissionScenario {
        MissionScenario {
            id: "test".into(),
            name: "Test Mission".into(),
            description: String::new(),
            habitat_type: HabitatType::Lunar,
            crew_size: 4,
            mission_duration: 30,
            objectives: vec![],
            constraints: MissionConstraints {
                max_volume: 150.0,
                budget_limit: 1_000_000.0,
                required_rooms: vec![RoomType::Sleep, RoomType::Airlock],
            },
        }
    }

    #[test]
    fn test_from_mission() {
        let h = HabitatDesign::from_mission(&mission());
        assert_eq!(h.max_volume, 150.0);
        assert_eq!(h.crew_size, 4);
        assert_eq!(h.dimensions.height, 10.0);
        assert!(h.rooms.is_empty());
        assert_eq!(h.next_room_id(), 1);
    }

    #[test]
    fn test_new_room_naming_and_volume() {
        let mut h = HabitatDesign::from_mission(&mission());
        let a = h.new_room(RoomType::Sleep, Position::ORIGIN);
        assert_eq!(a.name, "Sleep 1");
        h.rooms.push(a);
        let b = h.new_room(RoomType::Sleep, Position::flat(10.0, 0.0));
        assert_eq!(b.name, "Sleep 2");
        assert_eq!(b.id, 2);
        h.rooms.push(b);
        h.recompute_used_volume();
        // two 6×3×3 rooms
        assert_eq!(h.used_volume, 108.0);
        assert!((h.utilization() - 0.72).abs() < 1e-9);
    }

    #[test]
    fn test_remove_room_strips_adjacency() {
        let mut h = HabitatDesign::from_mission(&mission());
        let mut a = h.new_room(RoomType::Sleep, Position::ORIGIN);
        a.adjacent_rooms = vec![2];
        h.rooms.push(a);
        let mut b = h.new_room(RoomType::Exercise, Position::flat(10.0, 0.0));
        b.adjacent_rooms = vec![1];
        h.rooms.push(b);
        h.recompute_used_volume();

        let removed = h.remove_room(2).unwrap();
        assert_eq!(removed.room_type, RoomType::Exercise);
        assert!(h.rooms[0].adjacent_rooms.is_empty());
        assert_eq!(h.used_volume, 54.0);
        assert!(h.remove_room(2).is_none());
    }

    #[test]
    fn test_missing_mission_rooms() {
        let mut h = HabitatDesign::from_mission(&mission());
        assert_eq!(
            missing_mission_rooms(&h, &mission()),
            vec![RoomType::Sleep, RoomType::Airlock]
        );
        let airlock = h.new_room(RoomType::Airlock, Position::ORIGIN);
        h.rooms.push(airlock);
        assert_eq!(missing_mission_rooms(&h, &mission()), vec![RoomType::Sleep]);
    }

    #[test]
    fn test_utilization_guards_zero_ceiling() {
        let mut h = HabitatDesign::from_mission(&mission());
        h.max_volume = 0.0;
        h.used_volume = 10.0;
        assert_eq!(h.utilization(), 0.0);
    }
}
