//! Design rules, compliance scoring and crew happiness.
//!
//! Findings are values, not errors: they accumulate on the habitat and feed
//! the compliance score. Rules, in evaluation order:
//! 1. each of [`RoomType::REQUIRED`] appears at least once
//! 2. every room meets `min_area_per_crew × crew_size`
//! 3. no room lists an adjacent room whose type it is incompatible with
//! 4. used volume does not exceed the ceiling (soft; never blocks edits)

use serde::{Deserialize, Serialize};

use crate::constants::habitat::EFFICIENT_UTILIZATION;
use crate::crew::CrewMember;
use crate::habitat::HabitatDesign;
use crate::room::{RoomId, RoomType};

/// One rule violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Finding {
    MissingRequiredRoom {
        room_type: RoomType,
    },
    RoomTooSmall {
        room: RoomId,
        name: String,
        required: f64,
        actual: f64,
    },
    IncompatibleAdjacency {
        room: RoomId,
        name: String,
        adjacent: RoomId,
        adjacent_name: String,
    },
    VolumeExceeded {
        used: f64,
        max: f64,
    },
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequiredRoom { room_type } => {
                write!(f, "Missing required room: {room_type}")
            }
            Self::RoomTooSmall {
                name,
                required,
                actual,
                ..
            } => write!(f, "{name} is too small. Needs {required}m² but has {actual}m²"),
            Self::IncompatibleAdjacency {
                name,
                adjacent_name,
                ..
            } => write!(f, "{name} should not be adjacent to {adjacent_name}"),
            Self::VolumeExceeded { used, max } => {
                write!(f, "Habitat exceeds maximum volume: {used}m³ > {max}m³")
            }
        }
    }
}

pub fn validate(habitat: &HabitatDesign) -> Vec<Finding> {
    let mut findings = Vec::new();

    for room_type in RoomType::REQUIRED {
        if !habitat.has_room_type(room_type) {
            findings.push(Finding::MissingRequiredRoom { room_type });
        }
    }

    for room in &habitat.rooms {
        let required = room.room_type.required_area(habitat.crew_size);
        if room.actual_area < required {
            findings.push(Finding::RoomTooSmall {
                room: room.id,
                name: room.name.clone(),
                required,
                actual: room.actual_area,
            });
        }
    }

    for room in &habitat.rooms {
        for &adj_id in &room.adjacent_rooms {
            // Dangling ids are ignored
            let Some(adj) = habitat.room(adj_id) else {
                continue;
            };
            if room.is_incompatible_with(adj.room_type) {
                findings.push(Finding::IncompatibleAdjacency {
                    room: room.id,
                    name: room.name.clone(),
                    adjacent: adj.id,
                    adjacent_name: adj.name.clone(),
                });
            }
        }
    }

    if habitat.used_volume > habitat.max_volume {
        findings.push(Finding::VolumeExceeded {
            used: habitat.used_volume,
            max: habitat.max_volume,
        });
    }

    findings
}

/// Rendered finding messages, in rule order.
pub fn validation_messages(habitat: &HabitatDesign) -> Vec<String> {
    validate(habitat).iter().map(ToString::to_string).collect()
}

/// Refresh the habitat's stored findings and compliance score.
pub fn evaluate(habitat: &mut HabitatDesign) {
    habitat.validation_errors = validation_messages(habitat);
    habitat.compliance_score = compliance_score(habitat);
}

const PENALTY_PER_FINDING: i32 = 10;
const AMENITY_BONUS: i32 = 5;
const EFFICIENCY_BONUS: i32 = 10;

/// Compliance score in `[0, 100]`.
pub fn compliance_score(habitat: &HabitatDesign) -> u8 {
    let findings = validate(habitat).len() as i32;
    let mut score = 100 - findings * PENALTY_PER_FINDING;

    for amenity in [RoomType::Recreation, RoomType::Medical, RoomType::Research] {
        if habitat.has_room_type(amenity) {
            score += AMENITY_BONUS;
        }
    }

    let (lo, hi) = EFFICIENT_UTILIZATION;
    let util = habitat.utilization();
    if habitat.max_volume > 0.0 && util > lo && util < hi {
        score += EFFICIENCY_BONUS;
    }

    score.clamp(0, 100) as u8
}

/// Crew happiness in `[0, 100]`, blending mean mood score (0.5), mean
/// health (0.3) and mean energy (0.2). An empty crew is perfectly happy.
pub fn crew_happiness(crew: &[CrewMember]) -> f64 {
    if crew.is_empty() {
        return 100.0;
    }
    let n = crew.len() as f64;
    let mood = crew.iter().map(|m| m.mood.score()).sum::<f64>() / n;
    let health = crew.iter().map(|m| m.health).sum::<f64>() / n;
    let energy = crew.iter().map(|m| m.energy).sum::<f64>() / n;

    (mood * 0.5 + health * 0.3 + energy * 0.2).clamp(0.0, 100.0)
}
