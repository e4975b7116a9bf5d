//! Crew members — needs, status-driven needs drift, derived mood, and
//! cosmetic wandering.
//!
//! Needs live in `[0, 100]` where 100 is fully satisfied. Each status has a
//! fixed per-day drift; mood is recomputed from the needs mean after every
//! update and is never set independently.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::crew::*;
use crate::constants::grid;
use crate::room::Position;

pub type CrewId = u32;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrewStatus {
    #[default]
    Working,
    Sleeping,
    Eating,
    Exercising,
    Relaxing,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrewMood {
    Happy,
    #[default]
    Neutral,
    Stressed,
    Exhausted,
}

impl CrewMood {
    /// Classify a needs mean.
    pub fn from_needs_mean(mean: f64) -> Self {
        if mean > 70.0 {
            Self::Happy
        } else if mean > 50.0 {
            Self::Neutral
        } else if mean > 30.0 {
            Self::Stressed
        } else {
            Self::Exhausted
        }
    }

    /// Contribution to crew happiness.
    pub fn score(self) -> f64 {
        match self {
            Self::Happy => 100.0,
            Self::Neutral => 70.0,
            Self::Stressed => 40.0,
            Self::Exhausted => 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    pub engineering: u8,
    pub medical: u8,
    pub science: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: CrewId,
    pub name: String,
    pub position: Position,
    pub status: CrewStatus,
    pub mood: CrewMood,
    pub health: f64,
    pub energy: f64,
    pub hunger: f64,
    pub hygiene: f64,
    pub skills: Skills,
}

impl CrewMember {
    /// Mean of the three needs that drive mood (health excluded).
    pub fn needs_mean(&self) -> f64 {
        (self.energy + self.hunger + self.hygiene) / 3.0
    }
}

// ── Needs drift ───────────────────────────────────────────────────────────

/// Per-day change applied to each need while in a status.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NeedsDrift {
    pub energy: f64,
    pub hunger: f64,
    pub hygiene: f64,
    pub health: f64,
}

impl CrewStatus {
    pub fn drift(self) -> NeedsDrift {
        match self {
            Self::Working => NeedsDrift {
                energy: -0.5,
                hunger: -0.3,
                hygiene: -0.1,
                health: 0.0,
            },
            Self::Sleeping => NeedsDrift {
                energy: 2.0,
                ..NeedsDrift::default()
            },
            Self::Eating => NeedsDrift {
                hunger: 3.0,
                ..NeedsDrift::default()
            },
            Self::Exercising => NeedsDrift {
                energy: -1.0,
                health: 0.5,
                ..NeedsDrift::default()
            },
            Self::Relaxing => NeedsDrift::default(),
        }
    }
}

/// Health lost per day while the needs mean sits below the neglect threshold.
const NEGLECT_HEALTH_DECAY: f64 = 0.2;

fn clamp_need(v: f64) -> f64 {
    v.clamp(NEED_MIN, NEED_MAX)
}

/// Advance one member by `days`.
pub fn advance_member(member: &CrewMember, days: f64) -> CrewMember {
    let drift = member.status.drift();
    let mut next = member.clone();
    next.energy = clamp_need(member.energy + drift.energy * days);
    next.hunger = clamp_need(member.hunger + drift.hunger * days);
    next.hygiene = clamp_need(member.hygiene + drift.hygiene * days);
    next.health = clamp_need(member.health + drift.health * days);

    let mean = next.needs_mean();
    if mean < NEGLECT_THRESHOLD {
        next.health = clamp_need(next.health - NEGLECT_HEALTH_DECAY * days);
    }
    next.mood = CrewMood::from_needs_mean(mean);
    next
}

/// Advance the whole crew by `days`.
pub fn advance(crew: &[CrewMember], days: f64) -> Vec<CrewMember> {
    crew.iter().map(|m| advance_member(m, days)).collect()
}

// ── Generation & motion ───────────────────────────────────────────────────

/// Fresh crew: all needs full, working, neutral, skills in `[50, 80)`.
///
/// Names cycle through `names`; an empty pool falls back to numbered names.
pub fn generate_crew<R: Rng + ?Sized>(count: u32, names: &[String], rng: &mut R) -> Vec<CrewMember> {
    (0..count)
        .map(|i| {
            let name = if names.is_empty() {
                format!("Crew {}", i + 1)
            } else {
                names[i as usize % names.len()].clone()
            };
            CrewMember {
                id: i,
                name,
                position: Position::ORIGIN,
                status: CrewStatus::Working,
                mood: CrewMood::Neutral,
                health: NEED_MAX,
                energy: NEED_MAX,
                hunger: NEED_MAX,
                hygiene: NEED_MAX,
                skills: Skills {
                    engineering: rng.gen_range(50..80),
                    medical: rng.gen_range(50..80),
                    science: rng.gen_range(50..80),
                },
            }
        })
        .collect()
}

/// Cosmetic random walk. Touches positions only.
pub fn wander<R: Rng + ?Sized>(crew: &[CrewMember], speed: u32, rng: &mut R) -> Vec<CrewMember> {
    let speed = f64::from(speed.max(1));
    let move_chance = (MOVE_CHANCE * speed).min(1.0);

    crew.iter()
        .map(|m| {
            let mut next = m.clone();
            if rng.gen::<f64>() >= move_chance {
                return next;
            }
            let angle = rng.gen::<f64>() * std::f64::consts::TAU;
            let distance = (0.05 + rng.gen::<f64>()) * speed;
            let (x, y) = grid::clamp_xy(
                m.position.x + angle.cos() * distance,
                m.position.y + angle.sin() * distance,
            );
            next.position.x = x;
            next.position.y = y;
            if rng.gen::<f64>() < LAYER_CHANGE_CHANCE {
                next.position.z = f64::from(rng.gen_range(0..grid::LAYERS));
            }
            next
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn member(status: CrewStatus) -> CrewMember {
        CrewMember {
            id: 0,
            name: "Test".into(),
            position: Position::ORIGIN,
            status,
            mood: CrewMood::Neutral,
            health: 80.0,
            energy: 60.0,
            hunger: 60.0,
            hygiene: 60.0,
            skills: Skills {
                engineering: 60,
                medical: 60,
                science: 60,
            },
        }
    }

    #[test]
    fn test_mood_thresholds() {
        assert_eq!(CrewMood::from_needs_mean(70.1), CrewMood::Happy);
        assert_eq!(CrewMood::from_needs_mean(70.0), CrewMood::Neutral);
        assert_eq!(CrewMood::from_needs_mean(50.0), CrewMood::Stressed);
        assert_eq!(CrewMood::from_needs_mean(30.0), CrewMood::Exhausted);
    }

    #[test]
    fn test_working_drains() {
        let next = advance_member(&member(CrewStatus::Working), 10.0);
        assert!((next.energy - 55.0).abs() < 1e-9);
        assert!((next.hunger - 57.0).abs() < 1e-9);
        assert!((next.hygiene - 59.0).abs() < 1e-9);
        assert_eq!(next.health, 80.0);
    }

    #[test]
    fn test_restoring_statuses() {
        assert!(advance_member(&member(CrewStatus::Sleeping), 5.0).energy > 60.0);
        assert!(advance_member(&member(CrewStatus::Eating), 5.0).hunger > 60.0);
        let ex = advance_member(&member(CrewStatus::Exercising), 5.0);
        assert!(ex.energy < 60.0 && ex.health > 80.0);
        let idle = advance_member(&member(CrewStatus::Relaxing), 5.0);
        assert_eq!(idle.energy, 60.0);
    }

    #[test]
    fn test_needs_clamped() {
        let mut m = member(CrewStatus::Sleeping);
        m.energy = 99.0;
        assert_eq!(advance_member(&m, 100.0).energy, 100.0);
        let mut m = member(CrewStatus::Working);
        m.energy = 0.1;
        assert_eq!(advance_member(&m, 100.0).energy, 0.0);
    }

    #[test]
    fn test_neglect_decays_health() {
        let mut m = member(CrewStatus::Relaxing);
        m.energy = 20.0;
        m.hunger = 20.0;
        m.hygiene = 20.0;
        let next = advance_member(&m, 5.0);
        assert!((next.health - 79.0).abs() < 1e-9);
        assert_eq!(next.mood, CrewMood::Exhausted);

        // Mood follows needs even when it was stored stale
        let mut m = member(CrewStatus::Relaxing);
        m.mood = CrewMood::Exhausted;
        assert_eq!(advance_member(&m, 0.0).mood, CrewMood::Neutral);
    }

    #[test]
    fn test_generate_crew() {
        let names = vec!["Ada".to_string(), "Bo".to_string()];
        let mut rng = StdRng::seed_from_u64(5);
        let crew = generate_crew(3, &names, &mut rng);
        assert_eq!(crew.len(), 3);
        assert_eq!(crew[2].name, "Ada");
        for (i, m) in crew.iter().enumerate() {
            assert_eq!(m.id, i as u32);
            assert_eq!(m.status, CrewStatus::Working);
            assert_eq!(m.health, 100.0);
            assert!((50..80).contains(&m.skills.science));
        }
        assert_eq!(generate_crew(1, &[], &mut rng)[0].name, "Crew 1");
    }

    #[test]
    fn test_wander_stays_in_grid_and_keeps_needs() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut crew = generate_crew(6, &[], &mut rng);
        for _ in 0..500 {
            crew = wander(&crew, 12, &mut rng);
        }
        for m in &crew {
            assert!((0.0..=grid::WIDTH).contains(&m.position.x));
            assert!((0.0..=grid::DEPTH).contains(&m.position.y));
            assert!([0.0, 1.0, 2.0].contains(&m.position.z));
            assert_eq!(m.energy, 100.0);
        }
        assert!(crew.iter().any(|m| m.position != Position::ORIGIN));
    }
}
