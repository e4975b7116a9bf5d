//! One simulation tick as a pure function over a snapshot.
//!
//! Order within a tick is fixed: resources, then crew needs, then
//! validation and score, so validation always sees the tick's final state.
//! A tick that empties a pool still returns its complete result; stopping
//! the clock is the caller's job.

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::crew::{self, CrewMember};
use crate::habitat::HabitatDesign;
use crate::resources::{consumption, ResourceKind, Resources};
use crate::validation;

/// The parts of a session a tick reads and replaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub habitat: HabitatDesign,
    pub crew: Vec<CrewMember>,
    pub resources: Resources,
    pub days_passed: f64,
    pub score: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub next: SimSnapshot,
    pub consumed: Resources,
    pub happiness: f64,
    /// Pools that reached zero this tick. Non-empty means mission failure.
    pub depleted: Vec<ResourceKind>,
}

impl TickOutcome {
    pub fn is_failure(&self) -> bool {
        !self.depleted.is_empty()
    }
}

/// Score after adding one tick's weighted compliance and happiness.
pub fn accumulate_score(prev: u64, compliance: u8, happiness: f64, config: &SimConfig) -> u64 {
    let w = config.score_weights;
    let gained = f64::from(compliance) * w.compliance + happiness * w.happiness;
    (prev as f64 + gained.max(0.0)).round() as u64
}

/// Advance `snapshot` by `days`.
pub fn step(snapshot: &SimSnapshot, days: f64, config: &SimConfig) -> TickOutcome {
    let crew_count = snapshot.crew.len() as u32;
    let consumed = consumption(crew_count, days, &config.consumption);
    let resources = snapshot.resources.after_consumption(&consumed);

    let crew = crew::advance(&snapshot.crew, days);

    let mut habitat = snapshot.habitat.clone();
    validation::evaluate(&mut habitat);
    let happiness = validation::crew_happiness(&crew);
    let score = accumulate_score(snapshot.score, habitat.compliance_score, happiness, config);

    let depleted = resources.depleted();
    log::debug!(
        "tick +{days:.2}d → day {:.2}: compliance {} happiness {happiness:.1} score {score}",
        snapshot.days_passed + days,
        habitat.compliance_score
    );

    TickOutcome {
        next: SimSnapshot {
            habitat,
            crew,
            resources,
            days_passed: snapshot.days_passed + days,
            score,
        },
        consumed,
        happiness,
        depleted,
    }
}
