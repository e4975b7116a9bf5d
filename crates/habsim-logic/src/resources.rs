//! Resource accounting — four shared pools consumed linearly by the crew.
//!
//! `consumption = crew × rate × days` per pool. Pools never go negative;
//! a pool at zero is a terminal mission failure, detected by the caller
//! through [`Resources::depleted`].

use serde::{Deserialize, Serialize};

use crate::config::ConsumptionRates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Oxygen,
    Water,
    Power,
    Food,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [Self::Oxygen, Self::Water, Self::Power, Self::Food];

    pub fn unit(self) -> &'static str {
        match self {
            Self::Oxygen | Self::Food => "kg",
            Self::Water => "L",
            Self::Power => "kWh",
        }
    }

    fn rate(self, rates: &ConsumptionRates) -> f64 {
        match self {
            Self::Oxygen => rates.oxygen,
            Self::Water => rates.water,
            Self::Power => rates.power,
            Self::Food => rates.food,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Oxygen => "oxygen",
            Self::Water => "water",
            Self::Power => "power",
            Self::Food => "food",
        })
    }
}

/// Amounts in each pool, or amounts consumed, depending on context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    pub oxygen: f64,
    pub water: f64,
    pub power: f64,
    pub food: f64,
}

impl Resources {
    pub fn get(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Oxygen => self.oxygen,
            ResourceKind::Water => self.water,
            ResourceKind::Power => self.power,
            ResourceKind::Food => self.food,
        }
    }

    fn map(self, f: impl Fn(ResourceKind, f64) -> f64) -> Self {
        Self {
            oxygen: f(ResourceKind::Oxygen, self.oxygen),
            water: f(ResourceKind::Water, self.water),
            power: f(ResourceKind::Power, self.power),
            food: f(ResourceKind::Food, self.food),
        }
    }

    /// Pools after subtracting `used`, each floored at 0.
    pub fn after_consumption(&self, used: &Resources) -> Self {
        self.map(|kind, pool| (pool - used.get(kind)).max(0.0))
    }

    /// Pools that have reached zero.
    pub fn depleted(&self) -> Vec<ResourceKind> {
        ResourceKind::ALL
            .into_iter()
            .filter(|&k| self.get(k) <= 0.0)
            .collect()
    }

    pub fn any_depleted(&self) -> bool {
        ResourceKind::ALL.iter().any(|&k| self.get(k) <= 0.0)
    }
}

/// Resources used by `crew_count` people over `days`.
pub fn consumption(crew_count: u32, days: f64, rates: &ConsumptionRates) -> Resources {
    let crew_days = crew_count as f64 * days;
    Resources::default().map(|kind, _| kind.rate(rates) * crew_days)
}

/// Days until `kind` runs out at the current crew size. `None` when nothing
/// is being consumed.
pub fn days_remaining(
    pool: &Resources,
    kind: ResourceKind,
    crew_count: u32,
    rates: &ConsumptionRates,
) -> Option<f64> {
    let daily = kind.rate(rates) * crew_count as f64;
    if daily <= 0.0 {
        return None;
    }
    Some(pool.get(kind) / daily)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_four_crew_one_day_oxygen() {
        let used = consumption(4, 1.0, &ConsumptionRates::default());
        assert!(close(used.oxygen, 3.36));
        assert!(close(used.water, 14.4));
        assert!(close(used.power, 10.0));
        assert!(close(used.food, 7.2));
    }

    #[test]
    fn test_consumption_is_linear() {
        let rates = ConsumptionRates::default();
        for crew in [1, 3, 6] {
            for days in [0.1, 1.0, 2.5, 30.0] {
                let base = consumption(crew, days, &rates);
                let twice_days = consumption(crew, days * 2.0, &rates);
                let twice_crew = consumption(crew * 2, days, &rates);
                for k in ResourceKind::ALL {
                    assert!(close(twice_days.get(k), 2.0 * base.get(k)), "{k} days");
                    assert!(close(twice_crew.get(k), 2.0 * base.get(k)), "{k} crew");
                }
            }
        }
    }

    #[test]
    fn test_pool_floors_at_zero() {
        let pool = Resources {
            oxygen: 0.5,
            water: 10.0,
            power: 10.0,
            food: 10.0,
        };
        let used = Resources {
            oxygen: 1.0,
            ..Default::default()
        };
        let after = pool.after_consumption(&used);
        assert_eq!(after.oxygen, 0.0);
        assert_eq!(after.water, 10.0);
        assert_eq!(after.depleted(), vec![ResourceKind::Oxygen]);
        assert!(after.any_depleted());
        assert!(!pool.any_depleted());
    }

    #[test]
    fn test_days_remaining() {
        let rates = ConsumptionRates::default();
        let pool = consumption(4, 30.0, &rates);
        for k in ResourceKind::ALL {
            assert!(close(days_remaining(&pool, k, 4, &rates).unwrap(), 30.0));
        }
        assert_eq!(days_remaining(&pool, ResourceKind::Food, 0, &rates), None);
    }

    #[test]
    fn test_kind_names_and_units() {
        assert_eq!(ResourceKind::Power.to_string(), "power");
        assert_eq!(ResourceKind::Water.unit(), "L");
        assert_eq!(
            serde_json::to_string(&ResourceKind::Oxygen).unwrap(),
            "\"oxygen\""
        );
    }
}
