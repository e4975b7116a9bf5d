//! Static catalog: placeable object types, mission presets and the crew
//! name pool. Validated once at load so lookups never meet a malformed entry.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::habitat::MissionScenario;
use crate::objects::ObjectType;

const BUILTIN: &str = include_str!("../../../data/catalog.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub objects: Vec<ObjectType>,
    pub missions: Vec<MissionScenario>,
    pub crew_names: Vec<String>,
}

impl Catalog {
    /// The catalog shipped in `data/catalog.json`.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        log::debug!(
            "Catalog loaded: {} objects, {} missions, {} names",
            catalog.objects.len(),
            catalog.missions.len(),
            catalog.crew_names.len()
        );
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for obj in &self.objects {
            if !seen.insert(obj.id.as_str()) {
                return Err(CatalogError::DuplicateObject(obj.id.clone()));
            }
            let d = obj.dimensions;
            if d.width <= 0.0 || d.height <= 0.0 || d.depth() <= 0.0 {
                return Err(CatalogError::InvalidDimensions(obj.id.clone()));
            }
            if obj.room_types.is_empty() {
                return Err(CatalogError::NoCompatibleRooms(obj.id.clone()));
            }
        }

        for m in &self.missions {
            let invalid = |reason| CatalogError::InvalidMission(m.id.clone(), reason);
            if m.crew_size == 0 {
                return Err(invalid("crew size is zero"));
            }
            if m.mission_duration == 0 {
                return Err(invalid("duration is zero"));
            }
            if m.constraints.max_volume <= 0.0 {
                return Err(invalid("volume ceiling is not positive"));
            }
        }

        if self.crew_names.is_empty() {
            return Err(CatalogError::NoCrewNames);
        }
        Ok(())
    }

    pub fn object(&self, id: &str) -> Option<&ObjectType> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn mission(&self, id: &str) -> Option<&MissionScenario> {
        self.missions.iter().find(|m| m.id == id)
    }
}
