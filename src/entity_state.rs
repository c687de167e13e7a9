use std::{collections::HashMap, fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::errors::{CardError, Result};

const UNIT_ATTRIBUTE: &str = "unit_of_measurement";

// Current state of one host entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    pub state: String,

    #[serde(default)]
    pub attributes: Map<String, Value>,
}

// Every entity state pushed by the dashboard host, in the host's Json shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateSnapshot {
    states: HashMap<String, EntityState>,
}

impl EntityState {
    pub fn new(state: &str) -> Self {
        Self {
            state: state.to_string(),
            attributes: Map::new(),
        }
    }

    pub fn unit(&self) -> Option<&str> {
        self.attributes
            .get(UNIT_ATTRIBUTE)
            .and_then(Value::as_str)
            .filter(|unit| !unit.is_empty())
    }
}

impl StateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    // Load a snapshot from a Json file
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Reading state snapshot at: {:?}", path);

        let file = File::open(path).map_err(|source| CardError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let snapshot: StateSnapshot = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| CardError::Json {
                what: "state snapshot",
                source,
            })?;

        trace!("Loaded {} entity states", snapshot.states.len());

        Ok(snapshot)
    }

    pub fn insert(&mut self, entity_id: &str, state: EntityState) {
        self.states.insert(entity_id.to_string(), state);
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    pub fn resolve(&self, entity_id: &str) -> Option<&EntityState> {
        self.states.get(entity_id)
    }

    // Raw state string, None when the id is unset or unknown to the host
    pub fn state(&self, entity_id: Option<&str>) -> Option<&str> {
        entity_id
            .and_then(|id| self.resolve(id))
            .map(|entity| entity.state.as_str())
    }

    // Numeric state, None when missing or not a finite number
    pub fn number(&self, entity_id: Option<&str>) -> Option<f64> {
        self.state(entity_id).and_then(parse_number)
    }

    pub fn unit(&self, entity_id: Option<&str>) -> Option<&str> {
        entity_id
            .and_then(|id| self.resolve(id))
            .and_then(EntityState::unit)
    }
}

// Host states such as "unavailable" or "unknown" yield None
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
