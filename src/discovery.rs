use std::{collections::HashMap, fs::File, io::BufReader, path::Path};

use serde::Deserialize;
use tracing::{debug, trace};

use crate::{
    card_config::{CardConfig, ChipKind, Role},
    entity_state::StateSnapshot,
    errors::{CardError, Result},
};

pub struct DiscoveryRule {
    pub role: Role,
    // Tried in order, the first domain with a match wins
    pub domains: &'static [&'static str],
    pub suffix: &'static str,
}

const fn rule(role: Role, domains: &'static [&'static str], suffix: &'static str) -> DiscoveryRule {
    DiscoveryRule {
        role,
        domains,
        suffix,
    }
}

// Entities are named <domain>.<device>_<suffix>
pub const RULES: &[DiscoveryRule] = &[
    rule(Role::CvMode, &["select"], "cv_mode"),
    rule(Role::VvMode, &["select"], "vv_mode"),
    rule(Role::CvNight, &["select"], "cv_night"),
    rule(Role::VvSchedule, &["select"], "vv_schedule"),
    rule(Role::AuxHeating, &["select"], "aux_heating"),
    rule(Role::VvSetpoint, &["number", "input_number"], "vv_setpoint"),
    rule(Role::CurveShift, &["number"], "cv_curve"),
    rule(Role::CurveSetMinus12, &["number"], "curve_set_12"),
    rule(Role::CurveSetPlus12, &["number"], "curve_set_12_2"),
    rule(Role::CvMin, &["number"], "cv_min"),
    rule(Role::CvMax, &["number"], "cv_max"),
    rule(Role::OutdoorTemp, &["sensor"], "outdoor"),
    rule(Role::CurveTemp, &["sensor"], "curve_temp"),
    rule(Role::StorageTankCv, &["sensor"], "storage_tank_cv"),
    rule(Role::StorageTankVv, &["sensor"], "storage_tank_vv"),
    rule(Role::EvaporatorTemp, &["sensor"], "evaporator"),
    rule(Role::HpTemp, &["sensor"], "compressor_hp"),
    rule(Role::LpTemp, &["sensor"], "compressor_lp"),
    rule(Role::CvForwardTemp, &["sensor"], "cv_forward"),
    rule(Role::CvReturnTemp, &["sensor"], "cv_return"),
    rule(Role::Em23Power, &["sensor"], "em23_power"),
    rule(Role::Em23Energy, &["sensor"], "em23_energy"),
    rule(Role::InstallDate, &["sensor"], "install_date"),
    rule(Role::ServiceDate, &["sensor"], "service_date"),
    rule(Role::CompHours, &["sensor"], "comp_hours"),
    rule(Role::VvHours, &["sensor"], "vv_hours"),
    rule(Role::HeatingHours, &["sensor"], "heating_hours"),
    rule(Role::CompIcon, &["binary_sensor"], "soft_starter_compressor"),
    rule(Role::CvPumpIcon, &["binary_sensor"], "circ_pump_cv"),
    rule(Role::DefrostIcon, &["binary_sensor"], "4_way_valve_defrost"),
];

// Roles collected into each chip popup after matching
const CHIP_ROLES: &[(ChipKind, &[Role])] = &[
    (
        ChipKind::Info,
        &[
            Role::Em23Energy,
            Role::Em23Power,
            Role::InstallDate,
            Role::ServiceDate,
            Role::CompHours,
            Role::VvHours,
            Role::HeatingHours,
        ],
    ),
    (
        ChipKind::Cv,
        &[Role::CvMode, Role::CurveShift, Role::AuxHeating, Role::CvNight],
    ),
    (ChipKind::Vv, &[Role::VvSetpoint, Role::VvMode, Role::VvSchedule]),
    (ChipKind::Aux, &[Role::AuxHeating, Role::HeatingHours]),
];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryEntry {
    #[serde(default)]
    pub device_id: Option<String>,
}

// entity_id -> { device_id }
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct EntityRegistry {
    entries: HashMap<String, RegistryEntry>,
}

impl EntityRegistry {
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Reading entity registry at: {:?}", path);

        let file = File::open(path).map_err(|source| CardError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|source| CardError::Json {
            what: "entity registry",
            source,
        })
    }

    pub fn insert(&mut self, entity_id: &str, device_id: &str) {
        self.entries.insert(
            entity_id.to_string(),
            RegistryEntry {
                device_id: Some(device_id.to_string()),
            },
        );
    }

    fn device_of(&self, entity_id: &str) -> Option<&str> {
        self.entries
            .get(entity_id)
            .and_then(|entry| entry.device_id.as_deref())
    }
}

impl DiscoveryRule {
    pub fn matches(&self, domain: &str, entity_id: &str) -> bool {
        let Some(object_id) = entity_id.strip_prefix(domain).and_then(|id| id.strip_prefix('.'))
        else {
            return false;
        };

        // The suffix must follow the device prefix at a `_` boundary
        object_id
            .strip_suffix(self.suffix)
            .is_some_and(|prefix| prefix.ends_with('_'))
    }

    // First candidate matching the rule, domains are tried in order
    pub fn find<'a>(&self, candidates: &[&'a str]) -> Option<&'a str> {
        self.domains.iter().find_map(|domain| {
            candidates
                .iter()
                .copied()
                .find(|entity_id| self.matches(domain, entity_id))
        })
    }
}

pub fn device_entities<'a>(
    states: &'a StateSnapshot,
    registry: &EntityRegistry,
    device_id: &str,
) -> Vec<&'a str> {
    let mut entities: Vec<&str> = states
        .entity_ids()
        .filter(|id| registry.device_of(id) == Some(device_id))
        .collect();

    entities.sort_unstable();
    entities
}

pub fn autofill(
    config: &CardConfig,
    states: &StateSnapshot,
    registry: &EntityRegistry,
    device_id: &str,
) -> CardConfig {
    let candidates = device_entities(states, registry, device_id);
    debug!(
        "Auto-filling from device \"{device_id}\" with {} entities",
        candidates.len()
    );

    let matched: HashMap<Role, &str> = RULES
        .iter()
        .filter_map(|rule| rule.find(&candidates).map(|entity| (rule.role, entity)))
        .collect();

    let mut filled = config.clone();
    filled.device_id = Some(device_id.to_string());

    // Every rule writes its role, unmatched ones clear the old wiring
    for rule in RULES {
        let entity = matched.get(&rule.role).map(|entity| entity.to_string());
        trace!("Auto-fill: {} -> {:?}", rule.role.key(), entity);

        filled.set_entity(rule.role, entity);
    }

    for (chip, roles) in CHIP_ROLES {
        let entities = roles
            .iter()
            .filter_map(|role| matched.get(role))
            .map(|entity| entity.to_string())
            .collect();

        filled.set_chip_entities(*chip, entities);
    }

    filled
}
