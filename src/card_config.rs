use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::{
    errors::{CardError, Result},
    layout::Variant,
};

const TYPE_JSON: &str = "type";
const DEVICE_ID_JSON: &str = "device_id";
const TITLE_JSON: &str = "title";
const VARIANT_JSON: &str = "variant";
const SHOW_TEMP_UNIT_JSON: &str = "show_temp_unit";

// Entity slots a card can be wired to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    CvMode,
    VvMode,
    CvNight,
    VvSchedule,
    AuxHeating,
    VvSetpoint,

    CurveShift,
    CurveSetMinus12,
    CurveSetPlus12,
    CvMin,
    CvMax,

    OutdoorTemp,
    CurveTemp,
    StorageTankCv,
    StorageTankVv,
    EvaporatorTemp,
    HpTemp,
    LpTemp,
    CvForwardTemp,
    CvReturnTemp,

    Em23Power,
    Em23Energy,
    InstallDate,
    ServiceDate,
    CompHours,
    VvHours,
    HeatingHours,

    CompIcon,
    CvPumpIcon,
    DefrostIcon,
}

// Entity lists shown in the popup of each mode chip
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChipKind {
    Info,
    Cv,
    Vv,
    Aux,
}

// Which host entity backs each role, plus the chip popup lists
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardConfig {
    // Host card type, e.g. `custom:lv-heatpump-card`
    pub card_type: Option<String>,
    pub device_id: Option<String>,
    pub title: Option<String>,
    pub variant: Variant,
    pub show_temp_unit: bool,

    entities: BTreeMap<Role, String>,
    chips: BTreeMap<ChipKind, Vec<String>>,

    // Options this crate doesn't know, written back untouched
    extras: Map<String, Value>,
}

impl Role {
    pub const ALL: [Role; 30] = [
        Role::CvMode,
        Role::VvMode,
        Role::CvNight,
        Role::VvSchedule,
        Role::AuxHeating,
        Role::VvSetpoint,
        Role::CurveShift,
        Role::CurveSetMinus12,
        Role::CurveSetPlus12,
        Role::CvMin,
        Role::CvMax,
        Role::OutdoorTemp,
        Role::CurveTemp,
        Role::StorageTankCv,
        Role::StorageTankVv,
        Role::EvaporatorTemp,
        Role::HpTemp,
        Role::LpTemp,
        Role::CvForwardTemp,
        Role::CvReturnTemp,
        Role::Em23Power,
        Role::Em23Energy,
        Role::InstallDate,
        Role::ServiceDate,
        Role::CompHours,
        Role::VvHours,
        Role::HeatingHours,
        Role::CompIcon,
        Role::CvPumpIcon,
        Role::DefrostIcon,
    ];

    // Configuration key of the role
    pub fn key(self) -> &'static str {
        match self {
            Role::CvMode => "cv_mode",
            Role::VvMode => "vv_mode",
            Role::CvNight => "cv_night",
            Role::VvSchedule => "vv_schedule",
            Role::AuxHeating => "aux_heating",
            Role::VvSetpoint => "vv_setpoint",
            Role::CurveShift => "cv_curve_number",
            Role::CurveSetMinus12 => "curve_set_minus12_number",
            Role::CurveSetPlus12 => "curve_set_plus12_number",
            Role::CvMin => "cv_min_number",
            Role::CvMax => "cv_max_number",
            Role::OutdoorTemp => "outdoor_temp",
            Role::CurveTemp => "curve_temp",
            Role::StorageTankCv => "storage_tank_cv",
            Role::StorageTankVv => "storage_tank_vv",
            Role::EvaporatorTemp => "evaporator_temp",
            Role::HpTemp => "hp_temp",
            Role::LpTemp => "lp_temp",
            Role::CvForwardTemp => "cv_forward_temp",
            Role::CvReturnTemp => "cv_return_temp",
            Role::Em23Power => "em23_power",
            Role::Em23Energy => "em23_energy",
            Role::InstallDate => "install_date",
            Role::ServiceDate => "service_date",
            Role::CompHours => "comp_hours",
            Role::VvHours => "vv_hours",
            Role::HeatingHours => "heating_hours",
            Role::CompIcon => "comp_icon",
            Role::CvPumpIcon => "cv_pump_icon",
            Role::DefrostIcon => "defrost_icon",
        }
    }

    pub fn from_key(key: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|role| role.key() == key)
    }
}

impl ChipKind {
    pub const ALL: [ChipKind; 4] = [ChipKind::Info, ChipKind::Cv, ChipKind::Vv, ChipKind::Aux];

    pub fn key(self) -> &'static str {
        match self {
            ChipKind::Info => "info_entities",
            ChipKind::Cv => "cv_entities",
            ChipKind::Vv => "vv_entities",
            ChipKind::Aux => "aux_entities",
        }
    }

    // Popup title
    pub fn title(self) -> &'static str {
        match self {
            ChipKind::Info => "Information",
            ChipKind::Cv => "Centralvarme",
            ChipKind::Vv => "Varmtvandstemperatur",
            ChipKind::Aux => "El-patron / AUX",
        }
    }

    pub fn from_key(key: &str) -> Option<ChipKind> {
        ChipKind::ALL.into_iter().find(|chip| chip.key() == key)
    }
}

impl CardConfig {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            ..Default::default()
        }
    }

    // Load a card configuration from a Json file
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Parsing card config at: {:?}", path);

        let file = File::open(path).map_err(|source| CardError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config_json: Value = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| CardError::Json {
                what: "card config",
                source,
            })?;

        Self::from_json(config_json)
    }

    // Entries that don't fit their option are logged and skipped
    pub fn from_json(config_json: Value) -> Result<Self> {
        let Value::Object(options) = config_json else {
            return Err(CardError::NotAnObject);
        };

        let mut config = CardConfig::default();

        for (key, value) in options {
            if let Err(err) = config.parse_option(&key, value) {
                warn!("Failed to parse card option \"{key}\": {err}");
            }
        }

        trace!("Card config: {:?}", config);

        Ok(config)
    }

    fn parse_option(&mut self, key: &str, value: Value) -> serde_json::Result<()> {
        match key {
            TYPE_JSON => self.card_type = non_empty(serde_json::from_value(value)?),
            DEVICE_ID_JSON => self.device_id = non_empty(serde_json::from_value(value)?),
            TITLE_JSON => self.title = non_empty(serde_json::from_value(value)?),
            VARIANT_JSON => self.variant = serde_json::from_value(value)?,
            SHOW_TEMP_UNIT_JSON => {
                self.show_temp_unit = serde_json::from_value::<Option<bool>>(value)?.unwrap_or(false)
            }
            _ => {
                if let Some(role) = Role::from_key(key) {
                    let entity: Option<String> = serde_json::from_value(value)?;
                    self.set_entity(role, entity);
                } else if let Some(chip) = ChipKind::from_key(key) {
                    let entities: Option<Vec<String>> = serde_json::from_value(value)?;
                    self.set_chip_entities(chip, entities.unwrap_or_default());
                } else {
                    trace!("Keeping unknown card option \"{key}\"");
                    self.extras.insert(key.to_string(), value);
                }
            }
        }

        Ok(())
    }

    // Serialize back to the card's Json object, unset entries are left out
    pub fn to_json(&self) -> Value {
        let mut options = self.extras.clone();

        if let Some(card_type) = &self.card_type {
            options.insert(TYPE_JSON.to_string(), Value::from(card_type.as_str()));
        }
        if let Some(device_id) = &self.device_id {
            options.insert(DEVICE_ID_JSON.to_string(), Value::from(device_id.as_str()));
        }
        if let Some(title) = &self.title {
            options.insert(TITLE_JSON.to_string(), Value::from(title.as_str()));
        }
        options.insert(VARIANT_JSON.to_string(), Value::from(self.variant.key()));
        options.insert(SHOW_TEMP_UNIT_JSON.to_string(), Value::from(self.show_temp_unit));

        for (role, entity) in self.entities.iter() {
            options.insert(role.key().to_string(), Value::from(entity.as_str()));
        }

        for (chip, entities) in self.chips.iter() {
            options.insert(chip.key().to_string(), Value::from(entities.clone()));
        }

        Value::Object(options)
    }

    pub fn entity(&self, role: Role) -> Option<&str> {
        self.entities.get(&role).map(String::as_str)
    }

    // Empty ids count as unset
    pub fn set_entity(&mut self, role: Role, entity: Option<String>) {
        match non_empty(entity) {
            Some(entity) => {
                self.entities.insert(role, entity);
            }
            None => {
                self.entities.remove(&role);
            }
        }
    }

    pub fn chip_entities(&self, chip: ChipKind) -> &[String] {
        self.chips.get(&chip).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set_chip_entities(&mut self, chip: ChipKind, entities: Vec<String>) {
        let entities: Vec<String> = entities.into_iter().filter(|e| !e.is_empty()).collect();

        if entities.is_empty() {
            self.chips.remove(&chip);
        } else {
            self.chips.insert(chip, entities);
        }
    }

    // Default wiring of a newly added card, the LV card starts empty
    pub fn stub(variant: Variant) -> Self {
        let mut config = CardConfig::new(variant);

        if variant == Variant::Lv {
            return config;
        }

        let stub_entities = [
            (Role::CvMode, "select.dvi_lv12_cv_mode"),
            (Role::VvMode, "select.dvi_lv12_vv_mode"),
            (Role::CvNight, "select.dvi_lv12_cv_night"),
            (Role::VvSchedule, "select.dvi_lv12_vv_schedule"),
            (Role::AuxHeating, "select.dvi_lv12_aux_heating"),
            (Role::VvSetpoint, "number.dvi_lv12_vv_setpoint"),
            (Role::CurveShift, "number.dvi_lv12_cv_curve"),
            (Role::CurveSetMinus12, "number.dvi_lv12_curve_set_12"),
            (Role::CurveSetPlus12, "number.dvi_lv12_curve_set_12_2"),
            (Role::CvMin, "number.dvi_lv12_cv_min"),
            (Role::CvMax, "number.dvi_lv12_cv_max"),
            (Role::OutdoorTemp, "sensor.dvi_lv12_outdoor"),
            (Role::CurveTemp, "sensor.dvi_lv12_curve_temp"),
            (Role::StorageTankCv, "sensor.dvi_lv12_storage_tank_cv"),
            (Role::StorageTankVv, "sensor.dvi_lv12_storage_tank_vv"),
            (Role::EvaporatorTemp, "sensor.dvi_lv12_evaporator"),
            (Role::HpTemp, "sensor.dvi_lv12_compressor_hp"),
            (Role::LpTemp, "sensor.dvi_lv12_compressor_lp"),
            (Role::CvForwardTemp, "sensor.dvi_lv12_cv_forward"),
            (Role::CvReturnTemp, "sensor.dvi_lv12_cv_return"),
            (Role::Em23Power, "sensor.dvi_lv12_em23_power"),
            (Role::Em23Energy, "sensor.dvi_lv12_em23_energy"),
            (Role::CompIcon, "binary_sensor.dvi_lv12_soft_starter_compressor"),
            (Role::CvPumpIcon, "binary_sensor.dvi_lv12_circ_pump_cv"),
            (Role::DefrostIcon, "binary_sensor.dvi_lv12_4_way_valve_defrost"),
        ];

        for (role, entity) in stub_entities {
            config.set_entity(role, Some(entity.to_string()));
        }

        let stub_chips = [
            (
                ChipKind::Info,
                vec![
                    "sensor.dvi_lv12_em23_energy",
                    "sensor.dvi_lv12_comp_hours",
                    "sensor.dvi_lv12_vv_hours",
                    "sensor.dvi_lv12_heating_hours",
                ],
            ),
            (
                ChipKind::Cv,
                vec![
                    "select.dvi_lv12_cv_mode",
                    "number.dvi_lv12_cv_curve",
                    "select.dvi_lv12_aux_heating",
                    "select.dvi_lv12_cv_night",
                ],
            ),
            (
                ChipKind::Vv,
                vec![
                    "number.dvi_lv12_vv_setpoint",
                    "select.dvi_lv12_vv_mode",
                    "select.dvi_lv12_vv_schedule",
                ],
            ),
            (
                ChipKind::Aux,
                vec!["select.dvi_lv12_aux_heating", "sensor.dvi_lv12_heating_hours"],
            ),
        ];

        for (chip, entities) in stub_chips {
            config.set_chip_entities(chip, entities.into_iter().map(String::from).collect());
        }

        config
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
