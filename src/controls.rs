use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, trace};

use crate::{
    card_config::{CardConfig, ChipKind, Role},
    entity_state::StateSnapshot,
};

const INPUT_NUMBER_DOMAIN: &str = "input_number";
const NUMBER_DOMAIN: &str = "number";

// Host service invocation produced by a button press
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceCall {
    pub domain: &'static str,
    pub service: &'static str,
    pub data: Value,
}

// Event asking the host to open its own dialog
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum HostEvent {
    #[serde(rename = "hass-more-info")]
    MoreInfo { entity_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ButtonAction {
    SelectOption(&'static str),
    Nudge(f64),
}

// A control button of the card and what it does
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Button {
    pub id: &'static str,
    pub role: Role,
    pub action: ButtonAction,
}

const fn select(id: &'static str, role: Role, option: &'static str) -> Button {
    Button {
        id,
        role,
        action: ButtonAction::SelectOption(option),
    }
}

pub const BUTTONS: &[Button] = &[
    select("cv_on", Role::CvMode, "On"),
    select("cv_off", Role::CvMode, "Off"),
    select("vv_on", Role::VvMode, "On"),
    select("vv_off", Role::VvMode, "Off"),
    select("cv_night_timer", Role::CvNight, "Timer"),
    select("cv_night_day", Role::CvNight, "Constant day"),
    select("cv_night_night", Role::CvNight, "Constant night"),
    select("aux_off", Role::AuxHeating, "Off"),
    select("aux_auto", Role::AuxHeating, "Automatic"),
    select("aux_on", Role::AuxHeating, "On"),
    Button {
        id: "vv_set_dec",
        role: Role::VvSetpoint,
        action: ButtonAction::Nudge(-1.),
    },
    Button {
        id: "vv_set_inc",
        role: Role::VvSetpoint,
        action: ButtonAction::Nudge(1.),
    },
];

pub fn button(id: &str) -> Option<&'static Button> {
    BUTTONS.iter().find(|button| button.id == id)
}

// Buttons whose entity is wired in the card
pub fn available_buttons(config: &CardConfig) -> Vec<&'static Button> {
    BUTTONS
        .iter()
        .filter(|button| config.entity(button.role).is_some())
        .collect()
}

pub fn press(config: &CardConfig, states: &StateSnapshot, button: &Button) -> Option<ServiceCall> {
    let entity = config.entity(button.role)?;

    let call = match button.action {
        ButtonAction::SelectOption(option) => select_option(entity, option),
        ButtonAction::Nudge(delta) => nudge(states, entity, delta)?,
    };

    trace!("Button \"{}\": {:?}", button.id, call);

    Some(call)
}

pub fn select_option(entity_id: &str, option: &str) -> ServiceCall {
    ServiceCall {
        domain: "select",
        service: "select_option",
        data: json!({ "entity_id": entity_id, "option": option }),
    }
}

// Move a number entity by delta, nothing is sent without a numeric current value
pub fn nudge(states: &StateSnapshot, entity_id: &str, delta: f64) -> Option<ServiceCall> {
    let Some(current) = states.number(Some(entity_id)) else {
        debug!("Not nudging \"{entity_id}\", current value is unavailable");
        return None;
    };

    let domain = if entity_id.split('.').next() == Some(INPUT_NUMBER_DOMAIN) {
        INPUT_NUMBER_DOMAIN
    } else {
        NUMBER_DOMAIN
    };

    Some(ServiceCall {
        domain,
        service: "set_value",
        data: json!({ "entity_id": entity_id, "value": current + delta }),
    })
}

pub fn popup(config: &CardConfig, chip: ChipKind) -> Option<ServiceCall> {
    let entities = config.chip_entities(chip);

    if entities.is_empty() {
        return None;
    }

    Some(ServiceCall {
        domain: "browser_mod",
        service: "popup",
        data: json!({
            "title": chip.title(),
            "content": {
                "type": "entities",
                "entities": entities,
            },
        }),
    })
}

pub fn more_info(entity_id: Option<&str>) -> Option<HostEvent> {
    entity_id.map(|entity_id| HostEvent::MoreInfo {
        entity_id: entity_id.to_string(),
    })
}
