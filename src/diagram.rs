use serde::Serialize;
use tracing::trace;

use crate::{
    card_config::{CardConfig, ChipKind, Role},
    controls::{self, HostEvent},
    entity_state::StateSnapshot,
    layout::{IconKey, LabelKey, Position},
};

pub const BASE_IMAGE: &str = "dvi.gif";
pub const CURVE_CAPTION: &str = "Kurvetemperatur";

const UNAVAILABLE: &str = "unavailable";

const CV_ACTIVE_COLOR: &str = "var(--state-climate-heat-color, var(--accent-color))";
const VV_ACTIVE_COLOR: &str = "var(--state-water-heater-heat-color, var(--accent-color))";
const AUX_ACTIVE_COLOR: &str = "var(--warning-color, #fdd835)";
const DISABLED_COLOR: &str = "var(--disabled-text-color)";
const DEFROST_ON_COLOR: &str = "orange";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub key: LabelKey,
    pub text: String,
    pub position: Position,

    // History dialog opened on click, None for static captions
    pub more_info: Option<HostEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IconGraphic {
    Image { src: &'static str },
    Mdi { icon: &'static str, color: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Icon {
    pub key: IconKey,
    pub graphic: IconGraphic,
    pub opacity: f64,
    pub position: Position,
    pub more_info: Option<HostEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeChip {
    pub kind: ChipKind,
    pub label: &'static str,
    pub icon: &'static str,
    pub icon_color: Option<&'static str>,
    pub active: bool,

    // Small icon next to the main one, the night or schedule mode
    pub mode_icon: Option<&'static str>,
    pub mode_icon_color: Option<&'static str>,

    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatCurveChip {
    pub icon: &'static str,
    pub label: &'static str,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramView {
    pub header: &'static str,
    pub base_image: &'static str,
    pub labels: Vec<Label>,
    pub icons: Vec<Icon>,
    pub mode_chips: Vec<ModeChip>,
    pub heat_curve_chip: HeatCurveChip,
}

// Active unless off or unavailable, in any case
pub fn is_mode_active(state: Option<&str>) -> bool {
    let state = state.unwrap_or(UNAVAILABLE).to_lowercase();

    state != "off" && state != UNAVAILABLE
}

pub fn cv_night_icon(state: Option<&str>) -> Option<&'static str> {
    match state? {
        "Timer" => Some("mdi:clock-outline"),
        "Constant day" => Some("mdi:weather-sunny"),
        "Constant night" => Some("mdi:weather-night"),
        _ => None,
    }
}

pub fn vv_schedule_icon(state: Option<&str>) -> Option<&'static str> {
    match state? {
        "Timer" => Some("mdi:clock-outline"),
        "Constant on" => Some("mdi:toggle-switch"),
        "Constant off" => Some("mdi:toggle-switch-off-outline"),
        _ => None,
    }
}

fn on_opacity(state: Option<&str>, off: f64) -> f64 {
    if state == Some("on") { 1. } else { off }
}

fn active_color(active: bool, color: &'static str) -> &'static str {
    if active { color } else { DISABLED_COLOR }
}

// State text, with the unit appended when the card asks for it
fn value_text(config: &CardConfig, states: &StateSnapshot, role: Role) -> Option<String> {
    let entity = config.entity(role);
    let value = states.state(entity)?;

    match states.unit(entity) {
        Some(unit) if config.show_temp_unit => Some(format!("{value} {unit}")),
        _ => Some(value.to_string()),
    }
}

pub fn build(config: &CardConfig, states: &StateSnapshot) -> DiagramView {
    let layout = config.variant.layout();

    let labels = layout
        .labels
        .iter()
        .filter_map(|(key, position)| build_label(config, states, *key, *position))
        .collect();

    let icons = layout
        .icons
        .iter()
        .filter_map(|(key, position)| build_icon(config, states, *key, *position))
        .collect();

    let mode_chips = ChipKind::ALL
        .into_iter()
        .filter(|chip| !config.chip_entities(*chip).is_empty())
        .map(|chip| build_chip(config, states, chip))
        .collect();

    let view = DiagramView {
        header: layout.header,
        base_image: BASE_IMAGE,
        labels,
        icons,
        mode_chips,
        heat_curve_chip: HeatCurveChip {
            icon: "mdi:chart-bell-curve-cumulative",
            label: "CV Curve",
            value: value_text(config, states, Role::CurveTemp),
        },
    };

    trace!(
        "Diagram: {} labels - {} icons - {} chips",
        view.labels.len(),
        view.icons.len(),
        view.mode_chips.len()
    );

    view
}

fn build_label(
    config: &CardConfig,
    states: &StateSnapshot,
    key: LabelKey,
    position: Position,
) -> Option<Label> {
    let Some(role) = key.role() else {
        return Some(Label {
            key,
            text: CURVE_CAPTION.to_string(),
            position,
            more_info: None,
        });
    };

    Some(Label {
        key,
        text: value_text(config, states, role)?,
        position,
        more_info: controls::more_info(config.entity(role)),
    })
}

fn build_icon(
    config: &CardConfig,
    states: &StateSnapshot,
    key: IconKey,
    position: Position,
) -> Option<Icon> {
    let entity = config.entity(key.role());
    let state = states.state(entity);

    let (graphic, opacity) = match key {
        IconKey::CvPump => (IconGraphic::Image { src: "CV_on.gif" }, on_opacity(state, 0.25)),
        IconKey::CvFlow => (IconGraphic::Image { src: "CVflow_on.gif" }, on_opacity(state, 0.25)),
        IconKey::HpLoop => (IconGraphic::Image { src: "HP_on.gif" }, on_opacity(state, 0.)),
        IconKey::CompUnit => (IconGraphic::Image { src: "COMP_on.gif" }, on_opacity(state, 0.)),
        IconKey::Defrost => {
            let color = if state? == "on" {
                DEFROST_ON_COLOR
            } else {
                DISABLED_COLOR
            };

            (IconGraphic::Mdi { icon: "mdi:snowflake-melt", color }, 1.)
        }
        IconKey::Aux => {
            // Only drawn while the heater isn't switched off
            if state? == "Off" {
                return None;
            }

            (
                IconGraphic::Mdi {
                    icon: "mdi:lightning-bolt-outline",
                    color: AUX_ACTIVE_COLOR,
                },
                1.,
            )
        }
    };

    Some(Icon {
        key,
        graphic,
        opacity,
        position,
        more_info: controls::more_info(entity),
    })
}

fn build_chip(config: &CardConfig, states: &StateSnapshot, kind: ChipKind) -> ModeChip {
    let state_of = move |role: Role| states.state(config.entity(role));

    match kind {
        ChipKind::Info => ModeChip {
            kind,
            label: "Info",
            icon: "mdi:information-slab-circle",
            icon_color: None,
            active: true,
            mode_icon: None,
            mode_icon_color: None,
            value: state_of(Role::Em23Power).map(|power| format!("{power} kW")),
        },
        ChipKind::Cv => {
            let active = is_mode_active(state_of(Role::CvMode));
            let color = active_color(active, CV_ACTIVE_COLOR);
            let mode_icon = cv_night_icon(state_of(Role::CvNight));

            ModeChip {
                kind,
                label: "CV",
                icon: "mdi:radiator",
                icon_color: Some(color),
                active,
                mode_icon,
                mode_icon_color: mode_icon.map(|_| color),
                value: None,
            }
        }
        ChipKind::Vv => {
            let active = is_mode_active(state_of(Role::VvMode));
            let color = active_color(active, VV_ACTIVE_COLOR);
            let mode_icon = vv_schedule_icon(state_of(Role::VvSchedule));

            ModeChip {
                kind,
                label: "VV",
                icon: "mdi:shower-head",
                icon_color: Some(color),
                active,
                mode_icon,
                mode_icon_color: mode_icon.map(|_| color),
                value: None,
            }
        }
        ChipKind::Aux => {
            let active = is_mode_active(state_of(Role::AuxHeating));

            ModeChip {
                kind,
                label: "AUX",
                icon: "mdi:lightning-bolt-outline",
                icon_color: Some(active_color(active, AUX_ACTIVE_COLOR)),
                active,
                mode_icon: None,
                mode_icon_color: None,
                value: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{entity_state::EntityState, layout::Variant};

    fn snapshot(entries: &[(&str, &str)]) -> StateSnapshot {
        let mut states = StateSnapshot::new();
        for (id, state) in entries {
            let entity: EntityState = serde_json::from_value(serde_json::json!({
                "state": state,
                "attributes": { "unit_of_measurement": "°C" }
            }))
            .unwrap();

            states.insert(id, entity);
        }
        states
    }

    fn label<'a>(view: &'a DiagramView, key: LabelKey) -> Option<&'a Label> {
        view.labels.iter().find(|l| l.key == key)
    }

    fn icon<'a>(view: &'a DiagramView, key: IconKey) -> Option<&'a Icon> {
        view.icons.iter().find(|i| i.key == key)
    }

    #[test]
    fn mode_activity() {
        assert!(is_mode_active(Some("On")));
        assert!(is_mode_active(Some("Automatic")));
        assert!(!is_mode_active(Some("Off")));
        assert!(!is_mode_active(Some("UNAVAILABLE")));
        assert!(!is_mode_active(None));
    }

    #[test]
    fn labels_follow_resolved_entities() {
        let config = CardConfig::stub(Variant::Lv12);
        let states = snapshot(&[("sensor.dvi_lv12_outdoor", "4.5")]);

        let view = build(&config, &states);

        let outdoor = label(&view, LabelKey::Outdoor).unwrap();
        assert_eq!(outdoor.text, "4.5");
        assert_eq!(
            outdoor.more_info,
            Some(HostEvent::MoreInfo {
                entity_id: "sensor.dvi_lv12_outdoor".to_string()
            })
        );
        assert_eq!(outdoor.position, Variant::Lv12.layout().labels[0].1);

        let caption = label(&view, LabelKey::CurveCaption).unwrap();
        assert_eq!(caption.text, CURVE_CAPTION);
        assert_eq!(caption.more_info, None);

        assert!(label(&view, LabelKey::Evap).is_none());
        assert_eq!(view.heat_curve_chip.value, None);
    }

    #[test]
    fn unit_is_shown_on_request() {
        let mut config = CardConfig::stub(Variant::Lv12);
        config.show_temp_unit = true;
        let states = snapshot(&[
            ("sensor.dvi_lv12_outdoor", "4.5"),
            ("sensor.dvi_lv12_curve_temp", "38"),
        ]);

        let view = build(&config, &states);

        assert_eq!(label(&view, LabelKey::Outdoor).unwrap().text, "4.5 °C");
        assert_eq!(view.heat_curve_chip.value.as_deref(), Some("38 °C"));
    }

    #[test]
    fn icons_reflect_binary_states() {
        let config = CardConfig::stub(Variant::Lv12);
        let states = snapshot(&[
            ("binary_sensor.dvi_lv12_circ_pump_cv", "on"),
            ("binary_sensor.dvi_lv12_soft_starter_compressor", "off"),
            ("binary_sensor.dvi_lv12_4_way_valve_defrost", "on"),
            ("select.dvi_lv12_aux_heating", "Off"),
        ]);

        let view = build(&config, &states);

        let pump = icon(&view, IconKey::CvPump).unwrap();
        assert_eq!(pump.opacity, 1.);
        assert_eq!(
            pump.more_info,
            Some(HostEvent::MoreInfo {
                entity_id: "binary_sensor.dvi_lv12_circ_pump_cv".to_string()
            })
        );
        assert_eq!(icon(&view, IconKey::CvFlow).unwrap().opacity, 1.);
        assert_eq!(icon(&view, IconKey::HpLoop).unwrap().opacity, 0.);
        assert_eq!(icon(&view, IconKey::CompUnit).unwrap().opacity, 0.);
        assert_eq!(
            icon(&view, IconKey::Defrost).unwrap().graphic,
            IconGraphic::Mdi {
                icon: "mdi:snowflake-melt",
                color: DEFROST_ON_COLOR
            }
        );
        assert!(icon(&view, IconKey::Aux).is_none());
    }

    #[test]
    fn missing_pump_state_dims_icons() {
        let config = CardConfig::stub(Variant::Lv12);
        let view = build(&config, &StateSnapshot::new());

        assert_eq!(icon(&view, IconKey::CvPump).unwrap().opacity, 0.25);
        assert!(icon(&view, IconKey::Defrost).is_none());
    }

    #[test]
    fn chips_carry_mode_state() {
        let config = CardConfig::stub(Variant::Lv12);
        let states = snapshot(&[
            ("select.dvi_lv12_cv_mode", "On"),
            ("select.dvi_lv12_cv_night", "Constant night"),
            ("select.dvi_lv12_vv_mode", "Off"),
            ("select.dvi_lv12_vv_schedule", "Timer"),
            ("sensor.dvi_lv12_em23_power", "1.2"),
        ]);

        let view = build(&config, &states);
        let chip = |kind: ChipKind| view.mode_chips.iter().find(|c| c.kind == kind).unwrap();

        assert_eq!(chip(ChipKind::Info).value.as_deref(), Some("1.2 kW"));

        let cv = chip(ChipKind::Cv);
        assert!(cv.active);
        assert_eq!(cv.icon_color, Some(CV_ACTIVE_COLOR));
        assert_eq!(cv.mode_icon, Some("mdi:weather-night"));

        let vv = chip(ChipKind::Vv);
        assert!(!vv.active);
        assert_eq!(vv.mode_icon, Some("mdi:clock-outline"));
        assert_eq!(vv.mode_icon_color, Some(DISABLED_COLOR));

        let aux = chip(ChipKind::Aux);
        assert!(!aux.active);
    }

    #[test]
    fn chips_without_entities_are_hidden() {
        let config = CardConfig::new(Variant::Lv);
        let view = build(&config, &StateSnapshot::new());

        assert!(view.mode_chips.is_empty());
        assert_eq!(view.header, "DVI LV Compact varmepumpe");
        assert_eq!(view.labels.len(), 1);
    }
}
