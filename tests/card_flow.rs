use std::path::{Path, PathBuf};

use dvi_cards::{
    card_config::{CardConfig, ChipKind, Role},
    controls, diagram,
    discovery::{self, EntityRegistry},
    entity_state::{EntityState, StateSnapshot},
    errors::CardError,
    heat_curve_view,
    layout::{LabelKey, Variant},
};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load() -> (CardConfig, StateSnapshot) {
    let config = CardConfig::load(&fixture("card.json")).unwrap();
    let states = StateSnapshot::load(&fixture("states.json")).unwrap();

    (config, states)
}

#[test]
fn curve_from_snapshot() {
    let (config, states) = load();

    let view = heat_curve_view::build(&config, &states);
    let series = view.series.unwrap();

    // cv_min is unavailable and falls back to 20, cv_max is 50
    assert_eq!(series.curve_values[0], 50.);
    assert!(series.curve_values.iter().all(|v| (20. ..=50.).contains(v)));
    assert!((series.curve_values[17] - 37.5).abs() < 1e-9);

    let point = series.observed_point.unwrap();
    assert_eq!(point.outdoor_temp, -3);
    assert_eq!(point.value, 38.2);

    let observed = view.observed_data.unwrap();
    assert_eq!(observed.len(), series.domain.len());
    assert_eq!(observed[17], Some(38.2));
    assert_eq!(observed.iter().flatten().count(), 1);

    assert_eq!(view.controls.len(), 5);
}

#[test]
fn stale_update_keeps_previous_plot() {
    let (config, mut states) = load();

    let previous = heat_curve_view::evaluate(&config, &states);
    assert!(previous.is_some());

    states.insert("sensor.dvi_lv12_curve_temp", EntityState::new("unknown"));

    assert_eq!(heat_curve_view::evaluate(&config, &states), None);
}

#[test]
fn diagram_and_controls_from_snapshot() {
    let (config, states) = load();

    let view = diagram::build(&config, &states);

    let outdoor = view
        .labels
        .iter()
        .find(|label| label.key == LabelKey::Outdoor)
        .unwrap();
    assert_eq!(outdoor.text, "-3.5 °C");
    assert_eq!(view.header, Variant::Lv12.layout().header);
    assert_eq!(view.mode_chips.len(), 2);

    let inc = controls::button("vv_set_inc").unwrap();
    let call = controls::press(&config, &states, inc).unwrap();
    assert_eq!(call.data["value"], serde_json::json!(51.0));

    let popup = controls::popup(&config, ChipKind::Vv).unwrap();
    assert_eq!(popup.data["title"], "Varmtvandstemperatur");
}

#[test]
fn autofill_from_registry() {
    let (_, states) = load();
    let registry = EntityRegistry::load(&fixture("registry.json")).unwrap();

    let filled = discovery::autofill(&CardConfig::new(Variant::Lv), &states, &registry, "dvi-lv12");

    assert_eq!(filled.entity(Role::CurveSetMinus12), Some("number.dvi_lv12_curve_set_12"));
    assert_eq!(filled.entity(Role::CurveSetPlus12), Some("number.dvi_lv12_curve_set_12_2"));
    assert_eq!(filled.entity(Role::CvPumpIcon), Some("binary_sensor.dvi_lv12_circ_pump_cv"));
    assert_eq!(filled.chip_entities(ChipKind::Cv), ["select.dvi_lv12_cv_mode", "number.dvi_lv12_cv_curve"]);
    assert!(filled.chip_entities(ChipKind::Info).is_empty());

    let (config, _) = load();

    // Host still knows which card to load
    let refilled = discovery::autofill(&config, &states, &registry, "dvi-lv12").to_json();
    assert_eq!(refilled["type"], "custom:lv12-heatpump-card");
    assert_eq!(refilled["variant"], "lv12");
    assert_eq!(refilled["show_temp_unit"], true);

    // Auto-filled card draws the same curve as the hand written one
    assert_eq!(
        heat_curve_view::evaluate(&filled, &states),
        heat_curve_view::evaluate(&config, &states)
    );
}

#[test]
fn missing_file_is_reported() {
    let err = CardConfig::load(&fixture("nope.json")).unwrap_err();

    assert!(matches!(err, CardError::Io { .. }));
}
