use serde::Serialize;

use crate::{
    card_config::{CardConfig, Role},
    entity_state::StateSnapshot,
    heat_curve::{self, CurveInputs, CurveSeries, DOMAIN_END, DOMAIN_START},
};

pub const DEFAULT_TITLE: &str = "Kurvetemperatur";

// Entities offered as inline controls under the chart
const CONTROL_ROLES: [Role; 5] = [
    Role::CurveShift,
    Role::CurveSetMinus12,
    Role::CurveSetPlus12,
    Role::CvMin,
    Role::CvMax,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: &'static str,
    pub min: i32,
    pub max: i32,
    pub ticks: Option<Vec<i32>>,
}

// Static chart description, the plotting surface never changes it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub x: Axis,
    pub y: Axis,
    pub curve_label: &'static str,
    pub observed_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatCurveView {
    pub title: String,
    pub chart: ChartSpec,

    // None when a required reading is unavailable, keep the last plot then
    pub series: Option<CurveSeries>,

    // Marker dataset of the chart, one slot per domain point
    pub observed_data: Option<Vec<Option<f64>>>,
    pub controls: Vec<String>,
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self {
            x: Axis {
                title: "Outdoor Temp (°C)",
                min: DOMAIN_START,
                max: DOMAIN_END,
                ticks: None,
            },
            y: Axis {
                title: "CV Temp (°C)",
                min: 10,
                max: 80,
                ticks: Some((20..=60).step_by(10).collect()),
            },
            curve_label: "CV Temp Curve",
            observed_label: "Sensor Curve Temp",
        }
    }
}

// Unavailable required readings come back as NaN, unavailable rails as None
pub fn read_inputs(config: &CardConfig, states: &StateSnapshot) -> CurveInputs {
    let number = |role: Role| states.number(config.entity(role));
    let required = |role: Role| number(role).unwrap_or(f64::NAN);

    CurveInputs {
        curve_shift: required(Role::CurveShift),
        setpoint_minus12: required(Role::CurveSetMinus12),
        setpoint_plus12: required(Role::CurveSetPlus12),
        outdoor_temp: required(Role::OutdoorTemp),
        measured_curve_temp: required(Role::CurveTemp),

        clamp_min: number(Role::CvMin),
        clamp_max: number(Role::CvMax),
    }
}

pub fn evaluate(config: &CardConfig, states: &StateSnapshot) -> Option<CurveSeries> {
    heat_curve::compute(&read_inputs(config, states))
}

pub fn control_entities(config: &CardConfig) -> Vec<String> {
    CONTROL_ROLES
        .iter()
        .filter_map(|role| config.entity(*role))
        .map(str::to_string)
        .collect()
}

pub fn build(config: &CardConfig, states: &StateSnapshot) -> HeatCurveView {
    let series = evaluate(config, states);

    HeatCurveView {
        title: config
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        chart: ChartSpec::default(),
        observed_data: series.as_ref().map(CurveSeries::observed_dataset),
        series,
        controls: control_entities(config),
    }
}
