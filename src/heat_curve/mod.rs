pub mod clamped_curve;
pub mod linear_curve;

use serde::Serialize;
use tracing::{debug, trace};

use crate::heat_curve::{clamped_curve::ClampedCurve, linear_curve::LinearCurve};

// Outdoor temperature domain of the plot, both ends included
pub const DOMAIN_START: i32 = -20;
pub const DOMAIN_END: i32 = 32;
pub const DOMAIN_LEN: usize = (DOMAIN_END - DOMAIN_START + 1) as usize;

pub trait HeatCurve {
    // Return the target supply temperature for the given outdoor temperature
    fn supply_temp(&self, outdoor_temp: f64) -> f64;
}

// Readings feeding the curve, NaN marks a missing required one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveInputs {
    pub curve_shift: f64,
    pub setpoint_minus12: f64,
    pub setpoint_plus12: f64,
    pub outdoor_temp: f64,
    pub measured_curve_temp: f64,

    pub clamp_min: Option<f64>,
    pub clamp_max: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObservedPoint {
    // Position in the domain and the rounded outdoor temperature it stands for
    pub index: usize,
    pub outdoor_temp: i32,

    // Raw sensor reading, never clamped
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveSeries {
    pub domain: Vec<i32>,
    pub curve_values: Vec<f64>,
    pub observed_point: Option<ObservedPoint>,
}

impl CurveInputs {
    // Name of the first required reading that isn't a finite number
    fn first_invalid(&self) -> Option<&'static str> {
        [
            ("curve shift", self.curve_shift),
            ("setpoint at -12°C", self.setpoint_minus12),
            ("setpoint at +12°C", self.setpoint_plus12),
            ("outdoor temperature", self.outdoor_temp),
            ("measured curve temperature", self.measured_curve_temp),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(name, _)| name)
    }
}

impl CurveSeries {
    // None everywhere except at the observed index
    pub fn observed_dataset(&self) -> Vec<Option<f64>> {
        let mut data = vec![None; self.domain.len()];

        if let Some(point) = self.observed_point {
            data[point.index] = Some(point.value);
        }

        data
    }
}

pub fn domain() -> Vec<i32> {
    (DOMAIN_START..=DOMAIN_END).collect()
}

// 7.5 -> 8 and -2.5 -> -2
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

// None when any required reading is not a finite number, keep the last plot then
pub fn compute(inputs: &CurveInputs) -> Option<CurveSeries> {
    if let Some(name) = inputs.first_invalid() {
        debug!("Skipping heat curve update, {name} is unavailable");
        return None;
    }

    let curve = ClampedCurve::new(
        LinearCurve::new(
            inputs.setpoint_minus12,
            inputs.setpoint_plus12,
            inputs.curve_shift,
        ),
        inputs.clamp_min,
        inputs.clamp_max,
    );

    let domain = domain();
    let curve_values: Vec<f64> = domain
        .iter()
        .map(|&t| curve.supply_temp(t as f64))
        .collect();

    let observed_point = observed_point(inputs.outdoor_temp, inputs.measured_curve_temp);

    trace!(
        "Heat curve: rails {:?} - observed {:?}",
        curve.rails(),
        observed_point
    );

    Some(CurveSeries {
        domain,
        curve_values,
        observed_point,
    })
}

// Place the measured value at the domain sample nearest to the outdoor temperature
fn observed_point(outdoor_temp: f64, measured: f64) -> Option<ObservedPoint> {
    let rounded = round_half_up(outdoor_temp);

    if rounded < DOMAIN_START as f64 || rounded > DOMAIN_END as f64 {
        debug!("Outdoor temperature {outdoor_temp} is outside the plotted domain");
        return None;
    }

    let outdoor_temp = rounded as i32;

    Some(ObservedPoint {
        index: (outdoor_temp - DOMAIN_START) as usize,
        outdoor_temp,
        value: measured,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> CurveInputs {
        CurveInputs {
            curve_shift: 10.,
            setpoint_minus12: 45.,
            setpoint_plus12: 25.,
            outdoor_temp: 0.,
            measured_curve_temp: 35.,
            clamp_min: Some(20.),
            clamp_max: Some(55.),
        }
    }

    fn value_at(series: &CurveSeries, t: i32) -> f64 {
        series.curve_values[(t - DOMAIN_START) as usize]
    }

    #[test]
    fn reference_scenario() {
        let series = compute(&inputs()).unwrap();

        assert!((value_at(&series, 0) - 35.).abs() < 1e-9);

        let point = series.observed_point.unwrap();
        assert_eq!(point.outdoor_temp, 0);
        assert_eq!(point.index, 20);
        assert_eq!(point.value, 35.);
    }

    #[test]
    fn domain_has_53_points() {
        let series = compute(&inputs()).unwrap();

        assert_eq!(series.domain.len(), 53);
        assert_eq!(series.curve_values.len(), 53);
        assert_eq!(series.domain.first(), Some(&-20));
        assert_eq!(series.domain.last(), Some(&32));
        assert!(series.domain.windows(2).all(|w| w[1] == w[0] + 1));
    }

    #[test]
    fn values_stay_between_rails() {
        let mut steep = inputs();
        steep.setpoint_minus12 = 70.;
        steep.setpoint_plus12 = 5.;
        steep.clamp_min = None;
        steep.clamp_max = None;

        let series = compute(&steep).unwrap();

        assert!(series.curve_values.iter().all(|v| (20. ..=55.).contains(v)));
        assert_eq!(value_at(&series, -20), 55.);
        assert_eq!(value_at(&series, 32), 20.);
    }

    #[test]
    fn anchors_are_reproduced() {
        let mut shifted = inputs();
        shifted.curve_shift = 12.;

        let series = compute(&shifted).unwrap();

        assert!((value_at(&series, -12) - 47.).abs() < 1e-9);
        assert!((value_at(&series, 12) - 27.).abs() < 1e-9);
    }

    #[test]
    fn anchors_are_clamped() {
        let mut high = inputs();
        high.setpoint_minus12 = 60.;

        let series = compute(&high).unwrap();

        assert_eq!(value_at(&series, -12), 55.);
    }

    #[test]
    fn rising_setpoints_give_non_decreasing_curve() {
        let mut rising = inputs();
        rising.setpoint_minus12 = 25.;
        rising.setpoint_plus12 = 45.;

        let series = compute(&rising).unwrap();

        assert!(series.curve_values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        assert_eq!(compute(&inputs()), compute(&inputs()));
    }

    #[test]
    fn any_missing_reading_gives_no_result() {
        let setters: [fn(&mut CurveInputs); 5] = [
            |i| i.curve_shift = f64::NAN,
            |i| i.setpoint_minus12 = f64::NAN,
            |i| i.setpoint_plus12 = f64::NAN,
            |i| i.outdoor_temp = f64::NAN,
            |i| i.measured_curve_temp = f64::INFINITY,
        ];

        for set in setters {
            let mut broken = inputs();
            set(&mut broken);

            assert_eq!(compute(&broken), None);
        }
    }

    #[test]
    fn missing_rails_are_not_fatal() {
        let mut no_rails = inputs();
        no_rails.clamp_min = None;
        no_rails.clamp_max = Some(f64::NAN);

        assert!(compute(&no_rails).is_some());
    }

    #[test]
    fn observed_point_uses_nearest_sample() {
        let mut observed = inputs();
        observed.outdoor_temp = 7.6;
        observed.measured_curve_temp = 80.;

        let series = compute(&observed).unwrap();
        let point = series.observed_point.unwrap();

        assert_eq!(point.outdoor_temp, 8);
        assert_eq!(point.index, 28);
        // Outside the rails but shown as measured
        assert_eq!(point.value, 80.);

        let dataset = series.observed_dataset();
        assert_eq!(dataset.len(), 53);
        assert_eq!(dataset[28], Some(80.));
        assert_eq!(dataset.iter().filter(|v| v.is_some()).count(), 1);
    }

    #[test]
    fn half_values_round_up() {
        assert_eq!(round_half_up(7.5), 8.);
        assert_eq!(round_half_up(-2.5), -2.);
        assert_eq!(round_half_up(-2.6), -3.);
    }

    #[test]
    fn outdoor_outside_domain_omits_marker() {
        for outdoor in [-20.6, 32.5, 40.] {
            let mut cold = inputs();
            cold.outdoor_temp = outdoor;

            let series = compute(&cold).unwrap();

            assert_eq!(series.observed_point, None);
            assert_eq!(series.curve_values.len(), 53);
        }

        let mut edge = inputs();
        edge.outdoor_temp = -20.5;
        assert_eq!(compute(&edge).unwrap().observed_point.unwrap().index, 0);
    }
}
