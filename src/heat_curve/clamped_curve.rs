use crate::heat_curve::HeatCurve;

pub const DEFAULT_MIN: f64 = 20.;
pub const DEFAULT_MAX: f64 = 55.;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampedCurve<T: HeatCurve> {
    curve: T,

    // Lower rail, values below are flattened to it
    min: f64,

    // Upper rail, values above are flattened to it
    max: f64,
}

impl<T: HeatCurve> ClampedCurve<T> {
    // Wrap an existing curve between the given rails.
    // Missing or non finite rails fall back to the defaults.
    pub fn new(curve: T, min: Option<f64>, max: Option<f64>) -> ClampedCurve<T> {
        Self {
            curve,

            min: min.filter(|v| v.is_finite()).unwrap_or(DEFAULT_MIN),
            max: max.filter(|v| v.is_finite()).unwrap_or(DEFAULT_MAX),
        }
    }

    pub fn rails(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

impl<T: HeatCurve> HeatCurve for ClampedCurve<T> {
    fn supply_temp(&self, outdoor_temp: f64) -> f64 {
        let value = self.curve.supply_temp(outdoor_temp);

        // f64::clamp panics on swapped rails, the lower rail wins instead
        self.min.max(self.max.min(value))
    }
}
