use crate::heat_curve::HeatCurve;

// Outdoor temperatures at which the installer sets the supply temperature
pub const LOW_ANCHOR: f64 = -12.;
pub const HIGH_ANCHOR: f64 = 12.;

// Curve shift value that leaves the anchors untouched
pub const NEUTRAL_SHIFT: f64 = 10.;

// Two point weather compensation curve.
// The line goes through both anchors and is extrapolated beyond them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearCurve {
    low_setpoint: f64,
    slope: f64,
}

impl LinearCurve {
    // Create a curve from the setpoints at -12°C and +12°C,
    // moved up or down by the curve shift
    pub fn new(setpoint_minus12: f64, setpoint_plus12: f64, curve_shift: f64) -> LinearCurve {
        let shift = curve_shift - NEUTRAL_SHIFT;

        let adj_minus12 = setpoint_minus12 + shift;
        let adj_plus12 = setpoint_plus12 + shift;

        LinearCurve {
            low_setpoint: adj_minus12,
            slope: (adj_plus12 - adj_minus12) / (HIGH_ANCHOR - LOW_ANCHOR),
        }
    }
}

impl HeatCurve for LinearCurve {
    fn supply_temp(&self, outdoor_temp: f64) -> f64 {
        self.low_setpoint + self.slope * (outdoor_temp - LOW_ANCHOR)
    }
}
