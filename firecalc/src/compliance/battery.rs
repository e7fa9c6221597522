//! Standby Battery Sizing
//!
//! Integrates a fixed duty cycle (standby period followed by a short alarm
//! burst) into amp-hours, then applies a derating multiplier for aging and
//! temperature.

use crate::lenient::non_negative;

/// Default derating multiplier applied to the raw amp-hour figure.
pub const DEFAULT_DERATE: f64 = 1.25;

/// Required battery capacity in amp-hours, rounded to 4 decimal places.
///
/// # Arguments
/// * `standby_hours` - Standby period
/// * `alarm_minutes` - Alarm period following standby
/// * `standby_current_a` - Total standby draw
/// * `alarm_current_a` - Total alarm draw
/// * `derate` - Safety multiplier; anything below 1.0 is raised to 1.0
///
/// Negative or non-finite inputs count as 0.
pub fn battery_capacity_ah(
    standby_hours: f64,
    alarm_minutes: f64,
    standby_current_a: f64,
    alarm_current_a: f64,
    derate: f64,
) -> f64 {
    let standby_ah = non_negative(standby_hours) * non_negative(standby_current_a);
    let alarm_ah = non_negative(alarm_minutes) / 60.0 * non_negative(alarm_current_a);
    let derate = if derate.is_finite() { derate.max(1.0) } else { 1.0 };

    round_to(derate * (standby_ah + alarm_ah), 4)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_duty_cycle() {
        // 24h × 0.1A + 5min × 0.6A = 2.45 Ah, × 1.25
        let ah = battery_capacity_ah(24.0, 5.0, 0.1, 0.6, 1.25);
        assert!((ah - 3.0625).abs() < 1e-9, "Ah: {}", ah);
    }

    #[test]
    fn test_derate_floor_is_one() {
        let raw = battery_capacity_ah(24.0, 5.0, 0.1, 0.6, 1.0);
        assert_eq!(battery_capacity_ah(24.0, 5.0, 0.1, 0.6, 0.5), raw);
        assert_eq!(battery_capacity_ah(24.0, 5.0, 0.1, 0.6, f64::NAN), raw);
        assert!((raw - 2.45).abs() < 1e-9);
    }

    #[test]
    fn test_negative_inputs_clamp() {
        assert_eq!(battery_capacity_ah(-24.0, -5.0, 0.1, 0.6, 1.25), 0.0);
        assert_eq!(battery_capacity_ah(24.0, 5.0, -0.1, -0.6, 1.25), 0.0);
    }

    #[test]
    fn test_rounded_to_four_places() {
        let ah = battery_capacity_ah(24.0, 5.0, 0.0123457, 0.0, 1.0);
        assert_eq!(ah, 0.2963);
    }
}
