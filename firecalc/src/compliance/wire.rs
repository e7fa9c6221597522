//! Conductor Resistance and Voltage Drop
//!
//! Uses uncoated solid copper DC resistance at 75°C (NEC Chapter 9, Table 8)
//! for the common fire-alarm gauges.
//!
//! Loop resistance covers the round trip: R = Ω/1000ft × (2 × L / 1000)
//! Voltage drop: VD% = I × R / V × 100

use crate::lenient::{non_negative, parse_awg};

/// Resistance used for gauges missing from the table, in Ω/1000ft.
/// Deliberately high (close to 20 AWG) so unknown wire never looks better than it is.
pub const UNKNOWN_GAUGE_OHMS_PER_1000FT: f64 = 10.0;

/// (AWG, Ω per 1000 ft)
const RESISTANCE_TABLE: &[(u32, f64)] = &[
    (26, 40.81),
    (24, 25.67),
    (22, 16.14),
    (20, 10.15),
    (18, 6.385),
    (16, 4.016),
    (14, 2.525),
    (12, 1.588),
    (10, 0.999),
    (8, 0.628),
];

/// DC resistance per 1000 ft for a gauge spelling ("18", "18AWG", "#14", ...).
///
/// Unknown or unparseable gauges return [`UNKNOWN_GAUGE_OHMS_PER_1000FT`].
pub fn ohms_per_1000ft(awg: &str) -> f64 {
    parse_awg(awg)
        .and_then(|g| {
            RESISTANCE_TABLE
                .iter()
                .find(|(gauge, _)| *gauge == g)
                .map(|(_, ohms)| *ohms)
        })
        .unwrap_or(UNKNOWN_GAUGE_OHMS_PER_1000FT)
}

/// Round-trip conductor resistance for a run of `length_ft`.
///
/// Negative or non-finite lengths are treated as 0.
pub fn loop_resistance_ohms(length_ft: f64, awg: &str) -> f64 {
    let length_ft = non_negative(length_ft);
    ohms_per_1000ft(awg) * (2.0 * length_ft / 1000.0)
}

/// Voltage drop as a percentage of the source voltage
///
/// # Arguments
/// * `length_ft` - One-way run length in feet
/// * `current_a` - Load current in Amperes
/// * `awg` - Conductor gauge
/// * `source_voltage` - Supply voltage; `<= 0` yields 0
///
/// # Returns
/// Percent of `source_voltage` lost in the conductors
pub fn voltage_drop_percent(length_ft: f64, current_a: f64, awg: &str, source_voltage: f64) -> f64 {
    if !source_voltage.is_finite() || source_voltage <= 0.0 {
        return 0.0;
    }
    let current_a = non_negative(current_a);
    let drop_v = (current_a * loop_resistance_ohms(length_ft, awg)).max(0.0);
    drop_v / source_voltage * 100.0
}
