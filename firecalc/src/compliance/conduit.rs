//! Conduit Fill Calculator
//!
//! Compares the summed cross-sectional area of the conductors in a conduit
//! against the conduit's internal area (NEC Chapter 9, Table 4) and the
//! allowed fill percentage (Table 1: 40% for more than two conductors).
//!
//! Unlike the voltage-drop math, nothing here falls back to a default:
//! an unknown gauge or conduit is reported to the caller, because a made-up
//! fill percentage would be a compliance defect.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use serde::Serialize;

use crate::core::CalcError;

/// Maximum fill for more than two conductors.
pub const DEFAULT_MAX_FILL_PCT: f64 = 40.0;

/// One conduit kind/trade-size pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConduitSpec {
    pub kind: &'static str,
    pub trade_size: &'static str,
    /// Total internal cross-sectional area (100%), in²
    pub internal_area_in2: f64,
    pub max_fill_pct: f64,
}

const CONDUIT_REGISTRY: &[ConduitSpec] = &[
    ConduitSpec {
        kind: "EMT",
        trade_size: "1/2",
        internal_area_in2: 0.304,
        max_fill_pct: DEFAULT_MAX_FILL_PCT,
    },
    ConduitSpec {
        kind: "EMT",
        trade_size: "3/4",
        internal_area_in2: 0.533,
        max_fill_pct: DEFAULT_MAX_FILL_PCT,
    },
    ConduitSpec {
        kind: "EMT",
        trade_size: "1",
        internal_area_in2: 0.864,
        max_fill_pct: DEFAULT_MAX_FILL_PCT,
    },
    ConduitSpec {
        kind: "EMT",
        trade_size: "1-1/4",
        internal_area_in2: 1.496,
        max_fill_pct: DEFAULT_MAX_FILL_PCT,
    },
    ConduitSpec {
        kind: "EMT",
        trade_size: "1-1/2",
        internal_area_in2: 2.036,
        max_fill_pct: DEFAULT_MAX_FILL_PCT,
    },
];

/// Bare solid conductor diameters in inches (NEC Chapter 9, Table 8).
const CONDUCTOR_DIAMETER_IN: &[(u32, f64)] = &[
    (20, 0.032),
    (18, 0.040),
    (16, 0.051),
    (14, 0.064),
    (12, 0.081),
    (10, 0.102),
];

/// Gauges supported by [`awg_area_in2`], thinnest first.
pub fn supported_gauges() -> Vec<u32> {
    CONDUCTOR_DIAMETER_IN.iter().map(|(awg, _)| *awg).collect()
}

/// Cross-sectional area of one conductor, in².
pub fn awg_area_in2(awg: u32) -> Result<f64, CalcError> {
    let diameter = CONDUCTOR_DIAMETER_IN
        .iter()
        .find(|(gauge, _)| *gauge == awg)
        .map(|(_, d)| *d)
        .ok_or_else(|| CalcError::UnsupportedGauge(awg.to_string()))?;

    Ok(PI * (diameter / 2.0).powi(2))
}

/// Canonical trade-size spelling: `1/2"`, `1/2 in` -> `1/2`; `1 1/4` -> `1-1/4`.
pub fn normalize_trade_size(raw: &str) -> String {
    let mut size = raw.trim().to_ascii_lowercase();
    for suffix in ["inches", "inch", "in", "\"", "\u{201d}", "\u{2033}"] {
        if let Some(rest) = size.strip_suffix(suffix) {
            size = rest.trim_end().to_string();
        }
    }
    size.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Look up a conduit by kind (case-insensitive) and trade size.
pub fn get_conduit_spec(kind: &str, trade_size: &str) -> Result<ConduitSpec, CalcError> {
    let kind_upper = kind.trim().to_ascii_uppercase();
    let size = normalize_trade_size(trade_size);

    CONDUIT_REGISTRY
        .iter()
        .find(|spec| spec.kind == kind_upper && spec.trade_size == size)
        .copied()
        .ok_or_else(|| CalcError::UnsupportedConduit {
            kind: kind.trim().to_string(),
            trade_size: trade_size.trim().to_string(),
        })
}

/// Fill percentage and pass/fail for a conduit carrying `wires` (AWG -> count).
///
/// Entries with a zero or negative count are ignored.
///
/// # Returns
/// `(fill_pct, fill_pct <= max_fill_pct)`
pub fn compute_fill_pct(
    kind: &str,
    trade_size: &str,
    wires: &BTreeMap<u32, i64>,
) -> Result<(f64, bool), CalcError> {
    let spec = get_conduit_spec(kind, trade_size)?;

    let mut total_area = 0.0;
    for (&awg, &count) in wires {
        if count <= 0 {
            continue;
        }
        total_area += awg_area_in2(awg)? * count as f64;
    }

    let fill_pct = total_area / spec.internal_area_in2 * 100.0;
    Ok((fill_pct, fill_pct <= spec.max_fill_pct))
}
