//! Wirepath labels for the drawing overlay.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::compliance::conduit::{compute_fill_pct, normalize_trade_size};
use crate::core::CalcError;

/// `"10x18AWG + 2x12AWG"`: thinnest wire (highest AWG) first, empty counts skipped.
pub fn format_bundle(wires: &BTreeMap<u32, i64>) -> String {
    wires
        .iter()
        .rev()
        .filter(|(_, count)| **count > 0)
        .map(|(awg, count)| format!("{}x{}AWG", count, awg))
        .collect::<Vec<_>>()
        .join(" + ")
}

/// Render the label for a conduit run.
///
/// Returns `Ok(None)` when the bundle is empty. With `hide_fill` the bundle
/// is returned alone and no fill lookup happens; otherwise the label reads
/// `3/4 EMT — 10x18AWG — 2.4% fill` and an unsupported conduit or gauge is
/// an error. The trade size is printed as the caller spelled it.
pub fn format_wirepath_label(
    conduit_kind: &str,
    trade_size: &str,
    wires: &BTreeMap<u32, i64>,
    hide_fill: bool,
) -> Result<Option<String>, CalcError> {
    let bundle = format_bundle(wires);
    if bundle.is_empty() {
        return Ok(None);
    }
    if hide_fill {
        return Ok(Some(bundle));
    }

    let (fill_pct, _) = compute_fill_pct(conduit_kind, trade_size, wires)?;
    Ok(Some(format!(
        "{} {} — {} — {:.1}% fill",
        trade_size.trim(),
        conduit_kind.trim().to_ascii_uppercase(),
        bundle,
        fill_pct
    )))
}

/// Label plus fill verdict for one wirepath.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WirepathFill {
    pub conduit_kind: String,
    pub trade_size: String,
    pub label: Option<String>,
    pub fill_pct: f64,
    pub compliant: bool,
}

/// Fill-check a wirepath and build its label.
///
/// The fill check always runs, so an unsupported configuration is reported
/// even when the label hides the percentage.
pub fn check_wirepath(
    conduit_kind: &str,
    trade_size: &str,
    wires: &BTreeMap<u32, i64>,
    hide_fill: bool,
) -> Result<WirepathFill, CalcError> {
    let (fill_pct, compliant) = compute_fill_pct(conduit_kind, trade_size, wires)?;
    let label = format_wirepath_label(conduit_kind, trade_size, wires, hide_fill)?;

    Ok(WirepathFill {
        conduit_kind: conduit_kind.trim().to_ascii_uppercase(),
        trade_size: normalize_trade_size(trade_size),
        label,
        fill_pct,
        compliant,
    })
}
