//! Device Current Resolver
//!
//! Produces a `(standby, alarm)` current estimate for any [`DeviceFields`]
//! record by walking the tiers in priority order. Each tier reports
//! match / no match / unreadable; only [`CurrentResolver`] decides to move on
//! to the next tier.

use std::borrow::Cow;
use std::sync::Arc;

use serde::Serialize;

use crate::devices::catalog::DeviceCatalog;
use crate::devices::schema::{Current, DeviceFields, FieldError};
use crate::lenient::non_negative;

/// Minimal initiating-device draw used when nothing else is known.
pub const DEFAULT_DEVICE_CURRENT: (f64, f64) = (0.004, 0.004);

/// Typical 24 VDC strobe alarm current by candela setting.
const CANDELA_CURRENT_A: &[(u32, f64)] = &[
    (15, 0.066),
    (30, 0.094),
    (75, 0.158),
    (95, 0.181),
    (110, 0.205),
    (135, 0.240),
    (185, 0.300),
];

struct KeywordRule {
    kind: &'static str,
    /// Every phrase must appear.
    all_of: &'static [&'static str],
    /// At least one phrase must appear (ignored when empty).
    any_of: &'static [&'static str],
    standby_a: f64,
    alarm_a: f64,
}

impl KeywordRule {
    fn matches(&self, text: &str) -> bool {
        self.all_of.iter().all(|p| text.contains(p))
            && (self.any_of.is_empty() || self.any_of.iter().any(|p| text.contains(p)))
    }
}

/// Checked in order; the combination appliance must come before its parts.
const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        kind: "horn-strobe",
        all_of: &["horn", "strobe"],
        any_of: &[],
        standby_a: 0.0,
        alarm_a: 0.115,
    },
    KeywordRule {
        kind: "strobe",
        all_of: &["strobe"],
        any_of: &[],
        standby_a: 0.0,
        alarm_a: 0.095,
    },
    KeywordRule {
        kind: "horn",
        all_of: &["horn"],
        any_of: &[],
        standby_a: 0.0,
        alarm_a: 0.030,
    },
    KeywordRule {
        kind: "speaker",
        all_of: &["speaker"],
        any_of: &[],
        standby_a: 0.0,
        alarm_a: 0.050,
    },
    KeywordRule {
        kind: "detector",
        all_of: &[],
        any_of: &["smoke", "heat", "detector"],
        standby_a: 0.0003,
        alarm_a: 0.0007,
    },
    KeywordRule {
        kind: "manual-station",
        all_of: &[],
        any_of: &["pull", "manual station", "call point"],
        standby_a: 0.0003,
        alarm_a: 0.0003,
    },
];

/// Which tier produced an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentSource {
    Explicit,
    Catalog,
    Candela,
    Keyword,
    Default,
}

/// Resolved currents in amps, both non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurrentEstimate {
    pub standby_a: f64,
    pub alarm_a: f64,
    pub source: CurrentSource,
}

impl CurrentEstimate {
    fn new(source: CurrentSource, (standby_a, alarm_a): (f64, f64)) -> Self {
        Self {
            standby_a: non_negative(standby_a),
            alarm_a: non_negative(alarm_a),
            source,
        }
    }

    pub fn fallback() -> Self {
        Self::new(CurrentSource::Default, DEFAULT_DEVICE_CURRENT)
    }

    pub fn pair(&self) -> (f64, f64) {
        (self.standby_a, self.alarm_a)
    }
}

type TierResult = Result<Option<(f64, f64)>, FieldError>;

fn explicit_tier<D: DeviceFields + ?Sized>(device: &D) -> TierResult {
    let standby = device.standby_current()?;
    let alarm = device.alarm_current()?;
    if standby.is_none() && alarm.is_none() {
        return Ok(None);
    }
    Ok(Some((
        standby.map(Current::as_amps).unwrap_or(0.0),
        alarm.map(Current::as_amps).unwrap_or(0.0),
    )))
}

fn catalog_tier<D: DeviceFields + ?Sized>(device: &D, catalog: &DeviceCatalog) -> TierResult {
    if catalog.is_empty() {
        return Ok(None);
    }
    let keys = [device.part_number(), device.model(), device.name()];
    Ok(keys
        .iter()
        .flatten()
        .find_map(|key| catalog.get(key))
        .map(|entry| (entry.standby_a, entry.alarm_a)))
}

fn candela_tier<D: DeviceFields + ?Sized>(device: &D) -> TierResult {
    let Some(candela) = device.candela()? else {
        return Ok(None);
    };
    let rounded = candela.round();
    if rounded <= 0.0 || (candela - rounded).abs() > 1e-6 {
        return Ok(None);
    }
    Ok(CANDELA_CURRENT_A
        .iter()
        .find(|(cd, _)| f64::from(*cd) == rounded)
        .map(|(_, alarm)| (0.0, *alarm)))
}

fn keyword_text<D: DeviceFields + ?Sized>(device: &D) -> String {
    [device.name(), device.part_number()]
        .into_iter()
        .flatten()
        .map(Cow::into_owned)
        .collect::<Vec<String>>()
        .join(" ")
        .to_lowercase()
}

fn keyword_tier<D: DeviceFields + ?Sized>(device: &D) -> TierResult {
    let text = keyword_text(device);
    if text.is_empty() {
        return Ok(None);
    }
    Ok(KEYWORD_RULES
        .iter()
        .find(|rule| rule.matches(&text))
        .map(|rule| {
            tracing::trace!("Keyword rule {} matched {:?}", rule.kind, text);
            (rule.standby_a, rule.alarm_a)
        }))
}

/// An unreadable tier is logged and treated as "no match".
fn settle(source: CurrentSource, result: TierResult) -> Option<CurrentEstimate> {
    match result {
        Ok(found) => found.map(|pair| CurrentEstimate::new(source, pair)),
        Err(e) => {
            tracing::debug!("{:?} tier skipped: {}", source, e);
            None
        }
    }
}

/// Walk tiers 1-4 in priority order.
fn first_signal<D: DeviceFields + ?Sized>(device: &D, catalog: &DeviceCatalog) -> Option<CurrentEstimate> {
    settle(CurrentSource::Explicit, explicit_tier(device))
        .or_else(|| settle(CurrentSource::Catalog, catalog_tier(device, catalog)))
        .or_else(|| settle(CurrentSource::Candela, candela_tier(device)))
        .or_else(|| settle(CurrentSource::Keyword, keyword_tier(device)))
}

/// Current resolver bound to an immutable device catalog.
#[derive(Debug, Clone)]
pub struct CurrentResolver {
    catalog: Arc<DeviceCatalog>,
}

impl Default for CurrentResolver {
    fn default() -> Self {
        Self::new(Arc::new(DeviceCatalog::empty()))
    }
}

impl CurrentResolver {
    pub fn new(catalog: Arc<DeviceCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &DeviceCatalog {
        &self.catalog
    }

    /// First tier that knows anything about the device, or `None`.
    pub fn resolve_signal<D: DeviceFields + ?Sized>(&self, device: &D) -> Option<CurrentEstimate> {
        first_signal(device, &self.catalog)
    }

    /// Estimate with the default draw as the last resort.
    pub fn resolve<D: DeviceFields + ?Sized>(&self, device: &D) -> CurrentEstimate {
        self.resolve_signal(device)
            .unwrap_or_else(CurrentEstimate::fallback)
    }
}

/// `(standby_a, alarm_a)` for one device against `catalog`.
pub fn resolve_device_current<D: DeviceFields + ?Sized>(
    device: &D,
    catalog: &DeviceCatalog,
) -> (f64, f64) {
    first_signal(device, catalog)
        .unwrap_or_else(CurrentEstimate::fallback)
        .pair()
}
