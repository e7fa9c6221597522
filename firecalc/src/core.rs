//! Core evaluation context shared by library callers and the CLI.
//! Owns the device catalog and evaluation options; holds no other state.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analyzer::evaluator::{self, CircuitEval};
use crate::analyzer::report::CircuitReport;
use crate::compliance::battery::DEFAULT_DERATE;
use crate::compliance::wirepath::{check_wirepath, WirepathFill};
use crate::devices::catalog::DeviceCatalog;
use crate::devices::resolver::CurrentResolver;
use crate::devices::schema::DeviceFields;
use crate::project::schema::{Panel, Project, WireSegment};

#[derive(Debug, thiserror::Error)]
pub enum CalcError {
    #[error(
        "unsupported conductor size {0} AWG for conduit fill (supported: 10, 12, 14, 16, 18, 20 AWG)"
    )]
    UnsupportedGauge(String),
    #[error(
        "unsupported conduit {kind} {trade_size} (supported: EMT 1/2, 3/4, 1, 1-1/4, 1-1/2)"
    )]
    UnsupportedConduit { kind: String, trade_size: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::Parse(e.to_string())
    }
}

/// Options for an evaluation run (CLI or embedding application).
///
/// `Default` reproduces the fixed 24 V / 24 h standby / 5 min alarm
/// duty cycle used by [`crate::summarize_panel_circuits`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationOptions {
    /// Nominal panel output voltage used for voltage-drop percentages.
    pub system_voltage: f64,
    pub standby_hours: f64,
    pub alarm_minutes: f64,
    /// Battery safety/temperature multiplier; values below 1.0 act as 1.0.
    pub battery_derate: f64,
    /// Display preference: wirepath labels show the bundle only.
    pub hide_conduit_fill: bool,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            system_voltage: evaluator::SYSTEM_VOLTAGE,
            standby_hours: evaluator::STANDBY_HOURS,
            alarm_minutes: evaluator::ALARM_MINUTES,
            battery_derate: DEFAULT_DERATE,
            hide_conduit_fill: false,
        }
    }
}

/// Evaluation context: an immutable device catalog plus options.
///
/// The catalog is loaded once at construction and shared read-only, so one
/// engine can serve evaluations from any number of threads.
#[derive(Debug, Clone)]
pub struct CircuitEngine {
    resolver: CurrentResolver,
    options: EvaluationOptions,
}

impl Default for CircuitEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CircuitEngine {
    /// Engine with an empty device catalog and default options.
    pub fn new() -> Self {
        Self::with_catalog(Arc::new(DeviceCatalog::empty()))
    }

    /// Engine whose catalog is read from a device-spec JSON file.
    /// A missing or malformed file yields an empty catalog.
    pub fn with_spec_file(path: &Path) -> Self {
        Self::with_catalog(Arc::new(DeviceCatalog::load(path)))
    }

    pub fn with_catalog(catalog: Arc<DeviceCatalog>) -> Self {
        Self {
            resolver: CurrentResolver::new(catalog),
            options: EvaluationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EvaluationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    pub fn resolver(&self) -> &CurrentResolver {
        &self.resolver
    }

    /// Evaluate every circuit of every main panel.
    pub fn evaluate<D: DeviceFields>(
        &self,
        panels: &[Panel<D>],
        wires: &[WireSegment],
    ) -> Vec<CircuitEval> {
        evaluator::evaluate_panels(&self.resolver, &self.options, panels, wires)
    }

    /// Label and fill-check one wirepath using the display preference.
    pub fn check_wirepath(
        &self,
        conduit_kind: &str,
        trade_size: &str,
        wires: &std::collections::BTreeMap<u32, i64>,
    ) -> Result<WirepathFill, CalcError> {
        check_wirepath(
            conduit_kind,
            trade_size,
            wires,
            self.options.hide_conduit_fill,
        )
    }

    /// Evaluate a loaded project: circuit rows plus every wirepath.
    ///
    /// Fails on the first wirepath with an unsupported conduit or gauge;
    /// circuit evaluation itself never fails.
    pub fn evaluate_project<D: DeviceFields>(
        &self,
        project: &Project<D>,
    ) -> Result<CircuitReport, CalcError> {
        let rows = self.evaluate(&project.panels, &project.wires);
        let wirepaths = project
            .wirepaths
            .iter()
            .map(|wp| {
                self.check_wirepath(&wp.conduit_kind, &wp.trade_size, &wp.wires)
                    .map_err(|e| {
                        tracing::warn!("Wirepath {:?} rejected: {}", wp.name, e);
                        e
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CircuitReport::new(rows, wirepaths))
    }
}
