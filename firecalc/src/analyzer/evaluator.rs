//! Circuit Evaluator
//!
//! For every circuit on a main panel: sum device currents, take the alarm
//! total as the worst-case load, and compute voltage drop over the
//! aggregated wire run and the battery capacity for the standby/alarm duty
//! cycle.
//!
//! Status bands on voltage drop:
//! - PASS: drop <= 10%
//! - WARN: 10% < drop <= 15%
//! - FAIL: drop > 15%

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analyzer::wiring::{aggregate_wire_by_circuit, CircuitWiring};
use crate::compliance::battery::battery_capacity_ah;
use crate::compliance::wire::voltage_drop_percent;
use crate::core::EvaluationOptions;
use crate::devices::resolver::CurrentResolver;
use crate::devices::schema::DeviceFields;
use crate::project::schema::{Circuit, CircuitType, Panel, WireSegment};

/// Nominal fire-alarm system voltage.
pub const SYSTEM_VOLTAGE: f64 = 24.0;
pub const STANDBY_HOURS: f64 = 24.0;
pub const ALARM_MINUTES: f64 = 5.0;

pub const WARN_DROP_PCT: f64 = 10.0;
pub const FAIL_DROP_PCT: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CircuitStatus {
    Pass,
    Warn,
    Fail,
}

impl CircuitStatus {
    pub fn from_drop(drop_pct: f64) -> Self {
        if drop_pct <= WARN_DROP_PCT {
            CircuitStatus::Pass
        } else if drop_pct <= FAIL_DROP_PCT {
            CircuitStatus::Warn
        } else {
            CircuitStatus::Fail
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitStatus::Pass => "PASS",
            CircuitStatus::Warn => "WARN",
            CircuitStatus::Fail => "FAIL",
        }
    }
}

impl fmt::Display for CircuitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One evaluated circuit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircuitEval {
    pub panel: String,
    pub circuit_id: String,
    pub circuit_type: CircuitType,
    pub device_count: usize,
    pub length_ft: f64,
    pub gauge: String,
    /// Total alarm current, the worst case for voltage drop.
    pub current_a: f64,
    pub standby_current_a: f64,
    pub voltage_drop_pct: f64,
    pub battery_ah: f64,
    pub status: CircuitStatus,
}

/// Typical per-device draw for a circuit whose devices produced no current at all.
pub fn per_device_default(circuit_type: &CircuitType) -> (f64, f64) {
    match circuit_type {
        CircuitType::Nac => (0.0, 0.06),
        CircuitType::Power => (0.0, 0.0),
        CircuitType::Slc | CircuitType::Other(_) => (0.005, 0.005),
    }
}

/// Total (standby, alarm) current of a circuit.
///
/// Devices no resolver tier recognizes add nothing. Only when the whole
/// circuit sums to exactly (0, 0) is every device charged the circuit
/// type's per-device default.
pub fn sum_circuit_current<D: DeviceFields>(
    resolver: &CurrentResolver,
    circuit: &Circuit<D>,
) -> (f64, f64) {
    let mut standby = 0.0;
    let mut alarm = 0.0;
    for device in &circuit.devices {
        if let Some(estimate) = resolver.resolve_signal(device) {
            standby += estimate.standby_a;
            alarm += estimate.alarm_a;
        }
    }

    let count = circuit.devices.len();
    if count > 0 && standby == 0.0 && alarm == 0.0 {
        let (default_standby, default_alarm) = per_device_default(&circuit.circuit_type);
        return (default_standby * count as f64, default_alarm * count as f64);
    }
    (standby, alarm)
}

fn evaluate_circuit<D: DeviceFields>(
    resolver: &CurrentResolver,
    options: &EvaluationOptions,
    panel: &str,
    circuit_id: &str,
    circuit: &Circuit<D>,
    wiring: &CircuitWiring,
) -> CircuitEval {
    let (standby_a, alarm_a) = sum_circuit_current(resolver, circuit);
    let drop = voltage_drop_percent(wiring.length_ft, alarm_a, &wiring.gauge, options.system_voltage);
    let battery_ah = battery_capacity_ah(
        options.standby_hours,
        options.alarm_minutes,
        standby_a,
        alarm_a,
        options.battery_derate,
    );
    let status = CircuitStatus::from_drop(drop);

    tracing::debug!(
        "{}/{}: {} devices, {:.1} ft @ {} AWG, {:.3} A, VD {:.2}% -> {}",
        panel,
        circuit_id,
        circuit.devices.len(),
        wiring.length_ft,
        wiring.gauge,
        alarm_a,
        drop,
        status
    );

    CircuitEval {
        panel: panel.to_string(),
        circuit_id: circuit_id.to_string(),
        circuit_type: circuit.circuit_type.clone(),
        device_count: circuit.devices.len(),
        length_ft: wiring.length_ft,
        gauge: wiring.gauge.clone(),
        current_a: alarm_a,
        standby_current_a: standby_a,
        voltage_drop_pct: drop,
        battery_ah,
        status,
    }
}

/// Evaluate every circuit of every main panel, in panel then circuit order.
pub fn evaluate_panels<D: DeviceFields>(
    resolver: &CurrentResolver,
    options: &EvaluationOptions,
    panels: &[Panel<D>],
    wires: &[WireSegment],
) -> Vec<CircuitEval> {
    let wiring = aggregate_wire_by_circuit(wires);
    let unwired = CircuitWiring::default();

    let mut rows = Vec::new();
    for panel in panels.iter().filter(|panel| panel.is_main) {
        for (circuit_id, circuit) in &panel.circuits {
            let run = wiring.get(circuit_id.trim()).unwrap_or(&unwired);
            rows.push(evaluate_circuit(
                resolver,
                options,
                &panel.name,
                circuit_id,
                circuit,
                run,
            ));
        }
    }
    rows
}

/// Evaluate with default options and an empty device catalog.
///
/// No device-spec table is consulted here, so catalog part numbers never
/// match; devices resolve by explicit current, candela or keyword only. Use
/// [`crate::CircuitEngine::with_spec_file`] to evaluate against a catalog.
pub fn summarize_panel_circuits<D: DeviceFields>(
    panels: &[Panel<D>],
    wires: &[WireSegment],
) -> Vec<CircuitEval> {
    evaluate_panels(
        &CurrentResolver::default(),
        &EvaluationOptions::default(),
        panels,
        wires,
    )
}
