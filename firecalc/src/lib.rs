//! FireCalc - fire-alarm circuit analysis library
//!
//! This library turns panel, device and wire data from a fire-alarm drawing
//! into engineering verdicts: voltage drop per circuit, standby battery
//! size, device current estimates and conduit fill compliance.
//!
//! # Quick Start
//!
//! ```
//! use firecalc::prelude::*;
//!
//! let panels = vec![Panel::main("FACP-1").with_circuit(
//!     "NAC1",
//!     Circuit::new(CircuitType::Nac).with_devices(vec![
//!         Device::named("Wall Horn Strobe"),
//!         Device::named("Ceiling Strobe").with_candela(75.0),
//!     ]),
//! )];
//! let wires = vec![WireSegment::new("NAC1", 180.0, "14")];
//!
//! for row in firecalc::summarize_panel_circuits(&panels, &wires) {
//!     println!("{} {}: {:.2}% {}", row.panel, row.circuit_id, row.voltage_drop_pct, row.status);
//! }
//! ```
//!
//! # Features
//!
//! - **Voltage drop**: round-trip conductor resistance per AWG
//! - **Battery sizing**: 24 h standby + 5 min alarm with 1.25 derate
//! - **Device currents**: explicit, catalog, candela, keyword and default tiers
//! - **Conduit fill**: NEC Chapter 9 areas, 40% limit, wirepath labels

pub mod analyzer;
pub mod compliance;
pub mod core;
pub mod devices;
pub mod lenient;
pub mod project;

// Re-export main types
pub use analyzer::evaluator::{summarize_panel_circuits, CircuitEval, CircuitStatus};
pub use analyzer::report::{CircuitReport, ReportStats};
pub use compliance::{
    battery_capacity_ah, compute_fill_pct, format_wirepath_label, get_conduit_spec,
    loop_resistance_ohms, ohms_per_1000ft, voltage_drop_percent, ConduitSpec, WirepathFill,
};
pub use core::{CalcError, CircuitEngine, EvaluationOptions};
pub use devices::{
    resolve_device_current, CurrentEstimate, CurrentResolver, CurrentSource, Device,
    DeviceCatalog, DeviceFields,
};
pub use project::{Circuit, CircuitType, Panel, Project, WireSegment, Wirepath};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        CalcError, Circuit, CircuitEngine, CircuitEval, CircuitStatus, CircuitType, Device,
        DeviceCatalog, DeviceFields, EvaluationOptions, Panel, Project, WireSegment,
    };
}
