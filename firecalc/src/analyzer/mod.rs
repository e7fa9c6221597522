//! Circuit Analysis
//!
//! Turns panels, devices and drawn wire into per-circuit verdicts:
//!
//! ```text
//! WireSegment[] ──▶ wiring::aggregate_wire_by_circuit ──┐
//!                                                       ▼
//! Panel[] ──▶ main panels ──▶ circuits ──▶ evaluator ──▶ CircuitEval[] ──▶ report
//!                                 │
//!                                 └──▶ devices::CurrentResolver
//! ```

pub mod wiring;
pub mod evaluator;
pub mod report;

pub use wiring::{aggregate_wire_by_circuit, CircuitWiring, DEFAULT_GAUGE};
pub use evaluator::{summarize_panel_circuits, CircuitEval, CircuitStatus};
pub use report::{CircuitReport, ReportStats};
