//! Simple evaluation example: evaluate a project file and print circuit rows.

use firecalc::prelude::*;
use std::path::Path;

fn main() -> Result<(), CalcError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/project.json".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example simple_evaluation [path/to/project.json]");
        std::process::exit(1);
    }

    let project: Project = Project::load(path)?;
    let specs = path.with_file_name("device_specs.json");
    let engine = CircuitEngine::with_spec_file(&specs)
        .with_options(project.options.clone().unwrap_or_default());

    let report = engine.evaluate_project(&project)?;

    println!("Evaluation results for: {}", path.display());
    println!("Circuits: {}", report.stats.circuits);
    println!();

    for row in &report.rows {
        println!(
            "  {:<12} {:<6} {:<5} {:>8.1} ft  {:>3} AWG  {:>7.3} A  {:>6.2}%  {:>7.3} Ah  {}",
            row.panel,
            row.circuit_id,
            row.circuit_type,
            row.length_ft,
            row.gauge,
            row.current_a,
            row.voltage_drop_pct,
            row.battery_ah,
            row.status
        );
    }

    for wirepath in &report.wirepaths {
        if let Some(ref label) = wirepath.label {
            println!("  Wirepath: {}", label);
        }
    }

    if report.has_failures() {
        println!("\nEvaluation failed (FAIL circuits or overfilled conduit).");
        std::process::exit(1);
    }

    println!("\nEvaluation passed.");
    Ok(())
}
