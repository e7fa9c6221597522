use criterion::{black_box, criterion_group, criterion_main, Criterion};
use firecalc::prelude::*;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Ten main panels with eight circuits of sixteen devices each.
fn synthetic_building() -> (Vec<Panel>, Vec<WireSegment>) {
    let names = ["Smoke Detector", "Wall Horn Strobe", "Pull Station", "Ceiling Speaker"];
    let mut panels = Vec::new();
    let mut wires = Vec::new();

    for p in 0..10 {
        let mut panel = Panel::main(&format!("FACP-{}", p));
        for c in 0..8 {
            let id = format!("P{}C{}", p, c);
            let circuit_type = if c % 2 == 0 { CircuitType::Slc } else { CircuitType::Nac };
            let devices = (0..16)
                .map(|d| Device::named(names[d % names.len()]))
                .collect();
            panel = panel.with_circuit(&id, Circuit::new(circuit_type).with_devices(devices));
            wires.push(WireSegment::new(&id, 120.0 + c as f64 * 15.0, "14"));
            wires.push(WireSegment::new(&id, 40.0, "18"));
        }
        panels.push(panel);
    }
    (panels, wires)
}

fn bench_summarize_panel_circuits(c: &mut Criterion) {
    let (panels, wires) = synthetic_building();

    c.bench_function("summarize_panel_circuits", |b| {
        b.iter(|| firecalc::summarize_panel_circuits(black_box(&panels), black_box(&wires)));
    });
}

fn bench_evaluate_project(c: &mut Criterion) {
    let engine = CircuitEngine::with_spec_file(&fixture_path("device_specs.json"));
    let project: Project = match Project::load(&fixture_path("project.json")) {
        Ok(project) => project,
        Err(e) => panic!("fixture project unreadable: {}", e),
    };

    c.bench_function("evaluate_project", |b| {
        b.iter(|| engine.evaluate_project(black_box(&project)));
    });
}

criterion_group!(benches, bench_summarize_panel_circuits, bench_evaluate_project);
criterion_main!(benches);
