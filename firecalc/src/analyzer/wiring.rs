//! Wire aggregation per circuit.

use indexmap::IndexMap;
use serde::Serialize;

use crate::lenient::non_negative;
use crate::project::schema::WireSegment;

/// Gauge assumed for circuits with no drawn wire, or none with a gauge.
pub const DEFAULT_GAUGE: &str = "18";

/// Total length and dominant gauge of one circuit's wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircuitWiring {
    pub length_ft: f64,
    pub gauge: String,
    pub segment_count: usize,
}

impl Default for CircuitWiring {
    fn default() -> Self {
        Self {
            length_ft: 0.0,
            gauge: DEFAULT_GAUGE.to_string(),
            segment_count: 0,
        }
    }
}

#[derive(Default)]
struct Accumulator {
    length_ft: f64,
    gauge_counts: IndexMap<String, usize>,
    segment_count: usize,
}

impl Accumulator {
    /// Most frequent gauge; on a tie the gauge seen first wins.
    fn dominant_gauge(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for (gauge, &count) in &self.gauge_counts {
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((gauge.as_str(), count)),
            }
        }
        best.map(|(gauge, _)| gauge)
    }
}

/// Group segments by circuit id, summing length and picking the dominant gauge.
///
/// Circuits appear in the order their first segment was seen. Segments with
/// a blank circuit id belong to no circuit and are skipped.
pub fn aggregate_wire_by_circuit(wires: &[WireSegment]) -> IndexMap<String, CircuitWiring> {
    let mut accumulators: IndexMap<String, Accumulator> = IndexMap::new();

    for segment in wires {
        let circuit = segment.circuit.trim();
        if circuit.is_empty() {
            tracing::debug!("Skipping wire segment without circuit id ({} ft)", segment.length_ft);
            continue;
        }
        let acc = accumulators.entry(circuit.to_string()).or_default();
        acc.length_ft += non_negative(segment.length_ft);
        acc.segment_count += 1;
        if let Some(gauge) = segment.gauge.as_deref().filter(|g| !g.is_empty()) {
            *acc.gauge_counts.entry(gauge.to_string()).or_insert(0) += 1;
        }
    }

    accumulators
        .into_iter()
        .map(|(circuit, acc)| {
            let wiring = CircuitWiring {
                length_ft: acc.length_ft,
                gauge: acc.dominant_gauge().unwrap_or(DEFAULT_GAUGE).to_string(),
                segment_count: acc.segment_count,
            };
            (circuit, wiring)
        })
        .collect()
}
