//! Evaluation report handed to exporters and the CLI.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use uuid::Uuid;

use crate::analyzer::evaluator::{CircuitEval, CircuitStatus};
use crate::compliance::wirepath::WirepathFill;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportStats {
    pub circuits: usize,
    pub pass: usize,
    pub warn: usize,
    pub fail: usize,
    pub wirepaths: usize,
    pub overfilled_wirepaths: usize,
}

/// Circuit rows and wirepath checks from one evaluation run.
///
/// `id` and `generated_at` identify the run; the rows themselves depend only
/// on the inputs.
#[derive(Debug, Clone, Serialize)]
pub struct CircuitReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<CircuitEval>,
    pub wirepaths: Vec<WirepathFill>,
    pub stats: ReportStats,
}

fn rows_to_stats(rows: &[CircuitEval], wirepaths: &[WirepathFill]) -> ReportStats {
    let mut stats = ReportStats {
        circuits: rows.len(),
        wirepaths: wirepaths.len(),
        ..Default::default()
    };
    for row in rows {
        match row.status {
            CircuitStatus::Pass => stats.pass += 1,
            CircuitStatus::Warn => stats.warn += 1,
            CircuitStatus::Fail => stats.fail += 1,
        }
    }
    stats.overfilled_wirepaths = wirepaths.iter().filter(|w| !w.compliant).count();
    stats
}

impl CircuitReport {
    pub fn new(rows: Vec<CircuitEval>, wirepaths: Vec<WirepathFill>) -> Self {
        let stats = rows_to_stats(&rows, &wirepaths);
        Self {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            rows,
            wirepaths,
            stats,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.stats.fail > 0 || self.stats.overfilled_wirepaths > 0
    }

    pub fn has_warnings_or_failures(&self) -> bool {
        self.stats.warn > 0 || self.has_failures()
    }

    /// Sum of circuit battery requirements per panel, in panel order.
    pub fn battery_ah_by_panel(&self) -> IndexMap<String, f64> {
        let mut totals: IndexMap<String, f64> = IndexMap::new();
        for row in &self.rows {
            *totals.entry(row.panel.clone()).or_insert(0.0) += row.battery_ah;
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::schema::CircuitType;

    fn row(panel: &str, status: CircuitStatus, battery_ah: f64) -> CircuitEval {
        CircuitEval {
            panel: panel.to_string(),
            circuit_id: "C".to_string(),
            circuit_type: CircuitType::Nac,
            device_count: 1,
            length_ft: 0.0,
            gauge: "18".to_string(),
            current_a: 0.0,
            standby_current_a: 0.0,
            voltage_drop_pct: 0.0,
            battery_ah,
            status,
        }
    }

    #[test]
    fn test_stats_count_statuses() {
        let report = CircuitReport::new(
            vec![
                row("A", CircuitStatus::Pass, 1.0),
                row("A", CircuitStatus::Warn, 2.0),
                row("B", CircuitStatus::Pass, 0.5),
            ],
            vec![],
        );
        assert_eq!(report.stats.circuits, 3);
        assert_eq!(report.stats.pass, 2);
        assert_eq!(report.stats.warn, 1);
        assert_eq!(report.stats.fail, 0);
        assert!(!report.has_failures());
        assert!(report.has_warnings_or_failures());

        let by_panel = report.battery_ah_by_panel();
        assert_eq!(by_panel["A"], 3.0);
        assert_eq!(by_panel["B"], 0.5);
    }

    #[test]
    fn test_overfilled_wirepath_is_failure() {
        let fill = WirepathFill {
            conduit_kind: "EMT".to_string(),
            trade_size: "1/2".to_string(),
            label: None,
            fill_pct: 55.0,
            compliant: false,
        };
        let report = CircuitReport::new(vec![row("A", CircuitStatus::Pass, 1.0)], vec![fill]);
        assert_eq!(report.stats.overfilled_wirepaths, 1);
        assert!(report.has_failures());
    }

    #[test]
    fn test_serializes_status_upper_case() {
        let report = CircuitReport::new(vec![row("A", CircuitStatus::Fail, 1.0)], vec![]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["rows"][0]["status"], "FAIL");
        assert_eq!(json["rows"][0]["circuit_type"], "NAC");
        assert!(json["id"].is_string());
    }
}
