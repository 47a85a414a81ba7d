use super::MetricsSnapshot;
use crate::agent::Strategy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub model_name: String,
    pub epochs: usize,
    pub final_cooperators: f64,
    pub final_defectors: f64,
    pub final_loners: f64,
    pub mean_cooperators: f64,
    pub mean_defectors: f64,
    pub mean_loners: f64,
    pub extinct: Vec<Strategy>,
}

/// Reduces an epoch series to final and time-averaged strategy fractions.
pub fn analyze(snapshots: &[MetricsSnapshot], model_name: &str) -> AnalysisReport {
    let Some(last) = snapshots.last() else {
        return AnalysisReport {
            model_name: model_name.to_string(),
            epochs: 0,
            final_cooperators: 0.0,
            final_defectors: 0.0,
            final_loners: 0.0,
            mean_cooperators: 0.0,
            mean_defectors: 0.0,
            mean_loners: 0.0,
            extinct: Vec::new(),
        };
    };

    let final_fractions = last.counts().fractions();

    let mut sums = [0.0; 3];
    for snapshot in snapshots {
        let f = snapshot.counts().fractions();
        for slot in 0..3 {
            sums[slot] += f[slot];
        }
    }
    let n = snapshots.len() as f64;

    let extinct = Strategy::ALL
        .into_iter()
        .filter(|&s| last.count(s) == 0)
        .collect();

    AnalysisReport {
        model_name: model_name.to_string(),
        epochs: snapshots.len(),
        final_cooperators: final_fractions[0],
        final_defectors: final_fractions[1],
        final_loners: final_fractions[2],
        mean_cooperators: sums[0] / n,
        mean_defectors: sums[1] / n,
        mean_loners: sums[2] / n,
        extinct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::StrategyCounts;

    #[test]
    fn test_analyze_fractions_and_extinction() {
        let snapshots = vec![
            MetricsSnapshot::new(1, StrategyCounts { cooperators: 2, defectors: 2, loners: 0 }, [0.0; 3], 0),
            MetricsSnapshot::new(2, StrategyCounts { cooperators: 4, defectors: 0, loners: 0 }, [0.0; 3], 2),
        ];
        let report = analyze(&snapshots, "bucket");

        assert_eq!(report.epochs, 2);
        assert_eq!(report.final_cooperators, 1.0);
        assert_eq!(report.mean_cooperators, 0.75);
        assert_eq!(report.mean_defectors, 0.25);
        assert_eq!(report.extinct, vec![Strategy::Defector, Strategy::Loner]);
    }

    #[test]
    fn test_analyze_empty_series() {
        let report = analyze(&[], "lattice");
        assert_eq!(report.epochs, 0);
        assert!(report.extinct.is_empty());
    }
}
