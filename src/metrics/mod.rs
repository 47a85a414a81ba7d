pub mod analyzer;

use crate::agent::Strategy;
use crate::population::StrategyCounts;
use serde::{Deserialize, Serialize};

/// State of the population at the end of one epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub epoch: usize,
    pub cooperators: usize,
    pub defectors: usize,
    pub loners: usize,
    /// Mean payoffs are measured after the games, before revision.
    pub mean_payoff_cooperators: f64,
    pub mean_payoff_defectors: f64,
    pub mean_payoff_loners: f64,
    pub switches: usize,
}

impl MetricsSnapshot {
    pub fn new(epoch: usize, counts: StrategyCounts, mean_payoffs: [f64; 3], switches: usize) -> Self {
        Self {
            epoch,
            cooperators: counts.cooperators,
            defectors: counts.defectors,
            loners: counts.loners,
            mean_payoff_cooperators: mean_payoffs[0],
            mean_payoff_defectors: mean_payoffs[1],
            mean_payoff_loners: mean_payoffs[2],
            switches,
        }
    }

    pub fn counts(&self) -> StrategyCounts {
        StrategyCounts {
            cooperators: self.cooperators,
            defectors: self.defectors,
            loners: self.loners,
        }
    }

    pub fn count(&self, strategy: Strategy) -> usize {
        self.counts().get(strategy)
    }
}

/// In-memory time series of epoch snapshots.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    snapshots: Vec<MetricsSnapshot>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, snapshot: MetricsSnapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn latest(&self) -> Option<&MetricsSnapshot> {
        self.snapshots.last()
    }

    pub fn get_snapshots(&self) -> Vec<MetricsSnapshot> {
        self.snapshots.clone()
    }

    pub fn snapshots(&self) -> &[MetricsSnapshot] {
        &self.snapshots
    }

    /// `(cooperators, defectors, loners)` per epoch, ready for plotting.
    pub fn trajectory(&self) -> Vec<[usize; 3]> {
        self.snapshots
            .iter()
            .map(|s| [s.cooperators, s.defectors, s.loners])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(epoch: usize, c: usize, d: usize, l: usize) -> MetricsSnapshot {
        let counts = StrategyCounts { cooperators: c, defectors: d, loners: l };
        MetricsSnapshot::new(epoch, counts, [0.0; 3], 0)
    }

    #[test]
    fn test_collector_keeps_order() {
        let mut metrics = MetricsCollector::new();
        metrics.record(snapshot(1, 5, 3, 2));
        metrics.record(snapshot(2, 6, 2, 2));

        assert_eq!(metrics.trajectory(), vec![[5, 3, 2], [6, 2, 2]]);
        assert_eq!(metrics.latest().map(|s| s.epoch), Some(2));
        assert_eq!(metrics.latest().unwrap().count(Strategy::Defector), 2);
    }
}
