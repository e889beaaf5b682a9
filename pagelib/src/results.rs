use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::config::{Averaging, PolicyKind};

/// Running fault totals for every swept frame count and policy
///
/// Owned by a single driver (or a single worker, for parallel runs) and only combined with other
/// tables through [`ResultTable::merge`]
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    min_frames: usize,
    experiments: u64,
    // Row i holds the totals for min_frames + i frames, columns follow PolicyKind::ALL
    totals: Vec<[u64; PolicyKind::COUNT]>,
}

impl ResultTable {
    pub fn new(frames: RangeInclusive<usize>) -> Self {
        let rows = frames.end().saturating_sub(*frames.start()) + 1;
        Self {
            min_frames: *frames.start(),
            experiments: 0,
            totals: vec![[0; PolicyKind::COUNT]; rows],
        }
    }

    pub fn frames(&self) -> RangeInclusive<usize> {
        self.min_frames..=self.min_frames + self.totals.len() - 1
    }

    pub fn experiments(&self) -> u64 {
        self.experiments
    }

    /// Adds the faults of one policy run
    pub fn record(&mut self, frames: usize, kind: PolicyKind, faults: u64) {
        debug_assert!(self.frames().contains(&frames));
        self.totals[frames - self.min_frames][kind.index()] += faults;
    }

    /// Marks an experiment as complete, every frame count and policy should have been recorded
    pub fn finish_experiment(&mut self) {
        self.experiments += 1;
    }

    pub fn total(&self, frames: usize, kind: PolicyKind) -> u64 {
        self.totals[frames - self.min_frames][kind.index()]
    }

    /// Sums another table into this one. Both must cover the same frame counts
    pub fn merge(&mut self, other: &ResultTable) {
        assert_eq!(self.frames(), other.frames(), "Can't merge tables over different frame ranges");
        for (row, other_row) in self.totals.iter_mut().zip(&other.totals) {
            for (cell, other_cell) in row.iter_mut().zip(other_row) {
                *cell += other_cell;
            }
        }
        self.experiments += other.experiments;
    }

    /// Divides every total by the number of experiments
    ///
    /// A table with no experiments gives zero means rather than dividing by zero
    pub fn means(&self, averaging: Averaging) -> MeanTable {
        let experiments = self.experiments.max(1);
        let mean = |total: u64| match averaging {
            Averaging::Truncate => Mean::Truncated(total / experiments),
            Averaging::Exact => Mean::Exact(total as f64 / experiments as f64),
        };
        let rows = self
            .frames()
            .zip(&self.totals)
            .map(|(frames, row)| MeanRow {
                frames,
                fifo: mean(row[PolicyKind::Fifo.index()]),
                lru: mean(row[PolicyKind::LeastRecentlyUsed.index()]),
                clock: mean(row[PolicyKind::Clock.index()]),
            })
            .collect();
        MeanTable { rows }
    }
}

/// A mean fault count, either truncated to an integer or exact
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Mean {
    Truncated(u64),
    Exact(f64),
}

impl fmt::Display for Mean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mean::Truncated(m) => write!(f, "{m}"),
            Mean::Exact(m) => write!(f, "{m:.2}"),
        }
    }
}

/// Mean faults per policy for one frame count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanRow {
    pub frames: usize,
    pub fifo: Mean,
    pub lru: Mean,
    pub clock: Mean,
}

impl MeanRow {
    pub fn get(&self, kind: PolicyKind) -> Mean {
        match kind {
            PolicyKind::Fifo => self.fifo,
            PolicyKind::LeastRecentlyUsed => self.lru,
            PolicyKind::Clock => self.clock,
        }
    }
}

/// The final, averaged result of a run, one row per frame count in ascending order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanTable {
    pub rows: Vec<MeanRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncating_means_round_down() {
        let mut table = ResultTable::new(2..=3);
        for faults in [10, 11, 11] {
            table.record(2, PolicyKind::Fifo, faults);
            table.finish_experiment();
        }
        let means = table.means(Averaging::Truncate);
        assert_eq!(means.rows.len(), 2);
        assert_eq!(means.rows[0].frames, 2);
        assert_eq!(means.rows[0].fifo, Mean::Truncated(10));
        assert_eq!(means.rows[1].fifo, Mean::Truncated(0));
        match table.means(Averaging::Exact).rows[0].fifo {
            Mean::Exact(m) => assert!((m - 32.0 / 3.0).abs() < 1e-9),
            other => panic!("Expected an exact mean, got {other:?}"),
        }
    }

    #[test]
    fn merge_sums_cells_and_experiment_counts() {
        let mut a = ResultTable::new(1..=2);
        let mut b = ResultTable::new(1..=2);
        a.record(1, PolicyKind::Clock, 4);
        a.finish_experiment();
        b.record(1, PolicyKind::Clock, 6);
        b.record(2, PolicyKind::LeastRecentlyUsed, 3);
        b.finish_experiment();
        a.merge(&b);
        assert_eq!(a.experiments(), 2);
        assert_eq!(a.total(1, PolicyKind::Clock), 10);
        assert_eq!(a.total(2, PolicyKind::LeastRecentlyUsed), 3);
        assert_eq!(a.total(2, PolicyKind::Fifo), 0);
    }

    #[test]
    fn exact_means_print_with_two_decimals() {
        assert_eq!(Mean::Exact(2.5).to_string(), "2.50");
        assert_eq!(Mean::Truncated(7).to_string(), "7");
    }
}
