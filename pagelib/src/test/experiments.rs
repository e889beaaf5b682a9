use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::config::{Averaging, ExperimentConfig, FaultCounting, PolicyKind, TraceConfig};
use crate::error::Error as PageError;
use crate::experiment::ExperimentDriver;
use crate::frame_pool::PageId;
use crate::progress::{NoProgress, Progress};
use crate::results::Mean;
use crate::simulator::count_faults;
use crate::trace::{PoissonTrace, TraceSource};

const SHORT: [PageId; 6] = [1, 2, 3, 1, 2, 4];

fn fixed_config(experiments: usize) -> ExperimentConfig {
    ExperimentConfig {
        experiments,
        trace_length: SHORT.len(),
        min_frames: 1,
        max_frames: 4,
        trace: TraceConfig::Fixed { pages: SHORT.to_vec() },
        ..Default::default()
    }
}

/// Records which experiments asked for a trace
#[derive(Default)]
struct RecordingTrace {
    requested: Mutex<Vec<usize>>,
}

impl TraceSource for RecordingTrace {
    fn generate(&self, experiment: usize, length: usize) -> Vec<PageId> {
        self.requested.lock().unwrap().push(experiment);
        (0..length as PageId).map(|p| p % 5).collect()
    }
}

#[derive(Default)]
struct CountingProgress {
    calls: AtomicUsize,
    highest: AtomicUsize,
    finished: AtomicUsize,
}

impl Progress for CountingProgress {
    fn experiment_finished(&self, done: usize, _total: usize) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.highest.fetch_max(done, Ordering::Relaxed);
    }

    fn finish(&self) {
        self.finished.fetch_add(1, Ordering::Relaxed);
    }
}

#[test]
fn constant_trace_means_equal_a_single_run() -> Result<(), Box<dyn Error>> {
    let mut driver = ExperimentDriver::new(fixed_config(7))?;
    let table = driver.simulate(&NoProgress)?;
    assert_eq!(table.experiments(), 7);
    let means = table.means(Averaging::Truncate);
    let exact = table.means(Averaging::Exact);
    for (row, exact_row) in means.rows.iter().zip(&exact.rows) {
        for kind in PolicyKind::ALL {
            let single = count_faults(kind, &SHORT, row.frames)?;
            assert_eq!(table.total(row.frames, kind), 7 * single);
            assert_eq!(row.get(kind), Mean::Truncated(single));
            assert_eq!(exact_row.get(kind), Mean::Exact(single as f64));
        }
    }
    Ok(())
}

#[test]
fn one_trace_per_experiment_shared_by_every_run() -> Result<(), Box<dyn Error>> {
    let config = ExperimentConfig { experiments: 12, trace_length: 50, ..Default::default() };
    let source = RecordingTrace::default();
    ExperimentDriver::new(config)?.run(&source, &NoProgress)?;
    let mut requested = source.requested.into_inner().unwrap();
    requested.sort_unstable();
    assert_eq!(requested, (0..12).collect::<Vec<_>>());
    Ok(())
}

#[test]
fn parallel_runs_match_sequential_runs() -> Result<(), Box<dyn Error>> {
    let source = PoissonTrace::new(10.0, 9)?;
    let sequential = ExperimentConfig { experiments: 40, trace_length: 300, ..Default::default() };
    let parallel = ExperimentConfig { threads: 4, ..sequential.clone() };
    let expected = ExperimentDriver::new(sequential)?.run(&source, &NoProgress)?;
    let actual = ExperimentDriver::new(parallel)?.run(&source, &NoProgress)?;
    assert_eq!(actual, expected);
    Ok(())
}

#[test]
fn more_threads_than_experiments() -> Result<(), Box<dyn Error>> {
    let config = ExperimentConfig { threads: 8, ..fixed_config(3) };
    let table = ExperimentDriver::new(config)?.simulate(&NoProgress)?;
    assert_eq!(table.experiments(), 3);
    assert_eq!(table.total(3, PolicyKind::Fifo), 12);
    Ok(())
}

#[test]
fn progress_sees_every_experiment() -> Result<(), Box<dyn Error>> {
    let progress = CountingProgress::default();
    let config = ExperimentConfig { threads: 3, ..fixed_config(10) };
    ExperimentDriver::new(config)?.simulate(&progress)?;
    assert_eq!(progress.calls.load(Ordering::Relaxed), 10);
    assert_eq!(progress.highest.load(Ordering::Relaxed), 10);
    assert_eq!(progress.finished.load(Ordering::Relaxed), 1);
    Ok(())
}

#[test]
fn evictions_only_counting_reaches_the_table() -> Result<(), Box<dyn Error>> {
    let config = ExperimentConfig { fault_counting: FaultCounting::EvictionsOnly, ..fixed_config(2) };
    let table = ExperimentDriver::new(config)?.simulate(&NoProgress)?;
    let means = table.means(Averaging::Truncate);
    let three_frames = &means.rows[2];
    assert_eq!(three_frames.frames, 3);
    for kind in PolicyKind::ALL {
        assert_eq!(three_frames.get(kind), Mean::Truncated(1));
    }
    // Four frames hold every page, nothing is ever evicted
    assert_eq!(means.rows[3].get(PolicyKind::Clock), Mean::Truncated(0));
    Ok(())
}

#[test]
fn seeded_runs_are_reproducible() -> Result<(), Box<dyn Error>> {
    let config = ExperimentConfig { experiments: 5, trace_length: 200, seed: Some(1234), ..Default::default() };
    let first = ExperimentDriver::new(config.clone())?.simulate(&NoProgress)?;
    let second = ExperimentDriver::new(config)?.simulate(&NoProgress)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn invalid_configurations_are_rejected_up_front() {
    let config = ExperimentConfig { min_frames: 0, ..Default::default() };
    assert!(matches!(ExperimentDriver::new(config), Err(PageError::InvalidConfig(_))));
    let config = ExperimentConfig { min_frames: 4, max_frames: 2, ..Default::default() };
    assert!(matches!(ExperimentDriver::new(config), Err(PageError::InvalidConfig(_))));
}

#[test]
fn execution_time_accumulates_across_runs() -> Result<(), Box<dyn Error>> {
    let mut driver = ExperimentDriver::new(fixed_config(2))?;
    driver.simulate(&NoProgress)?;
    let first = *driver.get_execution_time();
    driver.simulate(&NoProgress)?;
    assert!(*driver.get_execution_time() >= first);
    Ok(())
}
