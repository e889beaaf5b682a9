use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::config::{ExperimentConfig, PolicyKind};
use crate::error::Result;
use crate::progress::Progress;
use crate::results::ResultTable;
use crate::simulator::simulate;
use crate::trace::{build_source, TraceSource};

/// The experiment driver runs every policy over every frame count for a series of independent
/// traces, and accumulates the fault counts.
///
/// Like the simulator it wraps, it can be run multiple times and keeps a running total of the
/// wall-clock time spent simulating
pub struct ExperimentDriver {
    config: ExperimentConfig,
    simulation_time: Duration,
}

impl ExperimentDriver {
    /// Creates a new driver, validating the configuration up front
    ///
    /// # Arguments
    ///
    /// * `config`: The experiment configuration, usually from defaults, JSON and CLI overrides
    ///
    /// returns: Result<ExperimentDriver, Error>
    pub fn new(config: ExperimentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            simulation_time: Duration::new(0, 0),
        })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Runs the experiments with the trace source described by the configuration
    pub fn simulate(&mut self, progress: &dyn Progress) -> Result<ResultTable> {
        let source = build_source(&self.config.trace, self.config.seed)?;
        self.run(source.as_ref(), progress)
    }

    /// Runs the experiments with an injected trace source
    ///
    /// Each experiment draws exactly one trace and reuses it for every policy and frame count.
    /// With more than one thread, experiments are split into contiguous chunks, each worker fills
    /// its own table, and the tables are summed once every worker has joined. Seeded sources give
    /// the same totals regardless of the thread count
    ///
    /// # Arguments
    ///
    /// * `source`: Produces one trace per experiment index
    /// * `progress`: Notified after every experiment
    ///
    /// returns: Result<ResultTable, Error>
    pub fn run(&mut self, source: &dyn TraceSource, progress: &dyn Progress) -> Result<ResultTable> {
        let config = &self.config;
        let threads = config.threads.min(config.experiments);
        info!(
            "Running {} experiments of {} references over {:?} frames on {threads} thread(s)",
            config.experiments,
            config.trace_length,
            config.frames()
        );
        let start = Instant::now();
        let done = AtomicUsize::new(0);
        let table = if threads <= 1 {
            run_chunk(config, source, 0..config.experiments, progress, &done)?
        } else {
            let chunk_size = (config.experiments + threads - 1) / threads;
            let chunks: Vec<Range<usize>> = (0..config.experiments)
                .step_by(chunk_size)
                .map(|lo| lo..(lo + chunk_size).min(config.experiments))
                .collect();
            thread::scope(|scope| -> Result<ResultTable> {
                let done = &done;
                let workers: Vec<_> = chunks
                    .into_iter()
                    .map(|chunk| scope.spawn(move || run_chunk(config, source, chunk, progress, done)))
                    .collect();
                let mut table = ResultTable::new(config.frames());
                for worker in workers {
                    let partial = worker.join().unwrap_or_else(|e| std::panic::resume_unwind(e))?;
                    table.merge(&partial);
                }
                Ok(table)
            })?
        };
        progress.finish();
        let elapsed = start.elapsed();
        self.simulation_time += elapsed;
        info!("Finished {} experiments in {:?}", table.experiments(), elapsed);
        Ok(table)
    }

    /// Gets the wall-clock time spent running experiments
    pub fn get_execution_time(&self) -> &Duration {
        &self.simulation_time
    }
}

/// Runs a contiguous block of experiments into a fresh table
fn run_chunk(
    config: &ExperimentConfig,
    source: &dyn TraceSource,
    experiments: Range<usize>,
    progress: &dyn Progress,
    done: &AtomicUsize,
) -> Result<ResultTable> {
    debug!("Running experiments {experiments:?}");
    let mut table = ResultTable::new(config.frames());
    for experiment in experiments {
        let trace = source.generate(experiment, config.trace_length);
        for frames in config.frames() {
            for kind in PolicyKind::ALL {
                let faults = simulate(kind, &trace, frames)?.faults(config.fault_counting);
                table.record(frames, kind, faults);
            }
        }
        table.finish_experiment();
        progress.experiment_finished(done.fetch_add(1, Ordering::Relaxed) + 1, config.experiments);
    }
    Ok(table)
}
