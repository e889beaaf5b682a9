use std::time::Instant;
use clap::{Parser, ValueEnum};
use pagelib::config::{Averaging, ExperimentConfig, FaultCounting, PolicyKind, TraceConfig};
use pagelib::experiment::ExperimentDriver;
use pagelib::progress::{ConsoleProgress, NoProgress, Progress};
use pagelib::report::{JsonReporter, ResultSink, TableReporter};

#[cfg(debug_assertions)]
const DEBUG_DEFAULT: bool = true;

#[cfg(not(debug_assertions))]
const DEBUG_DEFAULT: bool = false;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Format {
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum AveragingArg {
    Truncate,
    Exact,
}

impl From<AveragingArg> for Averaging {
    fn from(value: AveragingArg) -> Self {
        match value {
            AveragingArg::Truncate => Averaging::Truncate,
            AveragingArg::Exact => Averaging::Exact,
        }
    }
}

/// With no arguments, runs the reference workload: 1000 experiments of 1000 Poisson(10)
/// references, swept over 2 to 20 frames
#[derive(Parser, Debug)]
#[command(about = String::from("Page replacement simulator comparing FIFO, LRU and Clock"))]
struct Args {
    /// JSON experiment configuration, any other flag overrides its values
    #[arg(short, long)]
    config: Option<String>,

    #[arg(short = 'n', long)]
    experiments: Option<usize>,

    /// References per experiment
    #[arg(short, long)]
    length: Option<usize>,

    #[arg(long)]
    min_frames: Option<usize>,

    #[arg(long)]
    max_frames: Option<usize>,

    /// Mean of the Poisson trace distribution
    #[arg(long)]
    mean: Option<f64>,

    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(short, long)]
    threads: Option<usize>,

    #[arg(long, value_enum)]
    averaging: Option<AveragingArg>,

    /// Only count misses which evict a resident page
    #[arg(long)]
    evictions_only: bool,

    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Don't draw the progress bar
    #[arg(short, long)]
    quiet: bool,

    #[arg(short, long)]
    performance: bool,

    #[arg(short, long, default_value_t = DEBUG_DEFAULT)]
    debug: bool,
}

/// Starts from the defaults or the config file, then applies the command line overrides
fn build_config(args: &Args) -> Result<ExperimentConfig, String> {
    let mut config = match &args.config {
        Some(path) => ExperimentConfig::from_file(path)
            .map_err(|e| format!("Couldn't read the config file at path {path}: {e}"))?,
        None => ExperimentConfig::default(),
    };
    if let Some(experiments) = args.experiments {
        config.experiments = experiments;
    }
    if let Some(length) = args.length {
        config.trace_length = length;
    }
    if let Some(min_frames) = args.min_frames {
        config.min_frames = min_frames;
    }
    if let Some(max_frames) = args.max_frames {
        config.max_frames = max_frames;
    }
    if let Some(mean) = args.mean {
        match &mut config.trace {
            TraceConfig::Poisson { mean: m } => *m = mean,
            other => return Err(format!("--mean only applies to Poisson traces, the configured trace is {other:?}")),
        }
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    if let Some(averaging) = args.averaging {
        config.averaging = averaging.into();
    }
    if args.evictions_only {
        config.fault_counting = FaultCounting::EvictionsOnly;
    }
    Ok(config)
}

fn main() -> Result<(), String> {
    let start = Instant::now();
    let args = Args::parse();
    env_logger::init();
    let config = build_config(&args)?;
    let mut driver = ExperimentDriver::new(config.clone()).map_err(|e| format!("Couldn't start the experiments: {e}"))?;
    let progress: Box<dyn Progress> = if args.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ConsoleProgress::default())
    };
    let table = driver.simulate(progress.as_ref()).map_err(|e| format!("Simulation failed: {e}"))?;
    let reporter: Box<dyn ResultSink> = match args.format {
        Format::Table => Box::new(TableReporter),
        Format::Json => Box::new(JsonReporter),
    };
    reporter
        .report(&table.means(config.averaging), &mut std::io::stdout().lock())
        .map_err(|e| format!("Couldn't write the results: {e}"))?;
    if args.performance {
        let end = Instant::now();
        let simulation_time = driver.get_execution_time();
        let total_time = end - start;
        println!("Simulation time: {}s", simulation_time.as_nanos() as f64 / 1e9);
        println!("Total execution time (includes configuration and output): {}s", total_time.as_nanos() as f64 / 1e9)
    }
    if args.debug {
        #[cfg(debug_assertions)]
        eprintln!("Running the debug binary, debug mode is enabled by default. If benchmarking, do not use this binary, re-compile with the --release argument when using cargo run");
        eprintln!("Parsed experiment configuration: {config:?}");
        let formatted = PolicyKind::ALL
            .iter()
            .map(|kind| (kind, table.frames().map(|frames| table.total(frames, *kind)).sum::<u64>()))
            .map(|(kind, total)| format!("{kind}: {total}"))
            .reduce(|a, b| format!("{a}, {b}"))
            .unwrap_or_default();
        eprintln!("Total faults by policy over all experiments: ({formatted})");
    }
    Ok(())
}
