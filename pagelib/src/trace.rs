use log::debug;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::Poisson;

use crate::config::TraceConfig;
use crate::error::{Error, Result};
use crate::frame_pool::PageId;

/// A source of reference streams, one per experiment
///
/// The experiment index is passed in so the stream for a given experiment doesn't depend on the
/// order experiments are run in, which keeps parallel runs reproducible
pub trait TraceSource: Sync {
    /// Produces the reference stream for an experiment
    ///
    /// # Arguments
    ///
    /// * `experiment`: The 0-based experiment index
    /// * `length`: The number of references to produce
    ///
    /// returns: Vec<PageId>
    fn generate(&self, experiment: usize, length: usize) -> Vec<PageId>;
}

fn experiment_rng(seed: u64, experiment: usize) -> StdRng {
    StdRng::seed_from_u64(seed.wrapping_add(experiment as u64))
}

/// Pages drawn independently from a Poisson distribution, the reference workload
pub struct PoissonTrace {
    distribution: Poisson<f64>,
    seed: u64,
}

impl PoissonTrace {
    pub fn new(mean: f64, seed: u64) -> Result<Self> {
        let distribution = Poisson::new(mean)
            .map_err(|e| Error::InvalidDistribution(format!("Poisson mean {mean}: {e:?}")))?;
        Ok(Self { distribution, seed })
    }
}

impl TraceSource for PoissonTrace {
    fn generate(&self, experiment: usize, length: usize) -> Vec<PageId> {
        let mut rng = experiment_rng(self.seed, experiment);
        // Samples are whole numbers stored as floats
        (0..length)
            .map(|_| Distribution::<f64>::sample(&self.distribution, &mut rng) as PageId)
            .collect()
    }
}

/// Pages drawn uniformly from `0..=max`
pub struct UniformTrace {
    distribution: Uniform<PageId>,
    seed: u64,
}

impl UniformTrace {
    pub fn new(max: PageId, seed: u64) -> Self {
        Self {
            distribution: Uniform::new_inclusive(0, max),
            seed,
        }
    }
}

impl TraceSource for UniformTrace {
    fn generate(&self, experiment: usize, length: usize) -> Vec<PageId> {
        let mut rng = experiment_rng(self.seed, experiment);
        (0..length).map(|_| self.distribution.sample(&mut rng)).collect()
    }
}

/// A literal stream, the same for every experiment
///
/// Repeated cyclically when the requested length is longer than the stream, truncated when it is
/// shorter. An empty stream always produces an empty trace
pub struct FixedTrace {
    pages: Vec<PageId>,
}

impl FixedTrace {
    pub fn new(pages: Vec<PageId>) -> Self {
        Self { pages }
    }
}

impl TraceSource for FixedTrace {
    fn generate(&self, _experiment: usize, length: usize) -> Vec<PageId> {
        self.pages.iter().copied().cycle().take(length).collect()
    }
}

/// Builds the trace source described by a configuration
///
/// # Arguments
///
/// * `config`: The distribution and its parameters
/// * `seed`: Base seed for random sources. When absent a seed is drawn from OS entropy, so
/// unseeded runs differ from each other
///
/// returns: Result<Box<dyn TraceSource>, Error>
pub fn build_source(config: &TraceConfig, seed: Option<u64>) -> Result<Box<dyn TraceSource>> {
    config.validate()?;
    let seed = seed.unwrap_or_else(rand::random);
    debug!("Building {config:?} trace source with base seed {seed}");
    let source: Box<dyn TraceSource> = match config {
        TraceConfig::Poisson { mean } => Box::new(PoissonTrace::new(*mean, seed)?),
        TraceConfig::Uniform { max } => Box::new(UniformTrace::new(*max, seed)),
        TraceConfig::Fixed { pages } => Box::new(FixedTrace::new(pages.clone())),
    };
    Ok(source)
}
