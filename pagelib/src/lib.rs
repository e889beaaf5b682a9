//! # PageLib
//!
//! Pagelib is a library for comparing page replacement policies
//!
//! It provides a frame pool which can be parameterised by a replacement policy (FIFO, LRU or
//! Clock), a simulator which counts the page faults of a reference stream, and an experiment
//! driver which averages fault counts over many generated streams and a range of frame counts
//!
//! ```
//! use pagelib::config::ExperimentConfig;
//! use pagelib::experiment::ExperimentDriver;
//! use pagelib::progress::NoProgress;
//! use pagelib::config::Averaging;
//!
//! let config = ExperimentConfig { experiments: 10, seed: Some(1), ..Default::default() };
//! let mut driver = ExperimentDriver::new(config).unwrap();
//! let means = driver.simulate(&NoProgress).unwrap().means(Averaging::Truncate);
//! assert_eq!(means.rows.len(), 19);
//! ```

/// Contains the experiment configuration and the enums shared across the library
pub mod config;

pub mod error;

/// Contains the experiment driver, which sweeps every policy over every frame count
pub mod experiment;

/// Contains the frame pool implementation, and a utility enum for the existing pool types
pub mod frame_pool;

pub mod progress;

/// Contains the provided replacement policies, with a trait for implementing custom replacement
/// policies
pub mod replacement_policies;

/// Contains the renderers for averaged results
pub mod report;

pub mod results;

/// Contains the simulator used to count the page faults of a single reference stream
pub mod simulator;

/// Contains the trace sources which feed the experiment driver
pub mod trace;

#[cfg(test)]
mod test;

/// Contains utilities for tests and benchmarks
pub mod util;

pub use error::{Error, Result};
pub use frame_pool::PageId;
