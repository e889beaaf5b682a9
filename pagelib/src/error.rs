use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong before or while running an experiment
///
/// The engines themselves have no failure paths once a pool has been built, so almost every
/// variant here is a configuration problem caught before any simulation starts
#[derive(Debug, Error)]
pub enum Error {
    /// A frame pool was requested with no frames
    #[error("a frame pool needs at least one frame, got {0}")]
    InvalidCapacity(usize),

    /// The experiment configuration failed validation
    #[error("invalid experiment configuration: {0}")]
    InvalidConfig(String),

    /// The trace distribution can't be sampled with the given parameters
    #[error("invalid trace distribution: {0}")]
    InvalidDistribution(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("couldn't (de)serialise JSON: {0}")]
    Json(#[from] serde_json::Error),
}
