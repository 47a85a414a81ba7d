use thiserror::Error;

pub type Result<T> = std::result::Result<T, PggError>;

/// Everything that can go wrong while building a population or playing it.
///
/// Every failure is raised before any state is touched, so a caller that
/// gets an `Err` back can assume the population is exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PggError {
    #[error("initial distribution must sum to exactly 1.0, got {sum}")]
    InvalidDistribution { sum: f64 },

    #[error("initial distribution contains a negative probability")]
    NegativeProbability,

    #[error("population must contain at least one agent")]
    EmptyPopulation,

    #[error("lattice must be at least 3x3, got {width}x{height}")]
    LatticeTooSmall { width: usize, height: usize },

    #[error("lattice needs {expected} agents, got {actual}")]
    GridSizeMismatch { expected: usize, actual: usize },

    #[error("multiplication factor r = {r} must satisfy 1 < r < {group_size}")]
    MultiplicationFactorOutOfRange { r: f64, group_size: usize },

    #[error("loner payoff sigma = {sigma} must satisfy 0 < sigma < r - 1 (r = {r})")]
    LonerPayoffOutOfRange { sigma: f64, r: f64 },

    #[error("group of {group_size} cannot be drawn from {population} agents")]
    GroupTooLarge { group_size: usize, population: usize },

    #[error("agent index {index} out of range for population of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cell ({x}, {y}) out of range for {width}x{height} lattice")]
    CellOutOfRange { x: usize, y: usize, width: usize, height: usize },

    #[error("invalid strategy code {0}, expected 0 (cooperator), 1 (defector) or 2 (loner)")]
    InvalidStrategyCode(u8),

    #[error("noise K = {0} must be positive and finite")]
    InvalidNoise(f64),

    #[error("adoption probability {0} is not a valid probability")]
    InvalidProbability(f64),

    #[error("model '{0}' has no revision protocol")]
    RevisionUnsupported(String),

    #[error("model '{model}' needs a {expected} population")]
    TopologyMismatch { model: String, expected: &'static str },

    #[error("unknown model: {0}")]
    UnknownModel(String),
}
