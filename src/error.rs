use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures a caller can recover from. Losing the game is not one of them,
/// see `StepOutcome::Over`.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("initial snake length must be at least 1")]
    ZeroLength,

    #[error("decay rate must be a finite, non-negative number (got {0})")]
    InvalidDecayRate(f64),

    #[error("minimum tick interval must be between 1 and {base}ms (got {min}ms)")]
    InvalidMinInterval { min: u64, base: u64 },

    #[error("a {height}x{width} board cannot hold a snake of length {length}")]
    BoundsTooSmall { height: u16, width: u16, length: usize },
}
