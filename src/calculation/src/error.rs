//! Error types for trajectory loading and analysis.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for calculation operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Errors that can occur while loading or analysing trajectories
#[derive(Error, Debug)]
pub enum CalcError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported Armadillo format tag: {0}")]
    UnsupportedFormat(String),

    #[error("invalid Armadillo header: {0}")]
    InvalidHeader(String),

    #[error("truncated payload: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("particle {index} out of range ({count} particles loaded)")]
    ParticleOutOfRange { index: usize, count: usize },

    #[error("length mismatch: {left} vs {right} samples")]
    LengthMismatch { left: usize, right: usize },

    #[error("unstable trap: omega_0^2 = {omega_0_sq} < 2*omega_z^2 = {bound}")]
    UnstableTrap { omega_0_sq: f64, bound: f64 },

    #[error("degenerate trap: omega_m == omega_p == {0}")]
    DegenerateFrequencies(f64),
}

impl CalcError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CalcError::Io {
            path: path.into(),
            source,
        }
    }
}
