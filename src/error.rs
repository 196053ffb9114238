use thiserror::Error;

/// Top-level error type for the arcfit curve library.
#[derive(Debug, Error)]
pub enum ArcfitError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric input.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length chord")]
    ZeroChord,
}

/// Errors raised by the iterative solvers.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("no convergence after {iterations} iterations (residual {residual:e})")]
    NotConverged { iterations: usize, residual: f64 },

    #[error("no sign change on [{lo}, {hi}]")]
    NoSignChange { lo: f64, hi: f64 },
}

/// Errors related to curve operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for results using [`ArcfitError`].
pub type Result<T> = std::result::Result<T, ArcfitError>;
