use thiserror::Error;

/// Holds the errors reported by the reinforcing steel model and its tools
#[derive(Error, Debug)]
pub enum RebarError {
    #[error("strain {strain} is beyond the compressive limit {limit}")]
    StrainOutOfRange { strain: f64, limit: f64 },

    #[error("transition curve fit did not converge after {0} iterations")]
    NoConvergence(usize),

    #[error("transition curve fit produced a non-finite {0}")]
    NonFinite(&'static str),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("invalid state vector: {0}")]
    InvalidState(String),

    #[error("cannot save figure: {0}")]
    Figure(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Defines the result type of fallible operations
pub type RebarResult<T> = Result<T, RebarError>;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
