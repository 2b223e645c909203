use thiserror::Error;

/// error types of the conservation laws analysis
#[derive(Debug, Error)]
pub enum ConservationError {
    /// the stoichiometric matrix does not have the declared shape
    #[error("Matrix dimension mismatch: {0}")]
    DimensionMismatch(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// a found moiety breaks an invariant that the algorithm guarantees by construction
    #[error("Internal consistency violation: {0}")]
    InternalConsistency(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Parse error: {0}")]
    Parse(String),
}
