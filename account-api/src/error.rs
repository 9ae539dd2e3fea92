use thiserror::Error;

/// Failures raised while producing a strategy for an account.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// The generation backend did not answer (or answered with garbage).
    #[error("Strategy generator unavailable: {0}")]
    Unavailable(String),

    /// The generator was asked for a strategy family it does not know.
    #[error("Unknown strategy label: {0}")]
    UnknownLabel(String),
}
