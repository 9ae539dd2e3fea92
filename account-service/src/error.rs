use thiserror::Error;

/// Errors raised while bootstrapping or running the service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Failed to read or merge the configuration sources.
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// The merged configuration holds values the service cannot run with.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Underlying IO failure (bind, accept).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for service bootstrap operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
