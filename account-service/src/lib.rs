//! Account registry service.
//!
//! Keeps trading accounts in memory and hands each one a strategy produced by
//! the configured generator.

pub mod api;
pub mod args;
pub mod config;
pub mod error;
pub mod generator;
pub mod registry;

pub use api::{router, AppState, HandlerSettings};
pub use error::ServiceError;
pub use registry::{AccountRegistry, SharedRegistry};
