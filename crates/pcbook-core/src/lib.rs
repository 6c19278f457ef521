//! pcbook Core Library
//!
//! Shared functionality for pcbook components:
//! - Server configuration and TOML loading
//! - Tracing initialisation
//! - Common error types

pub mod config;
pub mod error;
pub mod tracing_init;

pub use config::Config;
pub use error::{Error, Result};
