//! # Core Error Types
//!
//! Centralized error definitions for the core-logic crate.
//! All errors implement `std::error::Error` and `std::fmt::Display`.

use thiserror::Error;

/// Unified error type for core-logic operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A cycle job returned an error the runner cannot skip over.
    #[error("Cycle {cycle} aborted: {source}")]
    Cycle {
        cycle: u64,
        #[source]
        source: anyhow::Error,
    },
}

/// Configuration and input-file errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: '{field}'")]
    MissingField { field: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error reading {path}: {msg}")]
    IoError { path: String, msg: String },

    #[error("No accounts found in {path}")]
    NoAccounts { path: String },

    #[error("Proxy list has {proxies} entries but there are {accounts} accounts")]
    ProxyCountMismatch { accounts: usize, proxies: usize },
}
