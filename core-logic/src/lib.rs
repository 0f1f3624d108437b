//! # Core Logic - Shared Plumbing for Game Farmers
//!
//! This crate provides the pieces every farming client needs regardless of
//! which game API it talks to: account and proxy list loading, logging,
//! and the forever-cycle runner with its cancellable countdown.
//!
//! ## Modules
//!
//! - [`config`] - Proxy configuration records
//! - [`error`] - Typed error handling with thiserror
//! - [`traits`] - The [`CycleJob`] seam driven by the runner
//! - [`utils`] - Utility modules (accounts, proxies, logger, countdown, runner)

pub mod config;
pub mod error;
pub mod traits;
pub(crate) mod utils;

pub use config::ProxyConfig;
pub use error::{ConfigError, CoreError};
pub use traits::{CycleJob, CycleStats};

// Utils are pub(crate) - only export specific public utilities
pub use utils::{
    bind_proxies, countdown, setup_logger, AccountManager, CycleRunner, ProxyManager,
};
