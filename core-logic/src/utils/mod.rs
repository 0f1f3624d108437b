//! # Utilities Module
//!
//! Internal utility modules for the core-logic crate.
//! These modules are marked as `pub(crate)` to enforce API boundaries.

pub(crate) mod account_manager;
pub(crate) mod timer;
pub(crate) mod logger;
pub(crate) mod proxy_manager;
pub(crate) mod runner;

pub use account_manager::AccountManager;
pub use timer::countdown;
pub use logger::setup_logger;
pub use proxy_manager::{bind_proxies, ProxyManager};
pub use runner::CycleRunner;
