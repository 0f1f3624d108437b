//! PitchTalk farmer - keeps every account's farming slot busy
//!
//! Each cycle walks the account list in order. For every account it
//! authenticates with the Telegram init-data credential, starts, inspects or
//! claims the farming timer, and optionally starts and verifies promotional
//! tasks. Cycles repeat after a fixed wait (6 hours by default).
//!
//! # Architecture
//!
//! - **[`Credential`]**: extracts the Telegram id and username from the raw hash
//! - **[`Transport`]**: seam over HTTP; [`HttpTransport`] binds one proxy per account
//! - **[`PitchtalkApi`]**: typed calls, one per endpoint
//! - **[`farming`]** / **[`tasks`]**: the per-account decisions
//! - **[`session`]**: runs one account through all steps, fail-soft
//! - **[`FarmingDriver`]**: a [`core_logic::CycleJob`] over all accounts
//!
//! Configuration is loaded from `config/config.toml`; see [`PitchtalkConfig`].

pub mod api;
pub mod config;
pub mod credential;
pub mod driver;
pub mod error;
pub mod farming;
pub mod headers;
pub mod models;
pub mod session;
pub mod tasks;
pub mod transport;

pub use api::PitchtalkApi;
pub use config::PitchtalkConfig;
pub use credential::Credential;
pub use driver::FarmingDriver;
pub use error::PitchtalkError;
pub use farming::{FarmingOutcome, FarmingPhase};
pub use headers::HeaderProfile;
pub use models::{FarmingRecord, Session, Task, TaskStatus};
pub use session::{AccountReport, AccountState, Clock, SessionOptions, SystemClock};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
