//! # mc-cli
//!
//! Command-line front end for management-chain resolution.
//!
//! Given a group and a root manager, `mgmtchain` prints which group members
//! report to that manager, directly or transitively, and who each member's
//! manager is.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use config::CliConfig;
pub use error::{CliError, CliResult};
