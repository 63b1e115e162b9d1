//! Command implementations.

pub mod resolve;

pub use resolve::{resolve_report, run_resolve, ResolvedReport};
