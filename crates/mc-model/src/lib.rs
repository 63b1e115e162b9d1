//! # mc-model
//!
//! Domain models for management-chain resolution.
//!
//! This crate defines the directory principals the rest of the workspace
//! passes around:
//! - [`Identity`]: a case-insensitive key for a directory user
//! - [`GroupId`]: an opaque group identifier
//! - [`MembershipSet`]: the fixed set of group members a resolution is
//!   constrained to

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod identity;
pub mod membership;

pub use error::{ModelError, ModelResult};
pub use identity::{GroupId, Identity};
pub use membership::MembershipSet;
