//! # mc-hierarchy
//!
//! Resolves which members of a group report, directly or transitively, to a
//! given manager.
//!
//! - [`Resolver`]: depth-first traversal of the directory's reporting lines,
//!   restricted to a [`MembershipSet`](mc_model::MembershipSet)
//! - [`HierarchyMap`]: member → resolved manager, first discovery wins
//! - [`Report`]: the validated, sorted (member, manager) table

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod hierarchy;
pub mod report;
pub mod resolver;

pub use error::{HierarchyError, HierarchyResult};
pub use hierarchy::HierarchyMap;
pub use report::{Report, ReportRow, REPORT_HEADER};
pub use resolver::{resolve, resolve_group, BranchFailure, GroupResolution, Resolution, Resolver};
