//! Hierarchy resolution errors.

use mc_directory::DirectoryError;
use mc_model::{GroupId, Identity};
use thiserror::Error;

/// Errors that abort a resolution or reject its result.
#[derive(Debug, Error)]
pub enum HierarchyError {
    /// The group's membership could not be fetched; nothing can be resolved.
    #[error("failed to fetch members of group {group}: {source}")]
    GroupFetch {
        /// The group that was requested.
        group: GroupId,
        /// The directory failure.
        #[source]
        source: DirectoryError,
    },

    /// A hierarchy entry names someone outside the membership set.
    #[error("{0} is not a member of the group")]
    UnknownMember(Identity),

    /// A hierarchy entry is not rooted at the resolution root.
    #[error("invalid hierarchy: {0}")]
    InvalidHierarchy(String),
}

impl HierarchyError {
    /// Checks if the failure was caused by missing or rejected credentials.
    #[must_use]
    pub const fn is_authentication(&self) -> bool {
        match self {
            Self::GroupFetch { source, .. } => source.is_authentication(),
            _ => false,
        }
    }
}

/// Result type for hierarchy operations.
pub type HierarchyResult<T> = Result<T, HierarchyError>;
