//! Directory client trait.

use async_trait::async_trait;
use mc_model::{GroupId, Identity, MembershipSet};

use crate::error::DirectoryResult;

/// Read access to a directory's group membership and reporting lines.
///
/// Implementations return user identities only. Non-user objects (nested
/// groups, devices, service principals) and users without a usable identity
/// are dropped while mapping the directory's response.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Lists the members of a group.
    ///
    /// ## Errors
    ///
    /// Returns `DirectoryError::NotFound` if the group does not exist, or
    /// `DirectoryError::Unavailable` if the directory cannot be reached.
    async fn list_group_members(&self, group: &GroupId) -> DirectoryResult<MembershipSet>;

    /// Lists the direct reports of a user, in the order the directory
    /// returns them.
    ///
    /// ## Errors
    ///
    /// Returns `DirectoryError::NotFound` if the user has no directory
    /// record, or `DirectoryError::Unavailable` if the directory cannot be
    /// reached.
    async fn list_direct_reports(&self, manager: &Identity) -> DirectoryResult<Vec<Identity>>;
}
