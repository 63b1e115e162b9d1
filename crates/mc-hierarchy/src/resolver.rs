//! Group-constrained management-chain traversal.
//!
//! Starting from a root manager, the resolver walks the directory's
//! direct-reports relation depth-first in pre-order. A report is recorded and
//! expanded only if it is a group member that has not been seen yet, which
//! both bounds the walk and guards against cycles in the directory data.
//!
//! ## Duplicate resolution
//!
//! A member reachable under several managers keeps the manager it was first
//! found under. That depends on the order the directory returns reports in
//! and is therefore arbitrary; do not treat it as meaningful.

use mc_directory::{DirectoryClient, DirectoryError};
use mc_model::{GroupId, Identity, MembershipSet};

use crate::error::{HierarchyError, HierarchyResult};
use crate::hierarchy::HierarchyMap;
use crate::report::Report;

/// A direct-reports lookup that failed; its subtree was skipped.
#[derive(Debug)]
pub struct BranchFailure {
    /// The manager whose reports could not be listed.
    pub manager: Identity,
    /// Why the lookup failed.
    pub error: DirectoryError,
}

/// Outcome of one traversal.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Discovered members and their managers.
    pub hierarchy: HierarchyMap,
    /// Branches that could not be expanded.
    pub failures: Vec<BranchFailure>,
    /// Number of direct-reports lookups issued.
    pub queries: usize,
}

impl Resolution {
    /// Returns true if every lookup succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A traversal frame: a manager and the reports not yet visited.
struct Frame {
    manager: Identity,
    depth: usize,
    reports: std::vec::IntoIter<Identity>,
}

/// Depth-first hierarchy resolver.
pub struct Resolver<'a, D: DirectoryClient + ?Sized> {
    directory: &'a D,
    max_depth: Option<usize>,
}

impl<'a, D: DirectoryClient + ?Sized> Resolver<'a, D> {
    /// Creates a resolver over a directory.
    #[must_use]
    pub fn new(directory: &'a D) -> Self {
        Self {
            directory,
            max_depth: None,
        }
    }

    /// Limits how many levels below the root are recorded.
    ///
    /// Direct reports of the root are at depth 1. Members found deeper than
    /// `depth` are not recorded, and members at exactly `depth` are not
    /// expanded.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Resolves which `members` report to `root`.
    ///
    /// Lookup failures are recorded in
    /// [`Resolution::failures`]; they never abort the traversal.
    pub async fn resolve(&self, root: &Identity, members: &MembershipSet) -> Resolution {
        let mut resolution = Resolution::default();

        let Some(reports) = self.direct_reports(root, &mut resolution).await else {
            return resolution;
        };
        let mut stack = vec![Frame {
            manager: root.clone(),
            depth: 0,
            reports: reports.into_iter(),
        }];

        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };
            let Some(report) = frame.reports.next() else {
                stack.pop();
                continue;
            };
            let depth = frame.depth + 1;
            let manager = frame.manager.clone();

            if !members.contains(&report)
                || report == *root
                || resolution.hierarchy.contains(&report)
            {
                continue;
            }
            if self.max_depth.is_some_and(|max| depth > max) {
                continue;
            }

            tracing::trace!(member = %report, manager = %manager, depth, "Discovered member");
            resolution.hierarchy.insert(report.clone(), manager);

            if self.max_depth.is_some_and(|max| depth >= max) {
                continue;
            }
            if let Some(reports) = self.direct_reports(&report, &mut resolution).await {
                stack.push(Frame {
                    manager: report,
                    depth,
                    reports: reports.into_iter(),
                });
            }
        }

        tracing::info!(
            root = %root,
            discovered = resolution.hierarchy.len(),
            failed_branches = resolution.failures.len(),
            queries = resolution.queries,
            "Hierarchy resolved"
        );
        resolution
    }

    /// Fetches the members of `group` once, then resolves which of them
    /// report to `root`.
    ///
    /// ## Errors
    ///
    /// Returns `HierarchyError::GroupFetch` if the membership cannot be
    /// listed. Failures further down are recorded in the resolution instead.
    pub async fn resolve_group(
        &self,
        group: &GroupId,
        root: &Identity,
    ) -> HierarchyResult<GroupResolution> {
        let members = self
            .directory
            .list_group_members(group)
            .await
            .map_err(|source| HierarchyError::GroupFetch {
                group: group.clone(),
                source,
            })?;

        tracing::info!(group = %group, members = members.len(), "Fetched group membership");
        if members.is_empty() {
            tracing::warn!(group = %group, "Group has no user members with a mail address");
        }

        let resolution = self.resolve(root, &members).await;
        Ok(GroupResolution {
            group: group.clone(),
            members,
            resolution,
        })
    }

    /// Lists a manager's reports, recording the failure if the lookup fails.
    async fn direct_reports(
        &self,
        manager: &Identity,
        resolution: &mut Resolution,
    ) -> Option<Vec<Identity>> {
        resolution.queries += 1;
        match self.directory.list_direct_reports(manager).await {
            Ok(reports) => Some(reports),
            Err(error) => {
                tracing::debug!(
                    manager = %manager,
                    error = %error,
                    "Failed to fetch direct reports; skipping branch"
                );
                resolution.failures.push(BranchFailure {
                    manager: manager.clone(),
                    error,
                });
                None
            }
        }
    }
}

/// Resolves which `members` report to `root`, keeping only the map.
pub async fn resolve<D: DirectoryClient + ?Sized>(
    directory: &D,
    root: &Identity,
    members: &MembershipSet,
) -> HierarchyMap {
    Resolver::new(directory).resolve(root, members).await.hierarchy
}

/// A resolution together with the membership it was constrained to.
#[derive(Debug)]
pub struct GroupResolution {
    /// The group whose members were resolved.
    pub group: GroupId,
    /// The group's members at fetch time.
    pub members: MembershipSet,
    /// The traversal outcome.
    pub resolution: Resolution,
}

impl GroupResolution {
    /// Builds the sorted report.
    ///
    /// ## Errors
    ///
    /// Returns `HierarchyError::UnknownMember` if the hierarchy names a
    /// non-member, which the resolver never produces.
    pub fn report(&self) -> HierarchyResult<Report> {
        Report::new(&self.resolution.hierarchy, &self.members)
    }
}

/// Fetches the members of `group` and resolves which of them report to `root`.
///
/// ## Errors
///
/// Returns `HierarchyError::GroupFetch` if the membership cannot be listed.
pub async fn resolve_group<D: DirectoryClient + ?Sized>(
    directory: &D,
    group: &GroupId,
    root: &Identity,
) -> HierarchyResult<GroupResolution> {
    Resolver::new(directory).resolve_group(group, root).await
}
