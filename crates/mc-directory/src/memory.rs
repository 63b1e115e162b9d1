//! In-memory directory.
//!
//! A deterministic fixture store: groups and reporting lines are declared up
//! front, and individual lookups can be made to fail. Every query is
//! recorded so callers can assert on traversal order.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use mc_model::{GroupId, Identity, MembershipSet};
use parking_lot::Mutex;

use crate::client::DirectoryClient;
use crate::error::{DirectoryError, DirectoryResult};

/// A failure injected for one identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InjectedFailure {
    Unavailable,
    NotFound,
}

/// Directory backed by in-memory maps.
///
/// Users are known once they appear anywhere in the fixture (as a group
/// member, a manager or a report). Asking for the reports of an unknown user
/// fails with `DirectoryError::NotFound`; a known user without declared
/// reports has none.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    groups: HashMap<GroupId, Vec<Identity>>,
    reports: HashMap<Identity, Vec<Identity>>,
    known: HashSet<Identity>,
    failures: HashMap<Identity, InjectedFailure>,
    report_queries: Mutex<Vec<Identity>>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a group and its members.
    ///
    /// Blank group IDs or member names are ignored.
    #[must_use]
    pub fn with_group<I, S>(mut self, group: &str, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Ok(group) = GroupId::new(group) else {
            return self;
        };
        let members = parse_all(members);
        self.known.extend(members.iter().cloned());
        self.groups.insert(group, members);
        self
    }

    /// Declares the direct reports of a manager, in response order.
    ///
    /// Calling this twice for the same manager replaces the earlier list.
    #[must_use]
    pub fn with_reports<I, S>(mut self, manager: &str, reports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Ok(manager) = Identity::new(manager) else {
            return self;
        };
        let reports = parse_all(reports);
        self.known.insert(manager.clone());
        self.known.extend(reports.iter().cloned());
        self.reports.insert(manager, reports);
        self
    }

    /// Makes report lookups for `identity` fail as unavailable.
    #[must_use]
    pub fn with_unavailable(self, identity: &str) -> Self {
        self.with_failure(identity, InjectedFailure::Unavailable)
    }

    /// Makes report lookups for `identity` fail as not found.
    #[must_use]
    pub fn with_not_found(self, identity: &str) -> Self {
        self.with_failure(identity, InjectedFailure::NotFound)
    }

    fn with_failure(mut self, identity: &str, failure: InjectedFailure) -> Self {
        if let Ok(identity) = Identity::new(identity) {
            self.failures.insert(identity, failure);
        }
        self
    }

    /// Returns the managers whose reports were requested, in query order.
    #[must_use]
    pub fn report_queries(&self) -> Vec<Identity> {
        self.report_queries.lock().clone()
    }
}

fn parse_all<I, S>(values: I) -> Vec<Identity>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .filter_map(|v| Identity::new(v).ok())
        .collect()
}

#[async_trait]
impl DirectoryClient for InMemoryDirectory {
    async fn list_group_members(&self, group: &GroupId) -> DirectoryResult<MembershipSet> {
        self.groups
            .get(group)
            .map(|members| members.iter().cloned().collect())
            .ok_or_else(|| DirectoryError::not_found(format!("group {group}")))
    }

    async fn list_direct_reports(&self, manager: &Identity) -> DirectoryResult<Vec<Identity>> {
        self.report_queries.lock().push(manager.clone());

        match self.failures.get(manager) {
            Some(InjectedFailure::Unavailable) => {
                return Err(DirectoryError::unavailable(format!(
                    "injected failure for {manager}"
                )))
            }
            Some(InjectedFailure::NotFound) => {
                return Err(DirectoryError::not_found(format!("user {manager}")))
            }
            None => {}
        }

        if let Some(reports) = self.reports.get(manager) {
            return Ok(reports.clone());
        }
        if self.known.contains(manager) {
            return Ok(Vec::new());
        }
        Err(DirectoryError::not_found(format!("user {manager}")))
    }
}
