//! The member → manager map produced by a resolution.

use std::collections::HashMap;

use mc_model::{Identity, MembershipSet};

use crate::error::{HierarchyError, HierarchyResult};

/// Maps each discovered group member to the manager it was found under.
///
/// Each member appears at most once; the first insertion wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyMap {
    entries: HashMap<Identity, Identity>,
}

impl HierarchyMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `member → manager` unless `member` already has an entry.
    ///
    /// Returns `true` if the entry was inserted.
    pub fn insert(&mut self, member: Identity, manager: Identity) -> bool {
        if self.entries.contains_key(&member) {
            return false;
        }
        self.entries.insert(member, manager);
        true
    }

    /// Checks whether a member has been discovered.
    #[must_use]
    pub fn contains(&self, member: &Identity) -> bool {
        self.entries.contains_key(member)
    }

    /// Returns the manager a member was discovered under.
    #[must_use]
    pub fn manager_of(&self, member: &Identity) -> Option<&Identity> {
        self.entries.get(member)
    }

    /// Returns the number of discovered members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether nothing was discovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `(member, manager)` pairs sorted by member.
    #[must_use]
    pub fn sorted(&self) -> Vec<(&Identity, &Identity)> {
        let mut pairs: Vec<_> = self.entries.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        pairs
    }

    /// Returns the management chain above `member`, nearest manager first,
    /// ending at the first manager that is not itself a key.
    ///
    /// Returns an empty chain for members that were not discovered.
    #[must_use]
    pub fn chain(&self, member: &Identity) -> Vec<&Identity> {
        let mut chain = Vec::new();
        let mut current = member;
        while let Some(manager) = self.entries.get(current) {
            chain.push(manager);
            if chain.len() > self.entries.len() {
                break;
            }
            current = manager;
        }
        chain
    }

    /// Checks the structural invariants of a resolution rooted at `root`.
    ///
    /// - every key is in `members`
    /// - `root` is never a key and no key maps to itself
    /// - every chain ends at `root`
    ///
    /// ## Errors
    ///
    /// Returns `HierarchyError::UnknownMember` or
    /// `HierarchyError::InvalidHierarchy` describing the first violation.
    pub fn verify(&self, root: &Identity, members: &MembershipSet) -> HierarchyResult<()> {
        if self.contains(root) {
            return Err(HierarchyError::InvalidHierarchy(format!(
                "root {root} has a manager entry"
            )));
        }

        for (member, manager) in self.sorted() {
            if !members.contains(member) {
                return Err(HierarchyError::UnknownMember(member.clone()));
            }
            if member == manager {
                return Err(HierarchyError::InvalidHierarchy(format!(
                    "{member} is its own manager"
                )));
            }
            let chain = self.chain(member);
            if chain.last().copied() != Some(root) {
                return Err(HierarchyError::InvalidHierarchy(format!(
                    "{member} does not report up to {root}"
                )));
            }
        }
        Ok(())
    }
}
