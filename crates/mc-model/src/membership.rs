//! Group membership sets.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// The members of a group, fixed for the duration of one resolution.
///
/// Lookups are case-insensitive because [`Identity`] hashes on its
/// lowercased key. There is no way to add members after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipSet {
    members: HashSet<Identity>,
}

impl MembershipSet {
    /// Creates an empty membership set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether an identity is a member.
    #[must_use]
    pub fn contains(&self, identity: &Identity) -> bool {
        self.members.contains(identity)
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Checks whether the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl FromIterator<Identity> for MembershipSet {
    fn from_iter<I: IntoIterator<Item = Identity>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}
