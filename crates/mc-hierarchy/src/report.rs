//! Report emission.

use std::io::{self, Write};

use mc_model::{Identity, MembershipSet};

use crate::error::{HierarchyError, HierarchyResult};
use crate::hierarchy::HierarchyMap;

/// Header line of the text report.
pub const REPORT_HEADER: &str = "EmailAddress, ManagerEmailAddress";

/// One (member, manager) line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// The group member.
    pub member: Identity,
    /// The manager the member was discovered under.
    pub manager: Identity,
}

/// A validated hierarchy, sorted by member.
#[derive(Debug, Clone, Default)]
pub struct Report {
    rows: Vec<ReportRow>,
}

impl Report {
    /// Builds a report, checking every entry against the membership set.
    ///
    /// ## Errors
    ///
    /// Returns `HierarchyError::UnknownMember` for the first (in sorted
    /// order) entry whose member is not in `members`.
    pub fn new(hierarchy: &HierarchyMap, members: &MembershipSet) -> HierarchyResult<Self> {
        let rows = hierarchy
            .sorted()
            .into_iter()
            .map(|(member, manager)| {
                if members.contains(member) {
                    Ok(ReportRow {
                        member: member.clone(),
                        manager: manager.clone(),
                    })
                } else {
                    Err(HierarchyError::UnknownMember(member.clone()))
                }
            })
            .collect::<HierarchyResult<Vec<_>>>()?;

        Ok(Self { rows })
    }

    /// Returns the rows in output order.
    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Checks whether the report has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Writes the header and one `member, manager` line per row.
    ///
    /// ## Errors
    ///
    /// Propagates write failures.
    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{REPORT_HEADER}")?;
        for row in &self.rows {
            writeln!(out, "{}, {}", row.member, row.manager)?;
        }
        Ok(())
    }
}
