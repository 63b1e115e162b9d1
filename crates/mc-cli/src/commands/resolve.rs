//! The resolve command.

use std::io::Write;

use mc_directory::{DirectoryClient, GraphDirectory};
use mc_hierarchy::{BranchFailure, Report, Resolver};
use mc_model::{GroupId, Identity};

use crate::cli::Cli;
use crate::output::{warning, write_report};
use crate::{CliConfig, CliError, CliResult};

/// A report and the traversal details needed to judge its completeness.
#[derive(Debug)]
pub struct ResolvedReport {
    /// The sorted report.
    pub report: Report,
    /// Branches that could not be expanded.
    pub failures: Vec<BranchFailure>,
    /// Number of direct-reports lookups issued.
    pub queries: usize,
}

/// Runs the resolve command against Microsoft Graph and prints the report.
///
/// ## Errors
///
/// Returns `CliError::InvalidArgument` for a blank group or manager,
/// `CliError::Auth` if credentials are missing or rejected and
/// `CliError::GroupFetch` if the membership cannot be listed. Failed
/// branches are reported as warnings, not errors.
pub async fn run_resolve(cli: &Cli, config: &CliConfig) -> CliResult<()> {
    let group = GroupId::new(&cli.group_id)
        .map_err(|e| CliError::InvalidArgument(format!("group: {e}")))?;
    let manager = Identity::new(&cli.manager)
        .map_err(|e| CliError::InvalidArgument(format!("manager: {e}")))?;
    if !manager.is_email_like() {
        tracing::warn!(manager = %manager, "Manager does not look like a mail address");
    }

    let directory = GraphDirectory::new(config.graph_config(cli)?)?;
    directory.authenticate().await?;

    let resolved = resolve_report(&directory, &group, &manager, cli.max_depth).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_report(&resolved.report, config.effective_output(cli.output), &mut out)?;
    out.flush()?;

    tracing::debug!(
        group = %group,
        rows = resolved.report.len(),
        queries = resolved.queries,
        failed_branches = resolved.failures.len(),
        "Report written"
    );
    if !resolved.failures.is_empty() {
        warning(&format!(
            "{} branch(es) could not be expanded; the report may be incomplete",
            resolved.failures.len()
        ));
        for failure in &resolved.failures {
            warning(&format!("  {}: {}", failure.manager, failure.error));
        }
    }
    Ok(())
}

/// Resolves `group` under `manager` and builds the report.
///
/// ## Errors
///
/// Returns `CliError::GroupFetch` (or `CliError::Auth`) if the membership
/// cannot be listed.
pub async fn resolve_report<D: DirectoryClient + ?Sized>(
    directory: &D,
    group: &GroupId,
    manager: &Identity,
    max_depth: Option<usize>,
) -> CliResult<ResolvedReport> {
    let mut resolver = Resolver::new(directory);
    if let Some(depth) = max_depth {
        resolver = resolver.with_max_depth(depth);
    }

    let outcome = resolver.resolve_group(group, manager).await?;
    let report = outcome.report()?;

    Ok(ResolvedReport {
        report,
        failures: outcome.resolution.failures,
        queries: outcome.resolution.queries,
    })
}
