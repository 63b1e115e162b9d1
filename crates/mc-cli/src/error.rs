//! CLI error types.

use mc_directory::DirectoryError;
use mc_hierarchy::HierarchyError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Missing or rejected credentials.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The group's membership could not be fetched.
    #[error("group fetch failed: {0}")]
    GroupFetch(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Directory error outside the categories above.
    #[error(transparent)]
    Directory(DirectoryError),

    /// Resolution produced an inconsistent result.
    #[error(transparent)]
    Hierarchy(HierarchyError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Returns the process exit code for this error.
    ///
    /// Usage errors exit with 2, authentication failures with 3, group fetch
    /// failures with 4 and everything else with 1.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => 2,
            Self::Auth(_) => 3,
            Self::GroupFetch(_) => 4,
            _ => 1,
        }
    }
}

impl From<DirectoryError> for CliError {
    fn from(err: DirectoryError) -> Self {
        if err.is_authentication() {
            return Self::Auth(err.to_string());
        }
        match err {
            DirectoryError::Configuration(msg) => Self::Config(msg),
            other => Self::Directory(other),
        }
    }
}

impl From<HierarchyError> for CliError {
    fn from(err: HierarchyError) -> Self {
        if err.is_authentication() {
            return Self::Auth(err.to_string());
        }
        match err {
            HierarchyError::GroupFetch { .. } => Self::GroupFetch(err.to_string()),
            other => Self::Hierarchy(other),
        }
    }
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
