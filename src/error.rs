use std::path::PathBuf;

use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Error reading or writing the profiles file
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Error when the home directory cannot be determined
    #[error("failed to find the home directory")]
    HomeDirNotFound,
    /// Error when the profiles file is not a valid profile map
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Error when the git executable cannot be started
    #[error("failed to run git: {0}")]
    GitSpawn(#[source] std::io::Error),
    /// Error when a git command exits unsuccessfully
    #[error("git command failed: {0}")]
    GitCommand(String),
    /// Error when one step of profile activation fails
    #[error("failed to set {key}: {source}")]
    ConfigWrite {
        key: String,
        #[source]
        source: Box<AppError>,
    },
    /// Error when current directory is not a Git repository
    #[error("not a git repository (or any of the parent directories)")]
    NotInGitRepository,
    /// Error when a profile name is not in the store
    #[error("profile '{0}' not found")]
    ProfileNotFound(String),
    /// Error during input validation
    #[error("validation error: {0}")]
    Validation(String),
    /// Error writing command output
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
    /// Error when user input fails
    #[error("inquire error: {0}")]
    Inquire(#[from] inquire::InquireError),
}
