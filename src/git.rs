use std::{
    path::PathBuf,
    process::{Command, Output},
};

use tracing::debug;

use crate::error::AppError;

/// Name of the git executable
#[cfg(windows)]
pub const GIT_PROGRAM: &str = "git.exe";
#[cfg(not(windows))]
pub const GIT_PROGRAM: &str = "git";

/// Runs git commands on behalf of the activation engine
pub trait ConfigGateway {
    /// Runs git with `args`, returning combined stdout and stderr
    ///
    /// A non-zero exit is reported as [`AppError::GitCommand`] carrying the
    /// trimmed output.
    fn run(&self, args: &[&str]) -> Result<Vec<u8>, AppError>;

    /// Checks if the working directory is inside a Git repository
    ///
    /// Only a failing `rev-parse` means "no repository"; a git executable that
    /// cannot be started is reported as an error.
    fn is_inside_repo(&self) -> Result<bool, AppError> {
        match self.run(&["rev-parse", "--git-dir"]) {
            Ok(_) => Ok(true),
            Err(AppError::GitCommand(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Reads a repository-local config key
    ///
    /// # Arguments
    /// * `key` - Git config key (user.name, user.email, ...)
    fn get_local(&self, key: &str) -> Result<String, AppError> {
        let output: Vec<u8> = self.run(&["config", "--local", key])?;
        Ok(String::from_utf8_lossy(&output).trim().to_string())
    }

    /// Writes a repository-local config key
    ///
    /// # Arguments
    /// * `key` - Git config key to set
    /// * `value` - Value to set for key
    fn set_local(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.run(&["config", "--local", key, value])?;
        Ok(())
    }
}

/// Gateway backed by the `git` executable on `PATH`
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    work_dir: Option<PathBuf>,
}

impl GitCli {
    /// Runs git in the process working directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs git in `dir` instead of the process working directory
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: Some(dir.into()),
        }
    }
}

impl ConfigGateway for GitCli {
    fn run(&self, args: &[&str]) -> Result<Vec<u8>, AppError> {
        let mut command = Command::new(GIT_PROGRAM);
        command.args(args);
        if let Some(dir) = &self.work_dir {
            command.current_dir(dir);
        }

        debug!(?args, "running git");
        let git_command_output: Output = command.output().map_err(AppError::GitSpawn)?;

        let mut combined: Vec<u8> = git_command_output.stdout;
        combined.extend_from_slice(&git_command_output.stderr);

        if !git_command_output.status.success() {
            debug!(?args, status = %git_command_output.status, "git failed");
            return Err(AppError::GitCommand(format!(
                "{}: {}",
                git_command_output.status,
                String::from_utf8_lossy(&combined).trim()
            )));
        }

        Ok(combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn git_available() -> bool {
        Command::new(GIT_PROGRAM).arg("--version").output().is_ok()
    }

    #[test]
    fn failed_command_carries_output() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let err = GitCli::in_dir(dir.path())
            .run(&["no-such-subcommand"])
            .unwrap_err();

        match err {
            AppError::GitCommand(message) => assert!(message.contains("no-such-subcommand")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_executable_is_a_spawn_error() {
        struct MissingGit;

        impl ConfigGateway for MissingGit {
            fn run(&self, _args: &[&str]) -> Result<Vec<u8>, AppError> {
                Err(AppError::GitSpawn(std::io::Error::from(
                    std::io::ErrorKind::NotFound,
                )))
            }
        }

        assert!(matches!(MissingGit.is_inside_repo(), Err(AppError::GitSpawn(_))));
    }

    #[test]
    fn local_config_round_trips_in_fresh_repo() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let gateway = GitCli::in_dir(dir.path());
        gateway.run(&["init", "--quiet"]).unwrap();

        assert!(gateway.is_inside_repo().unwrap());
        gateway.set_local("user.name", "Round Trip").unwrap();
        assert_eq!(gateway.get_local("user.name").unwrap(), "Round Trip");
        assert!(gateway.get_local("user.signingkey").is_err());
    }
}
