//! Command handlers shared by the CLI and the interactive menu.
//!
//! Handlers load the store fresh, mutate it, save it, and report to `out`.

use std::io::Write;

use clap::CommandFactory;
use colored::Colorize;
use tracing::debug;

use crate::{
    cli::{Cli, Commands, ProfileFields},
    engine,
    error::AppError,
    git::ConfigGateway,
    profile::{Profile, ProfileMap},
    storage::ProfileStore,
    validation::{validate_profile_name, validate_required},
};

/// Optional overrides applied by `edit`
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub gpg_key: Option<String>,
    pub ssh_key: Option<String>,
    pub sign_commits: Option<bool>,
}

impl ProfileChanges {
    fn apply(self, mut profile: Profile) -> Profile {
        if let Some(name) = self.name {
            profile.name = name;
        }
        if let Some(email) = self.email {
            profile.email = email;
        }
        if let Some(gpg_key) = self.gpg_key {
            profile.gpg_key = gpg_key;
        }
        if let Some(ssh_key) = self.ssh_key {
            profile.ssh_key = ssh_key;
        }
        if let Some(sign_commits) = self.sign_commits {
            profile.sign_commits = sign_commits;
        }
        profile
    }
}

/// Runs a parsed subcommand
pub fn execute<G, W>(
    command: Commands,
    store: &ProfileStore,
    git: &G,
    out: &mut W,
) -> Result<(), AppError>
where
    G: ConfigGateway,
    W: Write,
{
    debug!(?command, store = %store.path().display(), "executing command");
    match command {
        Commands::Add {
            profile_name,
            fields,
        } => add_profile(store, &profile_name, fields.into(), out),
        Commands::Use { profile_name } => use_profile(store, git, &profile_name, out),
        Commands::Edit {
            profile_name,
            name,
            email,
            gpg_key,
            ssh_key,
            sign,
        } => {
            let changes = ProfileChanges {
                name,
                email,
                gpg_key,
                ssh_key,
                sign_commits: sign,
            };
            edit_profile(store, &profile_name, changes, out)
        }
        Commands::Delete { profile_name } => delete_profile(store, &profile_name, out),
        Commands::List => list_profiles(store, out),
        Commands::Status => show_status(store, git, out),
        Commands::Completion { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "gitprofile", out);
            Ok(())
        }
    }
}

impl From<ProfileFields> for Profile {
    fn from(fields: ProfileFields) -> Self {
        Self {
            name: fields.name,
            email: fields.email,
            gpg_key: fields.gpg_key,
            sign_commits: fields.sign,
            ssh_key: fields.ssh_key,
        }
    }
}

fn validate_fields(profile: &Profile) -> Result<(), AppError> {
    validate_required("name", &profile.name)?;
    validate_required("email", &profile.email)
}

/// Adds a profile, replacing one with the same name
pub fn add_profile<W: Write>(
    store: &ProfileStore,
    profile_name: &str,
    profile: Profile,
    out: &mut W,
) -> Result<(), AppError> {
    validate_profile_name(profile_name)?;
    validate_fields(&profile)?;

    let message = match store.add(profile_name, profile)? {
        Some(_) => format!("profile '{profile_name}' replaced"),
        None => format!("profile '{profile_name}' added"),
    };
    writeln!(out, "{}", message.green())?;
    Ok(())
}

/// Activates a profile in the current repository
pub fn use_profile<G: ConfigGateway, W: Write>(
    store: &ProfileStore,
    git: &G,
    profile_name: &str,
    out: &mut W,
) -> Result<(), AppError> {
    let profiles: ProfileMap = store.load()?;
    engine::activate(git, &profiles, profile_name)?;
    writeln!(
        out,
        "{} {}",
        "activated profile in current repository:".green(),
        profile_name
    )?;
    Ok(())
}

/// Applies `changes` to a stored profile and saves the result
pub fn edit_profile<W: Write>(
    store: &ProfileStore,
    profile_name: &str,
    changes: ProfileChanges,
    out: &mut W,
) -> Result<(), AppError> {
    let profile: Profile = changes.apply(store.get(profile_name)?);
    validate_fields(&profile)?;
    store.update(profile_name, profile)?;
    writeln!(out, "{}", format!("profile '{profile_name}' updated").green())?;
    Ok(())
}

/// Deletes a stored profile
pub fn delete_profile<W: Write>(
    store: &ProfileStore,
    profile_name: &str,
    out: &mut W,
) -> Result<(), AppError> {
    store.delete(profile_name)?;
    writeln!(out, "{}", format!("profile '{profile_name}' deleted").green())?;
    Ok(())
}

/// Lists every stored profile
pub fn list_profiles<W: Write>(store: &ProfileStore, out: &mut W) -> Result<(), AppError> {
    let profiles: ProfileMap = store.load()?;
    if profiles.is_empty() {
        writeln!(out, "{}", "No profiles found".yellow())?;
        return Ok(());
    }

    for (profile_name, profile) in &profiles {
        writeln!(out, "{} {}", "Profile:".blue(), profile_name)?;
        write_profile_details(profile, out)?;
    }
    Ok(())
}

/// Shows the stored profile matching the current repository's identity
pub fn show_status<G: ConfigGateway, W: Write>(
    store: &ProfileStore,
    git: &G,
    out: &mut W,
) -> Result<(), AppError> {
    let profiles: ProfileMap = store.load()?;
    match engine::detect_active(git, &profiles) {
        Some((profile_name, profile)) => {
            writeln!(out, "{} {}", "Active profile:".blue(), profile_name)?;
            write_profile_details(profile, out)?;
        }
        None => writeln!(out, "{}", "No active profile found".yellow())?,
    }
    Ok(())
}

fn write_profile_details<W: Write>(profile: &Profile, out: &mut W) -> Result<(), AppError> {
    writeln!(out, "  Name: {}", profile.name)?;
    writeln!(out, "  Email: {}", profile.email)?;
    if !profile.gpg_key.is_empty() {
        writeln!(out, "  GPG Key: {}", profile.gpg_key)?;
    }
    if !profile.ssh_key.is_empty() {
        writeln!(out, "  SSH Key: {}", profile.ssh_key)?;
    }
    writeln!(out, "  Sign Commits: {}", profile.sign_commits)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    /// Gateway for tests that never reach git
    struct NoGit;

    impl ConfigGateway for NoGit {
        fn run(&self, args: &[&str]) -> Result<Vec<u8>, AppError> {
            Err(AppError::GitCommand(format!("git disabled in tests: {args:?}")))
        }
    }

    fn temp_store() -> (TempDir, ProfileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("profiles.json"));
        (dir, store)
    }

    fn output_of(store: &ProfileStore, command: Commands) -> Result<String, AppError> {
        let mut out: Vec<u8> = Vec::new();
        execute(command, store, &NoGit, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn add_command(profile_name: &str, name: &str, email: &str) -> Commands {
        Commands::Add {
            profile_name: profile_name.to_string(),
            fields: ProfileFields {
                name: name.to_string(),
                email: email.to_string(),
                gpg_key: String::new(),
                ssh_key: String::new(),
                sign: false,
            },
        }
    }

    #[test]
    fn list_shows_every_profile() {
        let (_dir, store) = temp_store();
        output_of(&store, add_command("profile1", "User 1", "user1@example.com")).unwrap();
        store
            .add("profile2", Profile {
                gpg_key: "ABC123".to_string(),
                sign_commits: true,
                ..Profile::new("User 2", "user2@example.com")
            })
            .unwrap();

        let listing = output_of(&store, Commands::List).unwrap();

        for expected in ["profile1", "profile2", "user1@example.com", "user2@example.com", "ABC123"] {
            assert!(listing.contains(expected), "missing {expected} in {listing}");
        }
    }

    #[test]
    fn list_on_empty_store_says_so() {
        let (_dir, store) = temp_store();
        assert!(output_of(&store, Commands::List).unwrap().contains("No profiles found"));
    }

    #[test]
    fn add_rejects_blank_email() {
        let (_dir, store) = temp_store();
        let err = output_of(&store, add_command("work", "Work", " ")).unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn add_reports_replacement() {
        let (_dir, store) = temp_store();
        output_of(&store, add_command("work", "Work", "work@example.com")).unwrap();

        let message = output_of(&store, add_command("work", "Work 2", "work2@example.com")).unwrap();

        assert!(message.contains("replaced"));
        assert_eq!(store.get("work").unwrap().name, "Work 2");
    }

    #[test]
    fn edit_overlays_only_given_fields() {
        let (_dir, store) = temp_store();
        store
            .add("work", Profile {
                ssh_key: "~/.ssh/id_work".to_string(),
                ..Profile::new("Work", "work@example.com")
            })
            .unwrap();

        output_of(&store, Commands::Edit {
            profile_name: "work".to_string(),
            name: None,
            email: Some("new@example.com".to_string()),
            gpg_key: Some("KEY1".to_string()),
            ssh_key: Some(String::new()),
            sign: Some(true),
        })
        .unwrap();

        let edited = store.get("work").unwrap();
        assert_eq!(edited.name, "Work");
        assert_eq!(edited.email, "new@example.com");
        assert_eq!(edited.gpg_key, "KEY1");
        assert!(edited.ssh_key.is_empty());
        assert!(edited.sign_commits);
    }

    #[test]
    fn edit_unknown_profile_fails() {
        let (_dir, store) = temp_store();
        let err = output_of(&store, Commands::Edit {
            profile_name: "ghost".to_string(),
            name: Some("Ghost".to_string()),
            email: None,
            gpg_key: None,
            ssh_key: None,
            sign: None,
        })
        .unwrap_err();

        assert!(matches!(err, AppError::ProfileNotFound(_)));
    }

    #[test]
    fn delete_unknown_profile_fails() {
        let (_dir, store) = temp_store();
        output_of(&store, add_command("work", "Work", "work@example.com")).unwrap();

        let err = output_of(&store, Commands::Delete {
            profile_name: "nonexistent".to_string(),
        })
        .unwrap_err();

        assert!(matches!(err, AppError::ProfileNotFound(_)));
        assert!(store.get("work").is_ok());
    }

    #[test]
    fn status_without_repository_reports_no_profile() {
        let (_dir, store) = temp_store();
        output_of(&store, add_command("work", "Work", "work@example.com")).unwrap();

        let status = output_of(&store, Commands::Status).unwrap();

        assert!(status.contains("No active profile found"));
    }

    #[test]
    fn use_outside_repository_fails() {
        let (_dir, store) = temp_store();
        output_of(&store, add_command("work", "Work", "work@example.com")).unwrap();

        let err = output_of(&store, Commands::Use {
            profile_name: "work".to_string(),
        })
        .unwrap_err();

        assert!(matches!(err, AppError::NotInGitRepository));
    }

    #[test]
    fn completion_script_mentions_subcommands() {
        let (_dir, store) = temp_store();
        let script = output_of(&store, Commands::Completion {
            shell: clap_complete::Shell::Bash,
        })
        .unwrap();

        assert!(script.contains("gitprofile"));
        assert!(script.contains("status"));
    }
}
