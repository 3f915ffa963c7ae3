use std::{ffi::OsStr, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use clap_complete::{
    Shell,
    engine::{ArgValueCompleter, CompletionCandidate},
};

use crate::storage::ProfileStore;

/// Environment variable naming the profiles file, same as `--config`
pub const CONFIG_ENV: &str = "GITPROFILE_CONFIG";

/// CLI arguments parser using `clap`
#[derive(Parser, Debug)]
#[command(name = "gitprofile", version, about = "Manage git identity profiles per repository")]
pub struct Cli {
    /// Profiles file to use instead of ~/.gitprofiles.json
    #[arg(long, global = true, env = CONFIG_ENV, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand chosen to execute, interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Adds a profile, replacing any profile with the same name
    Add {
        /// Name to store the profile under
        profile_name: String,
        #[command(flatten)]
        fields: ProfileFields,
    },
    /// Applies a profile to the current repository's local config
    Use {
        /// Profile to activate
        #[arg(add = ArgValueCompleter::new(complete_profile_names))]
        profile_name: String,
    },
    /// Changes fields of an existing profile
    Edit {
        /// Profile to edit
        #[arg(add = ArgValueCompleter::new(complete_profile_names))]
        profile_name: String,
        /// Git user name
        #[arg(long)]
        name: Option<String>,
        /// Git email
        #[arg(long)]
        email: Option<String>,
        /// GPG key id, pass an empty string to clear
        #[arg(long)]
        gpg_key: Option<String>,
        /// SSH key file path, pass an empty string to clear
        #[arg(long)]
        ssh_key: Option<String>,
        /// Enable or disable commit signing
        #[arg(long, value_name = "BOOL")]
        sign: Option<bool>,
    },
    /// Deletes a profile
    Delete {
        /// Profile to delete
        #[arg(add = ArgValueCompleter::new(complete_profile_names))]
        profile_name: String,
    },
    /// Displays all stored profiles
    List,
    /// Displays the profile active in the current repository
    Status,
    /// Prints a shell completion script
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Fields of a new profile
#[derive(Args, Debug)]
pub struct ProfileFields {
    /// Git user name
    #[arg(long)]
    pub name: String,
    /// Git email
    #[arg(long)]
    pub email: String,
    /// GPG key id
    #[arg(long, default_value = "")]
    pub gpg_key: String,
    /// SSH key file path (e.g. ~/.ssh/id_rsa)
    #[arg(long, default_value = "")]
    pub ssh_key: String,
    /// Enable commit signing
    #[arg(long)]
    pub sign: bool,
}

/// Completes stored profile names for `use`, `edit` and `delete`
///
/// Completion runs before arguments are parsed, so `--config` is not seen
/// here; only `GITPROFILE_CONFIG` and the default path are.
fn complete_profile_names(current: &OsStr) -> Vec<CompletionCandidate> {
    let store: ProfileStore = match std::env::var_os(CONFIG_ENV) {
        Some(path) => ProfileStore::at(path),
        None => match ProfileStore::open_default() {
            Ok(store) => store,
            Err(_) => return Vec::new(),
        },
    };
    profile_name_candidates(&store, current)
}

/// Stored profile names starting with `current`, empty if the store is unreadable
pub fn profile_name_candidates(
    store: &ProfileStore,
    current: &OsStr,
) -> Vec<CompletionCandidate> {
    let Some(prefix) = current.to_str() else {
        return Vec::new();
    };
    let Ok(profiles) = store.load() else {
        return Vec::new();
    };

    profiles
        .into_iter()
        .filter(|(profile_name, _)| profile_name.starts_with(prefix))
        .map(|(profile_name, profile)| {
            CompletionCandidate::new(profile_name).help(Some(profile.email.into()))
        })
        .collect()
}
