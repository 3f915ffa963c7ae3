//! Applying stored profiles to a repository's local git config, and working
//! out which stored profile a repository currently uses.

use tracing::{debug, info};

use crate::{
    error::AppError,
    git::ConfigGateway,
    profile::{Profile, ProfileMap},
};

/// Config writes that make up activating `profile`, in the order applied
pub fn planned_writes(profile: &Profile) -> Vec<(&'static str, String)> {
    let mut writes: Vec<(&'static str, String)> = vec![
        ("user.name", profile.name.clone()),
        ("user.email", profile.email.clone()),
    ];
    if !profile.gpg_key.is_empty() {
        writes.push(("user.signingkey", profile.gpg_key.clone()));
    }
    writes.push(("commit.gpgsign", profile.gpgsign_value().to_string()));
    if let Some(ssh_command) = profile.ssh_command() {
        writes.push(("core.sshCommand", ssh_command));
    }
    writes
}

/// Writes the named profile into the repository's local config
///
/// Nothing is written unless the working directory is a repository and the
/// profile exists with a name and email. Writes are applied one at a time; if
/// one fails the earlier ones stay applied.
pub fn activate<G: ConfigGateway + ?Sized>(
    gateway: &G,
    profiles: &ProfileMap,
    profile_name: &str,
) -> Result<(), AppError> {
    if !gateway.is_inside_repo()? {
        return Err(AppError::NotInGitRepository);
    }

    let profile: &Profile = profiles
        .get(profile_name)
        .ok_or_else(|| AppError::ProfileNotFound(profile_name.to_string()))?;

    if profile.name.is_empty() || profile.email.is_empty() {
        return Err(AppError::Validation(format!(
            "profile '{profile_name}' needs both a name and an email"
        )));
    }

    info!(profile = profile_name, "activating profile");
    for (key, value) in planned_writes(profile) {
        gateway
            .set_local(key, &value)
            .map_err(|source| AppError::ConfigWrite {
                key: key.to_string(),
                source: Box::new(source),
            })?;
    }
    info!(profile = profile_name, "profile activated");
    Ok(())
}

/// Finds the stored profile matching the repository's local identity
///
/// Returns `None` when the local user.name or user.email cannot be read, or
/// no profile matches both. With several matching profiles the first in key
/// order wins.
pub fn detect_active<'a, G: ConfigGateway + ?Sized>(
    gateway: &G,
    profiles: &'a ProfileMap,
) -> Option<(&'a str, &'a Profile)> {
    let (current_name, current_email) =
        match (gateway.get_local("user.name"), gateway.get_local("user.email")) {
            (Ok(name), Ok(email)) => (name, email),
            (Err(err), _) | (_, Err(err)) => {
                debug!(%err, "no local git identity");
                return None;
            }
        };

    profiles
        .iter()
        .find(|(_, profile)| profile.name == current_name && profile.email == current_email)
        .map(|(profile_name, profile)| (profile_name.as_str(), profile))
}
