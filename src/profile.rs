use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Profiles keyed by profile name, ordered by key
pub type ProfileMap = BTreeMap<String, Profile>;

/// Git identity preset stored in the profiles file
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    /// Git username (user.name)
    pub name: String,
    /// Git email address (user.email)
    pub email: String,
    /// GPG signing key id (user.signingkey), empty when unset
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub gpg_key: String,
    /// Whether commits are signed (commit.gpgsign)
    #[serde(default)]
    pub sign_commits: bool,
    /// SSH private key path used for core.sshCommand, empty when unset
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ssh_key: String,
}

impl Profile {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    /// Value written to core.sshCommand, if an SSH key is set
    pub fn ssh_command(&self) -> Option<String> {
        (!self.ssh_key.is_empty()).then(|| format!("ssh -i {}", self.ssh_key))
    }

    /// Value written to commit.gpgsign
    pub fn gpgsign_value(&self) -> &'static str {
        if self.sign_commits { "true" } else { "false" }
    }
}
