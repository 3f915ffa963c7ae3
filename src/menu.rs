use std::io::{self, Write};

use colored::Colorize;
use inquire::{Confirm, Select};

use crate::{
    commands::{
        ProfileChanges, add_profile, delete_profile, edit_profile, list_profiles, show_status,
        use_profile,
    },
    error::AppError,
    git::ConfigGateway,
    profile::{Profile, ProfileMap},
    storage::ProfileStore,
    validation::{
        BACK_OPTION, check_if_profiles_exist, prompt_until_valid, validate_profile_name,
        validate_required,
    },
};

/// Runs interactive menu interface
pub fn run_menu<G: ConfigGateway>(store: &ProfileStore, git: &G) -> Result<(), AppError> {
    let mut stdout = io::stdout();
    loop {
        let actions: Vec<&'static str> = vec![
            "use profile",
            "add profile",
            "edit profile",
            "delete profile",
            "show active profile",
            "show all profiles",
            "quit",
        ];

        let action_selected: &'static str =
            Select::new(&format!("{}", "select action".blue()), actions).prompt()?;

        let result: Result<(), AppError> = match action_selected {
            "use profile" => menu_use_profile(store, git, &mut stdout),
            "add profile" => menu_add_profile(store, &mut stdout),
            "edit profile" => menu_edit_profile(store, &mut stdout),
            "delete profile" => menu_delete_profile(store, &mut stdout),
            "show active profile" => show_status(store, git, &mut stdout),
            "show all profiles" => list_profiles(store, &mut stdout),
            "quit" => {
                println!("{}", "quitting".yellow());
                break Ok(());
            }
            _ => unreachable!("unexpected input"),
        };

        // Keep the menu alive for anything short of a broken prompt
        match result {
            Err(err @ AppError::Inquire(_)) => return Err(err),
            Err(err) => println!("{}", err.to_string().red()),
            Ok(()) => {}
        }
        stdout.flush()?;
    }
}

/// Menu for activating a profile
fn menu_use_profile<G: ConfigGateway>(
    store: &ProfileStore,
    git: &G,
    out: &mut impl Write,
) -> Result<(), AppError> {
    if let Some(profile_name) = select_profile(store, "select profile to use:")? {
        use_profile(store, git, &profile_name, out)?;
    }
    Ok(())
}

/// Menu for adding a new profile
fn menu_add_profile(store: &ProfileStore, out: &mut impl Write) -> Result<(), AppError> {
    let profile_name: String = prompt_until_valid(
        &format!("{}", "enter profile name:".blue()),
        None,
        validate_profile_name,
    )?;
    let profile: Profile = prompt_profile_fields(&Profile::default())?;
    add_profile(store, &profile_name, profile, out)
}

/// Menu for editing a profile, pre-filled with its current values
fn menu_edit_profile(store: &ProfileStore, out: &mut impl Write) -> Result<(), AppError> {
    let Some(profile_name) = select_profile(store, "select profile to edit:")? else {
        return Ok(());
    };
    let current: Profile = store.get(&profile_name)?;
    let edited: Profile = prompt_profile_fields(&current)?;

    let changes = ProfileChanges {
        name: Some(edited.name),
        email: Some(edited.email),
        gpg_key: Some(edited.gpg_key),
        ssh_key: Some(edited.ssh_key),
        sign_commits: Some(edited.sign_commits),
    };
    edit_profile(store, &profile_name, changes, out)
}

/// Menu for deleting a profile
fn menu_delete_profile(store: &ProfileStore, out: &mut impl Write) -> Result<(), AppError> {
    if let Some(profile_name) = select_profile(store, "select profile to delete:")? {
        delete_profile(store, &profile_name, out)?;
    }
    Ok(())
}

/// Prompts for every profile field, starting from `current`
fn prompt_profile_fields(current: &Profile) -> Result<Profile, AppError> {
    let name: String = prompt_until_valid(
        &format!("{}", "enter git username:".blue()),
        Some(current.name.as_str()),
        |input| validate_required("name", input),
    )?;
    let email: String = prompt_until_valid(
        &format!("{}", "enter git email:".blue()),
        Some(current.email.as_str()),
        |input| validate_required("email", input),
    )?;
    let gpg_key: String = prompt_until_valid(
        &format!("{}", "enter gpg key id (optional):".blue()),
        Some(current.gpg_key.as_str()),
        |_| Ok(()),
    )?;
    let ssh_key: String = prompt_until_valid(
        &format!("{}", "enter ssh key path (optional):".blue()),
        Some(current.ssh_key.as_str()),
        |_| Ok(()),
    )?;
    let sign_commits: bool = Confirm::new(&format!("{}", "sign commits?".blue()))
        .with_default(current.sign_commits)
        .prompt()?;

    Ok(Profile {
        name,
        email,
        gpg_key,
        sign_commits,
        ssh_key,
    })
}

/// Lets the user pick a stored profile, `None` when they choose back
fn select_profile(store: &ProfileStore, prompt: &str) -> Result<Option<String>, AppError> {
    let profiles: ProfileMap = store.load()?;
    check_if_profiles_exist(&profiles)?;

    let profile_names: Vec<String> = build_profile_list(&profiles);
    let selected: String = Select::new(&format!("{}", prompt.blue()), profile_names).prompt()?;

    Ok((selected != BACK_OPTION).then_some(selected))
}

/// Builds list of profile names for menu to display
pub fn build_profile_list(profiles: &ProfileMap) -> Vec<String> {
    let mut profile_names: Vec<String> = profiles.keys().cloned().collect();
    profile_names.push(BACK_OPTION.to_string());
    profile_names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_list_ends_with_back() {
        let profiles = ProfileMap::from([
            ("work".to_string(), Profile::new("W", "w@example.com")),
            ("home".to_string(), Profile::new("H", "h@example.com")),
        ]);

        assert_eq!(build_profile_list(&profiles), vec!["home", "work", BACK_OPTION]);
    }
}
