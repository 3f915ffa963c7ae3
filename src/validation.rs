use colored::Colorize;
use inquire::Text;

use crate::{error::AppError, profile::ProfileMap};

/// Menu entry that returns to the previous menu, so never a profile name
pub const BACK_OPTION: &str = "back";
/// Maximum length for profile names
const MAX_PROFILE_NAME_LENGTH: usize = 64;

/// Prompts user for input until valid input is provided
///
/// `default` pre-fills the prompt, e.g. with a field's current value.
pub fn prompt_until_valid<F>(
    prompt_message: &str,
    default: Option<&str>,
    input_validation: F,
) -> Result<String, AppError>
where
    F: Fn(&str) -> Result<(), AppError>,
{
    loop {
        let mut prompt = Text::new(prompt_message);
        if let Some(default) = default {
            prompt = prompt.with_initial_value(default);
        }
        let input: String = prompt.prompt()?.trim().to_string();
        match input_validation(&input) {
            Ok(_) => break Ok(input),
            Err(AppError::Validation(msg)) => println!("{}", msg.red()),
            Err(e) => return Err(e),
        }
    }
}

/// Validates a required free-text field such as user.name or user.email
pub fn validate_required(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        Err(AppError::Validation(format!("{field} cannot be empty")))
    } else {
        Ok(())
    }
}

/// Validates a name for a new profile
pub fn validate_profile_name(profile_name: &str) -> Result<(), AppError> {
    if profile_name.trim().is_empty() {
        Err(AppError::Validation("profile name cannot be empty".to_string()))
    } else if profile_name.chars().count() > MAX_PROFILE_NAME_LENGTH {
        Err(AppError::Validation(format!(
            "profile name too long (max {MAX_PROFILE_NAME_LENGTH} characters)"
        )))
    } else if profile_name == BACK_OPTION {
        Err(AppError::Validation(format!("profile name cannot be '{BACK_OPTION}'")))
    } else {
        Ok(())
    }
}

/// Fails when there is nothing to pick from
pub fn check_if_profiles_exist(profiles: &ProfileMap) -> Result<(), AppError> {
    if profiles.is_empty() {
        return Err(AppError::Validation(
            "no profiles found, add one with 'gitprofile add'".to_string(),
        ));
    }
    Ok(())
}
