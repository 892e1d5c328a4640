use anyhow::{Context, Result};
use inquire::{validator::Validation, Password, PasswordDisplayMode};
use std::error::Error;

use crate::config::PLACEHOLDER_API_KEY;

fn validate_api_key(input: &str) -> Validation {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Validation::Invalid("API key cannot be empty".into())
    } else if trimmed == PLACEHOLDER_API_KEY {
        Validation::Invalid("Please enter the API key issued for your account".into())
    } else {
        Validation::Valid
    }
}

/// Prompt for an API key without echoing it
pub fn prompt_api_key() -> Result<String> {
    let validator =
        |input: &str| -> Result<Validation, Box<dyn Error + Send + Sync>> { Ok(validate_api_key(input)) };

    let key = Password::new("API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_validator(validator)
        .prompt()
        .context("Failed to read API key input")?;

    Ok(key.trim().to_string())
}
