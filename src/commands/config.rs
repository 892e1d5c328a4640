use std::io::Write;

use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::{Config, EXPECTED_API_SERVER, PLACEHOLDER_API_KEY};
use crate::prompts;

pub fn handle<W: Write>(
    config: &Config,
    profile: &str,
    command: ConfigCommands,
    out: &mut W,
) -> Result<()> {
    match command {
        ConfigCommands::Init => {
            config.ensure_default_config()?;
            let path = config.config_file();
            writeln!(out, "Config file: {}", path.display())?;

            let settings = config.get_config(profile)?;
            match settings.get("api_key").map(String::as_str) {
                Some(key) if !key.is_empty() && key != PLACEHOLDER_API_KEY => {
                    writeln!(out, "{} Profile '{profile}' is configured", "✓".green())?;
                }
                _ => {
                    writeln!(
                        out,
                        "{} config proper api key at {}!",
                        "!".yellow(),
                        path.display()
                    )?;
                    writeln!(out, "  Run 'lab1918 config login' to store one")?;
                }
            }
        }
        ConfigCommands::Set { key, value } => {
            config.set(profile, &key, &value)?;
            writeln!(
                out,
                "{} Configuration updated: {} = {}",
                "✓".green(),
                key,
                shown_value(&key, &value)
            )?;
        }
        ConfigCommands::Get { key } => match config.get(profile, &key)? {
            Some(val) => writeln!(out, "{}", val)?,
            None => writeln!(
                out,
                "Configuration key '{}' not found in profile '{}'",
                key, profile
            )?,
        },
        ConfigCommands::Login { api_key } => {
            let api_key = match api_key {
                Some(key) => key.trim().to_string(),
                None => prompts::prompt_api_key()?,
            };
            if api_key.is_empty() || api_key == PLACEHOLDER_API_KEY {
                anyhow::bail!("Refusing to store an empty or placeholder API key");
            }

            if config.get(profile, "api_server")?.is_none() {
                config.set(profile, "api_server", EXPECTED_API_SERVER)?;
            }
            config.set(profile, "api_key", &api_key)?;
            writeln!(
                out,
                "{} API key saved to profile '{}' in {}",
                "✓".green(),
                profile,
                config.config_file().display()
            )?;
        }
    }

    Ok(())
}

/// Secrets are echoed as a mask with at most their last four characters.
fn shown_value(key: &str, value: &str) -> String {
    if key != "api_key" {
        return value.to_string();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(8);
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("********{tail}")
}
