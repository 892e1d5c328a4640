use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::ShellError;

const CONFIG_DIR: &str = ".lab1918";
const CONFIG_FILE: &str = "shell.toml";

pub const DEFAULT_PROFILE: &str = "default";
pub const EXPECTED_API_SERVER: &str = "api.lab1918.com";
pub const PLACEHOLDER_API_KEY: &str = "<replace with api key>";

/// Key/value settings of a single profile.
pub type Profile = BTreeMap<String, String>;

/// Profile-sectioned settings file under `~/.lab1918`.
#[derive(Debug, Clone)]
pub struct Config {
    config_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self, ShellError> {
        let home = dirs::home_dir().ok_or(ShellError::HomeDir)?;
        Ok(Self::at(home.join(CONFIG_DIR)))
    }

    pub fn at(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Writes the default profile with a placeholder key unless the file already exists.
    pub fn ensure_default_config(&self) -> Result<(), ShellError> {
        let config_file = self.config_file();
        if config_file.is_file() {
            return Ok(());
        }

        fs::create_dir_all(&self.config_dir).map_err(|source| ShellError::ConfigIo {
            path: self.config_dir.clone(),
            source,
        })?;
        write_table(&config_file, &default_table())?;
        tracing::info!(path = %config_file.display(), "created default config");
        Ok(())
    }

    /// Returns the named profile, or an empty mapping when the profile is absent.
    pub fn get_config(&self, profile: &str) -> Result<Profile, ShellError> {
        self.ensure_default_config()?;
        let table = read_table(&self.config_file())?;

        let Some(section) = table.get(profile).and_then(toml::Value::as_table) else {
            return Ok(Profile::new());
        };

        Ok(section
            .iter()
            .map(|(key, value)| (key.clone(), value_to_string(value)))
            .collect())
    }

    pub fn get(&self, profile: &str, key: &str) -> Result<Option<String>, ShellError> {
        Ok(self.get_config(profile)?.remove(key))
    }

    pub fn set(&self, profile: &str, key: &str, value: &str) -> Result<(), ShellError> {
        self.ensure_default_config()?;
        let config_file = self.config_file();
        let mut table = read_table(&config_file)?;

        let section = table
            .entry(profile.to_string())
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        let Some(section) = section.as_table_mut() else {
            return Err(ShellError::ConfigParse {
                path: config_file,
                message: format!("profile '{profile}' is not a table"),
            });
        };
        section.insert(key.to_string(), toml::Value::String(value.to_string()));

        write_table(&config_file, &table)
    }
}

/// Validated server address and key for one profile.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub base_url: Url,
    pub api_key: String,
}

impl Credentials {
    pub fn from_profile(
        profile_name: &str,
        profile: &Profile,
        config_file: &Path,
    ) -> Result<Self, ShellError> {
        let api_server = profile
            .get("api_server")
            .map(String::as_str)
            .unwrap_or_default();
        if api_server != EXPECTED_API_SERVER {
            return Err(ShellError::UnexpectedServer {
                found: api_server.to_string(),
                expected: EXPECTED_API_SERVER,
                path: config_file.to_path_buf(),
            });
        }

        let api_key = match profile.get("api_key").map(|key| key.trim()) {
            Some(PLACEHOLDER_API_KEY) => {
                return Err(ShellError::PlaceholderApiKey {
                    path: config_file.to_path_buf(),
                })
            }
            Some(key) if !key.is_empty() => key.to_string(),
            _ => {
                return Err(ShellError::MissingApiKey {
                    profile: profile_name.to_string(),
                    path: config_file.to_path_buf(),
                })
            }
        };

        let base_url = parse_base_url(&format!("https://{api_server}"))?;
        Ok(Self { base_url, api_key })
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }
}

pub fn parse_base_url(input: &str) -> Result<Url, ShellError> {
    Url::parse(input).map_err(|source| ShellError::InvalidUrl {
        url: input.to_string(),
        source,
    })
}

fn default_table() -> toml::Table {
    let mut profile = toml::Table::new();
    profile.insert(
        "api_server".to_string(),
        toml::Value::String(EXPECTED_API_SERVER.to_string()),
    );
    profile.insert(
        "api_key".to_string(),
        toml::Value::String(PLACEHOLDER_API_KEY.to_string()),
    );

    let mut table = toml::Table::new();
    table.insert(DEFAULT_PROFILE.to_string(), toml::Value::Table(profile));
    table
}

fn read_table(path: &Path) -> Result<toml::Table, ShellError> {
    let content = fs::read_to_string(path).map_err(|source| ShellError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|err| ShellError::ConfigParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

fn write_table(path: &Path, table: &toml::Table) -> Result<(), ShellError> {
    let content = toml::to_string_pretty(table).map_err(|err| ShellError::ConfigParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    fs::write(path, content).map_err(|source| ShellError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })
}

fn value_to_string(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
