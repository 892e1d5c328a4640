use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Failures surfaced by the config loader, the API client and payload parsing.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("failed to determine home directory")]
    HomeDir,

    #[error("failed to access config file {path}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("config proper api key at {path}!")]
    PlaceholderApiKey { path: PathBuf },

    #[error("no api key for profile '{profile}', set one in {path}")]
    MissingApiKey { profile: String, path: PathBuf },

    #[error("unexpected api server '{found}' in {path}, expected '{expected}'")]
    UnexpectedServer {
        found: String,
        expected: &'static str,
        path: PathBuf,
    },

    #[error("invalid api url '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API error ({status}): {body}")]
    Http { status: StatusCode, body: String },

    #[error("invalid input: {0}")]
    Input(String),
}

impl ShellError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }
}

/// Joins an error and its causes with `: `, skipping causes whose text is already shown.
///
/// reqwest folds its own sources into its message, so a plain `{:#}` repeats them.
pub fn display_message(err: &anyhow::Error) -> String {
    let mut message = String::new();
    for cause in err.chain() {
        let text = cause.to_string();
        if message.contains(&text) {
            continue;
        }
        if !message.is_empty() {
            message.push_str(": ");
        }
        message.push_str(&text);
    }
    message
}
