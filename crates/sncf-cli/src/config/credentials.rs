//! API token resolution.
//!
//! Sources are tried in order and the first non-empty token wins:
//!
//! 1. `NAVITIA_API_TOKEN` environment variable
//! 2. `.claude/sncf-train-schedule.local.md` in the working directory
//! 3. `.env` in the working directory
//! 4. `api.token` in `config.toml`

use std::fmt;
use std::path::Path;

use super::config::AppConfig;

/// Environment variable holding the token.
pub const TOKEN_ENV_VAR: &str = "NAVITIA_API_TOKEN";

/// Settings file, relative to the working directory.
const SETTINGS_FILE: &str = ".claude/sncf-train-schedule.local.md";

/// Key of the token line in the settings file.
const SETTINGS_KEY: &str = "navitia_api_token:";

/// Where a token was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// Process environment.
    Env,
    /// `.claude/sncf-train-schedule.local.md`.
    SettingsFile,
    /// `.env`.
    DotEnv,
    /// `config.toml`.
    ConfigFile,
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env => write!(f, "environment"),
            Self::SettingsFile => write!(f, "{SETTINGS_FILE}"),
            Self::DotEnv => write!(f, ".env"),
            Self::ConfigFile => write!(f, "config.toml"),
        }
    }
}

/// A token and its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedToken {
    /// Raw token.
    pub value: String,
    /// Origin.
    pub source: TokenSource,
}

/// Strips surrounding whitespace and one layer of quotes.
fn clean_value(raw: &str) -> &str {
    raw.trim().trim_matches(|c| c == '\'' || c == '"')
}

/// Reads a file from the working directory, `None` when it is absent or unreadable.
fn read_optional(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "cannot read credential file");
            None
        }
    }
}

/// Extracts the token from settings-file content.
///
/// Only the first `navitia_api_token:` line counts.
#[must_use]
pub fn parse_settings_token(content: &str) -> Option<String> {
    let line = content
        .lines()
        .find(|line| line.starts_with(SETTINGS_KEY))?;
    let value = clean_value(line.get(SETTINGS_KEY.len()..)?);
    (!value.is_empty()).then(|| String::from(value))
}

/// Reads the first non-empty `NAVITIA_API_TOKEN` entry of a `.env` file.
///
/// The process environment is left untouched. Malformed lines are skipped.
fn dotenv_token(path: &Path) -> Option<String> {
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(err) if err.not_found() => return None,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "cannot read credential file");
            return None;
        }
    };

    entries
        .filter_map(|entry| {
            entry
                .inspect_err(|err| {
                    tracing::warn!(path = %path.display(), error = %err, "skipping .env entry");
                })
                .ok()
        })
        .find_map(|(key, value)| {
            let value = value.trim();
            (key == TOKEN_ENV_VAR && !value.is_empty()).then(|| String::from(value))
        })
}

/// Resolves the API token.
///
/// `env_value` is the current value of `NAVITIA_API_TOKEN`; `work_dir` is
/// where the settings and `.env` files are looked up.
#[must_use]
pub fn resolve_token(
    env_value: Option<String>,
    work_dir: &Path,
    config: &AppConfig,
) -> Option<ResolvedToken> {
    let found = |value: String, source: TokenSource| {
        tracing::debug!(%source, "API token resolved");
        Some(ResolvedToken { value, source })
    };

    if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
        return found(String::from(value.trim()), TokenSource::Env);
    }

    if let Some(value) =
        read_optional(&work_dir.join(SETTINGS_FILE)).and_then(|c| parse_settings_token(&c))
    {
        return found(value, TokenSource::SettingsFile);
    }

    if let Some(value) = dotenv_token(&work_dir.join(".env")) {
        return found(value, TokenSource::DotEnv);
    }

    if let Some(value) = config
        .api
        .token
        .as_deref()
        .map(clean_value)
        .filter(|v| !v.is_empty())
    {
        return found(String::from(value), TokenSource::ConfigFile);
    }

    None
}
