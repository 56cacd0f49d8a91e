//! Application configuration module.
//!
//! Manages the TOML config file and resolves the Navitia API token
//! from the environment and local files.

#[allow(clippy::module_inception)]
mod config;
mod credentials;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use credentials::{ResolvedToken, TOKEN_ENV_VAR, resolve_token};
pub use paths::resolve_config_path;
