//! Configuration for the prompt template service and CLI.
//!
//! [`load_and_apply`] fills the process environment from XDG `config.toml` and a project
//! `.env`, with priority **existing env > .env > XDG**. [`Settings::from_env`] then reads the
//! typed settings. With the `tracing-init` feature, [`tracing_init::init`] installs the shared
//! subscriber.

mod dotenv_file;
mod settings;
#[cfg(feature = "tracing-init")]
pub mod tracing_init;
mod xdg_toml;

use std::path::{Path, PathBuf};
use thiserror::Error;

pub use settings::{
    Settings, DEFAULT_MAX_TEMPLATE_BYTES, DEFAULT_REMOTE_URL, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SERVE_ADDR,
};

/// Application name used for the XDG directory (`~/.config/prompt-template/config.toml`).
pub const APP_NAME: &str = "prompt-template";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    Dotenv(#[from] dotenv::Error),
}

/// Path of the XDG config file for `app_name`, if a config directory is known.
pub fn xdg_config_path(app_name: &str) -> Option<PathBuf> {
    xdg_toml::config_path(app_name)
}

/// Loads XDG `config.toml` and the optional project `.env`, then sets environment variables
/// only for keys that are **not** already set.
///
/// When a key is missing from the process environment:
/// 1. the value from `.env` (current directory, or `override_dir` if given) is used,
/// 2. else the value from `$XDG_CONFIG_HOME/<app_name>/config.toml` `[env]`.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<(), LoadError> {
    let xdg_map = xdg_toml::load_env_map(app_name)?;
    let dotenv_map = dotenv_file::load_env_map(override_dir)?;

    let mut keys: std::collections::HashSet<&String> = xdg_map.keys().collect();
    keys.extend(dotenv_map.keys());

    let mut applied = 0usize;
    for key in keys {
        if std::env::var_os(key).is_some() {
            continue;
        }
        if let Some(v) = dotenv_map.get(key).or_else(|| xdg_map.get(key)) {
            std::env::set_var(key, v);
            applied += 1;
        }
    }
    tracing::debug!(app_name, applied, "configuration applied to environment");
    Ok(())
}
