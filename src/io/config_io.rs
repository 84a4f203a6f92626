use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;

/// Error type for loading config.toml
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Get the default config file path, respecting XDG_CONFIG_HOME
pub fn default_config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".config"));
    config_dir.join("vcm").join("config.toml")
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Read the config file at `path`. A missing file yields defaults; relative
/// paths inside the file resolve against the file's directory.
pub fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let base = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut config = if path.exists() {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str::<AppConfig>(&text).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?
    } else {
        AppConfig::default()
    };

    resolve_paths(&mut config, &base);
    Ok(config)
}

/// Anchor every relative path in the config at `base`
pub fn resolve_paths(config: &mut AppConfig, base: &Path) {
    for path in [
        &mut config.cards.dir,
        &mut config.database.data_dir,
        &mut config.library.path,
        &mut config.log.dir,
    ] {
        if path.is_relative() {
            *path = base.join(&*path);
        }
    }
}
