use std::{
    io,
    path::{Path, PathBuf},
};

use fs_err as fs;
use serde::Deserialize;
use thiserror::Error;

pub static CONFIG_FILENAME: &str = "atlaspack.toml";

/// Project settings, contained in an atlaspack.toml file. Anything set on the
/// command line takes priority over these.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    /// The directory or glob to read sprites from, relative to the working
    /// directory.
    pub input: Option<String>,
    pub out: Option<PathBuf>,
    pub name: Option<String>,
    pub format: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub padding: Option<u32>,
    pub max_atlases: Option<usize>,
    pub sort: Option<String>,
    pub scale: Option<f64>,
    pub bleed: Option<bool>,
}

impl Config {
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|source| ConfigError::Io { source })?;

        let config = toml::from_slice(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_owned(),
            source,
        })?;

        log::debug!("Read settings from {}", path.display());
        Ok(config)
    }

    /// Reads the project file in the given folder, or returns the default
    /// config if there isn't one.
    pub fn read_from_folder_or_default<P: AsRef<Path>>(folder_path: P) -> Result<Self, ConfigError> {
        match Self::read_from_file(folder_path.as_ref().join(CONFIG_FILENAME)) {
            Ok(config) => Ok(config),
            Err(err) if err.is_not_found() => Ok(Self::default()),
            Err(err) => Err(err),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{source} in {}", .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("couldn't read project file: {source}")]
    Io { source: io::Error },
}

impl ConfigError {
    /// Tells whether this ConfigError originated because of a path not
    /// existing.
    pub fn is_not_found(&self) -> bool {
        match self {
            ConfigError::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
