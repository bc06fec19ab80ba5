//! User configuration loaded from a YAML file.
//!
//! ```yaml
//! database: sqlite:////home/me/notes.db
//! editor: /usr/bin/nvim
//! sql_echo: false
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

/// Editor used when the config does not name one.
pub const DEFAULT_EDITOR: &str = "/usr/bin/vi";

/// File name of the config in the user's home directory.
pub const CONFIG_FILE_NAME: &str = ".xnote.config.yml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Store connection string, see [`crate::StoreLocation::parse`].
    pub database: String,
    #[serde(default)]
    pub editor: Option<PathBuf>,
    /// Log every executed SQL statement.
    #[serde(default)]
    pub sql_echo: bool,
}

impl Config {
    /// Loads the config from `path`.
    ///
    /// A missing file is reported as [`Error::ConfigNotFound`] so the caller
    /// can stop before touching the store.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ConfigNotFound(path.to_path_buf()));
            }
            Err(source) => {
                return Err(Error::FileRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config = Self::from_yaml(&contents).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Default config location: `~/.xnote.config.yml`.
    ///
    /// Falls back to the working directory when no home directory is known.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_FILE_NAME)
    }

    /// The editor program, from the config or [`DEFAULT_EDITOR`].
    pub fn editor(&self) -> PathBuf {
        self.editor
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EDITOR))
    }
}
