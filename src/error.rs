use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::NoteId;

/// Errors produced by the store, configuration and editor layers.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file does not exist.
    #[error("no config file found at {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// The configuration file exists but cannot be parsed.
    #[error("invalid config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The connection string names a store this tool cannot open.
    #[error("unsupported database: {0}")]
    UnsupportedDatabase(String),

    /// The store file does not exist.
    #[error("database {} does not exist", .0.display())]
    DatabaseMissing(PathBuf),

    /// The store file exists but SQLite cannot open or read it.
    #[error("cannot open database {}: {source}", .path.display())]
    DatabaseUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The store file exists but has no schema.
    #[error("database {} is not initialized, run `xnote initdb`", .0.display())]
    DatabaseNotInitialized(PathBuf),

    #[error("note {0} not found")]
    NoteNotFound(NoteId),

    #[error("tag '{0}' not found")]
    TagNotFound(String),

    /// Renaming would collide with an existing tag.
    #[error("tag '{0}' already exists")]
    TagConflict(String),

    #[error("invalid tag name '{0}'")]
    InvalidTag(String),

    #[error("note title cannot be empty")]
    EmptyTitle,

    /// The editor ran but exited unsuccessfully.
    #[error("editor {} exited with {status}", .editor.display())]
    EditorFailed { editor: PathBuf, status: ExitStatus },

    /// The editor process could not be started.
    #[error("failed to launch editor {}: {source}", .editor.display())]
    EditorLaunch {
        editor: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid timestamp: {0}")]
    Timestamp(#[from] time::error::ComponentRange),
}

impl Error {
    /// Returns true for failures caused by user input or environment rather
    /// than by the store or the operating system.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Error::Io(_) | Error::Sqlite(_) | Error::Timestamp(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
