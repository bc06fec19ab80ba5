mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};

use crate::{Error, Result};
use schema::{INITIAL_SCHEMA, SCHEMA_VERSION};

/// Where the store lives, parsed from the configured connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    File(PathBuf),
}

impl StoreLocation {
    /// Parses a SQLite connection string.
    ///
    /// Accepts `sqlite:///relative.db`, `sqlite:////absolute.db`,
    /// `sqlite://` (in-memory), `:memory:` and bare file paths.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use xnote::StoreLocation;
    ///
    /// let loc = StoreLocation::parse("sqlite:////var/lib/notes.db").unwrap();
    /// assert_eq!(loc, StoreLocation::File(PathBuf::from("/var/lib/notes.db")));
    /// assert_eq!(StoreLocation::parse("sqlite://").unwrap(), StoreLocation::Memory);
    /// assert!(StoreLocation::parse("postgresql://localhost/notes").is_err());
    /// ```
    pub fn parse(uri: &str) -> Result<Self> {
        let uri = uri.trim();
        if uri == ":memory:" {
            return Ok(Self::Memory);
        }

        match uri.split_once("://") {
            Some(("sqlite", rest)) => {
                let path = rest.strip_prefix('/').unwrap_or(rest);
                if path.is_empty() || path == ":memory:" {
                    Ok(Self::Memory)
                } else {
                    Ok(Self::File(PathBuf::from(path)))
                }
            }
            Some(_) => Err(Error::UnsupportedDatabase(uri.to_string())),
            None if uri.is_empty() => Err(Error::UnsupportedDatabase(uri.to_string())),
            None => Ok(Self::File(PathBuf::from(uri))),
        }
    }
}

/// Result of `initdb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    /// The store already had a schema and was left untouched.
    AlreadyExists,
}

/// Database wrapper owning the single connection of the process.
///
/// The connection closes when the value drops.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens an in-memory SQLite database with the schema in place.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Creates the schema at `location` unless it already exists.
    ///
    /// Missing parent directories of a file store are created.
    pub fn initialize(location: &StoreLocation, sql_echo: bool) -> Result<InitOutcome> {
        let path = match location {
            StoreLocation::Memory => {
                Self::in_memory()?;
                return Ok(InitOutcome::Created);
            }
            StoreLocation::File(path) => path,
        };

        if path.exists() {
            let (_, version) = open_store_file(path, OpenFlags::default())?;
            if version >= SCHEMA_VERSION {
                return Ok(InitOutcome::AlreadyExists);
            }
        }

        ensure_database_directory(path)?;
        let (conn, _) = open_store_file(path, OpenFlags::default())?;
        let db = Self::connect(conn, sql_echo)?;
        db.initialize_schema()?;
        Ok(InitOutcome::Created)
    }

    /// Opens a store that `initdb` already created.
    ///
    /// Never creates a file: a missing file is [`Error::DatabaseMissing`] and
    /// a file without schema is [`Error::DatabaseNotInitialized`].
    pub fn open_existing(location: &StoreLocation, sql_echo: bool) -> Result<Self> {
        let path = match location {
            StoreLocation::Memory => {
                let db = Self::connect(Connection::open_in_memory()?, sql_echo)?;
                db.initialize_schema()?;
                return Ok(db);
            }
            StoreLocation::File(path) => path,
        };

        if !path.exists() {
            return Err(Error::DatabaseMissing(path.clone()));
        }

        let (conn, version) = open_store_file(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        if version < SCHEMA_VERSION {
            return Err(Error::DatabaseNotInitialized(path.clone()));
        }

        Self::connect(conn, sql_echo)
    }

    fn connect(mut conn: Connection, sql_echo: bool) -> Result<Self> {
        if sql_echo {
            conn.trace(Some(log_statement));
        }
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self { conn })
    }

    /// Executes the schema in a single transaction.
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute("PRAGMA foreign_keys = ON", [])?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(INITIAL_SCHEMA)?;
        tx.commit()?;
        Ok(())
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Opens a store file and reads its schema version.
///
/// SQLite opens lazily, so a directory or a non-database file only fails on
/// the first read; both count as [`Error::DatabaseUnavailable`].
fn open_store_file(path: &Path, flags: OpenFlags) -> Result<(Connection, i32)> {
    let unavailable = |source: rusqlite::Error| Error::DatabaseUnavailable {
        path: path.to_path_buf(),
        source,
    };
    let conn = Connection::open_with_flags(path, flags).map_err(unavailable)?;
    let version = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(unavailable)?;
    Ok((conn, version))
}

fn log_statement(sql: &str) {
    tracing::info!(target: "xnote::sql", "{sql}");
}

/// Ensures the parent directory of the database file exists.
fn ensure_database_directory(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
