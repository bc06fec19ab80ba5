/// Version recorded in `PRAGMA user_version` once the schema exists.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete database schema for the notes store.
///
/// Uses CREATE TABLE/INDEX IF NOT EXISTS for idempotent execution.
/// Links are removed together with their note or tag.
pub const INITIAL_SCHEMA: &str = r#"
-- Notes table: creation time in unix seconds, filled in by the store
CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    time INTEGER NOT NULL DEFAULT (unixepoch()),
    title TEXT NOT NULL CHECK (title <> ''),
    body TEXT NOT NULL
);

-- Tags table: unique, case-sensitive labels
CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tag TEXT NOT NULL UNIQUE CHECK (tag <> '')
);

-- Junction table: links notes to tags (many-to-many)
CREATE TABLE IF NOT EXISTS note_tags (
    note_id INTEGER NOT NULL,
    tag_id INTEGER NOT NULL,
    PRIMARY KEY (note_id, tag_id),
    FOREIGN KEY (note_id) REFERENCES notes(id) ON DELETE CASCADE,
    FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
);

-- The primary key already serves lookups by note
CREATE INDEX IF NOT EXISTS idx_note_tags_tag ON note_tags(tag_id);

PRAGMA user_version = 1;
"#;
