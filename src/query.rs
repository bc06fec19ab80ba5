//! SQL construction for note and tag operations.
//!
//! Builders are pure: they turn filter parameters into SQL text plus the
//! values to bind, and never touch a connection.

use rusqlite::types::Value;

use crate::NoteId;

/// Filters shared by `ls` and `find`.
///
/// Every field is optional; an empty filter selects all notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    /// Smallest id to include.
    pub first: Option<NoteId>,
    /// Largest id to include.
    pub last: Option<NoteId>,
    /// Only notes linked to this tag; surrounding whitespace is ignored.
    pub tag: Option<String>,
    /// Only notes whose body contains this text, case-sensitively.
    pub word: Option<String>,
}

impl NoteFilter {
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_word(mut self, word: impl Into<String>) -> Self {
        self.word = Some(word.into());
        self
    }

    /// Restricts to the inclusive id range `[first, last]`.
    pub fn with_range(mut self, first: Option<NoteId>, last: Option<NoteId>) -> Self {
        self.first = first;
        self.last = last;
        self
    }
}

/// SQL text with its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Query {
    fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// Selects `(id, time, title)` of the notes matching `filter`, oldest first.
///
/// The tag filter joins through `note_tags`; the keyword uses `instr` so the
/// match is literal and case-sensitive.
pub fn select_notes(filter: &NoteFilter) -> Query {
    let mut sql = String::from("SELECT DISTINCT n.id, n.time, n.title FROM notes n");
    let mut conditions = Vec::new();
    let mut params = Vec::new();

    if let Some(tag) = &filter.tag {
        sql.push_str(
            " JOIN note_tags nt ON nt.note_id = n.id \
             JOIN tags t ON t.id = nt.tag_id",
        );
        conditions.push("t.tag = ?");
        params.push(Value::Text(tag.trim().to_string()));
    }
    if let Some(first) = filter.first {
        conditions.push("n.id >= ?");
        params.push(Value::Integer(first.get()));
    }
    if let Some(last) = filter.last {
        conditions.push("n.id <= ?");
        params.push(Value::Integer(last.get()));
    }
    if let Some(word) = &filter.word {
        conditions.push("instr(n.body, ?) > 0");
        params.push(Value::Text(word.clone()));
    }

    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql.push_str(" ORDER BY n.id");

    Query::new(sql, params)
}

/// Selects the full row of one note.
pub fn select_note(id: NoteId) -> Query {
    Query::new(
        "SELECT id, time, title, body FROM notes WHERE id = ?1",
        vec![Value::Integer(id.get())],
    )
}

/// Selects the names of the tags linked to one note, in link order.
pub fn select_note_tags(id: NoteId) -> Query {
    Query::new(
        "SELECT t.tag FROM note_tags nt \
         JOIN tags t ON t.id = nt.tag_id \
         WHERE nt.note_id = ?1 ORDER BY nt.rowid",
        vec![Value::Integer(id.get())],
    )
}

pub fn delete_note(id: NoteId) -> Query {
    Query::new(
        "DELETE FROM notes WHERE id = ?1",
        vec![Value::Integer(id.get())],
    )
}

pub fn insert_note(title: &str, body: &str) -> Query {
    Query::new(
        "INSERT INTO notes (title, body) VALUES (?1, ?2)",
        vec![Value::Text(title.to_string()), Value::Text(body.to_string())],
    )
}

pub fn update_note(id: NoteId, title: &str, body: &str) -> Query {
    Query::new(
        "UPDATE notes SET title = ?1, body = ?2 WHERE id = ?3",
        vec![
            Value::Text(title.to_string()),
            Value::Text(body.to_string()),
            Value::Integer(id.get()),
        ],
    )
}

/// Inserts the tag unless a tag with that name exists.
pub fn insert_tag_if_absent(tag: &str) -> Query {
    Query::new(
        "INSERT INTO tags (tag) SELECT ?1 \
         WHERE NOT EXISTS (SELECT 1 FROM tags WHERE tag = ?1)",
        vec![Value::Text(tag.to_string())],
    )
}

pub fn select_tags() -> Query {
    Query::new("SELECT id, tag FROM tags ORDER BY id", Vec::new())
}

pub fn select_tag_id(tag: &str) -> Query {
    Query::new(
        "SELECT id FROM tags WHERE tag = ?1",
        vec![Value::Text(tag.to_string())],
    )
}

pub fn delete_tag(tag: &str) -> Query {
    Query::new(
        "DELETE FROM tags WHERE tag = ?1",
        vec![Value::Text(tag.to_string())],
    )
}

pub fn rename_tag(old: &str, new: &str) -> Query {
    Query::new(
        "UPDATE tags SET tag = ?2 WHERE tag = ?1",
        vec![Value::Text(old.to_string()), Value::Text(new.to_string())],
    )
}

pub fn note_exists(id: NoteId) -> Query {
    Query::new(
        "SELECT EXISTS(SELECT 1 FROM notes WHERE id = ?1)",
        vec![Value::Integer(id.get())],
    )
}

/// Links a note to a tag; linking twice is a no-op.
pub fn link_note_tag(note_id: NoteId, tag_id: i64) -> Query {
    Query::new(
        "INSERT OR IGNORE INTO note_tags (note_id, tag_id) VALUES (?1, ?2)",
        vec![Value::Integer(note_id.get()), Value::Integer(tag_id)],
    )
}
