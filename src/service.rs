use rusqlite::{Connection, OptionalExtension, params_from_iter};
use time::OffsetDateTime;

use crate::query::{self, NoteFilter, Query};
use crate::{Database, Error, Note, NoteId, NoteSummary, Result, Tag, TagId, title_from_body};

/// Data-access operations over the notes store.
///
/// NoteService owns the Database and is the only layer that issues SQL.
/// Preconditions the store cannot express (the tag to link exists, the
/// rename target is free) are checked explicitly and reported as typed
/// errors instead of silently affecting zero rows.
///
/// # Examples
///
/// ```
/// use xnote::{Database, NoteService};
///
/// # fn main() -> xnote::Result<()> {
/// let service = NoteService::new(Database::in_memory()?);
/// let note = service.add_note(None, "Groceries\nmilk", &["home"])?.unwrap();
/// assert_eq!(note.title, "Groceries");
/// assert_eq!(note.tags, vec!["home"]);
/// # Ok(())
/// # }
/// ```
pub struct NoteService {
    db: Database,
}

impl NoteService {
    /// Creates a new NoteService with the given database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Returns a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Adds a note and links it to `tags`, creating missing tags.
    ///
    /// The title is `title` trimmed, or the first line of `body` when no
    /// title is given. A note whose title ends up empty is not inserted and
    /// `Ok(None)` is returned. The note, its tags and links are written in a
    /// single transaction.
    pub fn add_note(&self, title: Option<&str>, body: &str, tags: &[&str]) -> Result<Option<Note>> {
        let title = match title {
            Some(title) => title.trim().to_string(),
            None => title_from_body(body),
        };
        if title.is_empty() {
            tracing::debug!("skipping note without title");
            return Ok(None);
        }

        let tags = tags
            .iter()
            .map(|tag| validate_tag(tag))
            .collect::<Result<Vec<_>>>()?;

        let tx = self.db.connection().unchecked_transaction()?;
        execute(&tx, &query::insert_note(&title, body))?;
        let note_id = NoteId::new(tx.last_insert_rowid());
        for tag in &tags {
            let tag_id = ensure_tag(&tx, tag)?;
            execute(&tx, &query::link_note_tag(note_id, tag_id.get()))?;
        }
        tx.commit()?;

        tracing::info!("note {} added", note_id);
        self.get_note(note_id)
    }

    /// Retrieves a note with its tag names.
    ///
    /// Returns `None` if no note exists with the given ID.
    pub fn get_note(&self, id: NoteId) -> Result<Option<Note>> {
        let conn = self.db.connection();
        let select = query::select_note(id);

        let row = conn
            .query_row(&select.sql, params_from_iter(&select.params), |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .optional()?;

        let Some((id, time, title, body)) = row else {
            return Ok(None);
        };
        let id = NoteId::new(id);

        Ok(Some(Note {
            id,
            time: OffsetDateTime::from_unix_timestamp(time)?,
            title,
            body,
            tags: self.note_tags(id)?,
        }))
    }

    /// Returns the names of the tags linked to a note, in link order.
    pub fn note_tags(&self, id: NoteId) -> Result<Vec<String>> {
        let select = query::select_note_tags(id);
        let mut stmt = self.db.connection().prepare(&select.sql)?;
        let rows = stmt.query_map(params_from_iter(&select.params), |row| row.get(0))?;

        let mut names = Vec::new();
        for row in rows {
            names.push(row?);
        }
        Ok(names)
    }

    /// Lists the notes matching `filter`, oldest first.
    pub fn list_notes(&self, filter: &NoteFilter) -> Result<Vec<NoteSummary>> {
        let select = query::select_notes(filter);
        let mut stmt = self.db.connection().prepare(&select.sql)?;
        let rows = stmt.query_map(params_from_iter(&select.params), |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut notes = Vec::new();
        for row in rows {
            let (id, time, title) = row?;
            notes.push(NoteSummary {
                id: NoteId::new(id),
                time: OffsetDateTime::from_unix_timestamp(time)?,
                title,
            });
        }
        Ok(notes)
    }

    /// Returns the body of a note, for pre-filling the editor.
    pub fn note_body(&self, id: NoteId) -> Result<String> {
        self.get_note(id)?
            .map(|note| note.body)
            .ok_or(Error::NoteNotFound(id))
    }

    /// Replaces the title and body of a note.
    pub fn update_note(&self, id: NoteId, title: &str, body: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::EmptyTitle);
        }

        let changed = execute(self.db.connection(), &query::update_note(id, title, body))?;
        if changed == 0 {
            return Err(Error::NoteNotFound(id));
        }

        tracing::info!("note {} updated", id);
        Ok(())
    }

    /// Deletes a note and its tag links.
    ///
    /// Removing an id that does not exist is a no-op.
    pub fn remove_note(&self, id: NoteId) -> Result<()> {
        let removed = execute(self.db.connection(), &query::delete_note(id))?;
        tracing::debug!("removed {} note(s) with id {}", removed, id);
        Ok(())
    }

    /// Links an existing tag to an existing note.
    ///
    /// Annotating a note with a tag it already carries is a no-op.
    pub fn annotate_note(&self, id: NoteId, tag: &str) -> Result<()> {
        let conn = self.db.connection();
        let tag = tag.trim();

        let exists = query::note_exists(id);
        let note_exists: bool =
            conn.query_row(&exists.sql, params_from_iter(&exists.params), |row| row.get(0))?;
        if !note_exists {
            return Err(Error::NoteNotFound(id));
        }

        let tag_id = find_tag(conn, tag)?.ok_or_else(|| Error::TagNotFound(tag.to_string()))?;
        execute(conn, &query::link_note_tag(id, tag_id.get()))?;
        Ok(())
    }

    /// Lists all tags in creation order.
    pub fn list_tags(&self) -> Result<Vec<Tag>> {
        let select = query::select_tags();
        let mut stmt = self.db.connection().prepare(&select.sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(Tag::new(TagId::new(row.get(0)?), row.get::<_, String>(1)?))
        })?;

        let mut tags = Vec::new();
        for row in rows {
            tags.push(row?);
        }
        Ok(tags)
    }

    /// Creates a tag unless it exists and returns its id either way.
    pub fn add_tag(&self, name: &str) -> Result<TagId> {
        let name = validate_tag(name)?;
        ensure_tag(self.db.connection(), name)
    }

    /// Deletes a tag and its links. Unknown tags are ignored.
    pub fn remove_tag(&self, name: &str) -> Result<()> {
        let removed = execute(self.db.connection(), &query::delete_tag(name.trim()))?;
        tracing::debug!("removed {} tag(s) named '{}'", removed, name);
        Ok(())
    }

    /// Renames a tag.
    ///
    /// Fails with [`Error::TagNotFound`] when `old` does not exist and with
    /// [`Error::TagConflict`] when `new` is already taken; neither case
    /// changes the store.
    pub fn rename_tag(&self, old: &str, new: &str) -> Result<()> {
        let old = old.trim();
        let new = validate_tag(new)?;

        let tx = self.db.connection().unchecked_transaction()?;
        if find_tag(&tx, old)?.is_none() {
            return Err(Error::TagNotFound(old.to_string()));
        }
        if old == new {
            return Ok(());
        }
        if find_tag(&tx, new)?.is_some() {
            return Err(Error::TagConflict(new.to_string()));
        }
        execute(&tx, &query::rename_tag(old, new))?;
        tx.commit()?;

        tracing::info!("tag '{}' renamed to '{}'", old, new);
        Ok(())
    }
}

fn execute(conn: &Connection, query: &Query) -> Result<usize> {
    Ok(conn.execute(&query.sql, params_from_iter(&query.params))?)
}

fn find_tag(conn: &Connection, name: &str) -> Result<Option<TagId>> {
    let select = query::select_tag_id(name);
    let id = conn
        .query_row(&select.sql, params_from_iter(&select.params), |row| row.get(0))
        .optional()?;
    Ok(id.map(TagId::new))
}

/// Inserts the tag if absent and returns its id.
fn ensure_tag(conn: &Connection, name: &str) -> Result<TagId> {
    execute(conn, &query::insert_tag_if_absent(name))?;
    find_tag(conn, name)?.ok_or_else(|| Error::TagNotFound(name.to_string()))
}

fn validate_tag(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() || name.contains(',') {
        return Err(Error::InvalidTag(name.to_string()));
    }
    Ok(name)
}
