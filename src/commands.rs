//! Command dispatch: resolved commands in, plain text out.
//!
//! Every parameter arrives fully resolved from the argument layer; handlers
//! never fall back to reading arguments themselves.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::models::display_time;
use crate::query::NoteFilter;
use crate::{
    Config, Context, Database, Error, InitOutcome, Note, NoteId, NoteSummary, StoreLocation,
    title_from_body,
};

/// Where the body of a new note comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteSource {
    Body(String),
    /// Read the whole file; a missing file is an error.
    File(PathBuf),
    /// Open the editor on an empty buffer.
    Editor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ListTags,
    AddTag(String),
    RemoveTag(String),
    RenameTag {
        old: String,
        new: String,
    },
    ListNotes(NoteFilter),
    ShowNote(NoteId),
    /// Like `ListNotes`, but a single match is shown in full.
    FindNotes(NoteFilter),
    /// Updates directly when both title and body are given, otherwise goes
    /// through the editor. The title is re-derived from the edited text
    /// unless one was given explicitly.
    EditNote {
        id: NoteId,
        title: Option<String>,
        body: Option<String>,
    },
    AnnotateNote {
        id: NoteId,
        tag: String,
    },
    AddNote {
        source: NoteSource,
        title: Option<String>,
        tags: Vec<String>,
    },
    RemoveNote(NoteId),
}

/// Creates the store named in `config` unless it already exists.
pub fn init_db(config: &Config) -> Result<InitOutcome> {
    let location = StoreLocation::parse(&config.database)?;
    let outcome = Database::initialize(&location, config.sql_echo)
        .with_context(|| format!("Failed to initialize database {}", config.database))?;

    match outcome {
        InitOutcome::Created => tracing::info!("Initialized the database: {}", config.database),
        InitOutcome::AlreadyExists => {
            tracing::warn!("Database {} already exists!", config.database)
        }
    }
    Ok(outcome)
}

/// Runs one command against the context, writing its output to `out`.
pub fn run(ctx: &Context, command: Command, out: &mut impl Write) -> Result<()> {
    let service = ctx.service();

    match command {
        Command::ListTags => {
            for tag in service.list_tags()? {
                writeln!(out, "{:4}: {}", tag.id().get(), tag.name())?;
            }
        }
        Command::AddTag(name) => {
            service.add_tag(&name)?;
        }
        Command::RemoveTag(name) => service.remove_tag(&name)?,
        Command::RenameTag { old, new } => service.rename_tag(&old, &new)?,
        Command::ListNotes(filter) => {
            write_summaries(out, &service.list_notes(&filter)?)?;
        }
        Command::ShowNote(id) => show_note(ctx, id, out)?,
        Command::FindNotes(filter) => {
            let found = service.list_notes(&filter)?;
            match found.as_slice() {
                [single] => show_note(ctx, single.id, out)?,
                many => write_summaries(out, many)?,
            }
        }
        Command::EditNote { id, title, body } => edit_note(ctx, id, title, body)?,
        Command::AnnotateNote { id, tag } => service.annotate_note(id, &tag)?,
        Command::AddNote {
            source,
            title,
            tags,
        } => add_note(ctx, source, title, &tags, out)?,
        Command::RemoveNote(id) => service.remove_note(id)?,
    }

    Ok(())
}

fn show_note(ctx: &Context, id: NoteId, out: &mut impl Write) -> Result<()> {
    match ctx.service().get_note(id)? {
        Some(note) => write_note(out, &note)?,
        None => tracing::warn!("note {} not found", id),
    }
    Ok(())
}

fn add_note(
    ctx: &Context,
    source: NoteSource,
    title: Option<String>,
    tags: &[String],
    out: &mut impl Write,
) -> Result<()> {
    let body = match source {
        NoteSource::Body(body) => body,
        NoteSource::File(path) => match std::fs::read_to_string(&path) {
            Ok(body) => body,
            Err(source) => return Err(Error::FileRead { path, source }.into()),
        },
        NoteSource::Editor => ctx.editor().edit("")?,
    };

    let tag_refs: Vec<&str> = tags.iter().map(String::as_str).collect();
    let Some(note) = ctx
        .service()
        .add_note(title.as_deref(), &body, &tag_refs)
        .context("Failed to create note")?
    else {
        tracing::warn!("note has an empty title, nothing added");
        return Ok(());
    };

    writeln!(out, "note {} added", note.id)?;
    Ok(())
}

fn edit_note(
    ctx: &Context,
    id: NoteId,
    title: Option<String>,
    body: Option<String>,
) -> Result<()> {
    let (title, body) = match (title, body) {
        (Some(title), Some(body)) => (title, body),
        (title, body) => {
            let initial = match body {
                Some(body) => body,
                None => ctx.service().note_body(id)?,
            };
            let edited = ctx.editor().edit(&initial)?;
            let title = title.unwrap_or_else(|| title_from_body(&edited));
            (title, edited)
        }
    };

    ctx.service().update_note(id, &title, &body)?;
    Ok(())
}

fn write_summaries(out: &mut impl Write, notes: &[NoteSummary]) -> Result<()> {
    for note in notes {
        writeln!(
            out,
            "{:4}: [{}] {}",
            note.id.get(),
            display_time(note.time),
            note.title
        )?;
    }
    Ok(())
}

fn write_note(out: &mut impl Write, note: &Note) -> Result<()> {
    let separator = format!("# {}", "-".repeat(25));

    writeln!(
        out,
        "#{:5}: {} {}",
        note.id.get(),
        display_time(note.time),
        note.title
    )?;
    writeln!(out, "{separator}")?;
    if !note.tags.is_empty() {
        writeln!(out, "# TAGS: {}", note.tags.join(","))?;
        writeln!(out, "{separator}")?;
    }
    writeln!(out, "{}", note.body)?;
    Ok(())
}
