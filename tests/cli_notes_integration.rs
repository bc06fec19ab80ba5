use anyhow::Result;
use xnote::commands::{self, Command, NoteSource};
use xnote::{Config, Context, Database, NoteFilter, NoteId, NoteService, StoreLocation};

/// Helper that mimics the `add -b` path of the CLI and returns its output.
fn add_note(ctx: &Context, body: &str, tags: &str) -> Result<String> {
    let mut out = Vec::new();
    commands::run(
        ctx,
        Command::AddNote {
            source: NoteSource::Body(body.to_string()),
            title: None,
            tags: xnote::parse_tags(tags),
        },
        &mut out,
    )?;
    Ok(String::from_utf8(out)?)
}

fn run(ctx: &Context, command: Command) -> Result<String> {
    let mut out = Vec::new();
    commands::run(ctx, command, &mut out)?;
    Ok(String::from_utf8(out)?)
}

/// Opens a file-backed store the way the binary does: initdb, then open.
fn file_context(dir: &std::path::Path) -> Result<Context> {
    let config = Config {
        database: format!("sqlite:///{}", dir.join("notes.db").display()),
        editor: None,
        sql_echo: false,
    };
    commands::init_db(&config)?;
    Ok(Context::open(config)?)
}

#[test]
fn test_add_then_show_round_trip() -> Result<()> {
    // Arrange: initialized store on disk
    let dir = tempfile::tempdir()?;
    let ctx = file_context(dir.path())?;

    // Act: add a two-line note and show it
    let added = add_note(&ctx, "Meeting notes\nDiscuss budget", "")?;
    let shown = run(&ctx, Command::ShowNote(NoteId::new(1)))?;

    // Assert: title is the first line and the body is intact
    assert_eq!(added, "note 1 added\n");
    let lines: Vec<&str> = shown.lines().collect();
    assert!(lines[0].ends_with(" Meeting notes"));
    assert_eq!(&lines[2..], ["Meeting notes", "Discuss budget"]);

    Ok(())
}

#[test]
fn test_notes_persist_across_contexts() -> Result<()> {
    let dir = tempfile::tempdir()?;
    {
        let ctx = file_context(dir.path())?;
        add_note(&ctx, "Persistent note", "keep")?;
    }

    // initdb again must not wipe anything
    let ctx = file_context(dir.path())?;
    let note = ctx.service().get_note(NoteId::new(1))?.expect("note should persist");
    assert_eq!(note.title, "Persistent note");
    assert_eq!(note.tags, vec!["keep"]);

    Ok(())
}

#[test]
fn test_find_with_tag_and_keyword() -> Result<()> {
    let service = NoteService::new(Database::in_memory()?);
    service.add_note(None, "Sprint\nthe deadline is near", &["work"])?;
    service.add_note(None, "Taxes\ndeadline in april", &["home"])?;
    service.add_note(None, "Standup\nno blockers", &["work"])?;
    service.add_note(None, "Review\ndeadline tomorrow", &["work"])?;

    let found = service.list_notes(&NoteFilter::default().with_tag("work").with_word("deadline"))?;

    let titles: Vec<&str> = found.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["Sprint", "Review"]);

    Ok(())
}

#[test]
fn test_list_single_id_range() -> Result<()> {
    let service = NoteService::new(Database::in_memory()?);
    for i in 1..=6 {
        service.add_note(None, &format!("Note {i}"), &[])?;
    }

    let five = NoteFilter::default().with_range(Some(NoteId::new(5)), Some(NoteId::new(5)));
    let notes = service.list_notes(&five)?;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id, NoteId::new(5));

    service.remove_note(NoteId::new(5))?;
    assert!(service.list_notes(&five)?.is_empty());

    Ok(())
}

#[test]
fn test_empty_title_note_is_invisible() -> Result<()> {
    let ctx = Context::open(Config {
        database: "sqlite://".into(),
        editor: None,
        sql_echo: false,
    })?;

    assert_eq!(add_note(&ctx, "  \nbody only", "x")?, "");
    assert_eq!(run(&ctx, Command::ListNotes(NoteFilter::default()))?, "");
    assert_eq!(run(&ctx, Command::ListTags)?, "");

    Ok(())
}

#[test]
fn test_remove_missing_note_leaves_store_unchanged() -> Result<()> {
    let service = NoteService::new(Database::in_memory()?);
    service.add_note(None, "Stays", &["a"])?;

    service.remove_note(NoteId::new(42))?;

    assert_eq!(service.list_notes(&NoteFilter::default())?.len(), 1);
    assert_eq!(service.note_tags(NoteId::new(1))?, vec!["a"]);

    Ok(())
}

#[test]
fn test_store_location_from_config() -> Result<()> {
    let config = Config::from_yaml("database: sqlite:////srv/notes.db\n")?;
    assert_eq!(
        StoreLocation::parse(&config.database)?,
        StoreLocation::File("/srv/notes.db".into())
    );
    Ok(())
}
