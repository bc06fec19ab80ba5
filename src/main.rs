use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use xnote::commands::{self, Command, NoteSource};
use xnote::{Config, Context, NoteFilter, NoteId, parse_tags};

/// xnote - personal notes with tags, kept in SQLite
#[derive(Parser)]
#[command(name = "xnote")]
#[command(about = "Take, tag and search personal notes from the command line")]
#[command(version)]
struct Cli {
    /// Config file path (default: ~/.xnote.config.yml)
    #[arg(
        short,
        long,
        alias = "config_path",
        env = "XNOTE_CONFIG",
        value_name = "PATH",
        global = true
    )]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Initdb,
    /// Manage tags
    Tags {
        #[command(subcommand)]
        command: TagsCommand,
    },
    /// List all notes
    Ls(ListArgs),
    /// Show the note with the specified id
    Show {
        note_id: NoteId,
    },
    /// Find notes
    Find(FindArgs),
    /// Edit a note
    Edit(EditArgs),
    /// Annotate a note by adding a tag
    Ann {
        note_id: NoteId,
        tag: String,
    },
    /// Add a note
    Add(AddArgs),
    /// Remove a note by id
    Rm {
        note_id: NoteId,
    },
}

#[derive(Subcommand)]
enum TagsCommand {
    /// List tags
    Ls,
    /// Create a tag
    Add { tag: String },
    /// Delete a tag
    Rm { tag: String },
    /// Rename a tag
    Up { old_tag: String, new_tag: String },
}

#[derive(Parser)]
struct ListArgs {
    /// Only list notes with the specified tag
    #[arg(short, long)]
    tag: Option<String>,

    /// First id to list
    #[arg(short, long)]
    first: Option<NoteId>,

    /// Last id to list
    #[arg(short, long)]
    last: Option<NoteId>,
}

#[derive(Parser)]
struct FindArgs {
    /// The keyword to find (case-sensitive)
    word: Option<String>,

    /// Find only the notes with the specified tag
    #[arg(short, long)]
    tag: Option<String>,
}

#[derive(Parser)]
struct EditArgs {
    note_id: NoteId,

    /// New title; with --body the editor is skipped
    #[arg(short = 'T', long)]
    title: Option<String>,

    /// New body; with --title the editor is skipped
    #[arg(short, long)]
    body: Option<String>,
}

#[derive(Parser)]
struct AddArgs {
    /// Add a file as a note
    #[arg(short, long, value_name = "FILE", conflicts_with = "body")]
    file: Option<PathBuf>,

    /// Note body; without --file or --body the editor opens
    #[arg(short, long)]
    body: Option<String>,

    /// Title for the note (default: first line of the body)
    #[arg(short = 'T', long)]
    title: Option<String>,

    /// Comma-separated tags for the note
    #[arg(short, long, value_name = "TAGS")]
    tags: Option<String>,
}

impl Commands {
    /// Resolves CLI arguments into a dispatcher command.
    ///
    /// `initdb` runs before a store exists and has no dispatcher command.
    fn into_command(self) -> Option<Command> {
        let command = match self {
            Commands::Initdb => return None,
            Commands::Tags { command } => match command {
                TagsCommand::Ls => Command::ListTags,
                TagsCommand::Add { tag } => Command::AddTag(tag),
                TagsCommand::Rm { tag } => Command::RemoveTag(tag),
                TagsCommand::Up { old_tag, new_tag } => Command::RenameTag {
                    old: old_tag,
                    new: new_tag,
                },
            },
            Commands::Ls(args) => Command::ListNotes(NoteFilter {
                first: args.first,
                last: args.last,
                tag: args.tag,
                word: None,
            }),
            Commands::Show { note_id } => Command::ShowNote(note_id),
            Commands::Find(args) => Command::FindNotes(NoteFilter {
                tag: args.tag,
                word: args.word,
                ..NoteFilter::default()
            }),
            Commands::Edit(args) => Command::EditNote {
                id: args.note_id,
                title: args.title,
                body: args.body,
            },
            Commands::Ann { note_id, tag } => Command::AnnotateNote { id: note_id, tag },
            Commands::Add(args) => {
                let source = match (args.file, args.body) {
                    (Some(file), _) => NoteSource::File(file),
                    (None, Some(body)) => NoteSource::Body(body),
                    (None, None) => NoteSource::Editor,
                };
                Command::AddNote {
                    source,
                    title: args.title,
                    tags: args.tags.as_deref().map(parse_tags).unwrap_or_default(),
                }
            }
            Commands::Rm { note_id } => Command::RemoveNote(note_id),
        };
        Some(command)
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        // Printing help to a closed stdout is not worth failing over.
        let _ = Cli::command().print_help();
        return;
    };
    let config_path = cli.config.unwrap_or_else(Config::default_path);

    if let Err(e) = run(&config_path, command) {
        tracing::error!("{e:#}");
        std::process::exit(exit_code(&e));
    }
}

/// Logs go to stderr; `XNOTE_LOG` overrides the default filter.
fn init_logging() {
    let filter = EnvFilter::try_from_env("XNOTE_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn,xnote::sql=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(config_path: &Path, command: Commands) -> Result<()> {
    let config = Config::load(config_path)?;

    let Some(command) = command.into_command() else {
        commands::init_db(&config)?;
        return Ok(());
    };

    let ctx = Context::open(config)?;
    let stdout = std::io::stdout();
    commands::run(&ctx, command, &mut stdout.lock())
}

/// 1 for startup and user errors, 2 for store or system failures.
fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<xnote::Error>() {
        Some(e) if e.is_user_error() => 1,
        _ => 2,
    }
}
