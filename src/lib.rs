pub mod commands;
pub mod config;
pub mod context;
pub mod db;
pub mod editor;
pub mod error;
pub mod models;
pub mod query;
pub mod service;

pub use commands::{Command, NoteSource};
pub use config::Config;
pub use context::Context;
pub use db::{Database, InitOutcome, StoreLocation};
pub use editor::{Editor, ExternalEditor};
pub use error::{Error, Result};
pub use models::{Note, NoteId, NoteSummary, Tag, TagId, parse_tags, title_from_body};
pub use query::NoteFilter;
pub use service::NoteService;
