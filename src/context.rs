use crate::editor::{Editor, ExternalEditor};
use crate::{Config, Database, NoteService, Result, StoreLocation};

/// Everything a command needs, built once per process.
///
/// Owns the only store connection; dropping the context closes it.
pub struct Context {
    config: Config,
    service: NoteService,
    editor: Box<dyn Editor>,
}

impl Context {
    /// Opens the configured store and prepares the configured editor.
    ///
    /// Fails if the store does not exist yet; `initdb` creates it.
    pub fn open(config: Config) -> Result<Self> {
        let location = StoreLocation::parse(&config.database)?;
        let db = Database::open_existing(&location, config.sql_echo)?;
        tracing::debug!("opened database {}", config.database);

        let editor = Box::new(ExternalEditor::new(config.editor()));
        Ok(Self::with_parts(config, NoteService::new(db), editor))
    }

    pub fn with_parts(config: Config, service: NoteService, editor: Box<dyn Editor>) -> Self {
        Self {
            config,
            service,
            editor,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn service(&self) -> &NoteService {
        &self.service
    }

    pub fn editor(&self) -> &dyn Editor {
        self.editor.as_ref()
    }
}
