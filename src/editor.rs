//! Interactive editing of note content in an external program.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use tempfile::NamedTempFile;

use crate::{Error, Result};

/// Lets the user edit a piece of text.
pub trait Editor {
    /// Returns the edited text, trimmed.
    fn edit(&self, initial: &str) -> Result<String>;
}

/// Runs an editor program on a temporary file.
///
/// The file is removed when the call returns, whether the editor succeeded
/// or not. The call blocks until the editor exits.
#[derive(Debug, Clone)]
pub struct ExternalEditor {
    program: PathBuf,
}

impl ExternalEditor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Editor for ExternalEditor {
    fn edit(&self, initial: &str) -> Result<String> {
        let mut file = NamedTempFile::with_prefix("xnote-")?;
        file.write_all(initial.as_bytes())?;
        file.flush()?;

        tracing::debug!(
            "launching {} on {}",
            self.program.display(),
            file.path().display()
        );
        let status = Command::new(&self.program)
            .arg(file.path())
            .status()
            .map_err(|source| Error::EditorLaunch {
                editor: self.program.clone(),
                source,
            })?;
        if !status.success() {
            return Err(Error::EditorFailed {
                editor: self.program.clone(),
                status,
            });
        }

        // Read by path: many editors replace the file rather than write in place.
        let text = std::fs::read_to_string(file.path())?;
        Ok(text.trim().to_string())
    }
}
