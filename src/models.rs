mod ids;
mod note;
mod tag;

pub use ids::{NoteId, TagId};
pub(crate) use note::display_time;
pub use note::{Note, NoteSummary, title_from_body};
pub use tag::{Tag, parse_tags};
