use time::OffsetDateTime;
use time::macros::format_description;

use super::NoteId;

/// A note with its body and the names of the tags attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    /// Creation time, set by the store on insert.
    pub time: OffsetDateTime,
    pub title: String,
    pub body: String,
    /// Tag names in link order.
    pub tags: Vec<String>,
}

/// The columns shown in list and search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSummary {
    pub id: NoteId,
    pub time: OffsetDateTime,
    pub title: String,
}

/// Renders a note timestamp as `YYYY-MM-DD HH:MM:SS`.
pub(crate) fn display_time(time: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    // Only fails for years outside the four-digit range.
    time.format(format)
        .unwrap_or_else(|_| time.unix_timestamp().to_string())
}

/// Derives a note title from its body: the first line, trimmed.
///
/// # Examples
///
/// ```
/// use xnote::title_from_body;
///
/// assert_eq!(title_from_body("  Meeting notes \nDiscuss budget"), "Meeting notes");
/// assert_eq!(title_from_body("\nsecond line"), "");
/// ```
pub fn title_from_body(body: &str) -> String {
    body.split('\n').next().unwrap_or_default().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_first_line_trimmed() {
        assert_eq!(title_from_body("Shopping\nmilk\neggs"), "Shopping");
        assert_eq!(title_from_body("\tindented title  \r\nrest"), "indented title");
        assert_eq!(title_from_body("single"), "single");
    }

    #[test]
    fn blank_first_line_gives_empty_title() {
        assert_eq!(title_from_body(""), "");
        assert_eq!(title_from_body("   \nbody"), "");
    }

    #[test]
    fn display_time_uses_fixed_width_format() {
        let time = OffsetDateTime::from_unix_timestamp(0).unwrap();
        assert_eq!(display_time(time), "1970-01-01 00:00:00");
    }
}
