use super::TagId;

/// A unique label that can annotate any number of notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    id: TagId,
    name: String,
}

impl Tag {
    /// Creates a tag value.
    ///
    /// # Examples
    ///
    /// ```
    /// use xnote::{Tag, TagId};
    ///
    /// let tag = Tag::new(TagId::new(1), "work");
    /// assert_eq!(tag.id(), TagId::new(1));
    /// assert_eq!(tag.name(), "work");
    /// ```
    pub fn new(id: TagId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> TagId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Splits a comma-separated tag list, trimming names and dropping empties.
///
/// # Examples
///
/// ```
/// use xnote::parse_tags;
///
/// assert_eq!(parse_tags("rust, learning, "), vec!["rust", "learning"]);
/// ```
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
