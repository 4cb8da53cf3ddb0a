//! Bibliographic metadata record filled in by the metadata readers.

/// Mutators a metadata reader uses to fill in a book record.
///
/// Readers only write through this trait; how the values are stored is up
/// to the implementor.
pub trait MetadataSink {
    fn set_title(&mut self, title: &str);
    fn add_author(&mut self, author: &str);
    fn remove_all_authors(&mut self);
    fn add_tag(&mut self, tag: &str);
    fn remove_all_tags(&mut self);
    fn set_language(&mut self, language: &str);
    fn set_series_name(&mut self, name: &str);
    fn set_index_in_series(&mut self, index: i32);
}

/// Book metadata (Dublin Core + calibre series extensions)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: String,
    pub authors: Vec<String>,
    pub language: String,
    /// Subjects, in document order.
    pub tags: Vec<String>,
    pub series: Option<String>,
    pub series_index: Option<i32>,
}

impl Metadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_series(mut self, name: impl Into<String>, index: i32) -> Self {
        self.series = Some(name.into());
        self.series_index = Some(index);
        self
    }
}

impl MetadataSink for Metadata {
    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn add_author(&mut self, author: &str) {
        self.authors.push(author.to_string());
    }

    fn remove_all_authors(&mut self) {
        self.authors.clear();
    }

    fn add_tag(&mut self, tag: &str) {
        self.tags.push(tag.to_string());
    }

    fn remove_all_tags(&mut self) {
        self.tags.clear();
    }

    fn set_language(&mut self, language: &str) {
        self.language = language.to_string();
    }

    fn set_series_name(&mut self, name: &str) {
        self.series = Some(name.to_string());
    }

    fn set_index_in_series(&mut self, index: i32) {
        self.series_index = Some(index);
    }
}
