//! Bibliographic metadata extraction from OEB/OPF package documents.

use std::ops::ControlFlow;
use std::path::Path;

use super::namespace::{is_dublin_core, is_open_packaging_format};
use crate::book::{Metadata, MetadataSink};
use crate::error::Result;
use crate::io::{FileStream, InputStream};
use crate::util::parse_leading_int;
use crate::xml::{Attribute, Namespaces, XmlHandler, XmlReader, attribute_value};

const METADATA: &str = "metadata";
const DC_METADATA: &str = "dc-metadata";
const METADATA_SUFFIX: &str = ":metadata";
const TITLE_SUFFIX: &str = ":title";
const AUTHOR_SUFFIX: &str = ":creator";
const SUBJECT_SUFFIX: &str = ":subject";
const LANGUAGE_SUFFIX: &str = ":language";
const META: &str = "meta";
const AUTHOR_ROLE: &str = "aut";
const SERIES: &str = "calibre:series";
const SERIES_INDEX: &str = "calibre:series_index";

/// Which field the text of the current element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    None,
    Title,
    Author,
    FallbackAuthor,
    Subject,
    Language,
}

/// Reads title, authors, subjects, language and calibre series information
/// from an OPF package document into a [`MetadataSink`].
///
/// Only elements inside the metadata container (`<metadata>`,
/// `<dc-metadata>` or `<opf:metadata>`) are considered, and the parse stops
/// as soon as that container closes.
///
/// Creators with `role="aut"` are authors. Creators without a role are only
/// used when no creator carries that role; creators with any other role
/// (editors, illustrators, ...) are ignored.
pub struct MetaInfoReader<'a> {
    book: &'a mut dyn MetadataSink,
    read_metadata: bool,
    metadata_tag: String,
    state: ReadState,
    buffer: String,
    authors: Vec<String>,
    fallback_authors: Vec<String>,
}

impl<'a> MetaInfoReader<'a> {
    /// Creates a reader for `book`, clearing its title, authors and tags.
    pub fn new(book: &'a mut dyn MetadataSink) -> Self {
        reset_book(book);
        Self {
            book,
            read_metadata: false,
            metadata_tag: String::new(),
            state: ReadState::None,
            buffer: String::new(),
            authors: Vec::new(),
            fallback_authors: Vec::new(),
        }
    }

    /// Parses `stream` and commits the collected authors.
    ///
    /// The destination's title, authors and tags are cleared before
    /// parsing, so reading the same document twice gives the same record.
    pub fn read_meta_info<S: InputStream + ?Sized>(&mut self, stream: &mut S) -> Result<()> {
        reset_book(self.book);
        self.read_metadata = false;
        self.metadata_tag.clear();
        self.state = ReadState::None;
        self.buffer.clear();
        self.authors.clear();
        self.fallback_authors.clear();

        XmlReader::new().read_document(stream, self)?;

        let authors = if !self.authors.is_empty() {
            log::debug!("using {} creators with role {AUTHOR_ROLE:?}", self.authors.len());
            &self.authors
        } else {
            log::debug!(
                "no creator with role {AUTHOR_ROLE:?}, using {} unqualified creators",
                self.fallback_authors.len()
            );
            &self.fallback_authors
        };
        for author in authors {
            self.book.add_author(author);
        }
        Ok(())
    }

    fn commit(&mut self) {
        let text = self.buffer.trim();
        if text.is_empty() {
            return;
        }
        match self.state {
            ReadState::None => {}
            ReadState::Title => self.book.set_title(text),
            ReadState::Author => self.authors.push(text.to_string()),
            ReadState::FallbackAuthor => self.fallback_authors.push(text.to_string()),
            ReadState::Subject => self.book.add_tag(text),
            ReadState::Language => {
                let language = normalize_language(text);
                if !language.is_empty() {
                    self.book.set_language(language);
                }
            }
        }
    }

    fn read_series(&mut self, attributes: &[Attribute]) {
        let (Some(name), Some(content)) = (
            attribute_value(attributes, "name"),
            attribute_value(attributes, "content"),
        ) else {
            return;
        };
        match name {
            SERIES => self.book.set_series_name(content),
            SERIES_INDEX => self.book.set_index_in_series(parse_leading_int(content)),
            _ => {}
        }
    }
}

impl XmlHandler for MetaInfoReader<'_> {
    fn start_element(
        &mut self,
        tag: &str,
        attributes: &[Attribute],
        namespaces: &Namespaces,
    ) -> ControlFlow<()> {
        let tag = tag.to_lowercase();
        let opens_scope = tag == METADATA
            || tag == DC_METADATA
            || tag
                .strip_suffix(METADATA_SUFFIX)
                .is_some_and(|prefix| resolves(namespaces, prefix, is_open_packaging_format));

        if opens_scope {
            log::debug!("entering metadata scope <{tag}>");
            self.metadata_tag = tag;
            self.read_metadata = true;
        } else if self.read_metadata {
            let dublin_core = |suffix: &str| {
                tag.strip_suffix(suffix)
                    .map(|prefix| resolves(namespaces, prefix, is_dublin_core))
            };

            if let Some(is_dc) = dublin_core(TITLE_SUFFIX) {
                if is_dc {
                    self.state = ReadState::Title;
                }
            } else if let Some(is_dc) = dublin_core(AUTHOR_SUFFIX) {
                if is_dc {
                    match role(attributes) {
                        None => self.state = ReadState::FallbackAuthor,
                        Some(AUTHOR_ROLE) => self.state = ReadState::Author,
                        Some(_) => {}
                    }
                }
            } else if let Some(is_dc) = dublin_core(SUBJECT_SUFFIX) {
                if is_dc {
                    self.state = ReadState::Subject;
                }
            } else if let Some(is_dc) = dublin_core(LANGUAGE_SUFFIX) {
                if is_dc {
                    self.state = ReadState::Language;
                }
            } else if tag == META {
                self.read_series(attributes);
            }
        }
        ControlFlow::Continue(())
    }

    fn end_element(&mut self, tag: &str, _namespaces: &Namespaces) -> ControlFlow<()> {
        let tag = tag.to_lowercase();
        if self.metadata_tag == tag {
            return ControlFlow::Break(());
        }

        self.commit();
        self.buffer.clear();
        self.state = ReadState::None;
        ControlFlow::Continue(())
    }

    fn character_data(&mut self, text: &str) -> ControlFlow<()> {
        if self.state != ReadState::None {
            self.buffer.push_str(text);
        }
        ControlFlow::Continue(())
    }

    fn process_namespaces(&self) -> bool {
        true
    }
}

/// Reads the metadata of an OPF file on disk.
pub fn read_opf_metadata(path: impl AsRef<Path>) -> Result<Metadata> {
    let mut metadata = Metadata::default();
    let mut stream = FileStream::new(path.as_ref());
    MetaInfoReader::new(&mut metadata).read_meta_info(&mut stream)?;
    Ok(metadata)
}

fn reset_book(book: &mut dyn MetadataSink) {
    book.remove_all_authors();
    book.set_title("");
    book.remove_all_tags();
}

fn resolves(namespaces: &Namespaces, prefix: &str, accept: fn(&str) -> bool) -> bool {
    namespaces.get(prefix).is_some_and(accept)
}

/// The creator role, whether written `role` or namespaced (`opf:role`).
fn role(attributes: &[Attribute]) -> Option<&str> {
    attributes
        .iter()
        .find(|a| a.name == "role" || a.name.ends_with(":role"))
        .map(|a| a.value.as_str())
}

/// `en-US` -> `en`, `pt_BR` -> `pt`; the obsolete code `cz` becomes `cs`.
fn normalize_language(language: &str) -> &str {
    let language = language.split('-').next().unwrap_or(language);
    let language = language.split('_').next().unwrap_or(language);
    if language == "cz" { "cs" } else { language }
}
