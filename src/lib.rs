//! # tagstream
//!
//! A forgiving, streaming parser for SGML/HTML-like markup, plus OEB/OPF
//! metadata extraction for ebooks.
//!
//! ## Features
//!
//! - Chunked HTML lexing that never fails on malformed markup
//! - HTML 4 named entities and numeric character references
//! - Push-style [`HtmlHandler`] callbacks with early termination
//! - Namespace-aware [`XmlReader`] for package documents
//! - Dublin Core and calibre series metadata from OPF files and EPUBs
//!
//! ## Quick Start
//!
//! ```
//! use std::ops::ControlFlow;
//! use tagstream::{HtmlHandler, HtmlReader, Tag};
//! use tagstream::io::MemoryStream;
//!
//! #[derive(Default)]
//! struct Links(Vec<String>);
//!
//! impl HtmlHandler for Links {
//!     fn character_data(&mut self, _data: &[u8], _convert: bool) -> ControlFlow<()> {
//!         ControlFlow::Continue(())
//!     }
//!
//!     fn tag(&mut self, tag: &Tag) -> ControlFlow<()> {
//!         if tag.is("A") && tag.is_start() {
//!             if let Some(href) = tag.attribute("HREF") {
//!                 self.0.push(href.to_string());
//!             }
//!         }
//!         ControlFlow::Continue(())
//!     }
//! }
//!
//! let mut links = Links::default();
//! let mut stream = MemoryStream::new("<p>See <a href=\"next.html\">next</a></p>");
//! let completed = HtmlReader::new().read_document(&mut stream, &mut links)?;
//! assert!(completed);
//! assert_eq!(links.0, ["next.html"]);
//! # Ok::<(), tagstream::Error>(())
//! ```
//!
//! ## Ebook Metadata
//!
//! ```no_run
//! use tagstream::read_epub_metadata;
//!
//! let meta = read_epub_metadata("book.epub")?;
//! println!("{} by {}", meta.title, meta.authors.join(", "));
//! # Ok::<(), tagstream::Error>(())
//! ```

pub mod book;
pub mod epub;
pub mod error;
pub mod html;
pub mod io;
pub mod oeb;
pub(crate) mod util;
pub mod xml;

pub use book::{Metadata, MetadataSink};
pub use epub::read_epub_metadata;
pub use error::{Error, Result};
pub use html::{HtmlHandler, HtmlReader, Tag, TextExtractor};
pub use oeb::{MetaInfoReader, read_opf_metadata};
pub use xml::{XmlHandler, XmlReader};
