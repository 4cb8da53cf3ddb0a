//! Streaming parser for SGML-like markup.
//!
//! [`HtmlReader`] pulls a document from an [`InputStream`](crate::io::InputStream)
//! in fixed-size chunks and pushes tag and character-data events into an
//! [`HtmlHandler`]. The parser never fails on malformed markup; see
//! [`lexer`] for the recovery rules.

pub mod collect;
pub mod entities;
pub mod lexer;
mod reader;
mod tag;
pub mod text;
mod url;

pub use collect::{EventCollector, HtmlEvent};
pub use lexer::{Lexer, State};
pub use reader::{DEFAULT_CHUNK_SIZE, HtmlHandler, HtmlReader};
pub use tag::{NORMALIZED_NAME_LEN, Tag};
pub use text::TextExtractor;
pub use url::decode_url;
