//! Error types for tagstream operations.
//!
//! Malformed markup is never an error: the HTML lexer recovers from every
//! malformed construct locally. Errors only describe I/O and container-level
//! failures.

use thiserror::Error;

/// Errors that can occur while reading markup or ebook containers.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot open stream: {0}")]
    Open(std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Invalid EPUB: {0}")]
    InvalidEpub(String),

    #[error("Missing required element: {0}")]
    MissingElement(String),
}

pub type Result<T> = std::result::Result<T, Error>;
