//! Chunked read loop driving the [`Lexer`] over an [`InputStream`].

use std::ops::ControlFlow;

use super::lexer::{Lexer, State};
use super::tag::Tag;
use crate::error::{Error, Result};
use crate::io::InputStream;

/// Default number of bytes pulled from the stream per read.
pub const DEFAULT_CHUNK_SIZE: usize = 2048;

/// Receives structural events from [`HtmlReader::read_document`].
///
/// `character_data` and `tag` return `ControlFlow::Break(())` to stop the
/// parse early; `end_document` still runs afterwards.
pub trait HtmlHandler {
    fn start_document(&mut self) {}

    /// A run of character data.
    ///
    /// `convert` is true for raw document bytes, which are still in the
    /// document's encoding, and false for bytes produced by resolving an
    /// entity reference, which are always UTF-8.
    fn character_data(&mut self, text: &[u8], convert: bool) -> ControlFlow<()>;

    /// A start or end tag. The tag is reused after this call returns.
    fn tag(&mut self, tag: &Tag) -> ControlFlow<()>;

    fn end_document(&mut self) {}
}

impl<H: HtmlHandler + ?Sized> HtmlHandler for &mut H {
    fn start_document(&mut self) {
        (**self).start_document()
    }

    fn character_data(&mut self, text: &[u8], convert: bool) -> ControlFlow<()> {
        (**self).character_data(text, convert)
    }

    fn tag(&mut self, tag: &Tag) -> ControlFlow<()> {
        (**self).tag(tag)
    }

    fn end_document(&mut self) {
        (**self).end_document()
    }
}

/// Streaming reader for SGML-like markup (HTML and friends).
#[derive(Debug, Clone)]
pub struct HtmlReader {
    chunk_size: usize,
}

impl Default for HtmlReader {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlReader {
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Sets the read size. Any size parses the same events; values below 1
    /// are raised to 1.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Parses the whole stream, pushing events into `handler`.
    ///
    /// Returns `Ok(true)` when the end of the stream was reached and
    /// `Ok(false)` when a handler stopped the parse. If the stream cannot be
    /// opened no handler method is called and [`Error::Open`] is returned.
    /// Malformed markup is never an error.
    pub fn read_document<S, H>(&self, stream: &mut S, handler: &mut H) -> Result<bool>
    where
        S: InputStream + ?Sized,
        H: HtmlHandler + ?Sized,
    {
        stream.open().map_err(Error::Open)?;

        handler.start_document();
        let outcome = self.scan(stream, handler);
        handler.end_document();

        stream.close();

        match outcome {
            Ok(ControlFlow::Continue(())) => Ok(true),
            Ok(ControlFlow::Break(())) => {
                log::debug!("parse stopped by handler");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn scan<S, H>(&self, stream: &mut S, handler: &mut H) -> std::io::Result<ControlFlow<()>>
    where
        S: InputStream + ?Sized,
        H: HtmlHandler + ?Sized,
    {
        let mut lexer = Lexer::new();
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            let length = stream.read(&mut buffer)?;
            if lexer.feed(&buffer[..length], handler).is_break() {
                return Ok(ControlFlow::Break(()));
            }
            if length < buffer.len() {
                break;
            }
        }

        if lexer.state() != State::Text {
            log::debug!("document ended inside markup ({:?})", lexer.state());
        }
        Ok(ControlFlow::Continue(()))
    }
}
