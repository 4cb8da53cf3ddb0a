//! Plain-text extraction from HTML documents in any encoding.

use std::ops::ControlFlow;

use bstr::ByteSlice;
use encoding_rs::{CoderResult, Decoder, Encoding, UTF_8};

use super::reader::HtmlHandler;
use super::tag::Tag;
use super::url::decode_url;

/// Tags that start a new paragraph when opened or closed.
const BLOCK_TAGS: &[&str] = &[
    "P", "DIV", "BR", "H1", "H2", "H3", "H4", "H5", "H6", "LI", "TR", "BLOCKQUOTE", "TITLE",
];

/// Tags whose content is not text.
const SKIPPED_TAGS: &[&str] = &["SCRIPT", "STYLE"];

/// Collects the visible text of a document as whitespace-collapsed
/// paragraphs, plus the targets of its `<a href>` links.
///
/// Raw character data is decoded from the document encoding with a
/// streaming decoder, so a multi-byte character split across two chunks
/// still decodes correctly.
pub struct TextExtractor {
    encoding: &'static Encoding,
    decoder: Decoder,
    current: String,
    paragraphs: Vec<String>,
    links: Vec<String>,
    skip_depth: usize,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::with_encoding(UTF_8)
    }
}

impl TextExtractor {
    /// Creates an extractor for documents in the encoding named `label`
    /// (e.g. `"windows-1252"`). Unknown labels fall back to UTF-8.
    pub fn new(label: &str) -> Self {
        let encoding = Encoding::for_label(label.trim().as_bytes()).unwrap_or_else(|| {
            log::warn!("unknown encoding {label:?}, assuming UTF-8");
            UTF_8
        });
        Self::with_encoding(encoding)
    }

    pub fn with_encoding(encoding: &'static Encoding) -> Self {
        Self {
            encoding,
            decoder: encoding.new_decoder(),
            current: String::new(),
            paragraphs: Vec::new(),
            links: Vec::new(),
            skip_depth: 0,
        }
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    /// All paragraphs joined by newlines.
    pub fn text(&self) -> String {
        self.paragraphs.join("\n")
    }

    /// Decoded `href` targets of `<a>` tags, in document order.
    pub fn links(&self) -> &[String] {
        &self.links
    }

    fn decode(&mut self, mut src: &[u8], last: bool) {
        loop {
            if let Some(needed) = self.decoder.max_utf8_buffer_length(src.len()) {
                self.current.reserve(needed);
            }
            let (result, read, _) = self.decoder.decode_to_string(src, &mut self.current, last);
            src = &src[read..];
            if result == CoderResult::InputEmpty {
                break;
            }
        }
    }

    fn end_paragraph(&mut self) {
        let collapsed = self.current.split_whitespace().collect::<Vec<_>>().join(" ");
        if !collapsed.is_empty() {
            self.paragraphs.push(collapsed);
        }
        self.current.clear();
    }
}

impl HtmlHandler for TextExtractor {
    fn start_document(&mut self) {
        self.decoder = self.encoding.new_decoder();
        self.current.clear();
        self.paragraphs.clear();
        self.links.clear();
        self.skip_depth = 0;
    }

    fn character_data(&mut self, text: &[u8], convert: bool) -> ControlFlow<()> {
        if self.skip_depth == 0 {
            if convert {
                self.decode(text, false);
            } else {
                self.current.push_str(&text.to_str_lossy());
            }
        }
        ControlFlow::Continue(())
    }

    fn tag(&mut self, tag: &Tag) -> ControlFlow<()> {
        // `<br/>` arrives named `BR/`
        let raw = tag.name().as_bytes();
        let name = raw.strip_suffix(b"/").unwrap_or(raw);
        if SKIPPED_TAGS.iter().any(|skipped| name == skipped.as_bytes()) {
            if tag.is_start() {
                self.skip_depth += 1;
            } else {
                self.skip_depth = self.skip_depth.saturating_sub(1);
            }
        } else if BLOCK_TAGS.iter().any(|block| name == block.as_bytes()) {
            self.end_paragraph();
        } else if tag.is_start()
            && tag.is("A")
            && let Some(href) = tag.attribute("HREF")
        {
            self.links.push(decode_url(&href.to_str_lossy()));
        }
        ControlFlow::Continue(())
    }

    fn end_document(&mut self) {
        self.decode(&[], true);
        self.end_paragraph();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::HtmlReader;
    use crate::io::MemoryStream;

    fn extract(extractor: &mut TextExtractor, input: &[u8], chunk_size: usize) {
        HtmlReader::new()
            .with_chunk_size(chunk_size)
            .read_document(&mut MemoryStream::new(input.to_vec()), extractor)
            .unwrap();
    }

    #[test]
    fn test_paragraphs_and_whitespace() {
        let mut extractor = TextExtractor::default();
        extract(
            &mut extractor,
            b"<html><head><title>T</title></head><body><p>One\n  two</p><p>three<br>four</p></body>",
            2048,
        );
        assert_eq!(extractor.paragraphs(), ["T", "One two", "three", "four"]);
        assert_eq!(extractor.text(), "T\nOne two\nthree\nfour");
    }

    #[test]
    fn test_self_closing_block_tags() {
        let mut extractor = TextExtractor::default();
        extract(&mut extractor, b"<p>one<br/>two</p><p/>three<div/>four", 2048);
        assert_eq!(extractor.paragraphs(), ["one", "two", "three", "four"]);
    }

    #[test]
    fn test_script_and_style_are_skipped() {
        let mut extractor = TextExtractor::default();
        extract(
            &mut extractor,
            b"<p>a<script>var x = 1;</script>b<style>p {}</style>c</p>",
            2048,
        );
        assert_eq!(extractor.paragraphs(), ["abc"]);
    }

    #[test]
    fn test_windows_1252_with_entities() {
        let mut extractor = TextExtractor::new("windows-1252");
        extract(&mut extractor, b"<p>caf\xe9 &mdash; \x93q\x94</p>", 2048);
        assert_eq!(extractor.text(), "caf\u{e9} \u{2014} \u{201c}q\u{201d}");
    }

    #[test]
    fn test_split_multibyte_sequence() {
        let mut extractor = TextExtractor::default();
        // Chunk size 1 splits every UTF-8 sequence.
        extract(&mut extractor, "<p>na\u{ef}ve \u{4e16}\u{754c}</p>".as_bytes(), 1);
        assert_eq!(extractor.text(), "na\u{ef}ve \u{4e16}\u{754c}");
    }

    #[test]
    fn test_links_are_decoded() {
        let mut extractor = TextExtractor::default();
        extract(
            &mut extractor,
            b"<a href=\"chapter%201.html#n1\">one</a> <a name=x>two</a> <A HREF=b.html>",
            2048,
        );
        assert_eq!(extractor.links(), ["chapter 1.html#n1", "b.html"]);
    }

    #[test]
    fn test_unknown_label_falls_back_to_utf8() {
        let extractor = TextExtractor::new("no-such-encoding");
        assert_eq!(extractor.encoding(), UTF_8);
    }
}
