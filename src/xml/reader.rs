use std::borrow::Cow;
use std::io::BufReader;
use std::ops::ControlFlow;

use encoding_rs::Encoding;
use memchr::memchr;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::namespaces::Namespaces;
use crate::error::{Error, Result};
use crate::html::entities;
use crate::io::{InputStream, StreamReader};
use crate::util::decode_text;

/// Default size of the buffer between the stream and the XML tokenizer.
pub const DEFAULT_BUFFER_SIZE: usize = 2048;

/// One attribute of an element, with its value unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Value of the attribute called exactly `key`, if present.
pub fn attribute_value<'a>(attributes: &'a [Attribute], key: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|a| a.name == key)
        .map(|a| a.value.as_str())
}

/// Receives document events from [`XmlReader::read_document`].
///
/// Element callbacks return `ControlFlow::Break(())` to interrupt the parse;
/// `end_document` still runs afterwards.
pub trait XmlHandler {
    fn start_document(&mut self) {}

    /// An element opened. Self-closing elements are reported as a start
    /// immediately followed by an end.
    fn start_element(
        &mut self,
        name: &str,
        attributes: &[Attribute],
        namespaces: &Namespaces,
    ) -> ControlFlow<()>;

    fn end_element(&mut self, _name: &str, _namespaces: &Namespaces) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn character_data(&mut self, _text: &str) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn end_document(&mut self) {}

    /// Whether `xmlns` declarations should be tracked in [`Namespaces`].
    /// When false, the namespace map passed to callbacks stays empty.
    fn process_namespaces(&self) -> bool {
        false
    }
}

/// Streaming, namespace-aware XML event source.
#[derive(Debug, Clone)]
pub struct XmlReader {
    buffer_size: usize,
}

impl Default for XmlReader {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlReader {
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Sets the size of the read buffer (at least 1 byte).
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    /// Parses the stream, pushing events into `handler`.
    ///
    /// Returns `Ok(true)` at end of document and `Ok(false)` when a handler
    /// interrupted. Unopenable streams yield [`Error::Open`] without any
    /// callback; XML that cannot be tokenized yields [`Error::Xml`] after
    /// `end_document` has run.
    pub fn read_document<S, H>(&self, stream: &mut S, handler: &mut H) -> Result<bool>
    where
        S: InputStream + ?Sized,
        H: XmlHandler + ?Sized,
    {
        stream.open().map_err(Error::Open)?;

        handler.start_document();
        let outcome = self.scan(stream, handler);
        handler.end_document();

        stream.close();

        match outcome? {
            ControlFlow::Continue(()) => Ok(true),
            ControlFlow::Break(()) => {
                log::debug!("XML parse interrupted by handler");
                Ok(false)
            }
        }
    }

    fn scan<S, H>(&self, stream: &mut S, handler: &mut H) -> Result<ControlFlow<()>>
    where
        S: InputStream + ?Sized,
        H: XmlHandler + ?Sized,
    {
        let source = BufReader::with_capacity(self.buffer_size, StreamReader::new(stream));
        let mut reader = Reader::from_reader(source);
        {
            let config = reader.config_mut();
            config.expand_empty_elements = true;
            config.check_end_names = false;
        }

        let track_namespaces = handler.process_namespaces();
        let mut namespaces = Namespaces::new();
        let mut encoding: Option<&'static Encoding> = None;
        let mut buf = Vec::new();

        loop {
            let flow = match reader.read_event_into(&mut buf)? {
                Event::Decl(decl) => {
                    if let Some(Ok(label)) = decl.encoding() {
                        encoding = Encoding::for_label(&label);
                    }
                    ControlFlow::Continue(())
                }
                Event::Start(e) => {
                    namespaces.push_scope();
                    let name = decode_text(e.name().as_ref(), encoding).into_owned();
                    let attributes = read_attributes(&e, encoding);
                    if track_namespaces {
                        declare_namespaces(&mut namespaces, &attributes);
                    }
                    handler.start_element(&name, &attributes, &namespaces)
                }
                Event::End(e) => {
                    let qname = e.name();
                    let name = decode_text(qname.as_ref(), encoding);
                    let flow = handler.end_element(&name, &namespaces);
                    namespaces.pop_scope();
                    flow
                }
                Event::Text(e) => {
                    let text = decode_text(e.as_ref(), encoding);
                    handler.character_data(&text)
                }
                Event::CData(e) => {
                    let raw = e.into_inner();
                    handler.character_data(&decode_text(&raw, encoding))
                }
                Event::GeneralRef(e) => {
                    let name = decode_text(e.as_ref(), encoding);
                    match resolve_reference(&name) {
                        Some(ch) => handler.character_data(ch.encode_utf8(&mut [0u8; 4])),
                        None => handler.character_data(&format!("&{name};")),
                    }
                }
                Event::Eof => break,
                _ => ControlFlow::Continue(()),
            };

            if flow.is_break() {
                return Ok(ControlFlow::Break(()));
            }
            buf.clear();
        }

        Ok(ControlFlow::Continue(()))
    }
}

fn read_attributes(e: &BytesStart<'_>, encoding: Option<&'static Encoding>) -> Vec<Attribute> {
    e.attributes()
        .with_checks(false)
        .filter_map(|attr| match attr {
            Ok(attr) => Some(attr),
            Err(err) => {
                log::warn!("skipping malformed attribute: {err}");
                None
            }
        })
        .map(|attr| {
            let name = decode_text(attr.key.as_ref(), encoding).into_owned();
            let value = unescape(&decode_text(&attr.value, encoding)).into_owned();
            Attribute { name, value }
        })
        .collect()
}

fn declare_namespaces(namespaces: &mut Namespaces, attributes: &[Attribute]) {
    for attr in attributes {
        if attr.name == "xmlns" {
            namespaces.bind("", &attr.value);
        } else if let Some(prefix) = attr.name.strip_prefix("xmlns:") {
            namespaces.bind(prefix, &attr.value);
        }
    }
}

/// Resolves the body of a reference (`amp`, `#65`, `#x41`) to a character.
///
/// Named references use the HTML entity table, which covers the five XML
/// predefined entities.
pub(crate) fn resolve_reference(name: &str) -> Option<char> {
    let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(dec) = name.strip_prefix('#') {
        dec.parse().ok()?
    } else {
        entities::lookup(name.as_bytes())?
    };
    char::from_u32(code).filter(|&ch| ch != '\0')
}

/// Replaces references in an attribute value. Unresolvable references are
/// kept as written.
fn unescape(raw: &str) -> Cow<'_, str> {
    if memchr(b'&', raw.as_bytes()).is_none() {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let resolved = tail[1..]
            .find(';')
            .and_then(|semi| Some((semi, resolve_reference(&tail[1..semi + 1])?)));
        match resolved {
            Some((semi, ch)) => {
                out.push(ch);
                rest = &tail[semi + 2..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}
