//! Byte-level state machine for SGML-like markup.
//!
//! The [`Lexer`] holds all parser state between chunks: partial tag names,
//! attribute names and values, and entity bodies live in its accumulators,
//! so a token split across two chunks parses exactly like an unsplit one.
//! Text runs are the exception: they are dispatched as soon as a chunk ends,
//! which may split one run into two `character_data` calls.
//!
//! Input is treated as opaque 8-bit bytes. Multi-byte UTF-8 sequences pass
//! through untouched as part of text or attribute values.

use std::ops::ControlFlow;

use memchr::memchr2;

use super::entities;
use super::reader::HtmlHandler;
use super::tag::Tag;

/// Lexer states. One transition is taken per input byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Text,
    TagStart,
    TagName,
    AttributeName,
    AttributeValue,
    SkipTag,
    Comment,
    Entity,
    EntityInAttributeValue,
}

/// Classification of the entity body read so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntityKind {
    Unknown,
    Numeric,
    Named,
    Decimal,
    Hex,
}

impl EntityKind {
    fn allows(self, b: u8) -> bool {
        match self {
            EntityKind::Named => b.is_ascii_alphabetic(),
            EntityKind::Decimal => b.is_ascii_digit(),
            EntityKind::Hex => b.is_ascii_hexdigit(),
            EntityKind::Unknown | EntityKind::Numeric => false,
        }
    }
}

/// What the driver does with the current byte after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Advance {
    Consume,
    /// Feed the same byte again in the new state.
    Rescan,
}

/// Tracks the last two bytes of a comment body to detect `-->`.
#[derive(Debug, Default, Clone, Copy)]
struct CommentWindow {
    started: bool,
    last: [u8; 2],
}

impl CommentWindow {
    fn push(&mut self, b: u8) {
        self.started = true;
        self.last = [self.last[1], b];
    }

    fn closes_with(&self, b: u8) -> bool {
        b == b'>' && self.last == [b'-', b'-']
    }
}

/// Parser state for one document. Not shared between parses.
#[derive(Debug)]
pub struct Lexer {
    state: State,
    entity_kind: EntityKind,
    text: Vec<u8>,
    entity: Vec<u8>,
    quotes: u32,
    comment: CommentWindow,
    tag: Tag,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer {
    pub fn new() -> Self {
        Self {
            state: State::Text,
            entity_kind: EntityKind::Unknown,
            text: Vec::new(),
            entity: Vec::new(),
            quotes: 0,
            comment: CommentWindow::default(),
            tag: Tag::new(),
        }
    }

    /// Current state. Anything but [`State::Text`] after the last chunk means
    /// the document ended inside markup; that trailing token is dropped.
    pub fn state(&self) -> State {
        self.state
    }

    /// Scans one chunk, dispatching events to `handler`.
    ///
    /// Returns `Break` as soon as a handler asks to stop; the rest of the
    /// chunk is not scanned.
    pub fn feed<H: HtmlHandler + ?Sized>(
        &mut self,
        chunk: &[u8],
        handler: &mut H,
    ) -> ControlFlow<()> {
        let mut run_start = 0;
        let mut i = 0;

        while i < chunk.len() {
            if self.state == State::Text {
                let Some(offset) = memchr2(b'<', b'&', &chunk[i..]) else {
                    break;
                };
                i += offset;
                emit_text(handler, &chunk[run_start..i])?;
            }

            match self.step(chunk[i], handler)? {
                Advance::Consume => i += 1,
                Advance::Rescan => {}
            }

            if self.state == State::Text {
                run_start = i;
            }
        }

        if self.state == State::Text {
            emit_text(handler, &chunk[run_start..])?;
        }

        ControlFlow::Continue(())
    }

    /// The transition function: applies one byte to the current state.
    fn step<H: HtmlHandler + ?Sized>(
        &mut self,
        b: u8,
        handler: &mut H,
    ) -> ControlFlow<(), Advance> {
        match self.state {
            State::Text => match b {
                b'<' => self.state = State::TagStart,
                b'&' => self.begin_entity(State::Entity),
                _ => {}
            },

            State::TagStart => {
                if b == b'!' {
                    self.state = State::Comment;
                    self.comment = CommentWindow::default();
                } else {
                    self.state = State::TagName;
                    return ControlFlow::Continue(Advance::Rescan);
                }
            }

            State::Comment => {
                if !self.comment.started && b != b'-' {
                    // `<!DOCTYPE ...>` and friends: treat as a tag named `!...`.
                    self.text.push(b'!');
                    self.state = State::TagName;
                    return ControlFlow::Continue(Advance::Rescan);
                }
                if self.comment.closes_with(b) {
                    self.state = State::Text;
                } else {
                    self.comment.push(b);
                }
            }

            State::TagName => {
                if b == b'>' || is_space(b) {
                    self.tag.set_name(&self.text);
                    self.text.clear();
                    if self.tag.name().is_empty() {
                        if b == b'>' {
                            self.state = State::Text;
                        } else {
                            log::trace!("skipping tag with empty name");
                            self.state = State::SkipTag;
                        }
                    } else if b == b'>' {
                        self.state = State::Text;
                        handler.tag(&self.tag)?;
                    } else {
                        self.state = State::AttributeName;
                    }
                } else {
                    self.text.push(b);
                }
            }

            State::AttributeName => {
                if b == b'>' || b == b'=' || is_space(b) {
                    if !self.text.is_empty() {
                        self.text.make_ascii_uppercase();
                        self.tag.add_attribute(std::mem::take(&mut self.text));
                    }
                    match b {
                        b'>' => {
                            self.state = State::Text;
                            handler.tag(&self.tag)?;
                        }
                        b'=' => self.state = State::AttributeValue,
                        _ => {}
                    }
                } else {
                    self.text.push(b);
                }
            }

            State::AttributeValue => match b {
                b'"' => {
                    if self.text.is_empty() || self.quotes > 0 {
                        self.quotes += 1;
                    }
                    self.text.push(b);
                }
                b'&' => self.begin_entity(State::EntityInAttributeValue),
                b'/' | b'>' if self.quotes != 1 => self.finish_value(b, handler)?,
                _ if self.quotes != 1 && is_space(b) => self.finish_value(b, handler)?,
                _ => self.text.push(b),
            },

            State::SkipTag => {
                if b == b'>' {
                    self.state = State::Text;
                }
            }

            State::Entity | State::EntityInAttributeValue => {
                return self.step_entity(b, handler);
            }
        }

        ControlFlow::Continue(Advance::Consume)
    }

    fn begin_entity(&mut self, state: State) {
        self.state = state;
        self.entity_kind = EntityKind::Unknown;
        self.entity.clear();
    }

    fn step_entity<H: HtmlHandler + ?Sized>(
        &mut self,
        b: u8,
        handler: &mut H,
    ) -> ControlFlow<(), Advance> {
        match self.entity_kind {
            EntityKind::Unknown => {
                if b == b'#' {
                    self.entity_kind = EntityKind::Numeric;
                } else if b.is_ascii_alphabetic() {
                    self.entity_kind = EntityKind::Named;
                } else {
                    return self.abandon_entity(handler);
                }
            }
            EntityKind::Numeric => {
                if b == b'x' || b == b'X' {
                    self.entity_kind = EntityKind::Hex;
                } else if b.is_ascii_digit() {
                    self.entity_kind = EntityKind::Decimal;
                } else {
                    return self.abandon_entity(handler);
                }
            }
            kind => {
                if b == b';' {
                    self.resolve_entity(handler)?;
                    return ControlFlow::Continue(Advance::Consume);
                }
                if !kind.allows(b) {
                    return self.abandon_entity(handler);
                }
            }
        }

        self.entity.push(b);
        ControlFlow::Continue(Advance::Consume)
    }

    /// Emits `&` plus the partial body as literal text and resumes the outer
    /// state at the offending byte.
    fn abandon_entity<H: HtmlHandler + ?Sized>(
        &mut self,
        handler: &mut H,
    ) -> ControlFlow<(), Advance> {
        let mut literal = Vec::with_capacity(self.entity.len() + 1);
        literal.push(b'&');
        literal.append(&mut self.entity);

        if self.state == State::Entity {
            self.state = State::Text;
            handler.character_data(&literal, true)?;
        } else {
            self.state = State::AttributeValue;
            self.text.extend_from_slice(&literal);
        }
        ControlFlow::Continue(Advance::Rescan)
    }

    fn resolve_entity<H: HtmlHandler + ?Sized>(&mut self, handler: &mut H) -> ControlFlow<()> {
        let code = match self.entity_kind {
            EntityKind::Named => entities::lookup(&self.entity),
            EntityKind::Decimal => parse_code(&self.entity[1..], 10),
            EntityKind::Hex => parse_code(&self.entity[2..], 16),
            EntityKind::Unknown | EntityKind::Numeric => None,
        };

        match code.filter(|&c| c != 0).and_then(char::from_u32) {
            Some(ch) => {
                let mut buf = [0u8; 4];
                self.entity.clear();
                self.emit_entity(ch.encode_utf8(&mut buf).as_bytes(), handler)
            }
            None => {
                log::trace!(
                    "unresolved entity &{};",
                    String::from_utf8_lossy(&self.entity)
                );
                let mut literal = Vec::with_capacity(self.entity.len() + 2);
                literal.push(b'&');
                literal.append(&mut self.entity);
                literal.push(b';');
                self.emit_entity(&literal, handler)
            }
        }
    }

    fn emit_entity<H: HtmlHandler + ?Sized>(
        &mut self,
        bytes: &[u8],
        handler: &mut H,
    ) -> ControlFlow<()> {
        if self.state == State::Entity {
            self.state = State::Text;
            handler.character_data(bytes, false)
        } else {
            self.state = State::AttributeValue;
            self.text.extend_from_slice(bytes);
            ControlFlow::Continue(())
        }
    }

    /// Ends an attribute value at `b` (`/`, `>` or whitespace).
    fn finish_value<H: HtmlHandler + ?Sized>(&mut self, b: u8, handler: &mut H) -> ControlFlow<()> {
        if !self.text.is_empty() {
            let value = if self.text[0] == b'"' {
                let end = (self.text.len() - 1).max(1);
                &self.text[1..end]
            } else {
                &self.text[..]
            };
            self.tag.set_last_attribute_value(value);
            self.text.clear();
            self.quotes = 0;
        }

        if b == b'>' {
            self.state = State::Text;
            handler.tag(&self.tag)
        } else {
            self.state = State::AttributeName;
            ControlFlow::Continue(())
        }
    }
}

fn emit_text<H: HtmlHandler + ?Sized>(handler: &mut H, run: &[u8]) -> ControlFlow<()> {
    if run.is_empty() {
        ControlFlow::Continue(())
    } else {
        handler.character_data(run, true)
    }
}

/// C `isspace` in the "C" locale: includes vertical tab, unlike
/// `u8::is_ascii_whitespace`.
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

fn parse_code(digits: &[u8], radix: u32) -> Option<u32> {
    let digits = std::str::from_utf8(digits).ok()?;
    u32::from_str_radix(digits, radix).ok()
}
