//! The per-occurrence tag model handed to [`HtmlHandler::tag`](super::HtmlHandler::tag).

use bstr::{BStr, BString, ByteSlice};

/// Only this many leading bytes of a tag name are case-normalized. Known tag
/// names are all shorter, so this is enough for matching.
pub const NORMALIZED_NAME_LEN: usize = 10;

/// One parsed tag occurrence: `<p class=x>` or `</p>`.
///
/// A single `Tag` is reused by the lexer for every tag in the document;
/// [`set_name`](Tag::set_name) resets it, so no attribute leaks from one tag
/// into the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    name: BString,
    start: bool,
    attributes: Vec<(BString, BString)>,
}

impl Tag {
    pub fn new() -> Self {
        Self {
            start: true,
            ..Self::default()
        }
    }

    /// Resets the tag from the raw text between `<` and the first
    /// whitespace or `>`.
    ///
    /// A leading `/` marks a closing tag and is stripped. The first
    /// [`NORMALIZED_NAME_LEN`] bytes are ASCII-uppercased; the rest of the
    /// name is kept as written. An empty raw name leaves the start flag
    /// untouched and yields an empty name.
    pub fn set_name(&mut self, raw: &[u8]) {
        self.attributes.clear();
        self.name.clear();

        let Some(&first) = raw.first() else {
            return;
        };

        self.start = first != b'/';
        let name = if self.start { raw } else { &raw[1..] };
        self.name.extend_from_slice(name);

        let len = self.name.len().min(NORMALIZED_NAME_LEN);
        self.name.as_mut_slice()[..len].make_ascii_uppercase();
    }

    /// The normalized tag name (without the `/` of a closing tag).
    pub fn name(&self) -> &BStr {
        self.name.as_bstr()
    }

    /// True for `<name ...>`, false for `</name>`.
    pub fn is_start(&self) -> bool {
        self.start
    }

    /// True if the normalized name equals `name`.
    pub fn is(&self, name: &str) -> bool {
        self.name == name.as_bytes()
    }

    /// Registers an attribute with an empty value. The name is stored as
    /// given; the lexer uppercases it first.
    pub fn add_attribute(&mut self, name: impl Into<BString>) {
        self.attributes.push((name.into(), BString::default()));
    }

    /// Assigns `value` to the most recently added attribute. Without any
    /// attribute this is a no-op.
    pub fn set_last_attribute_value(&mut self, value: impl Into<BString>) {
        if let Some((_, last)) = self.attributes.last_mut() {
            *last = value.into();
        }
    }

    /// Attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&BStr, &BStr)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_bstr(), value.as_bstr()))
    }

    /// Value of the first attribute called `name` (compared exactly, so pass
    /// it uppercased).
    pub fn attribute(&self, name: &str) -> Option<&BStr> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name.as_bytes())
            .map(|(_, value)| value.as_bstr())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }
}
