//! A handler that records the event stream, for inspection and dumping.

use std::fmt;
use std::ops::ControlFlow;

use bstr::{BString, ByteSlice};

use super::reader::HtmlHandler;
use super::tag::Tag;

/// One recorded structural event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlEvent {
    Text(BString),
    Tag {
        name: BString,
        start: bool,
        attributes: Vec<(BString, BString)>,
    },
}

impl HtmlEvent {
    pub fn text(text: impl Into<BString>) -> Self {
        HtmlEvent::Text(text.into())
    }

    pub fn tag(name: &str, start: bool, attributes: &[(&str, &str)]) -> Self {
        HtmlEvent::Tag {
            name: name.into(),
            start,
            attributes: attributes
                .iter()
                .map(|&(n, v)| (n.into(), v.into()))
                .collect(),
        }
    }
}

impl From<&Tag> for HtmlEvent {
    fn from(tag: &Tag) -> Self {
        HtmlEvent::Tag {
            name: tag.name().to_owned(),
            start: tag.is_start(),
            attributes: tag
                .attributes()
                .map(|(n, v)| (n.to_owned(), v.to_owned()))
                .collect(),
        }
    }
}

impl fmt::Display for HtmlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HtmlEvent::Text(text) => write!(f, "TEXT {:?}", text.to_str_lossy()),
            HtmlEvent::Tag {
                name,
                start,
                attributes,
            } => {
                write!(f, "{} {}", if *start { "START" } else { "END" }, name)?;
                for (n, v) in attributes {
                    write!(f, " {}={:?}", n, v.to_str_lossy())?;
                }
                Ok(())
            }
        }
    }
}

/// Records every event. With [`coalescing`](EventCollector::coalescing),
/// adjacent character-data runs are merged so the recorded sequence does not
/// depend on where chunk boundaries or entity references fall.
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<HtmlEvent>,
    coalesce: bool,
    limit: Option<usize>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coalescing() -> Self {
        Self {
            coalesce: true,
            ..Self::default()
        }
    }

    /// Stops the parse once `limit` events have been recorded.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn events(&self) -> &[HtmlEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<HtmlEvent> {
        self.events
    }

    fn record(&mut self, event: HtmlEvent) -> ControlFlow<()> {
        if self.coalesce
            && let HtmlEvent::Text(more) = &event
            && let Some(HtmlEvent::Text(last)) = self.events.last_mut()
        {
            last.extend_from_slice(more);
        } else {
            self.events.push(event);
        }

        match self.limit {
            Some(limit) if self.events.len() >= limit => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        }
    }
}

impl HtmlHandler for EventCollector {
    fn character_data(&mut self, text: &[u8], _convert: bool) -> ControlFlow<()> {
        self.record(HtmlEvent::text(text))
    }

    fn tag(&mut self, tag: &Tag) -> ControlFlow<()> {
        self.record(HtmlEvent::from(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::HtmlReader;
    use crate::io::MemoryStream;

    #[test]
    fn test_coalescing_merges_text_runs() {
        let mut collector = EventCollector::coalescing();
        HtmlReader::new()
            .read_document(&mut MemoryStream::new("a&lt;b<br>c"), &mut collector)
            .unwrap();
        assert_eq!(
            collector.into_events(),
            vec![
                HtmlEvent::text("a<b"),
                HtmlEvent::tag("BR", true, &[]),
                HtmlEvent::text("c")
            ]
        );
    }

    #[test]
    fn test_limit_stops_parse() {
        let mut collector = EventCollector::new().with_limit(2);
        let finished = HtmlReader::new()
            .read_document(&mut MemoryStream::new("<a><b><c>"), &mut collector)
            .unwrap();
        assert!(!finished);
        assert_eq!(collector.events().len(), 2);
    }

    #[test]
    fn test_display() {
        let event = HtmlEvent::tag("A", true, &[("HREF", "x.html")]);
        assert_eq!(event.to_string(), "START A HREF=\"x.html\"");
        assert_eq!(HtmlEvent::text("hi").to_string(), "TEXT \"hi\"");
        assert_eq!(HtmlEvent::tag("P", false, &[]).to_string(), "END P");
    }
}
