use std::io::Write;
use std::ops::ControlFlow;

use proptest::prelude::*;
use tagstream::html::{EventCollector, HtmlEvent};
use tagstream::io::{FileStream, MemoryStream, ReaderStream};
use tagstream::{Error, HtmlHandler, HtmlReader, Tag, TextExtractor};
use tempfile::NamedTempFile;

fn parse(doc: &[u8], chunk_size: usize) -> (bool, Vec<HtmlEvent>) {
    let mut collector = EventCollector::coalescing();
    let completed = HtmlReader::new()
        .with_chunk_size(chunk_size)
        .read_document(&mut MemoryStream::new(doc), &mut collector)
        .expect("memory streams always open");
    (completed, collector.into_events())
}

const SAMPLE: &str = r#"<!DOCTYPE html>
<html><head><title>Caf&eacute; &amp; Bar</title>
<!-- navigation -- goes here -->
</head>
<body bgcolor=white>
<p class="intro" id='first'>Fish &#38; chips &#x263A; &bogus; &c</p>
<a href="ch%202.html">next</a><br/>
</body></html>"#;

#[test]
fn test_sample_document() {
    let (completed, events) = parse(SAMPLE.as_bytes(), 2048);
    assert!(completed);

    let tags: Vec<String> = events
        .iter()
        .filter(|e| matches!(e, HtmlEvent::Tag { .. }))
        .map(|e| e.to_string())
        .collect();
    assert_eq!(
        tags,
        [
            "START !DOCTYPE HTML=\"\"",
            "START HTML",
            "START HEAD",
            "START TITLE",
            "END TITLE",
            "END HEAD",
            "START BODY BGCOLOR=\"white\"",
            "START P CLASS=\"intro\" ID=\"'first'\"",
            "END P",
            "START A HREF=\"ch%202.html\"",
            "END A",
            "START BR/",
            "END BODY",
            "END HTML",
        ]
    );

    assert!(events.contains(&HtmlEvent::text("Café & Bar")));
    assert!(events.contains(&HtmlEvent::text("Fish & chips \u{263A} &bogus; &c")));
}

#[test]
fn test_comment_hides_markup_and_declaration_is_a_tag() {
    let (_, events) = parse(b"<!DOCTYPE x><!-- <p>hidden</p> -->shown", 2048);
    assert_eq!(
        events,
        vec![
            HtmlEvent::tag("!DOCTYPE", true, &[("X", "")]),
            HtmlEvent::text("shown"),
        ]
    );
}

#[test]
fn test_every_chunk_size_agrees_on_sample() {
    let (_, expected) = parse(SAMPLE.as_bytes(), SAMPLE.len());
    for chunk_size in 1..=SAMPLE.len() + 1 {
        let (completed, events) = parse(SAMPLE.as_bytes(), chunk_size);
        assert!(completed);
        assert_eq!(events, expected, "chunk size {chunk_size}");
    }
}

/// Stops at the first tag whose name matches.
struct StopAt(&'static str, Vec<String>);

impl HtmlHandler for StopAt {
    fn character_data(&mut self, _text: &[u8], _convert: bool) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn tag(&mut self, tag: &Tag) -> ControlFlow<()> {
        self.1.push(tag.name().to_string());
        if tag.is(self.0) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

#[test]
fn test_early_termination() {
    let mut handler = StopAt("BODY", Vec::new());
    let completed = HtmlReader::new()
        .with_chunk_size(4)
        .read_document(&mut MemoryStream::new(SAMPLE), &mut handler)
        .unwrap();
    assert!(!completed);
    assert_eq!(handler.1.last().map(String::as_str), Some("BODY"));
    assert!(!handler.1.iter().any(|name| name == "P"));
}

#[test]
fn test_file_stream() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();

    let mut collector = EventCollector::coalescing();
    let completed = HtmlReader::new()
        .read_document(&mut FileStream::new(file.path()), &mut collector)
        .unwrap();
    assert!(completed);
    assert_eq!(collector.into_events(), parse(SAMPLE.as_bytes(), 2048).1);
}

#[test]
fn test_open_failure_reports_error_without_events() {
    let dir = tempfile::tempdir().unwrap();
    let mut collector = EventCollector::new();
    let err = HtmlReader::new()
        .read_document(&mut FileStream::new(dir.path().join("missing.html")), &mut collector)
        .unwrap_err();
    assert!(matches!(err, Error::Open(_)));
    assert!(collector.events().is_empty());
}

#[test]
fn test_reader_stream_and_text_extraction() {
    let mut extractor = TextExtractor::default();
    HtmlReader::new()
        .with_chunk_size(3)
        .read_document(&mut ReaderStream::new(SAMPLE.as_bytes()), &mut extractor)
        .unwrap();
    assert!(extractor.text().contains("Fish & chips"));
    assert_eq!(extractor.links(), ["ch 2.html"]);
}

fn fragment() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "<p>",
        "</P>",
        "text",
        " ",
        "\n",
        "&amp;",
        "&#65;",
        "&#x4E2D;",
        "&bogus;",
        "&lt",
        "& ",
        "&#;",
        "<!-- c -->",
        "<!--x-->",
        "<a href=\"x y\">",
        "<img src='a' alt=b>",
        "<br/>",
        "<!DOCTYPE html>",
        "<",
        ">",
        "\"",
        "caf\u{e9}",
    ])
}

proptest! {
    #[test]
    fn prop_events_do_not_depend_on_chunk_size(
        parts in prop::collection::vec(fragment(), 0..40),
        chunk_size in 1usize..64,
    ) {
        let doc = parts.concat();
        let (whole_completed, whole) = parse(doc.as_bytes(), doc.len().max(1));
        let (chunked_completed, chunked) = parse(doc.as_bytes(), chunk_size);
        prop_assert!(whole_completed && chunked_completed);
        prop_assert_eq!(chunked, whole);
    }

    #[test]
    fn prop_plain_text_passes_through(text in "[a-zA-Z0-9 .,;:!?\n]{1,200}", chunk_size in 1usize..32) {
        let (_, events) = parse(text.as_bytes(), chunk_size);
        prop_assert_eq!(events, vec![HtmlEvent::text(text.as_str())]);
    }
}
