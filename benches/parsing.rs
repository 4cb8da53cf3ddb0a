//! Benchmarks for the markup and metadata readers.
//!
//! Run with: cargo bench

use std::ops::ControlFlow;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use tagstream::io::MemoryStream;
use tagstream::{HtmlHandler, HtmlReader, MetaInfoReader, Metadata, Tag, TextExtractor};

/// A synthetic chapter with a mix of markup, entities and comments.
fn sample_html() -> Vec<u8> {
    let mut html = String::from("<!DOCTYPE html>\n<html><head><title>Bench</title></head><body>\n");
    for i in 0..500 {
        html.push_str(&format!(
            "<p class=\"para\" id=\"p{i}\">Paragraph {i} &mdash; caf&eacute; &#169; &#x2014; \
             <a href=\"ch{i}.html#note%20{i}\">note</a> <em>emphasis</em> &amp; more text.</p>\n\
             <!-- comment {i} -->\n"
        ));
    }
    html.push_str("</body></html>\n");
    html.into_bytes()
}

fn sample_opf() -> String {
    let mut subjects = String::new();
    for i in 0..50 {
        subjects.push_str(&format!("<dc:subject>Subject {i}</dc:subject>\n"));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
    <dc:title>Bench Book</dc:title>
    <dc:creator opf:role="aut">An Author</dc:creator>
    <dc:language>en-US</dc:language>
    {subjects}
    <meta name="calibre:series" content="Series"/>
    <meta name="calibre:series_index" content="7"/>
  </metadata>
  <manifest/>
</package>"#
    )
}

/// Counts events without storing them.
#[derive(Default)]
struct Counter {
    tags: usize,
    bytes: usize,
}

impl HtmlHandler for Counter {
    fn character_data(&mut self, text: &[u8], _convert: bool) -> ControlFlow<()> {
        self.bytes += text.len();
        ControlFlow::Continue(())
    }

    fn tag(&mut self, _tag: &Tag) -> ControlFlow<()> {
        self.tags += 1;
        ControlFlow::Continue(())
    }
}

// ============================================================================
// Markup Benchmarks
// ============================================================================

fn bench_html_chunk_sizes(c: &mut Criterion) {
    let html = sample_html();
    let mut group = c.benchmark_group("html_reader");
    group.throughput(Throughput::Bytes(html.len() as u64));

    for chunk_size in [64, 2048, 65536] {
        group.bench_with_input(BenchmarkId::from_parameter(chunk_size), &chunk_size, |b, &size| {
            let reader = HtmlReader::new().with_chunk_size(size);
            b.iter(|| {
                let mut counter = Counter::default();
                reader
                    .read_document(&mut MemoryStream::new(html.as_slice()), &mut counter)
                    .unwrap();
                counter.tags
            });
        });
    }
    group.finish();
}

fn bench_text_extraction(c: &mut Criterion) {
    let html = sample_html();

    c.bench_function("text_extraction", |b| {
        b.iter(|| {
            let mut extractor = TextExtractor::default();
            HtmlReader::new()
                .read_document(&mut MemoryStream::new(html.as_slice()), &mut extractor)
                .unwrap();
            extractor.paragraphs().len()
        });
    });
}

// ============================================================================
// Metadata Benchmarks
// ============================================================================

fn bench_opf_metadata(c: &mut Criterion) {
    let opf = sample_opf();

    c.bench_function("opf_metadata", |b| {
        b.iter(|| {
            let mut meta = Metadata::default();
            MetaInfoReader::new(&mut meta)
                .read_meta_info(&mut MemoryStream::new(opf.as_str()))
                .unwrap();
            meta
        });
    });
}

criterion_group!(
    benches,
    bench_html_chunk_sizes,
    bench_text_extraction,
    bench_opf_metadata,
);
criterion_main!(benches);
