//! tagstream - inspect markup streams and ebook metadata

use std::io::Write;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use tagstream::html::{DEFAULT_CHUNK_SIZE, HtmlEvent};
use tagstream::io::FileStream;
use tagstream::{HtmlHandler, HtmlReader, Metadata, Tag, TextExtractor};

#[derive(Parser)]
#[command(name = "tagstream")]
#[command(version, about = "Streaming markup parser and ebook metadata reader", long_about = None)]
#[command(after_help = "EXAMPLES:
    tagstream meta book.epub            Show EPUB metadata
    tagstream meta content.opf --json   Show OPF metadata as JSON
    tagstream tags chapter.html         Dump tag and text events
    tagstream text chapter.html --links Extract text and link targets")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show bibliographic metadata of an EPUB or OPF file
    Meta {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Dump the tag and text events of a markup file
    Tags {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Bytes read per chunk
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
    },
    /// Extract plain text from a markup file
    Text {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Character encoding of the document (WHATWG label)
        #[arg(long, default_value = "utf-8")]
        encoding: String,

        /// Also list link targets
        #[arg(long)]
        links: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Meta { input, json } => show_meta(&input, json),
        Command::Tags { input, chunk_size } => dump_tags(&input, chunk_size),
        Command::Text {
            input,
            encoding,
            links,
        } => extract_text(&input, &encoding, links),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init();
}

#[derive(Serialize)]
struct MetaReport<'a> {
    title: &'a str,
    authors: &'a [String],
    language: &'a str,
    tags: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    series: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    series_index: Option<i32>,
}

impl<'a> From<&'a Metadata> for MetaReport<'a> {
    fn from(meta: &'a Metadata) -> Self {
        Self {
            title: &meta.title,
            authors: &meta.authors,
            language: &meta.language,
            tags: &meta.tags,
            series: meta.series.as_deref(),
            series_index: meta.series_index,
        }
    }
}

fn show_meta(path: &Path, json: bool) -> Result<(), String> {
    let is_epub = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("epub"));
    let meta = if is_epub {
        tagstream::read_epub_metadata(path)
    } else {
        tagstream::read_opf_metadata(path)
    }
    .map_err(|e| e.to_string())?;

    if json {
        let report = serde_json::to_string_pretty(&MetaReport::from(&meta))
            .map_err(|e| e.to_string())?;
        println!("{report}");
        return Ok(());
    }

    println!("File: {}", path.display());
    println!("Title: {}", meta.title);
    if !meta.authors.is_empty() {
        println!("Authors: {}", meta.authors.join(", "));
    }
    if !meta.language.is_empty() {
        println!("Language: {}", meta.language);
    }
    if !meta.tags.is_empty() {
        println!("Subjects: {}", meta.tags.join(", "));
    }
    if let Some(ref series) = meta.series {
        match meta.series_index {
            Some(index) => println!("Series: {series} #{index}"),
            None => println!("Series: {series}"),
        }
    }
    Ok(())
}

/// Prints every event as it arrives; stops when stdout goes away.
struct EventPrinter<W: Write> {
    out: W,
}

impl<W: Write> EventPrinter<W> {
    fn print(&mut self, event: HtmlEvent) -> ControlFlow<()> {
        match writeln!(self.out, "{event}") {
            Ok(()) => ControlFlow::Continue(()),
            Err(_) => ControlFlow::Break(()),
        }
    }
}

impl<W: Write> HtmlHandler for EventPrinter<W> {
    fn character_data(&mut self, data: &[u8], _convert: bool) -> ControlFlow<()> {
        self.print(HtmlEvent::text(data))
    }

    fn tag(&mut self, tag: &Tag) -> ControlFlow<()> {
        self.print(HtmlEvent::from(tag))
    }
}

fn dump_tags(path: &Path, chunk_size: usize) -> Result<(), String> {
    let mut printer = EventPrinter {
        out: std::io::stdout().lock(),
    };
    HtmlReader::new()
        .with_chunk_size(chunk_size)
        .read_document(&mut FileStream::new(path), &mut printer)
        .map_err(|e| e.to_string())?;
    Ok(())
}

fn extract_text(path: &Path, encoding: &str, links: bool) -> Result<(), String> {
    let mut extractor = TextExtractor::new(encoding);
    HtmlReader::new()
        .read_document(&mut FileStream::new(path), &mut extractor)
        .map_err(|e| e.to_string())?;

    for paragraph in extractor.paragraphs() {
        println!("{paragraph}");
    }
    if links {
        println!();
        for link in extractor.links() {
            println!("-> {link}");
        }
    }
    Ok(())
}
