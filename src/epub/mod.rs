//! EPUB container access: locate the OPF package document and read its metadata.

mod container;
mod reader;

pub use container::{CONTAINER_PATH, parse_container_xml};
pub use reader::{read_epub_metadata, read_epub_metadata_from_reader};
