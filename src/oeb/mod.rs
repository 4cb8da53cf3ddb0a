//! OEB/OPF package metadata.
//!
//! [`MetaInfoReader`] consumes the namespace-resolved events of
//! [`XmlReader`](crate::xml::XmlReader) and fills a
//! [`MetadataSink`](crate::book::MetadataSink).

mod meta_info;
pub mod namespace;

pub use meta_info::{MetaInfoReader, read_opf_metadata};
