//! Namespace-aware XML event source.
//!
//! Used for OPF package documents and `container.xml`, where element names
//! carry namespace prefixes that consumers resolve through [`Namespaces`].

mod namespaces;
mod reader;

pub use namespaces::Namespaces;
pub use reader::{
    Attribute, DEFAULT_BUFFER_SIZE, XmlHandler, XmlReader, attribute_value,
};
