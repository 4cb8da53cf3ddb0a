//! IO abstractions for sequential, chunked markup reading.

mod adapter;
mod stream;

pub use adapter::StreamReader;
pub use stream::{FileStream, InputStream, MemoryStream, ReaderStream};
