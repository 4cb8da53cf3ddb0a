use super::stream::InputStream;
use std::io::{self, Read};

/// Wraps an opened [`InputStream`] into a `std::io::Read`.
/// Used to pass our streams into libraries like `quick_xml::Reader`.
pub struct StreamReader<'a, S: ?Sized> {
    inner: &'a mut S,
    exhausted: bool,
}

impl<'a, S: InputStream + ?Sized> StreamReader<'a, S> {
    pub fn new(inner: &'a mut S) -> Self {
        Self {
            inner,
            exhausted: false,
        }
    }
}

impl<S: InputStream + ?Sized> Read for StreamReader<'_, S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.exhausted || buf.is_empty() {
            return Ok(0);
        }

        // A short read marks the end of the stream; never ask again.
        let n = self.inner.read(buf)?;
        if n < buf.len() {
            self.exhausted = true;
        }
        Ok(n)
    }
}
