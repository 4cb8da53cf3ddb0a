use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

/// A sequential source of markup bytes.
///
/// Readers call [`open`](InputStream::open) once, pull fixed-size chunks with
/// [`read`](InputStream::read) and call [`close`](InputStream::close) when
/// done, whether or not the parse ran to completion.
pub trait InputStream {
    /// Prepares the stream for reading.
    fn open(&mut self) -> io::Result<()>;

    /// Fills `buf` with the next bytes of the stream.
    ///
    /// Implementations must fill the whole buffer unless the end of the
    /// stream is reached: a short read is how readers detect end-of-stream.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Releases the underlying resource. Reading after `close` is an error.
    fn close(&mut self);
}

impl<S: InputStream + ?Sized> InputStream for &mut S {
    fn open(&mut self) -> io::Result<()> {
        (**self).open()
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

// --- Implementation: In-Memory ---

/// An in-memory stream backed by a `Vec<u8>`.
pub struct MemoryStream {
    data: Vec<u8>,
    position: usize,
    is_open: bool,
}

impl MemoryStream {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            position: 0,
            is_open: false,
        }
    }

    /// True between a successful `open` and the matching `close`.
    pub fn is_open(&self) -> bool {
        self.is_open
    }
}

impl InputStream for MemoryStream {
    fn open(&mut self) -> io::Result<()> {
        self.position = 0;
        self.is_open = true;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.is_open {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "stream is not open"));
        }
        let remaining = &self.data[self.position..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.position += n;
        Ok(n)
    }

    fn close(&mut self) {
        self.is_open = false;
    }
}

// --- Implementation: Local File ---

/// A stream over a file on disk. The file is opened lazily by `open`.
pub struct FileStream {
    path: PathBuf,
    file: Option<File>,
}

impl FileStream {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
        }
    }
}

impl InputStream for FileStream {
    fn open(&mut self) -> io::Result<()> {
        self.file = Some(File::open(&self.path)?);
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.file.as_mut() {
            Some(file) => fill(file, buf),
            None => Err(io::Error::new(io::ErrorKind::NotConnected, "stream is not open")),
        }
    }

    fn close(&mut self) {
        self.file = None;
    }
}

// --- Implementation: Any `Read` ---

/// Wraps any `std::io::Read` as an [`InputStream`]. `open` is a no-op.
pub struct ReaderStream<R> {
    inner: R,
}

impl<R: Read> ReaderStream<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> InputStream for ReaderStream<R> {
    fn open(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        fill(&mut self.inner, buf)
    }

    fn close(&mut self) {}
}

/// `Read::read` may return short counts mid-stream; keep reading until the
/// buffer is full or the source is exhausted.
fn fill<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
