use std::io::{Read, Seek};
use std::path::Path;

use zip::ZipArchive;

use super::container::{CONTAINER_PATH, parse_container_xml};
use crate::book::Metadata;
use crate::error::{Error, Result};
use crate::io::MemoryStream;
use crate::oeb::MetaInfoReader;

/// Read the bibliographic metadata of an EPUB file on disk.
///
/// Locates the package document through `META-INF/container.xml` and runs
/// it through [`MetaInfoReader`]. Content documents are never opened.
///
/// # Example
///
/// ```no_run
/// use tagstream::read_epub_metadata;
///
/// let meta = read_epub_metadata("path/to/book.epub")?;
/// println!("Title: {}", meta.title);
/// # Ok::<(), tagstream::Error>(())
/// ```
pub fn read_epub_metadata<P: AsRef<Path>>(path: P) -> Result<Metadata> {
    let file = std::fs::File::open(path)?;
    read_epub_metadata_from_reader(file)
}

/// Read EPUB metadata from any [`Read`] + [`Seek`] source.
///
/// ```no_run
/// use std::io::Cursor;
/// use tagstream::epub::read_epub_metadata_from_reader;
///
/// let epub_data: Vec<u8> = std::fs::read("book.epub")?;
/// let meta = read_epub_metadata_from_reader(Cursor::new(epub_data))?;
/// # Ok::<(), tagstream::Error>(())
/// ```
pub fn read_epub_metadata_from_reader<R: Read + Seek>(reader: R) -> Result<Metadata> {
    let mut archive = ZipArchive::new(reader)?;

    let container = read_archive_file_bytes(&mut archive, CONTAINER_PATH)?;
    let opf_path = parse_container_xml(&container)?;
    log::debug!("package document at {opf_path}");

    let opf = read_archive_file_bytes(&mut archive, &opf_path)?;
    let mut metadata = Metadata::default();
    MetaInfoReader::new(&mut metadata).read_meta_info(&mut MemoryStream::new(opf))?;
    Ok(metadata)
}

fn read_archive_file_bytes<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Result<Vec<u8>> {
    match archive.by_name(path) {
        Ok(mut file) => {
            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            return Ok(contents);
        }
        Err(zip::result::ZipError::FileNotFound) => {}
        Err(e) => return Err(e.into()),
    }

    // Some packagers percent-encode the rootfile path
    let decoded = percent_encoding::percent_decode_str(path)
        .decode_utf8()
        .map_err(|_| Error::InvalidEpub(format!("Invalid UTF-8 in path: {}", path)))?;

    match archive.by_name(&decoded) {
        Ok(mut file) => {
            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            Ok(contents)
        }
        Err(zip::result::ZipError::FileNotFound) => {
            Err(Error::InvalidEpub(format!("Missing archive entry: {}", path)))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    const CONTAINER: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles><rootfile full-path="OEBPS/my%20book.opf" media-type="application/oebps-package+xml"/></rootfiles>
</container>"#;

    const OPF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
    <dc:title>Dune</dc:title>
    <dc:creator opf:role="aut">Frank Herbert</dc:creator>
    <dc:language>en-GB</dc:language>
  </metadata>
</package>"#;

    fn archive(entries: &[(&str, &str)]) -> Cursor<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        let mut cursor = zip.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    #[test]
    fn test_reads_package_metadata() {
        let epub = archive(&[
            ("mimetype", "application/epub+zip"),
            (CONTAINER_PATH, CONTAINER),
            ("OEBPS/my book.opf", OPF),
        ]);
        let meta = read_epub_metadata_from_reader(epub).unwrap();
        assert_eq!(meta.title, "Dune");
        assert_eq!(meta.authors, ["Frank Herbert"]);
        assert_eq!(meta.language, "en");
    }

    #[test]
    fn test_missing_package_document() {
        let epub = archive(&[(CONTAINER_PATH, CONTAINER)]);
        let err = read_epub_metadata_from_reader(epub).unwrap_err();
        assert!(matches!(err, Error::InvalidEpub(_)));
    }

    #[test]
    fn test_missing_container() {
        let epub = archive(&[("OEBPS/content.opf", OPF)]);
        let err = read_epub_metadata_from_reader(epub).unwrap_err();
        assert!(matches!(err, Error::InvalidEpub(_)));
    }

    #[test]
    fn test_not_a_zip() {
        let err = read_epub_metadata_from_reader(Cursor::new(b"plain text".to_vec())).unwrap_err();
        assert!(matches!(err, Error::Zip(_)));
    }
}
