use std::ops::ControlFlow;

use crate::error::{Error, Result};
use crate::io::MemoryStream;
use crate::util::strip_bom;
use crate::xml::{Attribute, Namespaces, XmlHandler, XmlReader, attribute_value};

/// Path of the container document inside every EPUB archive.
pub const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Finds the first `<rootfile full-path="...">` in `META-INF/container.xml`.
#[derive(Default)]
struct RootfileFinder {
    full_path: Option<String>,
}

impl XmlHandler for RootfileFinder {
    fn start_element(
        &mut self,
        tag: &str,
        attributes: &[Attribute],
        _namespaces: &Namespaces,
    ) -> ControlFlow<()> {
        if local_name(tag) == "rootfile"
            && let Some(path) = attribute_value(attributes, "full-path")
        {
            self.full_path = Some(path.to_string());
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }
}

/// Returns the package document path named by an EPUB `container.xml`.
pub fn parse_container_xml(bytes: &[u8]) -> Result<String> {
    let mut finder = RootfileFinder::default();
    let mut stream = MemoryStream::new(strip_bom(bytes));
    XmlReader::new().read_document(&mut stream, &mut finder)?;
    finder
        .full_path
        .ok_or_else(|| Error::MissingElement("rootfile in container.xml".into()))
}

/// Extract local name from potentially namespaced XML name
fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
    <rootfile full-path="other.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

    #[test]
    fn test_first_rootfile() {
        assert_eq!(parse_container_xml(CONTAINER.as_bytes()).unwrap(), "OEBPS/content.opf");
    }

    #[test]
    fn test_bom_and_prefixed_rootfile() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(
            br#"<c:container xmlns:c="urn:x"><c:rootfiles><c:rootfile full-path="a.opf"/></c:rootfiles></c:container>"#,
        );
        assert_eq!(parse_container_xml(&bytes).unwrap(), "a.opf");
    }

    #[test]
    fn test_missing_rootfile() {
        let err = parse_container_xml(b"<container><rootfiles/></container>").unwrap_err();
        assert!(matches!(err, Error::MissingElement(_)));
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name("c:rootfile"), "rootfile");
        assert_eq!(local_name("rootfile"), "rootfile");
    }
}
