//! Hyperlink target decoding.

use percent_encoding::percent_decode_str;

/// Decodes `%XX` escapes in a link target.
///
/// Every `%` followed by two hex digits becomes the byte they encode. A `%`
/// without two hex digits after it is kept as written. The decoded bytes are
/// read as UTF-8; invalid sequences become U+FFFD.
pub fn decode_url(encoded: &str) -> String {
    percent_decode_str(encoded).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_url() {
        assert_eq!(decode_url("chapter%201.html"), "chapter 1.html");
        assert_eq!(decode_url("a%2Fb%2fc"), "a/b/c");
        assert_eq!(decode_url("plain.html#frag"), "plain.html#frag");
    }

    #[test]
    fn test_decode_url_multibyte() {
        assert_eq!(decode_url("caf%C3%A9.xhtml"), "caf\u{e9}.xhtml");
    }

    #[test]
    fn test_decode_url_incomplete_escapes() {
        assert_eq!(decode_url("100%"), "100%");
        assert_eq!(decode_url("x%4"), "x%4");
        assert_eq!(decode_url("%zz"), "%zz");
        assert_eq!(decode_url("%41"), "A");
    }
}
