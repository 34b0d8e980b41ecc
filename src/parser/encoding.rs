//! Source encoding detection for FineReader exports.
//!
//! The encoding is taken from the byte order mark when there is one, then from
//! the `encoding` pseudo-attribute of the XML declaration, and defaults to
//! UTF-8. Sources in UTF-16 without a BOM are recognized from the `<?` of the
//! declaration.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

use crate::error::{Error, Result};

/// How many leading bytes are searched for the XML declaration.
const DECLARATION_LEN: usize = 1024;

/// Detect the encoding of an XML source.
///
/// Returns the encoding and the length of its BOM (0 when absent).
pub fn detect_encoding(data: &[u8]) -> Result<(&'static Encoding, usize)> {
    if let Some(found) = Encoding::for_bom(data) {
        return Ok(found);
    }

    // `<?` in UTF-16 without a BOM
    if data.starts_with(&[0x00, b'<', 0x00, b'?']) {
        return Ok((UTF_16BE, 0));
    }
    if data.starts_with(&[b'<', 0x00, b'?', 0x00]) {
        return Ok((UTF_16LE, 0));
    }

    match declared_encoding(data) {
        Some(label) => {
            let encoding = Encoding::for_label(label.as_bytes())
                .ok_or_else(|| Error::Xml(format!("unsupported encoding {:?}", label)))?;
            // An ASCII-readable declaration cannot be UTF-16
            Ok((encoding.output_encoding(), 0))
        }
        None => Ok((UTF_8, 0)),
    }
}

/// Decode an XML source to a string, honouring its BOM and declaration.
///
/// Malformed byte sequences are an error; nothing is replaced.
pub fn decode_source(data: &[u8]) -> Result<String> {
    let (encoding, bom_len) = detect_encoding(data)?;
    log::debug!("Decoding source as {}", encoding.name());

    encoding
        .decode_without_bom_handling_and_without_replacement(&data[bom_len..])
        .map(|text| text.into_owned())
        .ok_or_else(|| Error::Xml(format!("document is not valid {}", encoding.name())))
}

/// The `encoding` value of an ASCII-compatible XML declaration.
fn declared_encoding(data: &[u8]) -> Option<String> {
    let head = &data[..data.len().min(DECLARATION_LEN)];
    if !head.starts_with(b"<?xml") {
        return None;
    }
    let end = head.windows(2).position(|w| w == b"?>")?;
    let declaration = std::str::from_utf8(&head[..end]).ok()?;

    let rest = &declaration[declaration.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    let close = value.find(quote)?;
    Some(value[..close].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1252;

    #[test]
    fn test_default_is_utf8() {
        assert_eq!(detect_encoding(b"<document/>").unwrap(), (UTF_8, 0));
        assert_eq!(
            detect_encoding(br#"<?xml version="1.0"?><document/>"#).unwrap(),
            (UTF_8, 0)
        );
    }

    #[test]
    fn test_bom_wins() {
        assert_eq!(detect_encoding(b"\xEF\xBB\xBF<a/>").unwrap(), (UTF_8, 3));
        assert_eq!(detect_encoding(b"\xFF\xFE<\x00").unwrap(), (UTF_16LE, 2));
        assert_eq!(detect_encoding(b"\xFE\xFF\x00<").unwrap(), (UTF_16BE, 2));
    }

    #[test]
    fn test_utf16_without_bom() {
        assert_eq!(detect_encoding(b"<\x00?\x00x\x00").unwrap(), (UTF_16LE, 0));
        assert_eq!(detect_encoding(b"\x00<\x00?\x00x").unwrap(), (UTF_16BE, 0));
    }

    #[test]
    fn test_declared_encoding() {
        let source = br#"<?xml version="1.0" encoding='ISO-8859-1' ?><document/>"#;
        assert_eq!(declared_encoding(source).as_deref(), Some("ISO-8859-1"));
        // WHATWG maps Latin-1 labels to its windows-1252 superset
        assert_eq!(detect_encoding(source).unwrap(), (WINDOWS_1252, 0));

        assert_eq!(declared_encoding(br#"<?xml version="1.0"?>"#), None);
        assert_eq!(declared_encoding(br#"<document encoding="x"/>"#), None);
    }

    #[test]
    fn test_unknown_label_is_error() {
        let source = br#"<?xml version="1.0" encoding="klingon"?><document/>"#;
        assert!(matches!(detect_encoding(source), Err(Error::Xml(_))));
    }

    #[test]
    fn test_decode_latin1() {
        let mut source = br#"<?xml version="1.0" encoding="ISO-8859-1"?><a>caf"#.to_vec();
        source.push(0xE9);
        source.extend_from_slice(b"</a>");
        assert!(decode_source(&source).unwrap().ends_with("<a>caf\u{e9}</a>"));
    }

    #[test]
    fn test_decode_utf16le_with_bom() {
        let mut source = vec![0xFF, 0xFE];
        for unit in "<a>é</a>".encode_utf16() {
            source.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode_source(&source).unwrap(), "<a>é</a>");
    }

    #[test]
    fn test_invalid_utf8_is_error() {
        assert!(matches!(decode_source(b"<a>\xFF</a>"), Err(Error::Xml(_))));
    }
}
