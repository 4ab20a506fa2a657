//! Shared XML helpers for reading and writing SpreadsheetML parts.
//!
//! Attribute lookups handle namespace-prefixed keys and invalid UTF-8 by
//! returning `None` rather than failing the whole import.

use quick_xml::events::BytesStart;

/// Extract a string attribute value by exact key.
///
/// Returns `None` if the attribute is missing or not valid UTF-8.
pub fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            return attr.unescape_value().ok().map(|s| s.to_string());
        }
    }
    None
}

/// Extract a string attribute by local name (ignoring namespace prefix).
pub fn attr_string_local(e: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == key {
            return attr.unescape_value().ok().map(|s| s.to_string());
        }
    }
    None
}

/// Minimal XML escaping for attribute/text content.
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use quick_xml::events::Event;
    use quick_xml::Reader;

    fn first_start(xml: &str) -> BytesStart<'static> {
        let mut reader = Reader::from_str(xml);
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) | Event::Empty(e) => return e.into_owned(),
                Event::Eof => panic!("no element in {xml}"),
                _ => {}
            }
        }
    }

    #[test]
    fn test_attr_string_unescapes() {
        let e = first_start(r#"<sheet name="Fonts &amp; Colors" sheetId="3"/>"#);
        assert_eq!(attr_string(&e, b"name").as_deref(), Some("Fonts & Colors"));
        assert_eq!(attr_string(&e, b"sheetId").as_deref(), Some("3"));
        assert_eq!(attr_string(&e, b"missing"), None);
    }

    #[test]
    fn test_attr_string_local_ignores_prefix() {
        let e = first_start(r#"<sheet name="S" r:id="rId7"/>"#);
        assert_eq!(attr_string_local(&e, b"id").as_deref(), Some("rId7"));
        assert_eq!(attr_string(&e, b"id"), None);
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape(r#"a<b & "c"'"#), "a&lt;b &amp; &quot;c&quot;&apos;");
    }
}
