//! Helpers for reading character data.

use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;

use crate::error::XmlError;

/// Append the character data carried by `event` to `out`.
///
/// Handles plain text, CDATA sections and entity references, which quick-xml
/// reports as separate events. Returns `false` for any other event.
pub(crate) fn push_text(out: &mut String, event: &Event<'_>) -> Result<bool, XmlError> {
    match event {
        Event::Text(e) => {
            let decoded = e
                .decode()
                .map_err(|err| XmlError::ParseError(err.to_string()))?;
            out.push_str(&decoded);
        }
        Event::CData(e) => {
            let text =
                std::str::from_utf8(e).map_err(|err| XmlError::ParseError(err.to_string()))?;
            out.push_str(text);
        }
        Event::GeneralRef(e) => {
            if let Some(ch) = e.resolve_char_ref()? {
                out.push(ch);
            } else {
                let name = e
                    .decode()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                let resolved = resolve_predefined_entity(&name)
                    .ok_or_else(|| XmlError::ParseError(format!("unknown entity: &{name};")))?;
                out.push_str(resolved);
            }
        }
        _ => return Ok(false),
    }
    Ok(true)
}

/// Read the text content of the current element and consume its end tag.
///
/// Expects the reader to be positioned right after a `Start` event.
pub(crate) fn read_text_content<R: BufRead>(
    reader: &mut Reader<R>,
    buf: &mut Vec<u8>,
) -> Result<String, XmlError> {
    let mut text = String::new();
    let mut depth: u32 = 1;
    loop {
        buf.clear();
        let event = reader.read_event_into(buf)?;
        match event {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(text);
                }
            }
            Event::Eof => {
                return Err(XmlError::UnexpectedEof(
                    "while reading text content".to_owned(),
                ));
            }
            ref other if depth == 1 => {
                push_text(&mut text, other)?;
            }
            _ => {}
        }
    }
}

/// Skip over an element and all its children.
pub(crate) fn skip_element<R: BufRead>(
    reader: &mut Reader<R>,
    buf: &mut Vec<u8>,
) -> Result<(), XmlError> {
    let mut depth: u32 = 1;
    loop {
        buf.clear();
        match reader.read_event_into(buf)? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => {
                return Err(XmlError::UnexpectedEof(
                    "while skipping element".to_owned(),
                ));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_child_text(xml: &str) -> String {
        let mut reader = Reader::from_reader(xml.as_bytes());
        let mut buf = Vec::new();
        // position after <Root>
        loop {
            buf.clear();
            if matches!(reader.read_event_into(&mut buf).unwrap(), Event::Start(_)) {
                break;
            }
        }
        read_text_content(&mut reader, &mut buf).unwrap()
    }

    #[test]
    fn test_should_resolve_entities_and_cdata() {
        assert_eq!(first_child_text("<V>a &amp; b</V>"), "a & b");
        assert_eq!(first_child_text("<V>&#65;&lt;</V>"), "A<");
        assert_eq!(first_child_text("<V><![CDATA[x<y]]></V>"), "x<y");
    }

    #[test]
    fn test_should_keep_surrounding_whitespace() {
        assert_eq!(first_child_text("<V>  spaced </V>"), "  spaced ");
    }

    #[test]
    fn test_should_fail_on_truncated_element() {
        let mut reader = Reader::from_reader("<V>abc".as_bytes());
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if matches!(reader.read_event_into(&mut buf).unwrap(), Event::Start(_)) {
                break;
            }
        }
        assert!(read_text_content(&mut reader, &mut buf).is_err());
    }
}
