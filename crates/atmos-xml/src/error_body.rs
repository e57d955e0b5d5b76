//! Parsing of the `<Error>` document returned with failed requests.

use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::XmlError;
use crate::text::{read_text_content, skip_element};

/// The fields of an Atmos error document.
///
/// Both fields are optional: a server may omit either one, and the caller
/// decides how to fill the gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBody {
    /// Text of the `Code` element, trimmed.
    pub code: Option<String>,
    /// Text of the `Message` element, trimmed.
    pub message: Option<String>,
}

/// Parse an error document.
///
/// `Code` and `Message` are matched by local name among the children of the
/// root element; any other child is skipped.
///
/// # Errors
///
/// Returns an error if the document is not well-formed XML or has no root
/// element.
///
/// # Examples
///
/// ```
/// use atmos_xml::parse_error_body;
///
/// let body = parse_error_body(&b"<Error><Code>1003</Code><Message>not found</Message></Error>"[..]).unwrap();
/// assert_eq!(body.code.as_deref(), Some("1003"));
/// assert_eq!(body.message.as_deref(), Some("not found"));
/// ```
pub fn parse_error_body<R: BufRead>(reader: R) -> Result<ErrorBody, XmlError> {
    let mut reader = Reader::from_reader(reader);
    let mut buf = Vec::new();
    let mut body = ErrorBody::default();

    // Find the root element.
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(_) => break,
            Event::Empty(_) => return Ok(body),
            Event::Eof => return Err(XmlError::MissingElement("Error".to_owned())),
            _ => {}
        }
    }

    loop {
        buf.clear();
        let child = match reader.read_event_into(&mut buf)? {
            Event::Start(e) => e.local_name().as_ref().to_vec(),
            Event::End(_) => break,
            Event::Eof => {
                return Err(XmlError::UnexpectedEof("inside error document".to_owned()));
            }
            _ => continue,
        };

        match child.as_slice() {
            b"Code" => body.code = Some(read_text_content(&mut reader, &mut buf)?.trim().to_owned()),
            b"Message" => {
                body.message = Some(read_text_content(&mut reader, &mut buf)?.trim().to_owned());
            }
            _ => skip_element(&mut reader, &mut buf)?,
        }
    }

    Ok(body)
}
