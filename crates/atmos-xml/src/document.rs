//! Whole-document listing parser.

use std::io::BufRead;

use atmos_model::{Metadata, ObjectInfo};
use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{debug, warn};

use crate::error::XmlError;
use crate::listing::ListingParser;
use crate::text::{read_text_content, skip_element};

/// Listing parser that buffers the full body before walking it.
///
/// Elements are matched by local name only, wherever they appear in the
/// document. Useful for servers that omit the namespace declaration.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentListingParser;

impl DocumentListingParser {
    /// Create a parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ListingParser for DocumentListingParser {
    fn parse_identifiers(&self, body: &mut dyn BufRead) -> Result<Vec<String>, XmlError> {
        let objects = read_objects(body)?;
        Ok(objects.into_iter().map(|o| o.id).collect())
    }

    fn parse_objects(&self, body: &mut dyn BufRead) -> Result<Vec<ObjectInfo>, XmlError> {
        read_objects(body)
    }
}

fn read_objects(body: &mut dyn BufRead) -> Result<Vec<ObjectInfo>, XmlError> {
    let mut document = Vec::new();
    body.read_to_end(&mut document)?;

    let mut reader = Reader::from_reader(document.as_slice());
    let mut buf = Vec::new();
    let mut objects = Vec::new();
    // open elements outside of `<Object>`
    let mut depth = 0usize;

    loop {
        buf.clear();
        let is_object = match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.local_name().as_ref() == b"Object" => true,
            Event::Start(_) => {
                depth += 1;
                false
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                false
            }
            Event::Eof => {
                if depth > 0 {
                    return Err(XmlError::UnexpectedEof(format!(
                        "listing ended with {depth} open element(s)"
                    )));
                }
                break;
            }
            _ => false,
        };
        if is_object {
            let object = deserialize_object(&mut reader, &mut buf)?;
            if object.id.is_empty() {
                warn!("Discarding listed object without an ObjectID");
            } else {
                objects.push(object);
            }
        }
    }

    debug!(count = objects.len(), bytes = document.len(), "Parsed listing document");
    Ok(objects)
}

/// Deserialize an `<Object>` element. The reader is positioned after its start tag.
fn deserialize_object<R: BufRead>(
    reader: &mut Reader<R>,
    buf: &mut Vec<u8>,
) -> Result<ObjectInfo, XmlError> {
    let mut object = ObjectInfo::default();

    loop {
        buf.clear();
        let child = match reader.read_event_into(buf)? {
            Event::Start(e) => e.local_name().as_ref().to_vec(),
            Event::End(_) => break,
            Event::Eof => {
                return Err(XmlError::UnexpectedEof("inside Object".to_owned()));
            }
            _ => continue,
        };

        match child.as_slice() {
            b"ObjectID" => {
                if object.id.is_empty() {
                    object.id = read_text_content(reader, buf)?.trim().to_owned();
                } else {
                    skip_element(reader, buf)?;
                }
            }
            b"UserMetadataList" => object.user_metadata = deserialize_metadata_list(reader, buf)?,
            b"SystemMetadataList" => {
                object.system_metadata = deserialize_metadata_list(reader, buf)?;
            }
            _ => skip_element(reader, buf)?,
        }
    }

    Ok(object)
}

fn deserialize_metadata_list<R: BufRead>(
    reader: &mut Reader<R>,
    buf: &mut Vec<u8>,
) -> Result<Vec<Metadata>, XmlError> {
    let mut entries = Vec::new();

    loop {
        buf.clear();
        let child = match reader.read_event_into(buf)? {
            Event::Start(e) => e.local_name().as_ref().to_vec(),
            Event::End(_) => break,
            Event::Eof => {
                return Err(XmlError::UnexpectedEof("inside metadata list".to_owned()));
            }
            _ => continue,
        };

        if child == b"Metadata" {
            entries.push(deserialize_metadata(reader, buf)?);
        } else {
            skip_element(reader, buf)?;
        }
    }

    Ok(entries)
}

fn deserialize_metadata<R: BufRead>(
    reader: &mut Reader<R>,
    buf: &mut Vec<u8>,
) -> Result<Metadata, XmlError> {
    let mut entry = Metadata::default();

    loop {
        buf.clear();
        let child = match reader.read_event_into(buf)? {
            Event::Start(e) => e.local_name().as_ref().to_vec(),
            Event::End(_) => break,
            Event::Eof => {
                return Err(XmlError::UnexpectedEof("inside Metadata".to_owned()));
            }
            _ => continue,
        };

        match child.as_slice() {
            b"Name" => entry.name = read_text_content(reader, buf)?.trim().to_owned(),
            b"Value" => entry.value = read_text_content(reader, buf)?,
            b"Listable" => {
                entry.listable = read_text_content(reader, buf)?
                    .trim()
                    .eq_ignore_ascii_case("true");
            }
            _ => skip_element(reader, buf)?,
        }
    }

    Ok(entry)
}
