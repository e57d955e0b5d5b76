//! Object listing parsers.
//!
//! A listing is an EMC-namespaced document holding one `Object` element per
//! match. Depending on the query the caller wants either the identifiers
//! alone or full records with their metadata lists.

use std::fmt;
use std::io::BufRead;
use std::mem;

use atmos_model::{Metadata, ObjectInfo};
use quick_xml::NsReader;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use tracing::{debug, warn};

use crate::error::XmlError;
use crate::text::push_text;

/// Namespace of Atmos listing documents.
pub const EMC_NAMESPACE: &str = "http://www.emc.com/cos/";

/// Turns a listing body into results.
///
/// Implementations are interchangeable; the client holds one behind an
/// `Arc` and can be given a different one at construction time.
pub trait ListingParser: Send + Sync + fmt::Debug {
    /// Collect the text of every `ObjectID` element, in document order.
    ///
    /// Surrounding whitespace is trimmed and empty identifiers are skipped.
    fn parse_identifiers(&self, body: &mut dyn BufRead) -> Result<Vec<String>, XmlError>;

    /// Collect one record per `Object` element, in document order.
    ///
    /// Records without an identifier are discarded.
    fn parse_objects(&self, body: &mut dyn BufRead) -> Result<Vec<ObjectInfo>, XmlError>;
}

/// Forward-only listing parser.
///
/// Reads the body as a stream of events and keeps only the record under
/// construction in memory. Elements are matched by namespace and local name,
/// so prefixed and default-namespace documents are treated alike.
#[derive(Debug, Clone)]
pub struct StreamingListingParser {
    namespace: String,
}

impl StreamingListingParser {
    /// Create a parser for the given namespace URI.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// The namespace elements must belong to.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn in_namespace(&self, resolved: &ResolveResult<'_>) -> bool {
        matches!(resolved, ResolveResult::Bound(Namespace(uri)) if *uri == self.namespace.as_bytes())
    }
}

impl Default for StreamingListingParser {
    fn default() -> Self {
        Self::new(EMC_NAMESPACE)
    }
}

impl ListingParser for StreamingListingParser {
    fn parse_identifiers(&self, body: &mut dyn BufRead) -> Result<Vec<String>, XmlError> {
        let mut reader = NsReader::from_reader(body);
        let mut buf = Vec::new();
        let mut ids = Vec::new();
        let mut current: Option<String> = None;
        let mut depth: usize = 0;

        loop {
            buf.clear();
            let (resolved, event) = reader.read_resolved_event_into(&mut buf)?;
            match event {
                Event::Start(ref e) => {
                    depth += 1;
                    if self.in_namespace(&resolved) && e.local_name().as_ref() == b"ObjectID" {
                        current = Some(String::new());
                    }
                }
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    if let Some(text) = current.take() {
                        let id = text.trim();
                        if !id.is_empty() {
                            ids.push(id.to_owned());
                        }
                    }
                }
                Event::Eof => {
                    check_closed(depth)?;
                    break;
                }
                ref other => {
                    if let Some(text) = current.as_mut() {
                        push_text(text, other)?;
                    }
                }
            }
        }

        debug!(count = ids.len(), "Parsed object identifiers");
        Ok(ids)
    }

    fn parse_objects(&self, body: &mut dyn BufRead) -> Result<Vec<ObjectInfo>, XmlError> {
        let mut reader = NsReader::from_reader(body);
        let mut buf = Vec::new();
        let mut state = RecordState::default();
        let mut depth: usize = 0;

        loop {
            buf.clear();
            let (resolved, event) = reader.read_resolved_event_into(&mut buf)?;
            let in_ns = self.in_namespace(&resolved);
            match event {
                Event::Start(ref e) => {
                    depth += 1;
                    if in_ns {
                        state.on_start(e);
                    }
                }
                Event::Empty(ref e) => {
                    if in_ns {
                        state.on_start(e);
                        state.on_end(&e.to_end(), true);
                    }
                }
                Event::End(ref e) => {
                    depth = depth.saturating_sub(1);
                    state.on_end(e, in_ns);
                }
                Event::Eof => {
                    check_closed(depth)?;
                    break;
                }
                ref other => {
                    if state.field.is_some() {
                        push_text(&mut state.text, other)?;
                    }
                }
            }
        }

        debug!(count = state.records.len(), "Parsed object records");
        Ok(state.records)
    }
}

fn check_closed(depth: usize) -> Result<(), XmlError> {
    if depth > 0 {
        return Err(XmlError::UnexpectedEof(format!(
            "listing ended with {depth} open element(s)"
        )));
    }
    Ok(())
}

/// Leaf elements whose text is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    ObjectId,
    Name,
    Value,
    Listable,
}

impl Field {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"ObjectID" => Some(Self::ObjectId),
            b"Name" => Some(Self::Name),
            b"Value" => Some(Self::Value),
            b"Listable" => Some(Self::Listable),
            _ => None,
        }
    }
}

/// In-progress state of a full-record listing parse.
#[derive(Debug, Default)]
struct RecordState {
    field: Option<Field>,
    text: String,
    id: String,
    name: String,
    value: String,
    listable: bool,
    entries: Vec<Metadata>,
    user_metadata: Vec<Metadata>,
    system_metadata: Vec<Metadata>,
    records: Vec<ObjectInfo>,
}

impl RecordState {
    fn on_start(&mut self, e: &BytesStart<'_>) {
        if let Some(field) = Field::from_local_name(e.local_name().as_ref()) {
            self.field = Some(field);
            self.text.clear();
        }
    }

    fn on_end(&mut self, e: &BytesEnd<'_>, in_ns: bool) {
        // Closing any element ends the active leaf.
        if let Some(field) = self.field.take() {
            let text = mem::take(&mut self.text);
            match field {
                Field::ObjectId => self.id = text.trim().to_owned(),
                Field::Name => self.name = text.trim().to_owned(),
                Field::Value => self.value = text,
                Field::Listable => self.listable = text.trim().eq_ignore_ascii_case("true"),
            }
        }

        if !in_ns {
            return;
        }

        match e.local_name().as_ref() {
            b"Metadata" => {
                let entry = Metadata {
                    name: mem::take(&mut self.name),
                    value: mem::take(&mut self.value),
                    listable: mem::take(&mut self.listable),
                };
                self.entries.push(entry);
            }
            b"UserMetadataList" => self.user_metadata = mem::take(&mut self.entries),
            b"SystemMetadataList" => self.system_metadata = mem::take(&mut self.entries),
            b"Object" => self.finish_record(),
            _ => {}
        }
    }

    fn finish_record(&mut self) {
        let id = mem::take(&mut self.id);
        let user_metadata = mem::take(&mut self.user_metadata);
        let system_metadata = mem::take(&mut self.system_metadata);
        self.entries.clear();
        self.name.clear();
        self.value.clear();
        self.listable = false;

        if id.is_empty() {
            warn!("Discarding listed object without an ObjectID");
            return;
        }
        self.records.push(ObjectInfo {
            id,
            user_metadata,
            system_metadata,
        });
    }
}
