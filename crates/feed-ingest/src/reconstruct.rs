//! Record reconstruction from a flat token stream.
//!
//! The reconstructor tracks nesting depth to find the section headers and the
//! item boundaries of a catalog export. Everything between an item's opening
//! and closing brace is rebuilt into a [`Record`] arena; when the item closes
//! the record is typed, handed to the listener and dropped, so memory does not
//! grow with the number of items.

use std::io::Read;

use tracing::debug;

use feed_model::{ContainerKind, FeedError, NodeId, Record, Result, Scalar, SectionKind};

use crate::json::JsonTokenSource;
use crate::listener::{ExportListener, dispatch};
use crate::token::{Token, TokenSink};

/// Depths at which section keys and section items live.
///
/// Items are always two levels below the header: the header object holds the
/// section key, the key's value is the section list, and each list element is
/// one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportLayout {
    header_depth: usize,
}

impl ExportLayout {
    /// Each section wrapped in its own object inside a root array:
    /// `[{"header": …}, {"attributes": […]}, {"attribute_values": […]}, {"products": […]}]`.
    pub const SECTIONED: Self = Self::with_header_depth(2);

    /// Sections as keys of a single root object: `{"attributes": […], …}`.
    pub const ROOT_OBJECT: Self = Self::with_header_depth(1);

    pub const fn with_header_depth(header_depth: usize) -> Self {
        Self { header_depth }
    }

    /// Depth of the objects holding section keys.
    pub const fn header_depth(&self) -> usize {
        self.header_depth
    }

    /// Depth of the section lists.
    pub const fn list_depth(&self) -> usize {
        self.header_depth + 1
    }

    /// Depth of one item.
    pub const fn item_depth(&self) -> usize {
        self.header_depth + 2
    }
}

impl Default for ExportLayout {
    fn default() -> Self {
        Self::SECTIONED
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    BeforeDocument,
    InDocument,
    Finished,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionState {
    Idle,
    /// Section key seen; its list has not opened yet.
    AwaitingList(SectionKind),
    Active(SectionKind),
}

/// Item under construction.
#[derive(Debug, Default)]
struct RecordBuilder {
    record: Record,
    /// Keys waiting for their value, innermost last.
    keys: Vec<String>,
    /// Open nested containers, innermost last.
    open: Vec<NodeId>,
}

impl RecordBuilder {
    fn push_key(&mut self, key: String) {
        self.keys.push(key);
    }

    fn open_container(&mut self, kind: ContainerKind) {
        let id = self.record.alloc_container(kind);
        self.open.push(id);
    }

    fn close_container(&mut self) -> std::result::Result<(), String> {
        let id = self
            .open
            .pop()
            .ok_or_else(|| "closing a container that was never opened".to_string())?;
        self.attach(id)
    }

    fn scalar(&mut self, scalar: Scalar) -> std::result::Result<(), String> {
        let id = self.record.alloc_scalar(scalar);
        self.attach(id)
    }

    /// Attach a finished node to the innermost open container, or to the
    /// record itself when no container is open.
    fn attach(&mut self, id: NodeId) -> std::result::Result<(), String> {
        match self.open.last().copied() {
            Some(parent) => match self.record.container_kind(parent) {
                Some(ContainerKind::List) => {
                    self.record.push_item(parent, id);
                    Ok(())
                }
                Some(ContainerKind::Map) => {
                    let key = self.take_key()?;
                    self.record.insert_entry(parent, key, id);
                    Ok(())
                }
                None => Err("open container is not a container".to_string()),
            },
            None => {
                let key = self.take_key()?;
                self.record.set_field(key, id);
                Ok(())
            }
        }
    }

    fn take_key(&mut self) -> std::result::Result<String, String> {
        self.keys
            .pop()
            .ok_or_else(|| "value inside an object without a key".to_string())
    }

    fn finish(self) -> std::result::Result<Record, String> {
        if let Some(key) = self.keys.last() {
            return Err(format!("key `{key}` has no value"));
        }
        if !self.open.is_empty() {
            return Err("item closed with nested containers still open".to_string());
        }
        Ok(self.record)
    }
}

/// Depth-tracking state machine turning tokens into listener callbacks.
pub struct RecordReconstructor<L> {
    listener: L,
    layout: ExportLayout,
    phase: Phase,
    /// Open containers, outermost first; its length is the nesting depth.
    containers: Vec<ContainerKind>,
    section: SectionState,
    /// Number of sections fully consumed; also the ordinal of the next one.
    completed: usize,
    /// Records dispatched in the active section.
    section_records: usize,
    builder: Option<RecordBuilder>,
    position: u64,
}

impl<L: ExportListener> RecordReconstructor<L> {
    pub fn new(listener: L) -> Self {
        Self::with_layout(listener, ExportLayout::default())
    }

    pub fn with_layout(listener: L, layout: ExportLayout) -> Self {
        Self {
            listener,
            layout,
            phase: Phase::BeforeDocument,
            containers: Vec::new(),
            section: SectionState::Idle,
            completed: 0,
            section_records: 0,
            builder: None,
            position: 0,
        }
    }

    /// Listener as it stands after the tokens fed so far.
    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn into_listener(self) -> L {
        self.listener
    }

    /// True once the end-of-document token has been accepted.
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    fn depth(&self) -> usize {
        self.containers.len()
    }

    /// Process one token. The first error poisons the reconstructor.
    pub fn feed(&mut self, token: Token) -> Result<()> {
        self.position += 1;
        let outcome = self.step(token);
        if outcome.is_err() {
            self.phase = Phase::Failed;
        }
        outcome
    }

    fn fail<T>(&self, message: impl Into<String>) -> Result<T> {
        Err(FeedError::structural(self.position, message))
    }

    fn step(&mut self, token: Token) -> Result<()> {
        match self.phase {
            Phase::Failed => return self.fail("reconstructor already failed"),
            Phase::Finished => return self.fail("token after end of document"),
            Phase::BeforeDocument if token != Token::StartDocument => {
                return self.fail("token before start of document");
            }
            _ => {}
        }
        match token {
            Token::StartDocument => self.start_document(),
            Token::EndDocument => self.end_document(),
            Token::StartObject => self.start_container(ContainerKind::Map),
            Token::StartArray => self.start_container(ContainerKind::List),
            Token::EndObject => self.end_container(ContainerKind::Map),
            Token::EndArray => self.end_container(ContainerKind::List),
            Token::Key(key) => self.key(key),
            Token::Value(scalar) => self.value(scalar),
        }
    }

    fn start_document(&mut self) -> Result<()> {
        if self.phase != Phase::BeforeDocument {
            return self.fail("document started twice");
        }
        self.phase = Phase::InDocument;
        self.listener.start_document()
    }

    fn end_document(&mut self) -> Result<()> {
        if self.depth() != 0 {
            return self.fail(format!(
                "document ended with {} container(s) still open",
                self.depth()
            ));
        }
        if let Some(missing) = SectionKind::ALL.get(self.completed) {
            return self.fail(format!("document ended before section `{missing}`"));
        }
        self.phase = Phase::Finished;
        self.listener.end_document()
    }

    fn start_container(&mut self, kind: ContainerKind) -> Result<()> {
        self.containers.push(kind);
        let depth = self.depth();
        match self.section {
            SectionState::Idle => Ok(()),
            SectionState::AwaitingList(section) => {
                if kind != ContainerKind::List {
                    return self.fail(format!("section `{section}` must hold a list"));
                }
                debug_assert_eq!(depth, self.layout.list_depth());
                self.section = SectionState::Active(section);
                self.section_records = 0;
                Ok(())
            }
            SectionState::Active(section) => {
                if depth == self.layout.item_depth() {
                    if kind != ContainerKind::Map {
                        return self.fail(format!(
                            "{} #{} must be an object",
                            section.record_label(),
                            self.section_records + 1
                        ));
                    }
                    self.builder = Some(RecordBuilder::default());
                    Ok(())
                } else {
                    match self.builder.as_mut() {
                        Some(builder) => {
                            builder.open_container(kind);
                            Ok(())
                        }
                        None => self.fail("container outside an open record"),
                    }
                }
            }
        }
    }

    fn end_container(&mut self, kind: ContainerKind) -> Result<()> {
        let depth = self.depth();
        match self.containers.last() {
            None => return self.fail("closing a container at depth 0"),
            Some(open) if *open != kind => {
                return self.fail(format!("mismatched close: {kind:?} closes an open {open:?}"));
            }
            Some(_) => {}
        }
        if let SectionState::AwaitingList(section) = self.section {
            return self.fail(format!("section `{section}` must hold a list"));
        }

        if let SectionState::Active(section) = self.section {
            if depth > self.layout.item_depth() {
                let outcome = match self.builder.as_mut() {
                    Some(builder) => builder.close_container(),
                    None => Err("container outside an open record".to_string()),
                };
                if let Err(message) = outcome {
                    return self.fail(message);
                }
            } else if depth == self.layout.item_depth() {
                self.finish_record(section)?;
            } else if depth == self.layout.list_depth() {
                self.end_section(section)?;
            }
        }

        self.containers.pop();
        Ok(())
    }

    fn key(&mut self, key: String) -> Result<()> {
        match self.section {
            SectionState::Idle => {
                let at_header = self.depth() == self.layout.header_depth()
                    && self.containers.last() == Some(&ContainerKind::Map);
                if !at_header {
                    return Ok(());
                }
                match SectionKind::from_key(&key) {
                    Some(section) => self.begin_section(section),
                    None => {
                        debug!(key = %key, "skipping non-section header key");
                        Ok(())
                    }
                }
            }
            SectionState::AwaitingList(section) => {
                self.fail(format!("section `{section}` must hold a list"))
            }
            SectionState::Active(_) => match self.builder.as_mut() {
                Some(builder) => {
                    builder.push_key(key);
                    Ok(())
                }
                None => self.fail(format!("key `{key}` outside an open record")),
            },
        }
    }

    fn value(&mut self, scalar: Scalar) -> Result<()> {
        match self.section {
            SectionState::Idle => Ok(()),
            SectionState::AwaitingList(section) => {
                self.fail(format!("section `{section}` must hold a list"))
            }
            SectionState::Active(_) => {
                let outcome = match self.builder.as_mut() {
                    Some(builder) => builder.scalar(scalar),
                    None => Err("value outside an open record".to_string()),
                };
                match outcome {
                    Ok(()) => Ok(()),
                    Err(message) => self.fail(message),
                }
            }
        }
    }

    fn begin_section(&mut self, section: SectionKind) -> Result<()> {
        if section.ordinal() < self.completed {
            return self.fail(format!("section `{section}` appears twice"));
        }
        if let Some(expected) = SectionKind::ALL.get(self.completed)
            && *expected != section
        {
            return self.fail(format!(
                "section `{section}` out of order: expected `{expected}` first"
            ));
        }
        debug!(section = %section, "section started");
        self.section = SectionState::AwaitingList(section);
        self.listener.start_section(section)
    }

    fn end_section(&mut self, section: SectionKind) -> Result<()> {
        debug!(section = %section, records = self.section_records, "section complete");
        self.section = SectionState::Idle;
        self.completed += 1;
        self.listener.end_section(section)
    }

    fn finish_record(&mut self, section: SectionKind) -> Result<()> {
        let record = match self.builder.take().map(RecordBuilder::finish) {
            Some(Ok(record)) => record,
            Some(Err(message)) => return self.fail(message),
            None => return self.fail("item closed without being opened"),
        };
        self.section_records += 1;
        dispatch(&mut self.listener, section, self.section_records, record)
    }
}

impl<L: ExportListener> TokenSink for RecordReconstructor<L> {
    fn token(&mut self, token: Token) -> Result<()> {
        self.feed(token)
    }
}

/// Run a JSON export through a reconstructor and return the listener.
pub fn reconstruct<R: Read, L: ExportListener>(reader: R, listener: L) -> Result<L> {
    reconstruct_with_layout(reader, listener, ExportLayout::default())
}

/// [`reconstruct`] with an explicit layout.
pub fn reconstruct_with_layout<R: Read, L: ExportListener>(
    reader: R,
    listener: L,
    layout: ExportLayout,
) -> Result<L> {
    let mut reconstructor = RecordReconstructor::with_layout(listener, layout);
    JsonTokenSource::new(reader).drive(&mut reconstructor)?;
    Ok(reconstructor.into_listener())
}
