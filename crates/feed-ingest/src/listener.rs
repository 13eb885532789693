//! Listener contract between the reconstructor and record consumers.

use feed_model::{
    AttributeDefinition, AttributeValue, FeedError, ProductRecord, Record, Result, SectionKind,
};

/// Receives section lifecycle notifications and typed records.
///
/// Each record callback fires exactly once per completed record and only
/// between the matching `start_section`/`end_section` pair. Returning an
/// error aborts the pass.
pub trait ExportListener {
    fn start_document(&mut self) -> Result<()> {
        Ok(())
    }

    fn end_document(&mut self) -> Result<()> {
        Ok(())
    }

    fn start_section(&mut self, section: SectionKind) -> Result<()>;

    fn end_section(&mut self, section: SectionKind) -> Result<()>;

    fn attribute(&mut self, attribute: AttributeDefinition) -> Result<()>;

    fn attribute_value(&mut self, value: AttributeValue) -> Result<()>;

    fn product(&mut self, product: ProductRecord) -> Result<()>;
}

impl<L: ExportListener + ?Sized> ExportListener for &mut L {
    fn start_document(&mut self) -> Result<()> {
        (**self).start_document()
    }

    fn end_document(&mut self) -> Result<()> {
        (**self).end_document()
    }

    fn start_section(&mut self, section: SectionKind) -> Result<()> {
        (**self).start_section(section)
    }

    fn end_section(&mut self, section: SectionKind) -> Result<()> {
        (**self).end_section(section)
    }

    fn attribute(&mut self, attribute: AttributeDefinition) -> Result<()> {
        (**self).attribute(attribute)
    }

    fn attribute_value(&mut self, value: AttributeValue) -> Result<()> {
        (**self).attribute_value(value)
    }

    fn product(&mut self, product: ProductRecord) -> Result<()> {
        (**self).product(product)
    }
}

/// Type a completed record for its section and hand it to the listener.
///
/// `index` is the 1-based position of the record within its section.
pub(crate) fn dispatch<L: ExportListener + ?Sized>(
    listener: &mut L,
    section: SectionKind,
    index: usize,
    record: Record,
) -> Result<()> {
    let invalid = |source| FeedError::InvalidRecord {
        section,
        index,
        source,
    };
    match section {
        SectionKind::Attributes => {
            listener.attribute(AttributeDefinition::from_record(record).map_err(invalid)?)
        }
        SectionKind::AttributeValues => {
            listener.attribute_value(AttributeValue::from_record(&record).map_err(invalid)?)
        }
        SectionKind::Products => {
            listener.product(ProductRecord::from_record(record).map_err(invalid)?)
        }
    }
}

/// One captured listener call.
#[derive(Debug, Clone, PartialEq)]
pub enum ListenerEvent {
    StartDocument,
    EndDocument,
    StartSection(SectionKind),
    EndSection(SectionKind),
    Attribute(AttributeDefinition),
    AttributeValue(AttributeValue),
    Product(ProductRecord),
}

/// Listener that keeps every call it receives.
///
/// Retains all records, so it is meant for tests and small documents only.
#[derive(Debug, Default)]
pub struct RecordingListener {
    pub events: Vec<ListenerEvent>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attributes(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.events.iter().filter_map(|event| match event {
            ListenerEvent::Attribute(attribute) => Some(attribute),
            _ => None,
        })
    }

    pub fn attribute_values(&self) -> impl Iterator<Item = &AttributeValue> {
        self.events.iter().filter_map(|event| match event {
            ListenerEvent::AttributeValue(value) => Some(value),
            _ => None,
        })
    }

    pub fn products(&self) -> impl Iterator<Item = &ProductRecord> {
        self.events.iter().filter_map(|event| match event {
            ListenerEvent::Product(product) => Some(product),
            _ => None,
        })
    }
}

impl ExportListener for RecordingListener {
    fn start_document(&mut self) -> Result<()> {
        self.events.push(ListenerEvent::StartDocument);
        Ok(())
    }

    fn end_document(&mut self) -> Result<()> {
        self.events.push(ListenerEvent::EndDocument);
        Ok(())
    }

    fn start_section(&mut self, section: SectionKind) -> Result<()> {
        self.events.push(ListenerEvent::StartSection(section));
        Ok(())
    }

    fn end_section(&mut self, section: SectionKind) -> Result<()> {
        self.events.push(ListenerEvent::EndSection(section));
        Ok(())
    }

    fn attribute(&mut self, attribute: AttributeDefinition) -> Result<()> {
        self.events.push(ListenerEvent::Attribute(attribute));
        Ok(())
    }

    fn attribute_value(&mut self, value: AttributeValue) -> Result<()> {
        self.events.push(ListenerEvent::AttributeValue(value));
        Ok(())
    }

    fn product(&mut self, product: ProductRecord) -> Result<()> {
        self.events.push(ListenerEvent::Product(product));
        Ok(())
    }
}
