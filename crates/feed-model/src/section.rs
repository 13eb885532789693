use std::fmt;

/// Top-level groupings of a catalog export, in required document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKind {
    /// Attribute definitions (`attributes`).
    Attributes,
    /// Attribute values such as brands and categories (`attribute_values`).
    AttributeValues,
    /// Product records (`products`).
    Products,
}

impl SectionKind {
    /// Every section, in the order the export must present them.
    pub const ALL: [SectionKind; 3] = [
        SectionKind::Attributes,
        SectionKind::AttributeValues,
        SectionKind::Products,
    ];

    /// Key naming this section in the export header.
    pub fn key(&self) -> &'static str {
        match self {
            SectionKind::Attributes => "attributes",
            SectionKind::AttributeValues => "attribute_values",
            SectionKind::Products => "products",
        }
    }

    /// Resolve a header key to its section.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Zero-based position in document order.
    pub fn ordinal(&self) -> usize {
        match self {
            SectionKind::Attributes => 0,
            SectionKind::AttributeValues => 1,
            SectionKind::Products => 2,
        }
    }

    /// Singular name of one record in this section.
    pub fn record_label(&self) -> &'static str {
        match self {
            SectionKind::Attributes => "attribute",
            SectionKind::AttributeValues => "attribute value",
            SectionKind::Products => "product",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
