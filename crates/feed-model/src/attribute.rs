//! Attribute definitions and attribute values.

use std::fmt;

use crate::error::FieldError;
use crate::fields::{optional_text, required_text};
use crate::keys;
use crate::value::Record;

/// Special meaning an attribute carries for products.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeRole {
    /// Holds the product's external identifier.
    ProductId,
    /// Holds the product's display name.
    ProductName,
    /// Any other role, kept verbatim.
    Other(String),
}

impl AttributeRole {
    pub fn as_str(&self) -> &str {
        match self {
            AttributeRole::ProductId => "product_id",
            AttributeRole::ProductName => "product_name",
            AttributeRole::Other(value) => value,
        }
    }
}

impl From<&str> for AttributeRole {
    fn from(value: &str) -> Self {
        match value {
            "product_id" => AttributeRole::ProductId,
            "product_name" => AttributeRole::ProductName,
            other => AttributeRole::Other(other.to_string()),
        }
    }
}

impl fmt::Display for AttributeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared value type of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    String,
    Number,
    Boolean,
    Date,
    /// Values come from a closed, pre-declared set of attribute values.
    Enumerated,
    DigitalAsset,
    Link,
    RichText,
    Html,
    Other(String),
}

impl DataType {
    pub fn as_str(&self) -> &str {
        match self {
            DataType::String => "string",
            DataType::Number => "number",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
            DataType::Enumerated => "enumerated",
            DataType::DigitalAsset => "digital_asset",
            DataType::Link => "link",
            DataType::RichText => "rich_text",
            DataType::Html => "html",
            DataType::Other(value) => value,
        }
    }
}

impl From<&str> for DataType {
    fn from(value: &str) -> Self {
        match value {
            "string" => DataType::String,
            "number" => DataType::Number,
            "boolean" => DataType::Boolean,
            "date" => DataType::Date,
            "enumerated" => DataType::Enumerated,
            "digital_asset" => DataType::DigitalAsset,
            "link" => DataType::Link,
            "rich_text" => DataType::RichText,
            "html" => DataType::Html,
            other => DataType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the `attributes` section.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDefinition {
    pub id: String,
    pub role: Option<AttributeRole>,
    pub data_type: Option<DataType>,
    /// Every field other than id, role and data type.
    pub metadata: Record,
}

impl AttributeDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: None,
            data_type: None,
            metadata: Record::new(),
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: AttributeRole) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// Type a reconstructed `attributes` record.
    pub fn from_record(mut record: Record) -> Result<Self, FieldError> {
        let id = required_text(&record, keys::ID)?;
        let role =
            optional_text(&record, keys::ROLE)?.map(|role| AttributeRole::from(role.as_str()));
        let data_type = optional_text(&record, keys::DATA_TYPE)?
            .map(|data_type| DataType::from(data_type.as_str()));
        for key in [keys::ID, keys::ROLE, keys::DATA_TYPE] {
            record.remove(key);
        }
        Ok(Self {
            id,
            role,
            data_type,
            metadata: record,
        })
    }

    pub fn is_enumerated(&self) -> bool {
        self.data_type == Some(DataType::Enumerated)
    }
}

/// One entry of the `attribute_values` section, e.g. a brand or a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeValue {
    pub id: String,
    /// Attribute this value belongs to.
    pub attribute_id: String,
    pub name: String,
    /// Parent value of the same attribute, for hierarchical values.
    pub parent_id: Option<String>,
}

impl AttributeValue {
    pub fn new(
        id: impl Into<String>,
        attribute_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            attribute_id: attribute_id.into(),
            name: name.into(),
            parent_id: None,
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Type a reconstructed `attribute_values` record.
    pub fn from_record(record: &Record) -> Result<Self, FieldError> {
        Ok(Self {
            id: required_text(record, keys::ID)?,
            attribute_id: required_text(record, keys::ATTRIBUTE_ID)?,
            name: required_text(record, keys::NAME)?,
            parent_id: optional_text(record, keys::PARENT_ID)?,
        })
    }
}
