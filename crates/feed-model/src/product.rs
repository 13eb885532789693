//! Product records and their asset descriptors.

use std::borrow::Cow;

use serde_json::Value;

use crate::error::FieldError;
use crate::keys;
use crate::value::{Record, ValueRef};

/// A `{id, url}` pair resolving a symbolic asset reference to a real location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDescriptor {
    pub id: String,
    pub url: Option<String>,
    pub name: Option<String>,
}

impl AssetDescriptor {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: Some(url.into()),
            name: None,
        }
    }

    fn from_value(value: ValueRef<'_>) -> Result<Self, FieldError> {
        if !value.is_map() {
            return Err(FieldError::Malformed {
                field: keys::DIGITAL_ASSETS,
                message: "asset descriptor must be an object".to_string(),
            });
        }
        let text = |key: &str| {
            value
                .get(key)
                .and_then(|v| v.as_scalar())
                .and_then(|s| s.to_text())
                .map(Cow::into_owned)
        };
        let id = text(keys::ID).ok_or_else(|| FieldError::Malformed {
            field: keys::DIGITAL_ASSETS,
            message: format!("asset descriptor without `{}`", keys::ID),
        })?;
        Ok(Self {
            id,
            url: text(keys::URL),
            name: text(keys::NAME),
        })
    }
}

/// One entry of the `products` section.
///
/// Fields are keyed by attribute id and hold a scalar or, for multi-valued
/// attributes, an ordered list. The reserved asset and relation keys are
/// lifted out of the field set.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    fields: Record,
    assets: Vec<AssetDescriptor>,
    relations: Option<Value>,
}

impl ProductRecord {
    /// Type a reconstructed `products` record.
    pub fn from_record(mut fields: Record) -> Result<Self, FieldError> {
        let mut assets = Vec::new();
        if let Some(value) = fields.get(keys::DIGITAL_ASSETS) {
            if !value.is_list() {
                return Err(FieldError::Malformed {
                    field: keys::DIGITAL_ASSETS,
                    message: "expected a list of asset descriptors".to_string(),
                });
            }
            for item in value.items() {
                assets.push(AssetDescriptor::from_value(item)?);
            }
        }
        let relations = fields.get(keys::RELATIONS).map(|value| value.to_json());
        fields.remove(keys::DIGITAL_ASSETS);
        fields.remove(keys::RELATIONS);
        Ok(Self {
            fields,
            assets,
            relations,
        })
    }

    /// Build a product directly from attribute fields, with no assets.
    pub fn from_fields(fields: Record) -> Self {
        Self {
            fields,
            assets: Vec::new(),
            relations: None,
        }
    }

    #[must_use]
    pub fn with_asset(mut self, asset: AssetDescriptor) -> Self {
        self.assets.push(asset);
        self
    }

    pub fn fields(&self) -> &Record {
        &self.fields
    }

    pub fn value(&self, attribute_id: &str) -> Option<ValueRef<'_>> {
        self.fields.get(attribute_id)
    }

    /// Text of a field; the first element when the field is multi-valued.
    pub fn first_text(&self, attribute_id: &str) -> Option<Cow<'_, str>> {
        self.value(attribute_id)
            .and_then(|value| value.first_scalar())
            .and_then(|scalar| scalar.to_text())
    }

    /// Every value of a field as text, in order. Nulls are skipped.
    pub fn texts(&self, attribute_id: &str) -> Vec<Cow<'_, str>> {
        self.value(attribute_id)
            .map(|value| {
                value
                    .scalars()
                    .into_iter()
                    .filter_map(|scalar| scalar.to_text())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn assets(&self) -> &[AssetDescriptor] {
        &self.assets
    }

    /// Asset descriptor whose id equals `id`.
    pub fn asset(&self, id: &str) -> Option<&AssetDescriptor> {
        self.assets.iter().find(|asset| asset.id == id)
    }

    /// Related-product links, untouched.
    pub fn relations(&self) -> Option<&Value> {
        self.relations.as_ref()
    }
}
