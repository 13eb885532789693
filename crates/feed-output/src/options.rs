//! Adapter configuration.
//!
//! Options deserialize leniently so that a missing key reaches
//! [`AdapterOptions::resolve`] and is reported as a configuration error
//! naming that key, rather than as a parse failure.

use serde::Deserialize;

use feed_model::{FeedError, Result};

/// How a mapped product field becomes element text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueResolution {
    /// First value of the field, as-is.
    #[default]
    Value,
    /// Field value names a digital asset; write that asset's URL.
    AssetUrl,
}

/// Copies one product attribute into a product element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldMapping {
    pub attribute_id: String,
    pub element: String,
    /// Optional element enclosing `element`.
    #[serde(default)]
    pub wrapper: Option<String>,
    #[serde(default)]
    pub resolve: ValueResolution,
}

impl FieldMapping {
    pub fn new(attribute_id: impl Into<String>, element: impl Into<String>) -> Self {
        Self {
            attribute_id: attribute_id.into(),
            element: element.into(),
            wrapper: None,
            resolve: ValueResolution::Value,
        }
    }

    #[must_use]
    pub fn wrapped_in(mut self, wrapper: impl Into<String>) -> Self {
        self.wrapper = Some(wrapper.into());
        self
    }

    #[must_use]
    pub fn resolve_asset_url(mut self) -> Self {
        self.resolve = ValueResolution::AssetUrl;
        self
    }
}

/// Options for [`crate::FeedAdapter`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdapterOptions {
    /// Enumerated attribute whose values are brands. Required.
    pub brand_attribute_id: Option<String>,
    /// Attribute whose values are categories. Required.
    pub category_attribute_id: Option<String>,
    /// Overrides the attribute carrying the `product_id` role.
    pub product_id_attribute_id: Option<String>,
    /// Overrides the attribute carrying the `product_name` role.
    pub product_name_attribute_id: Option<String>,
    /// Extra product elements, written in this order.
    pub fields: Vec<FieldMapping>,
    /// Stamp the feed root with the extraction time.
    pub extract_date: bool,
    pub feed_name: Option<String>,
}

impl Default for AdapterOptions {
    fn default() -> Self {
        Self {
            brand_attribute_id: None,
            category_attribute_id: None,
            product_id_attribute_id: None,
            product_name_attribute_id: None,
            fields: Vec::new(),
            extract_date: true,
            feed_name: None,
        }
    }
}

impl AdapterOptions {
    pub fn new(
        brand_attribute_id: impl Into<String>,
        category_attribute_id: impl Into<String>,
    ) -> Self {
        Self {
            brand_attribute_id: Some(brand_attribute_id.into()),
            category_attribute_id: Some(category_attribute_id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_field(mut self, mapping: FieldMapping) -> Self {
        self.fields.push(mapping);
        self
    }

    #[must_use]
    pub fn with_product_id_attribute(mut self, attribute_id: impl Into<String>) -> Self {
        self.product_id_attribute_id = Some(attribute_id.into());
        self
    }

    #[must_use]
    pub fn with_product_name_attribute(mut self, attribute_id: impl Into<String>) -> Self {
        self.product_name_attribute_id = Some(attribute_id.into());
        self
    }

    #[must_use]
    pub fn with_feed_name(mut self, name: impl Into<String>) -> Self {
        self.feed_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn without_extract_date(mut self) -> Self {
        self.extract_date = false;
        self
    }

    /// Check required keys and element names.
    pub fn resolve(self) -> Result<ResolvedOptions> {
        let brand_attribute_id = required(self.brand_attribute_id, "brand_attribute_id")?;
        let category_attribute_id = required(self.category_attribute_id, "category_attribute_id")?;
        for (index, mapping) in self.fields.iter().enumerate() {
            let key = format!("fields[{index}]");
            if mapping.attribute_id.trim().is_empty() {
                return Err(FeedError::configuration(key, "attribute_id must not be blank"));
            }
            check_element_name(&key, &mapping.element)?;
            if let Some(wrapper) = &mapping.wrapper {
                check_element_name(&key, wrapper)?;
            }
        }
        Ok(ResolvedOptions {
            brand_attribute_id,
            category_attribute_id,
            product_id_attribute_id: non_blank(self.product_id_attribute_id),
            product_name_attribute_id: non_blank(self.product_name_attribute_id),
            fields: self.fields,
            extract_date: self.extract_date,
            feed_name: self.feed_name,
        })
    }
}

/// Options after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub brand_attribute_id: String,
    pub category_attribute_id: String,
    pub product_id_attribute_id: Option<String>,
    pub product_name_attribute_id: Option<String>,
    pub fields: Vec<FieldMapping>,
    pub extract_date: bool,
    pub feed_name: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn required(value: Option<String>, key: &str) -> Result<String> {
    match non_blank(value) {
        Some(value) => Ok(value),
        None => Err(FeedError::configuration(key, "required option is missing or blank")),
    }
}

fn check_element_name(key: &str, name: &str) -> Result<()> {
    if is_xml_name(name) {
        Ok(())
    } else {
        Err(FeedError::configuration(
            key,
            format!("`{name}` is not a valid XML element name"),
        ))
    }
}

/// Element names without namespaces: a letter or underscore, then letters,
/// digits, `-`, `_` or `.`.
pub(crate) fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
