//! Counting listener used to inspect an export without converting it.

use std::collections::BTreeMap;

use feed_model::{
    AttributeDefinition, AttributeRole, AttributeValue, ProductRecord, Result, SectionKind,
};

/// Record counts gathered from one pass over an export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub attributes: usize,
    pub enumerated_attributes: usize,
    /// Attribute value count keyed by owning attribute id.
    pub values_by_attribute: BTreeMap<String, usize>,
    pub products: usize,
    pub products_with_assets: usize,
    pub product_id_attribute: Option<String>,
    pub product_name_attribute: Option<String>,
    /// Sections in the order they completed.
    pub sections: Vec<SectionKind>,
}

impl ExportStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute_values(&self) -> usize {
        self.values_by_attribute.values().sum()
    }

    pub fn values_for(&self, attribute_id: &str) -> usize {
        self.values_by_attribute
            .get(attribute_id)
            .copied()
            .unwrap_or(0)
    }
}

impl crate::listener::ExportListener for ExportStats {
    fn start_section(&mut self, _section: SectionKind) -> Result<()> {
        Ok(())
    }

    fn end_section(&mut self, section: SectionKind) -> Result<()> {
        self.sections.push(section);
        Ok(())
    }

    fn attribute(&mut self, attribute: AttributeDefinition) -> Result<()> {
        self.attributes += 1;
        if attribute.is_enumerated() {
            self.enumerated_attributes += 1;
        }
        match attribute.role {
            Some(AttributeRole::ProductId) => self.product_id_attribute = Some(attribute.id),
            Some(AttributeRole::ProductName) => self.product_name_attribute = Some(attribute.id),
            _ => {}
        }
        Ok(())
    }

    fn attribute_value(&mut self, value: AttributeValue) -> Result<()> {
        *self
            .values_by_attribute
            .entry(value.attribute_id)
            .or_default() += 1;
        Ok(())
    }

    fn product(&mut self, product: ProductRecord) -> Result<()> {
        self.products += 1;
        if !product.assets().is_empty() {
            self.products_with_assets += 1;
        }
        Ok(())
    }
}
