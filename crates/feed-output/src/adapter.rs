//! Listener that writes the recommendation feed as records stream in.
//!
//! Brands and categories are collected into lookup tables during the
//! `attribute_values` section and written as soon as that section ends.
//! Products are written one element at a time; nothing about a product is
//! kept once its element is out.

use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesStart, Event};
use tracing::{debug, info, warn};

use feed_ingest::ExportListener;
use feed_model::{
    AttributeDefinition, AttributeRole, AttributeValue, DataType, FeedError, ProductRecord,
    Result, SectionKind,
};

use crate::ancestry::expand_ancestry;
use crate::options::{AdapterOptions, FieldMapping, ResolvedOptions, ValueResolution};
use crate::tables::{BrandTable, CategoryEntry, CategoryTable};
use crate::xml::{end, start, write_optional_element, write_text_element, write_wrapped_element};

/// Root element of the feed.
pub const FEED_ELEMENT: &str = "Feed";

/// Counts from one adapter pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedSummary {
    pub attributes: usize,
    pub attribute_values: usize,
    /// Attribute values owned by neither the brand nor the category attribute.
    pub ignored_values: usize,
    pub brands: usize,
    pub categories: usize,
    pub products: usize,
    /// `CategoryExternalId` elements written across all products.
    pub category_links: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdapterState {
    AwaitingAttributes,
    InAttributes,
    AwaitingValues,
    InAttributeValues,
    ValuesFlushed,
    InProducts,
    Done,
}

impl AdapterState {
    fn as_str(self) -> &'static str {
        match self {
            AdapterState::AwaitingAttributes => "awaiting attributes",
            AdapterState::InAttributes => "reading attributes",
            AdapterState::AwaitingValues => "awaiting attribute values",
            AdapterState::InAttributeValues => "reading attribute values",
            AdapterState::ValuesFlushed => "awaiting products",
            AdapterState::InProducts => "reading products",
            AdapterState::Done => "done",
        }
    }
}

/// Writes a recommendation feed to `W` from catalog export callbacks.
pub struct FeedAdapter<W: Write> {
    xml: Writer<W>,
    options: ResolvedOptions,
    state: AdapterState,
    document_open: bool,
    extract_date: Option<DateTime<Utc>>,
    product_id_attribute: Option<String>,
    product_name_attribute: Option<String>,
    brand_declared: bool,
    category_declared: bool,
    brands: BrandTable,
    categories: CategoryTable,
    summary: FeedSummary,
}

impl<W: Write> FeedAdapter<W> {
    /// Validate `options` and wrap `writer`. Nothing is written yet.
    pub fn new(writer: W, options: AdapterOptions) -> Result<Self> {
        let options = options.resolve()?;
        let extract_date = options.extract_date.then(Utc::now);
        Ok(Self {
            xml: Writer::new_with_indent(writer, b' ', 2),
            product_id_attribute: options.product_id_attribute_id.clone(),
            product_name_attribute: options.product_name_attribute_id.clone(),
            options,
            state: AdapterState::AwaitingAttributes,
            document_open: false,
            extract_date,
            brand_declared: false,
            category_declared: false,
            brands: BrandTable::new(),
            categories: CategoryTable::new(),
            summary: FeedSummary::default(),
        })
    }

    /// Stamp the feed with `at` instead of the construction time. Has no
    /// effect when `extract_date` is off.
    #[must_use]
    pub fn with_extract_date(mut self, at: DateTime<Utc>) -> Self {
        if self.options.extract_date {
            self.extract_date = Some(at);
        }
        self
    }

    pub fn summary(&self) -> &FeedSummary {
        &self.summary
    }

    pub fn brands(&self) -> &BrandTable {
        &self.brands
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    /// Attribute used for product `ExternalId`, once known.
    pub fn product_id_attribute(&self) -> Option<&str> {
        self.product_id_attribute.as_deref()
    }

    pub fn is_done(&self) -> bool {
        self.state == AdapterState::Done && !self.document_open
    }

    /// Flush and hand back the sink. Fails unless the feed is complete.
    pub fn finish(mut self) -> Result<(W, FeedSummary)> {
        if !self.is_done() {
            return Err(self.sequence("finish"));
        }
        self.xml.get_mut().flush()?;
        Ok((self.xml.into_inner(), self.summary))
    }

    fn sequence(&self, event: impl Into<String>) -> FeedError {
        FeedError::Sequence {
            state: self.state.as_str(),
            event: event.into(),
        }
    }

    fn expect_state(&self, expected: AdapterState, event: &str) -> Result<()> {
        if self.state == expected && self.document_open {
            Ok(())
        } else {
            Err(self.sequence(event))
        }
    }

    fn transition(&mut self, from: AdapterState, to: AdapterState, event: &str) -> Result<()> {
        self.expect_state(from, event)?;
        self.state = to;
        Ok(())
    }

    fn write_brands(&mut self) -> Result<()> {
        start(&mut self.xml, "Brands")?;
        for (id, name) in self.brands.iter() {
            start(&mut self.xml, "Brand")?;
            write_text_element(&mut self.xml, "ExternalId", id)?;
            write_text_element(&mut self.xml, "Name", name)?;
            end(&mut self.xml, "Brand")?;
        }
        end(&mut self.xml, "Brands")?;
        Ok(())
    }

    fn write_categories(&mut self) -> Result<()> {
        start(&mut self.xml, "Categories")?;
        for (id, category) in self.categories.iter() {
            start(&mut self.xml, "Category")?;
            write_text_element(&mut self.xml, "ExternalId", id)?;
            write_text_element(&mut self.xml, "Name", &category.name)?;
            if let Some(parent) = &category.parent_id {
                write_text_element(&mut self.xml, "ParentExternalId", parent)?;
            }
            end(&mut self.xml, "Category")?;
        }
        end(&mut self.xml, "Categories")?;
        Ok(())
    }

    fn flush_tables(&mut self) -> Result<()> {
        self.write_brands()?;
        self.write_categories()?;
        self.summary.brands = self.brands.len();
        self.summary.categories = self.categories.len();
        info!(
            brands = self.brands.len(),
            categories = self.categories.len(),
            "lookup tables written"
        );
        Ok(())
    }

    fn write_product(&mut self, product: &ProductRecord) -> Result<()> {
        let ordinal = self.summary.products + 1;
        let Some(id_attribute) = self.product_id_attribute.as_deref() else {
            return Err(FeedError::configuration(
                "product_id_attribute_id",
                "no attribute carries the product_id role",
            ));
        };
        let Some(external_id) = product.first_text(id_attribute) else {
            return Err(FeedError::data_integrity(
                format!("#{ordinal}"),
                format!("no value for product id attribute `{id_attribute}`"),
            ));
        };
        let name = self
            .product_name_attribute
            .as_deref()
            .and_then(|attribute| product.first_text(attribute));

        let assigned = product.texts(&self.options.category_attribute_id);
        let ancestry = expand_ancestry(&self.categories, assigned.iter().map(|id| &**id))
            .map_err(|error| FeedError::data_integrity(external_id.to_string(), error.to_string()))?;

        start(&mut self.xml, "Product")?;
        write_text_element(&mut self.xml, "ExternalId", &external_id)?;
        write_optional_element(&mut self.xml, "Name", name.as_deref())?;
        for category in &ancestry {
            write_text_element(&mut self.xml, "CategoryExternalId", category)?;
        }
        for mapping in &self.options.fields {
            let Some(text) = resolve_field(product, mapping) else {
                continue;
            };
            match &mapping.wrapper {
                Some(wrapper) => {
                    write_wrapped_element(&mut self.xml, wrapper, &mapping.element, &text)?;
                }
                None => write_text_element(&mut self.xml, &mapping.element, &text)?,
            }
        }
        end(&mut self.xml, "Product")?;

        self.summary.products = ordinal;
        self.summary.category_links += ancestry.len();
        Ok(())
    }
}

/// Text for one mapped field, or `None` when the element is omitted.
fn resolve_field(product: &ProductRecord, mapping: &FieldMapping) -> Option<String> {
    let value = product.first_text(&mapping.attribute_id)?;
    match mapping.resolve {
        ValueResolution::Value => Some(value.into_owned()),
        ValueResolution::AssetUrl => product
            .asset(&value)
            .and_then(|asset| asset.url.clone()),
    }
}

impl<W: Write> ExportListener for FeedAdapter<W> {
    fn start_document(&mut self) -> Result<()> {
        if self.document_open || self.state != AdapterState::AwaitingAttributes {
            return Err(self.sequence("start of document"));
        }
        self.xml
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        let mut root = BytesStart::new(FEED_ELEMENT);
        if let Some(name) = &self.options.feed_name {
            root.push_attribute(("name", name.as_str()));
        }
        if let Some(at) = self.extract_date {
            let stamp = at.to_rfc3339_opts(SecondsFormat::Secs, false);
            root.push_attribute(("extractDate", stamp.as_str()));
        }
        self.xml.write_event(Event::Start(root))?;
        self.document_open = true;
        Ok(())
    }

    fn end_document(&mut self) -> Result<()> {
        self.expect_state(AdapterState::Done, "end of document")?;
        end(&mut self.xml, FEED_ELEMENT)?;
        self.xml.get_mut().write_all(b"\n")?;
        self.xml.get_mut().flush()?;
        self.document_open = false;
        info!(
            products = self.summary.products,
            brands = self.summary.brands,
            categories = self.summary.categories,
            "feed complete"
        );
        Ok(())
    }

    fn start_section(&mut self, section: SectionKind) -> Result<()> {
        let event = format!("start of section `{section}`");
        match section {
            SectionKind::Attributes => self.transition(
                AdapterState::AwaitingAttributes,
                AdapterState::InAttributes,
                &event,
            ),
            SectionKind::AttributeValues => self.transition(
                AdapterState::AwaitingValues,
                AdapterState::InAttributeValues,
                &event,
            ),
            SectionKind::Products => {
                self.expect_state(AdapterState::ValuesFlushed, &event)?;
                match &self.product_id_attribute {
                    Some(attribute) => debug!(attribute = %attribute, "product id attribute"),
                    None => {
                        return Err(FeedError::configuration(
                            "product_id_attribute_id",
                            "no attribute carries the product_id role and no override is set",
                        ));
                    }
                }
                start(&mut self.xml, "Products")?;
                self.state = AdapterState::InProducts;
                Ok(())
            }
        }
    }

    fn end_section(&mut self, section: SectionKind) -> Result<()> {
        let event = format!("end of section `{section}`");
        match section {
            SectionKind::Attributes => {
                self.transition(
                    AdapterState::InAttributes,
                    AdapterState::AwaitingValues,
                    &event,
                )?;
                if !self.brand_declared {
                    warn!(
                        attribute = %self.options.brand_attribute_id,
                        "brand attribute is not declared in the export"
                    );
                }
                if !self.category_declared {
                    warn!(
                        attribute = %self.options.category_attribute_id,
                        "category attribute is not declared in the export"
                    );
                }
                Ok(())
            }
            SectionKind::AttributeValues => {
                self.expect_state(AdapterState::InAttributeValues, &event)?;
                self.flush_tables()?;
                self.state = AdapterState::ValuesFlushed;
                Ok(())
            }
            SectionKind::Products => {
                self.expect_state(AdapterState::InProducts, &event)?;
                end(&mut self.xml, "Products")?;
                self.state = AdapterState::Done;
                Ok(())
            }
        }
    }

    fn attribute(&mut self, attribute: AttributeDefinition) -> Result<()> {
        self.expect_state(AdapterState::InAttributes, "attribute")?;
        self.summary.attributes += 1;

        match attribute.role {
            Some(AttributeRole::ProductId) if self.options.product_id_attribute_id.is_none() => {
                self.product_id_attribute = Some(attribute.id.clone());
            }
            Some(AttributeRole::ProductName)
                if self.options.product_name_attribute_id.is_none() =>
            {
                self.product_name_attribute = Some(attribute.id.clone());
            }
            _ => {}
        }

        if attribute.id == self.options.brand_attribute_id {
            if attribute.data_type != Some(DataType::Enumerated) {
                let declared = attribute
                    .data_type
                    .as_ref()
                    .map_or("none", DataType::as_str);
                return Err(FeedError::configuration(
                    "brand_attribute_id",
                    format!(
                        "brand attribute `{}` must be enumerated, found data type `{declared}`",
                        attribute.id
                    ),
                ));
            }
            self.brand_declared = true;
        }
        if attribute.id == self.options.category_attribute_id {
            self.category_declared = true;
        }
        Ok(())
    }

    fn attribute_value(&mut self, value: AttributeValue) -> Result<()> {
        self.expect_state(AdapterState::InAttributeValues, "attribute value")?;
        self.summary.attribute_values += 1;

        if value.attribute_id == self.options.brand_attribute_id {
            if !self.brands.upsert(value.id.clone(), value.name) {
                debug!(brand = %value.id, "brand redefined; keeping first position");
            }
        } else if value.attribute_id == self.options.category_attribute_id {
            let entry = CategoryEntry::new(value.name, value.parent_id);
            if !self.categories.upsert(value.id.clone(), entry) {
                debug!(category = %value.id, "category redefined; keeping first position");
            }
        } else {
            self.summary.ignored_values += 1;
        }
        Ok(())
    }

    fn product(&mut self, product: ProductRecord) -> Result<()> {
        self.expect_state(AdapterState::InProducts, "product")?;
        self.write_product(&product)
    }
}
