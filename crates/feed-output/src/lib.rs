//! Recommendation feed output.
//!
//! [`FeedAdapter`] is an [`ExportListener`](feed_ingest::ExportListener) that
//! turns a catalog export into a feed document:
//!
//! - **Brands** from values of the configured brand attribute
//! - **Categories** from values of the configured category attribute
//! - **Products** with their full category ancestry and mapped fields

mod adapter;
pub mod ancestry;
pub mod options;
pub mod tables;
mod xml;

use std::io::{Read, Write};

use chrono::{DateTime, Utc};

use feed_ingest::{ExportLayout, reconstruct_with_layout};
use feed_model::Result;

pub use adapter::{FEED_ELEMENT, FeedAdapter, FeedSummary};
pub use ancestry::{AncestryError, expand_ancestry};
pub use options::{AdapterOptions, FieldMapping, ResolvedOptions, ValueResolution};
pub use tables::{BrandTable, CategoryEntry, CategoryTable, LookupTable};

/// Settings for one conversion beyond the adapter options.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformOptions {
    pub layout: ExportLayout,
    /// Fixed `extractDate`; the current time is used when unset.
    pub extract_date: Option<DateTime<Utc>>,
}

/// Convert a JSON catalog export into a feed written to `writer`.
pub fn transform_export<R: Read, W: Write>(
    reader: R,
    writer: W,
    options: AdapterOptions,
) -> Result<FeedSummary> {
    transform_export_with(reader, writer, options, TransformOptions::default())
        .map(|(_, summary)| summary)
}

/// [`transform_export`] with an explicit layout and timestamp; returns the
/// sink along with the summary.
pub fn transform_export_with<R: Read, W: Write>(
    reader: R,
    writer: W,
    options: AdapterOptions,
    transform: TransformOptions,
) -> Result<(W, FeedSummary)> {
    let mut adapter = FeedAdapter::new(writer, options)?;
    if let Some(at) = transform.extract_date {
        adapter = adapter.with_extract_date(at);
    }
    reconstruct_with_layout(reader, adapter, transform.layout)?.finish()
}
