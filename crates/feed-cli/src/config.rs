//! Adapter options from a TOML file plus command-line overrides.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use feed_output::AdapterOptions;

/// Read adapter options from a TOML file.
///
/// Required keys are not checked here; the adapter reports them when it is
/// built.
pub fn load_options(path: &Path) -> Result<AdapterOptions> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parse config {}", path.display()))
}

/// Values given on the command line that replace file values.
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    pub brand_attribute: Option<String>,
    pub category_attribute: Option<String>,
    pub feed_name: Option<String>,
    pub no_extract_date: bool,
}

impl OptionOverrides {
    pub fn apply(&self, mut options: AdapterOptions) -> AdapterOptions {
        if let Some(brand) = &self.brand_attribute {
            options.brand_attribute_id = Some(brand.clone());
        }
        if let Some(category) = &self.category_attribute {
            options.category_attribute_id = Some(category.clone());
        }
        if let Some(name) = &self.feed_name {
            options.feed_name = Some(name.clone());
        }
        if self.no_extract_date {
            options.extract_date = false;
        }
        options
    }
}

/// Options from `path` (or defaults) with `overrides` applied.
pub fn resolve_options(path: Option<&Path>, overrides: &OptionOverrides) -> Result<AdapterOptions> {
    let options = match path {
        Some(path) => load_options(path)?,
        None => AdapterOptions::default(),
    };
    Ok(overrides.apply(options))
}
