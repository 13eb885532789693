//! Reserved field names of the catalog export format.

pub const ID: &str = "salsify:id";
pub const ROLE: &str = "salsify:role";
pub const DATA_TYPE: &str = "salsify:data_type";
pub const ATTRIBUTE_ID: &str = "salsify:attribute_id";
pub const NAME: &str = "salsify:name";
pub const PARENT_ID: &str = "salsify:parent_id";
pub const URL: &str = "salsify:url";

/// Product key holding `{id, url}` asset descriptors.
pub const DIGITAL_ASSETS: &str = "salsify:digital_assets";

/// Product key holding related-product links (accessories and the like).
pub const RELATIONS: &str = "salsify:relations";
