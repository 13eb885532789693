//! Tests for adapter option loading and validation.

use feed_model::FeedError;
use feed_output::{AdapterOptions, FieldMapping, ValueResolution};

#[test]
fn options_deserialize_from_toml() {
    let options: AdapterOptions = toml::from_str(
        r#"
        brand_attribute_id = "Brand"
        category_attribute_id = "Category"
        feed_name = "Acme feed"

        [[fields]]
        attribute_id = "Image"
        element = "ImageUrl"
        resolve = "asset_url"

        [[fields]]
        attribute_id = "UPC"
        element = "ManufacturerPartNumber"
        wrapper = "ManufacturerPartNumbers"
        "#,
    )
    .expect("parse options");

    assert_eq!(options.brand_attribute_id.as_deref(), Some("Brand"));
    assert!(options.extract_date);
    assert_eq!(
        options.fields,
        vec![
            FieldMapping::new("Image", "ImageUrl").resolve_asset_url(),
            FieldMapping::new("UPC", "ManufacturerPartNumber")
                .wrapped_in("ManufacturerPartNumbers"),
        ]
    );
    assert_eq!(options.fields[0].resolve, ValueResolution::AssetUrl);

    let resolved = options.resolve().expect("resolve");
    assert_eq!(resolved.category_attribute_id, "Category");
    assert_eq!(resolved.feed_name.as_deref(), Some("Acme feed"));
}

#[test]
fn missing_key_is_reported_by_resolve_not_by_parsing() {
    let options: AdapterOptions =
        toml::from_str(r#"category_attribute_id = "Category""#).expect("parse options");
    match options.resolve().unwrap_err() {
        FeedError::Configuration { key, .. } => assert_eq!(key, "brand_attribute_id"),
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn unknown_keys_are_rejected() {
    let parsed: Result<AdapterOptions, _> = toml::from_str(
        r#"
        brand_attribute_id = "Brand"
        category_attribute_id = "Category"
        brand_atribute = "typo"
        "#,
    );
    assert!(parsed.is_err());
}

#[test]
fn invalid_wrapper_is_rejected() {
    let options = AdapterOptions::new("Brand", "Category")
        .with_field(FieldMapping::new("UPC", "PartNumber"))
        .with_field(FieldMapping::new("MPN", "PartNumber").wrapped_in("Part Numbers"));
    match options.resolve().unwrap_err() {
        FeedError::Configuration { key, message } => {
            assert_eq!(key, "fields[1]");
            assert!(message.contains("Part Numbers"), "{message}");
        }
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn extract_date_can_be_turned_off_in_toml() {
    let options: AdapterOptions = toml::from_str(
        r#"
        brand_attribute_id = "Brand"
        category_attribute_id = "Category"
        extract_date = false
        "#,
    )
    .expect("parse options");
    assert!(!options.extract_date);
}
