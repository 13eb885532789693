//! Tests for feed-model record typing.

use feed_model::{
    AttributeDefinition, AttributeRole, AttributeValue, ContainerKind, DataType, FieldError,
    ProductRecord, Record, SectionKind, keys,
};

fn asset(record: &mut Record, id: &str, url: &str) -> feed_model::NodeId {
    let map = record.alloc_container(ContainerKind::Map);
    let id_node = record.alloc_scalar(id.into());
    let url_node = record.alloc_scalar(url.into());
    record.insert_entry(map, keys::ID.to_string(), id_node);
    record.insert_entry(map, keys::URL.to_string(), url_node);
    map
}

#[test]
fn attribute_definition_splits_known_fields_from_metadata() {
    let mut record = Record::new();
    record.insert(keys::ID, "Brand");
    record.insert(keys::DATA_TYPE, "enumerated");
    record.insert("salsify:system_id", "s-1");

    let attribute = AttributeDefinition::from_record(record).expect("attribute");

    assert_eq!(attribute.id, "Brand");
    assert_eq!(attribute.role, None);
    assert!(attribute.is_enumerated());
    assert_eq!(attribute.metadata.len(), 1);
    assert!(attribute.metadata.contains_key("salsify:system_id"));
}

#[test]
fn attribute_definition_parses_roles() {
    let mut record = Record::new();
    record.insert(keys::ID, "pid");
    record.insert(keys::ROLE, "product_id");
    let attribute = AttributeDefinition::from_record(record).expect("attribute");
    assert_eq!(attribute.role, Some(AttributeRole::ProductId));

    assert_eq!(AttributeRole::from("product_name"), AttributeRole::ProductName);
    assert_eq!(
        AttributeRole::from("parent_id"),
        AttributeRole::Other("parent_id".to_string())
    );
    assert_eq!(DataType::from("digital_asset"), DataType::DigitalAsset);
    assert_eq!(DataType::from("currency").to_string(), "currency");
}

#[test]
fn attribute_definition_requires_id() {
    let mut record = Record::new();
    record.insert(keys::DATA_TYPE, "string");
    let error = AttributeDefinition::from_record(record).unwrap_err();
    assert_eq!(error, FieldError::Missing(keys::ID));
}

#[test]
fn attribute_value_accepts_numeric_ids() {
    let mut record = Record::new();
    record.insert(keys::ID, 17_u64);
    record.insert(keys::ATTRIBUTE_ID, "Category");
    record.insert(keys::NAME, "Shoes");
    record.insert(keys::PARENT_ID, 3_u64);

    let value = AttributeValue::from_record(&record).expect("value");

    assert_eq!(
        value,
        AttributeValue::new("17", "Category", "Shoes").with_parent("3")
    );
}

#[test]
fn attribute_value_treats_null_parent_as_root() {
    let mut record = Record::new();
    record.insert(keys::ID, "c1");
    record.insert(keys::ATTRIBUTE_ID, "Category");
    record.insert(keys::NAME, "Root");
    record.insert(keys::PARENT_ID, feed_model::Scalar::Null);

    let value = AttributeValue::from_record(&record).expect("value");
    assert_eq!(value.parent_id, None);
}

#[test]
fn attribute_value_rejects_list_id() {
    let mut record = Record::new();
    record.insert_list(keys::ID, ["a", "b"]);
    record.insert(keys::ATTRIBUTE_ID, "Brand");
    record.insert(keys::NAME, "Acme");

    let error = AttributeValue::from_record(&record).unwrap_err();
    assert_eq!(error, FieldError::NotScalar(keys::ID));
}

#[test]
fn product_lifts_assets_out_of_fields() {
    let mut record = Record::new();
    record.insert("pid", "P1");
    record.insert("Image", "img-2");
    let list = record.alloc_container(ContainerKind::List);
    let first = asset(&mut record, "img-1", "http://cdn/1.jpg");
    let second = asset(&mut record, "img-2", "http://cdn/2.jpg");
    record.push_item(list, first);
    record.push_item(list, second);
    record.set_field(keys::DIGITAL_ASSETS.to_string(), list);

    let product = ProductRecord::from_record(record).expect("product");

    assert_eq!(product.assets().len(), 2);
    assert!(product.value(keys::DIGITAL_ASSETS).is_none());
    let image = product.first_text("Image").expect("image");
    assert_eq!(
        product.asset(&image).and_then(|a| a.url.as_deref()),
        Some("http://cdn/2.jpg")
    );
}

#[test]
fn product_multi_valued_fields() {
    let mut record = Record::new();
    record.insert_list("Color", ["x", "y"]);
    let product = ProductRecord::from_fields(record);

    assert_eq!(product.first_text("Color").as_deref(), Some("x"));
    let all: Vec<String> = product
        .texts("Color")
        .into_iter()
        .map(|t| t.into_owned())
        .collect();
    assert_eq!(all, vec!["x", "y"]);
    assert!(product.texts("Missing").is_empty());
}

#[test]
fn product_rejects_scalar_asset_field() {
    let mut record = Record::new();
    record.insert(keys::DIGITAL_ASSETS, "img-1");
    let error = ProductRecord::from_record(record).unwrap_err();
    assert!(matches!(error, FieldError::Malformed { .. }));
}

#[test]
fn section_keys_round_trip() {
    for kind in SectionKind::ALL {
        assert_eq!(SectionKind::from_key(kind.key()), Some(kind));
    }
    assert_eq!(SectionKind::from_key("header"), None);
    assert!(SectionKind::Attributes.ordinal() < SectionKind::Products.ordinal());
}
