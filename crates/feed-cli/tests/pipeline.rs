//! Integration tests for file-based conversion runs.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use feed_cli::config::{OptionOverrides, load_options, resolve_options};
use feed_cli::pipeline::{ConvertRequest, InputSource, convert, inspect, partial_path};
use feed_ingest::ExportLayout;
use feed_output::AdapterOptions;

const EXPORT: &str = r#"[
  {"header": {"version": "2012-12"}},
  {"attributes": [
    {"salsify:id": "pid", "salsify:role": "product_id"},
    {"salsify:id": "Brand", "salsify:data_type": "enumerated"},
    {"salsify:id": "Category", "salsify:data_type": "enumerated"}
  ]},
  {"attribute_values": [
    {"salsify:id": "b1", "salsify:attribute_id": "Brand", "salsify:name": "Acme"},
    {"salsify:id": "c1", "salsify:attribute_id": "Category", "salsify:name": "Root"},
    {"salsify:id": "c2", "salsify:attribute_id": "Category", "salsify:name": "Child", "salsify:parent_id": "c1"}
  ]},
  {"products": [
    {"pid": "P1", "Brand": "b1", "Category": "c2"}
  ]}
]"#;

const CONFIG: &str = r#"
brand_attribute_id = "Brand"
category_attribute_id = "Category"
extract_date = false

[[fields]]
attribute_id = "Brand"
element = "BrandExternalId"
"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn request(input: &Path, output: &Path, options: AdapterOptions) -> ConvertRequest {
    ConvertRequest {
        input: InputSource::File(input.to_path_buf()),
        output: Some(output.to_path_buf()),
        options,
        layout: ExportLayout::SECTIONED,
    }
}

#[test]
fn convert_writes_feed_and_removes_partial() {
    let dir = TempDir::new().expect("tempdir");
    let input = write(&dir, "export.json", EXPORT);
    let config = write(&dir, "feed.toml", CONFIG);
    let output = dir.path().join("feed.xml");

    let options = load_options(&config).expect("load config");
    let outcome = convert(request(&input, &output, options)).expect("convert");

    assert_eq!(outcome.summary.products, 1);
    assert_eq!(outcome.output.as_deref(), Some(output.as_path()));
    assert!(!partial_path(&output).exists());

    let xml = fs::read_to_string(&output).expect("read feed");
    assert!(xml.contains("<Feed>"), "{xml}");
    assert!(xml.contains("<CategoryExternalId>c2</CategoryExternalId>"));
    assert!(xml.contains("<BrandExternalId>b1</BrandExternalId>"));
    assert!(xml.trim_end().ends_with("</Feed>"));
}

#[test]
fn failed_conversion_keeps_existing_output() {
    let dir = TempDir::new().expect("tempdir");
    let broken = EXPORT.replace(r#""Category": "c2""#, r#""Category": "c9""#);
    let input = write(&dir, "export.json", &broken);
    let output = write(&dir, "feed.xml", "previous feed");

    let error = convert(request(
        &input,
        &output,
        AdapterOptions::new("Brand", "Category"),
    ))
    .unwrap_err();

    assert!(format!("{error:#}").contains("c9"), "{error:#}");
    assert_eq!(fs::read_to_string(&output).expect("read"), "previous feed");
    assert!(!partial_path(&output).exists());
}

#[test]
fn missing_required_option_names_the_key() {
    let dir = TempDir::new().expect("tempdir");
    let input = write(&dir, "export.json", EXPORT);
    let output = dir.path().join("feed.xml");

    let options = AdapterOptions {
        brand_attribute_id: Some("Brand".to_string()),
        ..AdapterOptions::default()
    };
    let error = convert(request(&input, &output, options)).unwrap_err();

    assert!(
        format!("{error:#}").contains("category_attribute_id"),
        "{error:#}"
    );
    assert!(!output.exists());
}

#[test]
fn overrides_replace_config_values() {
    let dir = TempDir::new().expect("tempdir");
    let config = write(&dir, "feed.toml", CONFIG);
    let overrides = OptionOverrides {
        brand_attribute: Some("Manufacturer".to_string()),
        feed_name: Some("nightly".to_string()),
        ..OptionOverrides::default()
    };

    let options = resolve_options(Some(&config), &overrides).expect("resolve");

    assert_eq!(options.brand_attribute_id.as_deref(), Some("Manufacturer"));
    assert_eq!(options.category_attribute_id.as_deref(), Some("Category"));
    assert_eq!(options.feed_name.as_deref(), Some("nightly"));
    assert!(!options.extract_date);
}

#[test]
fn flags_alone_are_enough_without_a_config_file() {
    let overrides = OptionOverrides {
        brand_attribute: Some("Brand".to_string()),
        category_attribute: Some("Category".to_string()),
        no_extract_date: true,
        ..OptionOverrides::default()
    };
    let options = resolve_options(None, &overrides).expect("resolve");
    assert!(options.resolve().is_ok());
}

#[test]
fn unreadable_config_reports_path() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("missing.toml");
    let error = load_options(&missing).unwrap_err();
    assert!(format!("{error:#}").contains("missing.toml"), "{error:#}");
}

#[test]
fn inspect_counts_sections() {
    let dir = TempDir::new().expect("tempdir");
    let input = write(&dir, "export.json", EXPORT);

    let stats = inspect(&InputSource::File(input), ExportLayout::SECTIONED).expect("inspect");

    assert_eq!(stats.attributes, 3);
    assert_eq!(stats.values_for("Category"), 2);
    assert_eq!(stats.products, 1);
}

#[test]
fn dash_means_stdin() {
    assert_eq!(InputSource::from_arg(Path::new("-")), InputSource::Stdin);
    assert_eq!(
        InputSource::from_arg(Path::new("export.json")),
        InputSource::File("export.json".into())
    );
    assert_eq!(
        partial_path(Path::new("out/feed.xml")),
        Path::new("out/feed.xml.partial")
    );
}
