use anyhow::Result;

use feed_cli::config::{OptionOverrides, resolve_options};
use feed_cli::pipeline::{ConvertOutcome, ConvertRequest, InputSource, convert, inspect};
use feed_ingest::ExportStats;

use crate::cli::{ConvertArgs, InspectArgs};

pub fn run_convert(args: &ConvertArgs) -> Result<ConvertOutcome> {
    let overrides = OptionOverrides {
        brand_attribute: args.brand_attribute.clone(),
        category_attribute: args.category_attribute.clone(),
        feed_name: args.feed_name.clone(),
        no_extract_date: args.no_extract_date,
    };
    let options = resolve_options(args.config.as_deref(), &overrides)?;
    convert(ConvertRequest {
        input: InputSource::from_arg(&args.input),
        output: args.output.clone(),
        options,
        layout: args.layout.layout(),
    })
}

pub fn run_inspect(args: &InspectArgs) -> Result<ExportStats> {
    inspect(&InputSource::from_arg(&args.input), args.layout.layout())
}
