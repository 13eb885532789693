//! CLI argument definitions for the catalog feed converter.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use feed_ingest::ExportLayout;

#[derive(Parser)]
#[command(
    name = "catalog-feed",
    version,
    about = "Convert catalog exports into recommendation feeds",
    long_about = "Stream a JSON catalog export (attributes, attribute values, products)\n\
                  and write a recommendation feed XML with brands, categories and\n\
                  products with their full category ancestry."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert an export into a feed.
    Convert(ConvertArgs),

    /// Count the records of an export without converting it.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Export to read, or `-` for standard input.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// TOML file with adapter options.
    #[arg(long = "config", short = 'c', value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Feed destination (default: standard output).
    ///
    /// The feed is written next to the destination as `<PATH>.partial` and
    /// moved into place only when the conversion succeeds.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Brand attribute id (overrides the config file).
    #[arg(long = "brand-attribute", value_name = "ID")]
    pub brand_attribute: Option<String>,

    /// Category attribute id (overrides the config file).
    #[arg(long = "category-attribute", value_name = "ID")]
    pub category_attribute: Option<String>,

    /// Feed name written on the root element.
    #[arg(long = "feed-name", value_name = "NAME")]
    pub feed_name: Option<String>,

    /// Leave the extraction timestamp off the root element.
    #[arg(long = "no-extract-date")]
    pub no_extract_date: bool,

    #[arg(long = "layout", value_enum, default_value = "sectioned")]
    pub layout: LayoutArg,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Export to read, or `-` for standard input.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[arg(long = "layout", value_enum, default_value = "sectioned")]
    pub layout: LayoutArg,
}

/// Export layout choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LayoutArg {
    /// Each section in its own object inside a root array.
    Sectioned,
    /// Sections as keys of one root object.
    RootObject,
}

impl LayoutArg {
    pub fn layout(self) -> ExportLayout {
        match self {
            LayoutArg::Sectioned => ExportLayout::SECTIONED,
            LayoutArg::RootObject => ExportLayout::ROOT_OBJECT,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
