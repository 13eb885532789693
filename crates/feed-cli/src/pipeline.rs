//! Conversion and inspection runs over files or standard streams.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use feed_ingest::{ExportLayout, ExportStats, reconstruct_with_layout};
use feed_output::{AdapterOptions, FeedSummary, TransformOptions, transform_export_with};

/// Where the export is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// `-` means standard input.
    pub fn from_arg(arg: &Path) -> Self {
        if arg.as_os_str() == "-" {
            InputSource::Stdin
        } else {
            InputSource::File(arg.to_path_buf())
        }
    }

    pub fn describe(&self) -> String {
        match self {
            InputSource::Stdin => "<stdin>".to_string(),
            InputSource::File(path) => path.display().to_string(),
        }
    }

    fn open(&self) -> Result<Box<dyn Read>> {
        match self {
            InputSource::Stdin => Ok(Box::new(BufReader::new(io::stdin().lock()))),
            InputSource::File(path) => {
                let file =
                    File::open(path).with_context(|| format!("open {}", path.display()))?;
                Ok(Box::new(BufReader::new(file)))
            }
        }
    }
}

/// One `convert` run.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub input: InputSource,
    /// Feed destination; standard output when `None`.
    pub output: Option<PathBuf>,
    pub options: AdapterOptions,
    pub layout: ExportLayout,
}

#[derive(Debug, Clone)]
pub struct ConvertOutcome {
    pub input: String,
    pub output: Option<PathBuf>,
    pub summary: FeedSummary,
    pub elapsed: Duration,
}

/// Sibling path the feed is written to before it is moved into place.
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".partial");
    PathBuf::from(name)
}

pub fn convert(request: ConvertRequest) -> Result<ConvertOutcome> {
    let input = request.input.describe();
    let span = info_span!("convert", input = %input);
    let _guard = span.enter();
    let started = Instant::now();

    let reader = request.input.open()?;
    let transform = TransformOptions {
        layout: request.layout,
        extract_date: None,
    };
    let summary = match &request.output {
        Some(path) => convert_to_file(reader, path, request.options, transform)?,
        None => {
            let stdout = BufWriter::new(io::stdout().lock());
            let (mut writer, summary) =
                transform_export_with(reader, stdout, request.options, transform)
                    .with_context(|| format!("convert {input}"))?;
            writer.flush().context("flush standard output")?;
            summary
        }
    };

    let elapsed = started.elapsed();
    info!(
        products = summary.products,
        elapsed_ms = elapsed.as_millis(),
        "conversion finished"
    );
    Ok(ConvertOutcome {
        input,
        output: request.output,
        summary,
        elapsed,
    })
}

/// Write to `<path>.partial` and rename over `path` only when the whole pass
/// succeeds. A failed pass leaves `path` untouched.
fn convert_to_file(
    reader: Box<dyn Read>,
    path: &Path,
    options: AdapterOptions,
    transform: TransformOptions,
) -> Result<FeedSummary> {
    let partial = partial_path(path);
    let file = File::create(&partial)
        .with_context(|| format!("create {}", partial.display()))?;

    let outcome = transform_export_with(reader, BufWriter::new(file), options, transform)
        .map_err(anyhow::Error::from)
        .and_then(|(writer, summary)| {
            let file = writer
                .into_inner()
                .map_err(|error| error.into_error())
                .context("flush feed")?;
            file.sync_all().context("sync feed")?;
            Ok(summary)
        });

    match outcome {
        Ok(summary) => {
            fs::rename(&partial, path).with_context(|| {
                format!("move {} to {}", partial.display(), path.display())
            })?;
            Ok(summary)
        }
        Err(error) => {
            if let Err(cleanup) = fs::remove_file(&partial) {
                warn!(path = %partial.display(), %cleanup, "could not remove partial feed");
            }
            Err(error.context(format!("convert into {}", path.display())))
        }
    }
}

/// Count the records of an export without converting it.
pub fn inspect(input: &InputSource, layout: ExportLayout) -> Result<ExportStats> {
    let span = info_span!("inspect", input = %input.describe());
    let _guard = span.enter();
    let reader = input.open()?;
    reconstruct_with_layout(reader, ExportStats::new(), layout)
        .with_context(|| format!("inspect {}", input.describe()))
}
