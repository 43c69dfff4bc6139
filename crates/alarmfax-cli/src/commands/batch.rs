//! Batch processing command for multiple fax transcripts.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, error, warn};

use alarmfax_core::extract::{AlarmExtractor, AlarmFaxParser};
use alarmfax_core::models::fields::{Field, FieldMap};

use super::extract::{format_fields, OutputFormat};
use super::{failure, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue when a file cannot be read
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    fields: Option<FieldMap>,
    error: Option<String>,
    processing_time_ms: u64,
}

/// One row of the summary CSV.
#[derive(Serialize)]
struct SummaryRow<'a> {
    filename: &'a str,
    status: &'a str,
    incident_number: &'a str,
    street: &'a str,
    city: &'a str,
    vehicles: String,
    processing_time_ms: u64,
    error: &'a str,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let parser = AlarmFaxParser::from_config(&config)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    // Create output directory if specified
    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = fs::read(&path)
            .map(|bytes| parser.extract(Some(String::from_utf8_lossy(&bytes).as_ref())));
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(fields) => {
                if let Some(diagnostic) = failure(&fields) {
                    warn!("Could not parse {}: {}", path.display(), diagnostic);
                }
                results.push(ProcessResult {
                    path,
                    fields: Some(fields),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to read {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        fields: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to read {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        progress.inc(1);
    }

    progress.finish_and_clear();

    // Write outputs
    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            if let Some(fields) = &result.fields {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("fax");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, format_fields(fields, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    // Generate summary if requested
    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let parsed = results
        .iter()
        .filter(|r| r.fields.as_ref().is_some_and(|f| failure(f).is_none()))
        .count();
    let failed: Vec<_> = results
        .iter()
        .filter(|r| r.fields.as_ref().is_none_or(|f| failure(f).is_some()))
        .collect();

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} parsed, {} failed",
        style(parsed).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!("  - {}: {}", result.path.display(), describe_failure(result));
        }
    }

    Ok(())
}

fn describe_failure(result: &ProcessResult) -> &str {
    result
        .error
        .as_deref()
        .or_else(|| result.fields.as_ref().and_then(failure))
        .unwrap_or("unknown error")
}

fn field_value(result: &ProcessResult, field: Field) -> &str {
    result
        .fields
        .as_ref()
        .and_then(|f| f.get(field.key()))
        .map(String::as_str)
        .unwrap_or("")
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        let failed = result.fields.as_ref().is_none_or(|f| failure(f).is_some());
        wtr.serialize(SummaryRow {
            filename,
            status: if failed { "error" } else { "success" },
            incident_number: field_value(result, Field::IncidentNumber),
            street: field_value(result, Field::Street),
            city: field_value(result, Field::City),
            vehicles: field_value(result, Field::Vehicles).replace('\n', ", "),
            processing_time_ms: result.processing_time_ms,
            error: if failed { describe_failure(result) } else { "" },
        })?;
    }

    wtr.flush()?;
    Ok(())
}
