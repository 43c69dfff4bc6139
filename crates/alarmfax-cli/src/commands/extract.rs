//! Extract command - turn a single fax transcript into alarm fields.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use alarmfax_core::extract::{AlarmExtractor, AlarmFaxParser};
use alarmfax_core::models::fields::{Field, FieldMap};

use super::{failure, load_config};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input text file (`-` for stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Exit with an error when the fax could not be parsed
    #[arg(long)]
    strict: bool,

    /// Only output these field keys (repeatable, e.g. `--field street`)
    #[arg(long = "field", value_parser = parse_field)]
    fields: Vec<Field>,
}

fn parse_field(key: &str) -> Result<Field, String> {
    Field::from_key(key).ok_or_else(|| {
        let known: Vec<_> = Field::ALL.iter().map(|f| f.key()).collect();
        format!("unknown field `{}`, expected one of: {}", key, known.join(", "))
    })
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON object
    Json,
    /// Key/value CSV
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for written outputs.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let parser = AlarmFaxParser::from_config(&config)?;

    let text = read_input(&args.input)?;
    info!("Processing input: {}", args.input.display());

    let fields = parser.extract(Some(text.as_str()));

    if let Some(diagnostic) = failure(&fields) {
        eprintln!("{} {}", style("✗ Extraction failed:").red(), diagnostic);
        if args.strict {
            anyhow::bail!("Could not parse {}", args.input.display());
        }
    }

    let fields = select_fields(fields, &args.fields);
    let output = format_fields(&fields, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn read_input(input: &PathBuf) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    // Fax transcripts are not always valid UTF-8
    let bytes = fs::read(input)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Keep only the requested fields. The diagnostic field always survives.
fn select_fields(fields: FieldMap, selected: &[Field]) -> FieldMap {
    if selected.is_empty() {
        return fields;
    }

    fields
        .into_iter()
        .filter(|(key, _)| {
            key == Field::Log.key() || selected.iter().any(|f| f.key() == key)
        })
        .collect()
}

pub fn format_fields(fields: &FieldMap, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(fields)?),
        OutputFormat::Csv => format_csv(fields),
        OutputFormat::Text => Ok(format_text(fields)),
    }
}

fn format_csv(fields: &FieldMap) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["key", "value"])?;
    for (key, value) in fields {
        wtr.write_record([key, value])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(fields: &FieldMap) -> String {
    let mut output = String::new();

    for (key, value) in fields {
        let mut lines = value.lines();
        output.push_str(&format!("{}: {}\n", key, lines.next().unwrap_or("")));
        for line in lines {
            output.push_str(&format!("    {}\n", line));
        }
    }

    output
}
