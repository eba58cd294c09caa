// LedgerSift CLI - batch bank-transaction triage

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_CONFIG, EXIT_SINK, EXIT_SOURCE, EXIT_SUCCESS, EXIT_USAGE};
use ledgersift_engine::TriageConfig;

#[derive(Parser)]
#[command(name = "lsift")]
#[command(about = "Clean and deduplicate bank-transaction exports for reconciliation review")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the triage pipeline over a transaction CSV
    #[command(after_help = "\
Examples:
  lsift run transactions.csv
  lsift run transactions.csv -o reviewed.xlsx
  lsift run transactions.csv --config june.triage.toml
  lsift run transactions.csv --json > result.json
  lsift run export.txt --delimiter ';'")]
    Run {
        /// Input CSV file (all fields read as text)
        input: PathBuf,

        /// Output workbook (default: PROCESSED_<stem>.xlsx beside the input)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// TOML pipeline config (default: built-in tables)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Field delimiter (default: sniffed from the input)
        #[arg(long)]
        delimiter: Option<char>,

        /// Print the full result as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Suppress the human summary on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Validate a pipeline config without running
    #[command(after_help = "\
Examples:
  lsift validate june.triage.toml")]
    Validate {
        /// Path to the TOML config file
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            input,
            output,
            config,
            delimiter,
            json,
            quiet,
        } => cmd_run(input, output, config, delimiter, json, quiet),
        Commands::Validate { config } => cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    fn source(msg: impl Into<String>) -> Self {
        Self { code: EXIT_SOURCE, message: msg.into(), hint: None }
    }

    fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    fn sink(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_SINK,
            message: msg.into(),
            hint: Some("is the workbook open in another application?".into()),
        }
    }
}

fn cmd_run(
    input: PathBuf,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    delimiter: Option<char>,
    json: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref())?;

    let table = match delimiter {
        Some(d) => {
            if !d.is_ascii() {
                return Err(CliError::usage(format!(
                    "delimiter must be a single ASCII character, got '{d}'"
                )));
            }
            ledgersift_io::csv::import_with_delimiter(&input, d as u8)
        }
        None => ledgersift_io::csv::import(&input),
    }
    .map_err(|e| CliError::source(format!("cannot read {}: {e}", input.display())))?;

    let result = ledgersift_engine::run(&config, &table)
        .map_err(|e| CliError::source(e.to_string()))?;

    let output_path = output.unwrap_or_else(|| processed_path(&input));
    let export = ledgersift_io::xlsx::export(&result, &output_path, &config)
        .map_err(|e| CliError::sink(format!("cannot write {}: {e}", output_path.display())))?;

    if json {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::sink(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    if !quiet {
        let s = &result.summary;
        eprintln!(
            "{} records — {} unique, {} duplicates, {} double duplicates ({} unkeyed)",
            s.total_records, s.unique, s.duplicates, s.double_duplicates, s.unkeyed,
        );
        if export.rows_suppressed > 0 {
            eprintln!("suppressed {} blank row(s)", export.rows_suppressed);
        }
        eprintln!("wrote {}", output_path.display());
    }

    Ok(())
}

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(Some(&config_path))?;
    eprintln!(
        "valid: '{}' — {} abbreviation(s), {} pruned column(s), tie-break {} char(s)",
        config.name,
        config.normalize.abbreviations.len(),
        config.normalize.prune_columns.len(),
        config.key.tie_break_chars,
    );
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<TriageConfig, CliError> {
    let Some(path) = path else {
        return Ok(TriageConfig::default());
    };
    let config_str = std::fs::read_to_string(path)
        .map_err(|e| CliError::config(format!("cannot read {}: {e}", path.display())))?;
    TriageConfig::from_toml(&config_str).map_err(|e| CliError::config(e.to_string()))
}

/// Default artifact name: prefix the input's base name with the processed
/// marker and swap the extension for the workbook format.
fn processed_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    input.with_file_name(format!("PROCESSED_{stem}.xlsx"))
}
