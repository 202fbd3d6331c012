// partsync CLI - headless product master-data reconciliation

mod config;
mod exit_codes;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use partsync_core::model::ProductKey;
use partsync_fetch::{fetch_all, Fetch, FetchError, HttpFetcher};
use partsync_io::{extract_keys, reconcile, xlsx, IoError, OUTPUT_FILENAME};

use config::{resolve, FileConfig};
use exit_codes::{
    EXIT_DOC_STRUCTURE, EXIT_FETCH_AUTH, EXIT_FETCH_NOT_FOUND, EXIT_FETCH_UPSTREAM, EXIT_IO,
    EXIT_MISMATCH, EXIT_SUCCESS, EXIT_USAGE,
};
use report::{write_csv_report, KeyStats, RunReport};

#[derive(Parser)]
#[command(name = "partsync")]
#[command(about = "Reconcile product master-data sheets against the product data service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one product record by key and print it as JSON
    #[command(after_help = "\
Examples:
  partsync lookup A2V00012345
  partsync lookup a2v00012345 --base-url https://parts.example.com/api")]
    Lookup {
        /// Product key (must carry the A2V prefix)
        key: String,

        /// Product data service base URL
        #[arg(long, env = "PARTSYNC_BASE_URL")]
        base_url: Option<String>,

        /// Bearer token for the product data service
        #[arg(long, env = "PARTSYNC_API_TOKEN", hide_env_values = true)]
        api_token: Option<String>,

        /// Config file (default: ./partsync.toml, then the user config dir)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Reconcile a workbook: fetch every keyed row, then interleave
    /// web-data and verdict rows under the originals
    #[command(after_help = "\
Examples:
  partsync reconcile parts.xlsx
  partsync reconcile parts.xlsx -o checked.xlsx --tolerance 2
  partsync reconcile parts.xlsx --concurrency 12 --report verdicts.csv
  partsync reconcile parts.xlsx --json --quiet")]
    Reconcile {
        /// Input workbook (xlsx, xls, xlsb, ods)
        input: PathBuf,

        /// Output workbook (default: reconciliation.xlsx)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Product data service base URL
        #[arg(long, env = "PARTSYNC_BASE_URL")]
        base_url: Option<String>,

        /// Bearer token for the product data service
        #[arg(long, env = "PARTSYNC_API_TOKEN", hide_env_values = true)]
        api_token: Option<String>,

        /// Upper bound on simultaneous fetches
        #[arg(long, env = "PARTSYNC_CONCURRENCY")]
        concurrency: Option<usize>,

        /// Allowed relative weight deviation in percent (0 = exact)
        #[arg(long, env = "PARTSYNC_WEIGHT_TOLERANCE")]
        tolerance: Option<f64>,

        /// Config file (default: ./partsync.toml, then the user config dir)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write per-attribute verdicts as CSV
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print the run summary as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Exit non-zero when any attribute mismatches
        #[arg(long)]
        fail_on_mismatch: bool,

        /// Suppress progress output
        #[arg(long, short = 'q')]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Lookup { key, base_url, api_token, config } => {
            cmd_lookup(key, base_url, api_token, config)
        }
        Commands::Reconcile {
            input,
            output,
            base_url,
            api_token,
            concurrency,
            tolerance,
            config,
            report,
            json,
            fail_on_mismatch,
            quiet,
        } => cmd_reconcile(
            input,
            output,
            base_url,
            api_token,
            concurrency,
            tolerance,
            config,
            report,
            json,
            fail_on_mismatch,
            quiet,
        ),
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
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn fetch_error(e: FetchError) -> CliError {
    let code = match &e {
        FetchError::Auth(_) => EXIT_FETCH_AUTH,
        FetchError::NotFound(_) => EXIT_FETCH_NOT_FOUND,
        FetchError::Upstream(_) | FetchError::Parse(_) => EXIT_FETCH_UPSTREAM,
        FetchError::Config(_) => EXIT_USAGE,
    };
    CliError { code, message: e.to_string(), hint: None }
}

fn document_error(e: IoError) -> CliError {
    let code = match &e {
        IoError::Open(_) | IoError::Read { .. } => EXIT_DOC_STRUCTURE,
        IoError::Write(_) => EXIT_IO,
    };
    CliError { code, message: e.to_string(), hint: None }
}

// ============================================================================
// lookup
// ============================================================================

fn cmd_lookup(
    key: String,
    base_url: Option<String>,
    api_token: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<(), CliError> {
    // Prefix validation happens before anything touches the network.
    let key = ProductKey::parse(&key).ok_or_else(|| {
        CliError::args(format!("ineligible product key {key:?}"))
            .with_hint("keys must carry the A2V prefix")
    })?;

    let file = FileConfig::load(config_path.as_deref())?;
    let settings = resolve(base_url, api_token, None, None, &file)?;

    let fetcher = HttpFetcher::new(&settings.base_url, settings.api_token).map_err(fetch_error)?;
    let record = fetcher.fetch_one(&key).map_err(fetch_error)?;

    let json = serde_json::to_string_pretty(&record)
        .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
    println!("{json}");
    Ok(())
}

// ============================================================================
// reconcile
// ============================================================================

fn cmd_reconcile(
    input: PathBuf,
    output: Option<PathBuf>,
    base_url: Option<String>,
    api_token: Option<String>,
    concurrency: Option<usize>,
    tolerance: Option<f64>,
    config_path: Option<PathBuf>,
    report_path: Option<PathBuf>,
    json_output: bool,
    fail_on_mismatch: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let file = FileConfig::load(config_path.as_deref())?;
    let settings = resolve(base_url, api_token, concurrency, tolerance, &file)?;

    let (document, import_stats) = xlsx::import(&input).map_err(document_error)?;
    if !quiet {
        eprintln!(
            "imported {} sheet(s), {} cells from {}",
            import_stats.sheets_imported,
            import_stats.cells_imported,
            input.display(),
        );
        for warning in &import_stats.warnings {
            eprintln!("warning: {warning}");
        }
    }

    let keys = extract_keys(&document);
    let fetcher = HttpFetcher::new(&settings.base_url, settings.api_token).map_err(fetch_error)?;
    let outcomes = fetch_all(&keys, &fetcher, settings.reconcile.concurrency);

    let retrieved = outcomes.values().filter(|o| o.record().is_some()).count();
    let failed = outcomes.len() - retrieved;
    if !quiet {
        eprintln!(
            "fetched {} unique key(s) with concurrency {}: {} retrieved, {} failed",
            outcomes.len(),
            settings.reconcile.concurrency,
            retrieved,
            failed,
        );
    }

    let result = reconcile(&document, &outcomes, &settings.reconcile);

    let out_path = output.unwrap_or_else(|| PathBuf::from(OUTPUT_FILENAME));
    let export_stats = xlsx::export(&result.document, &out_path).map_err(document_error)?;
    if !quiet {
        eprintln!(
            "wrote {} ({} cells)",
            out_path.display(),
            export_stats.cells_exported,
        );
    }

    if let Some(ref path) = report_path {
        write_csv_report(&result.entries, path)?;
        if !quiet {
            eprintln!("report written to {}", path.display());
        }
    }

    let summary = &result.summary;
    if !quiet {
        eprintln!(
            "{} candidate row(s) — {} match, {} mismatch, {} unresolved",
            summary.candidate_rows, summary.matches, summary.mismatches, summary.unresolved,
        );
    }

    if json_output {
        let run = RunReport::new(
            result.summary.clone(),
            KeyStats { unique_keys: outcomes.len(), retrieved, failed },
        );
        let json = serde_json::to_string_pretty(&run)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        println!("{json}");
    }

    if fail_on_mismatch && summary.mismatches > 0 {
        return Err(CliError {
            code: EXIT_MISMATCH,
            message: format!("{} attribute mismatch(es) found", summary.mismatches),
            hint: None,
        });
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
