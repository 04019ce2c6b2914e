//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};
use url::Url;

use sapscout_core::batch::{self, BatchProgress};
use sapscout_core::pipeline;
use sapscout_gemini::GeminiClient;
use sapscout_shared::{
    AppConfig, ErrorResult, RunConfig, TableResult, init_config, load_config, resolve_api_key,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// SapScout — SAP table definitions as annotated JSON.
#[derive(Parser)]
#[command(
    name = "sapscout",
    version,
    about = "Scrape SAP table definitions into JSON documents with generated analysis.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Scrape one table by URL, or every table listed in a CSV file.
    Scrape {
        /// Explicit table page URL (skips batch mode).
        #[arg(long)]
        url: Option<String>,

        /// CSV file with a `table_name` column.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Output path for single-URL mode.
        #[arg(long, env = "SAPSCOUT_OUTPUT")]
        out: Option<PathBuf>,

        /// Output directory for batch mode.
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = format!(
        "sapscout={level},sapscout_shared={level},sapscout_extract={level},\
         sapscout_gemini={level},sapscout_core={level}"
    );

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Scrape {
            url,
            csv,
            out,
            out_dir,
        } => cmd_scrape(url.as_deref(), csv, out, out_dir).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// scrape
// ---------------------------------------------------------------------------

async fn cmd_scrape(
    url: Option<&str>,
    csv: Option<PathBuf>,
    out: Option<PathBuf>,
    out_dir: Option<PathBuf>,
) -> Result<()> {
    // Resolve config and credentials before doing anything.
    let config = load_config()?;
    let api_key = resolve_api_key(&config)?;

    let mut run_config = RunConfig::from(&config);
    if let Some(out) = out {
        run_config.single_output = out;
    }
    if let Some(out_dir) = out_dir {
        run_config.output_dir = out_dir;
    }

    let client = pipeline::build_client()?;
    let generator = GeminiClient::new(api_key, run_config.model.clone())?;

    let output = match url {
        Some(url) => {
            // Single-table mode: the URL replaces the whole batch.
            Url::parse(url).map_err(|e| eyre!("invalid URL '{url}': {e}"))?;
            info!(url, "processing single table URL");

            let result =
                pipeline::process_url(&client, &generator, url, &run_config.single_output).await;

            match &result {
                TableResult::Table(def) => {
                    info!(table = %def.name, "table processed successfully")
                }
                TableResult::Error(err) => error!(error = %err.error, "table processing failed"),
            }
            serde_json::to_string_pretty(&result)?
        }
        None => {
            let csv_path = csv.unwrap_or_else(|| PathBuf::from(&config.defaults.csv_path));
            info!(csv = %csv_path.display(), "processing tables from CSV");

            let progress = CliProgress::new();
            match batch::process_batch(&client, &generator, &run_config, &csv_path, &progress)
                .await
            {
                Ok(results) => {
                    info!(tables = results.len(), "batch completed");
                    serde_json::to_string_pretty(&results)?
                }
                Err(e) => {
                    // Batch-source problems surface as a top-level error
                    // document, not a process failure.
                    error!(error = %e, "batch aborted");
                    serde_json::to_string_pretty(&ErrorResult {
                        error: e.to_string(),
                    })?
                }
            }
        }
    };

    println!();
    println!("{output}");

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// Batch progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl BatchProgress for CliProgress {
    fn table_started(&self, name: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Processing [{current}/{total}] {name}"));
    }

    fn done(&self, _results: &[TableResult]) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
