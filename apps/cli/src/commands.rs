//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::Result;
use lakekit_core::{RecordReporter, json_catalog, text_catalog};
use lakekit_shared::{
    AppConfig, CatalogRunConfig, RecordOutcome, RecordStatus, RunReport, init_config,
    load_config,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// lakekit — derive lake identifiers and merge placeholder metadata.
#[derive(Parser)]
#[command(
    name = "lakekit",
    version,
    about = "Derive lake identifiers and merge placeholder metadata into the catalog.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ./lakekit.toml, then ~/.lakekit/lakekit.toml).
    #[arg(long, global = true, env = "LAKEKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
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
    /// Merge placeholder pricing, regulations and images into the text catalog.
    Enrich(RunArgs),

    /// Add missing `id` fields to the JSON catalog.
    AssignIds(RunArgs),

    /// Print the identifier each name normalizes to.
    Slug {
        /// Lake names.
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options shared by both catalog pipelines.
#[derive(Args)]
pub(crate) struct RunArgs {
    /// Document to read (overrides the config file).
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Document to write (defaults to the input).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report what would change without writing.
    #[arg(long)]
    pub dry_run: bool,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a default lakekit.toml into the working directory.
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

    let filter = match cli.verbose {
        0 => "lakekit=info",
        1 => "lakekit=debug",
        _ => "lakekit=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Enrich(args) => cmd_enrich(&load_config(config_path)?, args),
        Command::AssignIds(args) => cmd_assign_ids(&load_config(config_path)?, args),
        Command::Slug { names } => cmd_slug(&names),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&load_config(config_path)?),
        },
    }
}

fn cmd_enrich(config: &AppConfig, args: RunArgs) -> Result<()> {
    let run_config = CatalogRunConfig::from(&config.text_catalog).with_overrides(
        args.input,
        args.output,
        args.dry_run,
    );

    info!(
        input = %run_config.input_path.display(),
        output = %run_config.output_path.display(),
        dry_run = run_config.dry_run,
        "enriching text catalog"
    );

    text_catalog::run(
        &run_config,
        &config.fields,
        &config.enrichment,
        &ConsoleReporter::new(&run_config),
    )?;
    Ok(())
}

fn cmd_assign_ids(config: &AppConfig, args: RunArgs) -> Result<()> {
    let run_config = CatalogRunConfig::from(&config.json_catalog).with_overrides(
        args.input,
        args.output,
        args.dry_run,
    );

    info!(
        input = %run_config.input_path.display(),
        output = %run_config.output_path.display(),
        dry_run = run_config.dry_run,
        "assigning identifiers"
    );

    json_catalog::run(
        &run_config,
        &config.fields,
        &ConsoleReporter::new(&run_config),
    )?;
    Ok(())
}

fn cmd_slug(names: &[String]) -> Result<()> {
    for name in names {
        println!("{name} -> {}", lakekit_core::normalize(name));
    }

    for collision in lakekit_core::find_collisions(names.iter().map(String::as_str)) {
        println!(
            "collision: {} <- {}",
            collision.identifier,
            collision.names.join(", ")
        );
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let cwd = std::env::current_dir()?;
    let path = init_config(&cwd)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Console reporter
// ---------------------------------------------------------------------------

/// Prints one status line per record and a closing summary.
struct ConsoleReporter {
    output: PathBuf,
    dry_run: bool,
}

impl ConsoleReporter {
    fn new(config: &CatalogRunConfig) -> Self {
        Self {
            output: config.output_path.clone(),
            dry_run: config.dry_run,
        }
    }
}

impl RecordReporter for ConsoleReporter {
    fn record(&self, outcome: &RecordOutcome) {
        let symbol = match outcome.status {
            RecordStatus::Updated => "✓",
            RecordStatus::SkippedAlreadyEnriched => "○",
            RecordStatus::SkippedIneligible(_) => "·",
        };
        let name = if outcome.name.is_empty() {
            "<unnamed>"
        } else {
            outcome.name.as_str()
        };
        match &outcome.identifier {
            Some(id) => println!("  {symbol} {name} → {id}  [{}]", outcome.status),
            None => println!("  {symbol} {name}  [{}]", outcome.status),
        }
    }

    fn done(&self, report: &RunReport) {
        println!();
        println!("  Records:          {}", report.outcomes.len());
        println!("  Updated:          {}", report.updated());
        println!("  Already enriched: {}", report.already_enriched());
        println!("  Ineligible:       {}", report.ineligible());
        for collision in &report.collisions {
            println!(
                "  Collision:        {} <- {}",
                collision.identifier,
                collision.names.join(", ")
            );
        }
        if report.written {
            println!("  Written:          {}", self.output.display());
        } else if self.dry_run {
            println!("  Dry run, nothing written.");
        }
        println!();
    }
}
