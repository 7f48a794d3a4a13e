//! lakekit CLI — one-shot enrichment of the lake catalog.
//!
//! Derives URL-safe identifiers from lake names and merges placeholder
//! pricing, regulation and image metadata into every eligible record.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
