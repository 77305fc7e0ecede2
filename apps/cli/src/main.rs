//! mdindex CLI: structural indexing and verification of Markdown documents.
//!
//! Extracts a hierarchical heading index to JSON and checks an existing
//! index against the current document.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let config = commands::resolve_config(&cli)?;
    commands::init_tracing(&cli, &config)?;
    commands::run(cli, config)
}
