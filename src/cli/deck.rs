use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Subcommand;
use tracing::error;

use cardstock::{Decks, read_custom_decks};

use crate::cli::common::load_catalog;

/// Read and inspect custom deck files.
#[derive(Subcommand, Debug)]
pub enum DeckCommand {
    /// Read a custom deck file and list the decks it defines.
    Load {
        /// Card file (JSON array of card records).
        #[arg(long)]
        cards: PathBuf,
        /// Custom deck file, one deck per line.
        #[arg(long)]
        decks: PathBuf,
    },
}

pub fn handle(cmd: DeckCommand) -> Result<()> {
    match cmd {
        DeckCommand::Load { cards, decks } => {
            let catalog = load_catalog(&cards)?;
            let mut registry = Decks::default();
            if let Err(err) = read_custom_decks(&mut registry, &catalog, &decks) {
                error!("{err}");
                process::exit(err.exit_code());
            }
            for deck in registry.decks() {
                let total: u32 = deck.entries.iter().map(|e| e.count).sum();
                println!(
                    "{} (line {}, {} cards)",
                    deck.short_description(),
                    deck.line,
                    total
                );
            }
            Ok(())
        }
    }
}
