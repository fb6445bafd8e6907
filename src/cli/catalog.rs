use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use cardstock::{CardType, parse_card_spec};

use crate::cli::common::load_catalog;

/// Inspect an organized card catalog.
#[derive(Subcommand, Debug)]
pub enum CatalogCommand {
    /// Print catalog summary statistics per category.
    Stats {
        /// Card file (JSON array of card records).
        #[arg(long)]
        cards: PathBuf,
    },
    /// Resolve a card spec against the catalog and print the result.
    Find {
        /// Card file (JSON array of card records).
        #[arg(long)]
        cards: PathBuf,
        /// Card spec, e.g. "Fire Drake#+3".
        spec: String,
    },
}

pub fn handle(cmd: CatalogCommand) -> Result<()> {
    match cmd {
        CatalogCommand::Stats { cards } => {
            let catalog = load_catalog(&cards)?;
            println!("cards:      {}", catalog.cards().len());
            println!("player:     {}", catalog.player_cards()?.count());
            for ty in [
                CardType::Commander,
                CardType::Assault,
                CardType::Structure,
                CardType::Action,
            ] {
                println!("{:<11} {}", format!("{ty}:"), catalog.bucket(ty)?.count());
            }
            Ok(())
        }
        CatalogCommand::Find { cards, spec } => {
            let catalog = load_catalog(&cards)?;
            let parsed = parse_card_spec(&catalog, &spec)?;
            let card = catalog.by_id(parsed.id)?;
            print!("{} [id {}] {}{}", card.name, card.id, parsed.sign, parsed.count);
            if parsed.marked {
                print!(" (marked)");
            }
            if let Some(upgraded) = card.upgraded_id {
                print!(" (upgrades to id {upgraded})");
            }
            if let Some(proto) = card.proto_id {
                print!(" (prototype id {proto})");
            }
            println!();
            Ok(())
        }
    }
}
