use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use cardstock::read_owned_cards;

use crate::cli::common::load_catalog;

/// Inspect owned-card inventory files.
#[derive(Subcommand, Debug)]
pub enum OwnedCommand {
    /// Accumulate an owned cards file and print the resulting quantities.
    Show {
        /// Card file (JSON array of card records).
        #[arg(long)]
        cards: PathBuf,
        /// Owned cards file, one card spec per line.
        #[arg(long)]
        owned: PathBuf,
    },
}

pub fn handle(cmd: OwnedCommand) -> Result<()> {
    match cmd {
        OwnedCommand::Show { cards, owned } => {
            let catalog = load_catalog(&cards)?;
            let mut owned_cards = BTreeMap::new();
            let mut buyable_cards = BTreeMap::new();
            read_owned_cards(&catalog, &mut owned_cards, &mut buyable_cards, &owned);
            for (id, count) in &owned_cards {
                let card = catalog.by_id(*id)?;
                println!("{} x{} [id {}]", card.name, count, id);
            }
            for (id, count) in &buyable_cards {
                let card = catalog.by_id(*id)?;
                println!("{} x{} [id {}] (buyable)", card.name, count, id);
            }
            Ok(())
        }
    }
}
