//! Command-line interface wiring for the `cardstock` binary.
//!
//! This module owns the clap definitions and delegates execution to
//! specialized submodules that encapsulate each command family.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod catalog;
pub mod common;
pub mod deck;
pub mod owned;

/// Parsed CLI entrypoint for the `cardstock` binary.
#[derive(Parser, Debug)]
#[command(name = "cardstock", version, about = "Card catalog and deck file toolkit")]
pub struct Cli {
    /// Top-level command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// High-level command families made available to end users.
#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(subcommand)]
    Catalog(catalog::CatalogCommand),
    #[command(subcommand)]
    Deck(deck::DeckCommand),
    #[command(subcommand)]
    Owned(owned::OwnedCommand),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Catalog(cmd) => catalog::handle(cmd),
        Command::Deck(cmd) => deck::handle(cmd),
        Command::Owned(cmd) => owned::handle(cmd),
    }
}
