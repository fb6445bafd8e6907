//! Core library for card catalog indexing and the deck/inventory text formats.

mod catalog;
mod decks;
mod owned;
mod scan;
mod spec;

pub use catalog::{Card, CardType, Catalog, CatalogError, PROMO_SET, simplify_name};
pub use decks::{
    Deck, DeckEntry, DeckFileError, DeckKind, Decks, parse_deck_list, read_custom_decks,
};
pub use owned::read_owned_cards;
pub use scan::{ScanError, advance_until, read_token, recede_until};
pub use spec::{CardSpec, Sign, SpecError, parse_card_spec};
