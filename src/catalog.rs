use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Set number marking a promoted ("prototype upgrade") card variant.
pub const PROMO_SET: u32 = 5002;

/// Characters stripped by [`simplify_name`] before lookup.
const NAME_DELIMITERS: &str = ";:, \"'-";

/// Canonical lookup key for a card name: delimiter characters removed,
/// everything else ASCII-lowercased.
pub fn simplify_name(name: &str) -> String {
    name.chars()
        .filter(|c| !NAME_DELIMITERS.contains(*c))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Category of a card, closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Commander,
    Assault,
    Structure,
    Action,
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardType::Commander => write!(f, "commander"),
            CardType::Assault => write!(f, "assault"),
            CardType::Structure => write!(f, "structure"),
            CardType::Action => write!(f, "action"),
        }
    }
}

/// Single card definition as ingested from a card file.
///
/// `proto_id` and `upgraded_id` are derived relations, filled in by
/// [`Catalog::organize`]; they are never read from the card file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: u32,
    pub name: String,
    /// `0` means not obtainable by players; [`PROMO_SET`] marks a promoted variant.
    #[serde(default)]
    pub set: u32,
    #[serde(rename = "type")]
    pub card_type: CardType,
    /// Secondary entry sharing a display name with another card.
    #[serde(default)]
    pub hidden: bool,
    /// Id of an older card this one supersedes under the same name.
    #[serde(default)]
    pub replace: Option<u32>,
    #[serde(skip)]
    pub proto_id: Option<u32>,
    #[serde(skip)]
    pub upgraded_id: Option<u32>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog has not been organized")]
    NotOrganized,
    #[error("no card with id {0} in the catalog")]
    UnknownId(u32),
    #[error("promo card '{name}' (id {id}) has no prototype in the catalog")]
    MissingPrototype { name: String, id: u32 },
}

/// Indices derived from the card collection, rebuilt from scratch by every
/// [`Catalog::organize`] call. Entries are positions into the catalog's
/// card vector, never owning copies.
#[derive(Debug, Default, Clone)]
struct CatalogIndex {
    by_id: HashMap<u32, usize>,
    by_name: HashMap<(String, bool), usize>,
    player: Vec<usize>,
    commanders: Vec<usize>,
    assaults: Vec<usize>,
    structures: Vec<usize>,
    actions: Vec<usize>,
}

/// Owns every card definition plus the derived lookup indices.
///
/// A freshly built catalog is unorganized: lookups fail with
/// [`CatalogError::NotOrganized`] until [`Catalog::organize`] has run.
/// Adding a card invalidates the indices again.
#[derive(Debug, Default)]
pub struct Catalog {
    cards: Vec<Card>,
    index: Option<CatalogIndex>,
}

impl Catalog {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards, index: None }
    }

    /// Read a card file (JSON array of card records) into an unorganized catalog.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read card file {}", path.display()))?;
        let cards: Vec<Card> = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse card file {}", path.display()))?;
        Ok(Self::new(cards))
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Append a card, invalidating the indices until the next `organize`.
    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
        self.index = None;
    }

    /// Rebuild every index from the current card collection.
    ///
    /// First pass, in collection order: normalize display names (strip
    /// `;:,`, suffix `*` on promo cards), register the id index, and for
    /// player-obtainable cards fill the category buckets and the canonical
    /// `(name, hidden)` index. An occupied name slot is only overwritten
    /// when the occupant's id equals the new card's `replace` field.
    ///
    /// Second pass links each promo card to its prototype by the
    /// un-suffixed canonical name; a missing prototype aborts the rebuild.
    /// The linking runs after the first pass so every base name is final
    /// and indexed regardless of collection order.
    pub fn organize(&mut self) -> Result<(), CatalogError> {
        let mut index = CatalogIndex::default();

        for card in &mut self.cards {
            card.name.retain(|c| !matches!(c, ';' | ':' | ','));
            if card.set == PROMO_SET && !card.name.ends_with('*') {
                card.name.push('*');
            }
            card.proto_id = None;
            card.upgraded_id = None;
        }

        for (pos, card) in self.cards.iter().enumerate() {
            // Duplicate ids are a data-quality issue; last write wins.
            index.by_id.insert(card.id, pos);
            if card.set == 0 {
                continue;
            }
            index.player.push(pos);
            match card.card_type {
                CardType::Commander => index.commanders.push(pos),
                CardType::Assault => index.assaults.push(pos),
                CardType::Structure => index.structures.push(pos),
                CardType::Action => index.actions.push(pos),
            }
            let key = (simplify_name(&card.name), card.hidden);
            let insert = match index.by_name.get(&key) {
                None => true,
                // Overwrite only under explicit supersession.
                Some(&occupant) => card.replace == Some(self.cards[occupant].id),
            };
            if insert {
                index.by_name.insert(key, pos);
            }
        }

        let mut links = Vec::new();
        for (pos, card) in self.cards.iter().enumerate() {
            if card.set != PROMO_SET {
                continue;
            }
            let mut proto_name = simplify_name(&card.name);
            proto_name.pop();
            match index.by_name.get(&(proto_name, card.hidden)) {
                Some(&base) => links.push((pos, base)),
                None => {
                    return Err(CatalogError::MissingPrototype {
                        name: card.name.clone(),
                        id: card.id,
                    });
                }
            }
        }
        for (promo, base) in links {
            let base_id = self.cards[base].id;
            let promo_id = self.cards[promo].id;
            self.cards[promo].proto_id = Some(base_id);
            self.cards[base].upgraded_id = Some(promo_id);
        }

        self.index = Some(index);
        Ok(())
    }

    fn index(&self) -> Result<&CatalogIndex, CatalogError> {
        self.index.as_ref().ok_or(CatalogError::NotOrganized)
    }

    /// Look up a card by id.
    pub fn by_id(&self, id: u32) -> Result<&Card, CatalogError> {
        let index = self.index()?;
        index
            .by_id
            .get(&id)
            .map(|&pos| &self.cards[pos])
            .ok_or(CatalogError::UnknownId(id))
    }

    /// Look up a player-obtainable card by canonical name and hidden flag.
    pub fn by_name(&self, key: &str, hidden: bool) -> Result<Option<&Card>, CatalogError> {
        let index = self.index()?;
        Ok(index
            .by_name
            .get(&(key.to_string(), hidden))
            .map(|&pos| &self.cards[pos]))
    }

    /// All player-obtainable cards, in collection order.
    pub fn player_cards(&self) -> Result<impl Iterator<Item = &Card>, CatalogError> {
        let index = self.index()?;
        Ok(index.player.iter().map(move |&pos| &self.cards[pos]))
    }

    /// Player-obtainable cards of one category, in collection order.
    pub fn bucket(&self, card_type: CardType) -> Result<impl Iterator<Item = &Card>, CatalogError> {
        let index = self.index()?;
        let positions = match card_type {
            CardType::Commander => &index.commanders,
            CardType::Assault => &index.assaults,
            CardType::Structure => &index.structures,
            CardType::Action => &index.actions,
        };
        Ok(positions.iter().map(move |&pos| &self.cards[pos]))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    pub(crate) fn card(id: u32, name: &str, set: u32, card_type: CardType) -> Card {
        Card {
            id,
            name: name.to_string(),
            set,
            card_type,
            hidden: false,
            replace: None,
            proto_id: None,
            upgraded_id: None,
        }
    }

    pub(crate) fn sample_catalog() -> Catalog {
        Catalog::new(vec![
            card(1, "Fire Drake", 1, CardType::Assault),
            card(2, "Ambush", 1, CardType::Action),
            card(3, "Steel Wall", 1, CardType::Structure),
            card(4, "Iron Commander", 1, CardType::Commander),
            card(5, "Fire Drake", PROMO_SET, CardType::Assault),
            card(6, "Archive Relic", 0, CardType::Structure),
        ])
    }

    #[test]
    fn simplify_drops_delimiters_and_lowercases() {
        assert_eq!(simplify_name("Steel-Style, Inc"), "steelstyleinc");
        assert_eq!(simplify_name("steel style inc"), "steelstyleinc");
        assert_eq!(simplify_name("\"Quo'ted\""), "quoted");
    }

    #[test]
    fn simplify_is_idempotent() {
        let once = simplify_name("Fire-Drake: Reborn");
        assert_eq!(simplify_name(&once), once);
    }

    #[test]
    fn unorganized_lookups_fail() {
        let catalog = sample_catalog();
        assert!(matches!(catalog.by_id(1), Err(CatalogError::NotOrganized)));
        assert!(matches!(
            catalog.by_name("firedrake", false),
            Err(CatalogError::NotOrganized)
        ));
    }

    #[test]
    fn organize_builds_id_and_name_indices() {
        let mut catalog = sample_catalog();
        catalog.organize().unwrap();
        assert_eq!(catalog.by_id(2).unwrap().name, "Ambush");
        assert!(matches!(catalog.by_id(99), Err(CatalogError::UnknownId(99))));
        assert_eq!(catalog.by_name("firedrake", false).unwrap().unwrap().id, 1);
        assert_eq!(catalog.by_name("missing", false).unwrap(), None);
    }

    #[test]
    fn organize_strips_name_delimiters() {
        let mut catalog = Catalog::new(vec![card(1, "Steel; Wall:,", 1, CardType::Structure)]);
        catalog.organize().unwrap();
        assert_eq!(catalog.by_id(1).unwrap().name, "Steel Wall");
    }

    #[test]
    fn promo_cards_get_suffix_and_links() {
        let mut catalog = sample_catalog();
        catalog.organize().unwrap();
        let promo = catalog.by_id(5).unwrap();
        assert_eq!(promo.name, "Fire Drake*");
        assert_eq!(promo.proto_id, Some(1));
        let base = catalog.by_id(1).unwrap();
        assert_eq!(base.upgraded_id, Some(5));
        assert_eq!(catalog.by_name("firedrake*", false).unwrap().unwrap().id, 5);
    }

    #[test]
    fn missing_prototype_is_fatal() {
        let mut catalog = Catalog::new(vec![card(9, "Orphan", PROMO_SET, CardType::Assault)]);
        let err = catalog.organize().unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MissingPrototype { id: 9, ref name } if name == "Orphan*"
        ));
    }

    #[test]
    fn buckets_partition_player_cards() {
        let mut catalog = sample_catalog();
        catalog.organize().unwrap();
        let player: Vec<u32> = catalog.player_cards().unwrap().map(|c| c.id).collect();
        let mut bucketed: Vec<u32> = Vec::new();
        for ty in [
            CardType::Commander,
            CardType::Assault,
            CardType::Structure,
            CardType::Action,
        ] {
            bucketed.extend(catalog.bucket(ty).unwrap().map(|c| c.id));
        }
        assert_eq!(bucketed.len(), player.len());
        bucketed.sort_unstable();
        let mut sorted_player = player.clone();
        sorted_player.sort_unstable();
        assert_eq!(bucketed, sorted_player);
        // Set-0 cards stay out of the player list entirely.
        assert!(!player.contains(&6));
    }

    #[test]
    fn organize_twice_yields_identical_state() {
        let mut first = sample_catalog();
        first.organize().unwrap();
        let mut second = sample_catalog();
        second.organize().unwrap();
        second.organize().unwrap();
        assert_eq!(first.cards(), second.cards());
        assert_eq!(
            second.by_name("firedrake*", false).unwrap().unwrap().id,
            5
        );
    }

    #[test]
    fn name_conflict_first_write_wins_without_replace() {
        let mut catalog = Catalog::new(vec![
            card(1, "Twin", 1, CardType::Assault),
            card(2, "Twin", 1, CardType::Assault),
        ]);
        catalog.organize().unwrap();
        assert_eq!(catalog.by_name("twin", false).unwrap().unwrap().id, 1);
    }

    #[test]
    fn name_conflict_replace_overrides_occupant() {
        let mut newer = card(2, "Twin", 1, CardType::Assault);
        newer.replace = Some(1);
        let mut catalog = Catalog::new(vec![card(1, "Twin", 1, CardType::Assault), newer]);
        catalog.organize().unwrap();
        assert_eq!(catalog.by_name("twin", false).unwrap().unwrap().id, 2);
    }

    #[test]
    fn hidden_cards_index_separately() {
        let mut alt = card(2, "Twin", 1, CardType::Assault);
        alt.hidden = true;
        let mut catalog = Catalog::new(vec![card(1, "Twin", 1, CardType::Assault), alt]);
        catalog.organize().unwrap();
        assert_eq!(catalog.by_name("twin", false).unwrap().unwrap().id, 1);
        assert_eq!(catalog.by_name("twin", true).unwrap().unwrap().id, 2);
    }

    #[test]
    fn add_card_invalidates_indices() {
        let mut catalog = sample_catalog();
        catalog.organize().unwrap();
        catalog.add_card(card(7, "Late Arrival", 1, CardType::Action));
        assert!(matches!(catalog.by_id(1), Err(CatalogError::NotOrganized)));
        catalog.organize().unwrap();
        assert_eq!(catalog.by_id(7).unwrap().name, "Late Arrival");
    }

    #[test]
    fn load_reads_json_card_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": 10, "name": "Parsed Card", "set": 1, "type": "assault"}}]"#
        )
        .unwrap();
        let mut catalog = Catalog::load(file.path()).unwrap();
        catalog.organize().unwrap();
        let card = catalog.by_id(10).unwrap();
        assert_eq!(card.name, "Parsed Card");
        assert_eq!(card.card_type, CardType::Assault);
        assert!(!card.hidden);
        assert_eq!(card.replace, None);
    }
}
