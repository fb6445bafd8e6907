use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, warn};

use crate::catalog::Catalog;
use crate::scan::{ScanError, advance_until, read_token};
use crate::spec::{SpecError, parse_card_spec};

/// Parse a deck-list string of the form `name[:weight];name[:weight];...`.
///
/// Weights default to 1.0; items split on the first `:` only, so any text
/// after a second colon makes the weight malformed. Order and duplicates
/// are preserved, empty items skipped.
pub fn parse_deck_list(list: &str) -> Result<Vec<(String, f64)>, ScanError> {
    let mut entries = Vec::new();
    for item in list.split(';') {
        if item.is_empty() {
            continue;
        }
        match item.split_once(':') {
            Some((name, raw_weight)) => {
                let weight: f64 = raw_weight
                    .parse()
                    .map_err(|_| ScanError::Malformed(raw_weight.to_string()))?;
                entries.push((name.to_string(), weight));
            }
            None => entries.push((item.to_string(), 1.0)),
        }
    }
    Ok(entries)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckKind {
    Custom,
}

impl fmt::Display for DeckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckKind::Custom => write!(f, "Custom Deck"),
        }
    }
}

/// One card reference inside a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckEntry {
    pub id: u32,
    pub count: u32,
    pub marked: bool,
}

/// A named deck read from a custom deck file.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    pub kind: DeckKind,
    pub id: u32,
    /// Source line the deck was defined on.
    pub line: usize,
    pub name: String,
    pub entries: Vec<DeckEntry>,
}

impl Deck {
    pub fn short_description(&self) -> String {
        format!("{} #{}: {}", self.kind, self.id, self.name)
    }

    fn set(&mut self, catalog: &Catalog, list: &str) -> Result<(), SpecError> {
        for token in list.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let spec = parse_card_spec(catalog, token)?;
            self.entries.push(DeckEntry {
                id: spec.id,
                count: spec.count,
                marked: spec.marked,
            });
        }
        Ok(())
    }
}

/// Registry of decks keyed by name and by the `"<kind> #<id>"` alias.
/// Later registrations silently override earlier keys.
#[derive(Debug, Default)]
pub struct Decks {
    decks: Vec<Deck>,
    by_name: HashMap<String, usize>,
    next_id: u32,
}

impl Decks {
    pub fn decks(&self) -> &[Deck] {
        &self.decks
    }

    pub fn by_name(&self, name: &str) -> Option<&Deck> {
        self.by_name.get(name).map(|&pos| &self.decks[pos])
    }

    /// Parse a card list into a new custom deck and register it under both
    /// its name and its sequential alias.
    pub fn add_custom(
        &mut self,
        catalog: &Catalog,
        name: &str,
        line: usize,
        list: &str,
    ) -> Result<&Deck, SpecError> {
        self.next_id += 1;
        let mut deck = Deck {
            kind: DeckKind::Custom,
            id: self.next_id,
            line,
            name: name.to_string(),
            entries: Vec::new(),
        };
        deck.set(catalog, list)?;
        let alias = format!("{} #{}", deck.kind, deck.id);
        let pos = self.decks.len();
        self.decks.push(deck);
        self.by_name.insert(name.to_string(), pos);
        self.by_name.insert(alias, pos);
        Ok(&self.decks[pos])
    }
}

#[derive(Debug, Error)]
pub enum DeckFileError {
    #[error("custom deck file {path} could not be opened: {source}")]
    Unreadable { path: PathBuf, source: io::Error },
    #[error("read fault in custom deck file {path} at line {line}: {source}")]
    Read {
        path: PathBuf,
        line: usize,
        source: io::Error,
    },
    #[error("error while parsing custom deck file {path} at line {line}: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        source: SpecError,
    },
}

impl DeckFileError {
    /// Status code of the read: 2 for an unreadable file, 3 for any fault
    /// encountered mid-file.
    pub fn exit_code(&self) -> i32 {
        match self {
            DeckFileError::Unreadable { .. } => 2,
            DeckFileError::Read { .. } | DeckFileError::Parse { .. } => 3,
        }
    }
}

/// Read a custom deck file into the registry, one deck per line.
///
/// Blank lines and `//` comments are skipped. A line whose deck name
/// cannot be read is diagnosed and skipped; a card-spec failure or a
/// stream fault aborts the whole file with line context. Name conflicts
/// override the earlier deck with a warning.
pub fn read_custom_decks(
    decks: &mut Decks,
    catalog: &Catalog,
    path: &Path,
) -> Result<(), DeckFileError> {
    let file = File::open(path).map_err(|source| DeckFileError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let mut num_line = 0usize;
    for line in reader.lines() {
        num_line += 1;
        let raw = line.map_err(|source| DeckFileError::Read {
            path: path.to_path_buf(),
            line: num_line,
            source,
        })?;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }
        let chars: Vec<char> = trimmed.chars().collect();
        let mut deck_name = String::new();
        let pos = read_token(&chars, 0, |c| matches!(c, ':' | ','), &mut deck_name).map_err(
            |source| DeckFileError::Parse {
                path: path.to_path_buf(),
                line: num_line,
                source: source.into(),
            },
        )?;
        if pos >= chars.len() || deck_name.is_empty() {
            error!(
                "error in custom deck file {} at line {}, could not read the deck name",
                path.display(),
                num_line
            );
            continue;
        }
        let list_start = advance_until(&chars, pos + 1, |c| c != ' ');
        if let Some(existing) = decks.by_name(&deck_name) {
            warn!(
                "name conflict in custom deck file {} at line {}, overrides {}",
                path.display(),
                num_line,
                existing.short_description()
            );
        }
        let list: String = chars[list_start..].iter().collect();
        decks
            .add_custom(catalog, &deck_name, num_line, &list)
            .map_err(|source| DeckFileError::Parse {
                path: path.to_path_buf(),
                line: num_line,
                source,
            })?;
    }
    Ok(())
}
