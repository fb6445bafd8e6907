use std::fmt;

use thiserror::Error;

use crate::catalog::{Catalog, CatalogError, simplify_name};
use crate::scan::{ScanError, advance_until, read_token};

/// Quantity modifier attached to a card spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sign {
    /// No sign: the count is an absolute value.
    #[default]
    Assign,
    /// `+`: add to the current quantity.
    Add,
    /// `-`: subtract, never below zero.
    Subtract,
    /// `$`: set the buyable quantity instead.
    Buyable,
}

impl Sign {
    fn from_modifier(c: char) -> Option<Self> {
        match c {
            '+' => Some(Sign::Add),
            '-' => Some(Sign::Subtract),
            '$' => Some(Sign::Buyable),
            _ => None,
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Assign => write!(f, "="),
            Sign::Add => write!(f, "+"),
            Sign::Subtract => write!(f, "-"),
            Sign::Buyable => write!(f, "$"),
        }
    }
}

/// Parsed card reference: resolved id plus quantity modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardSpec {
    pub id: u32,
    pub count: u32,
    pub sign: Sign,
    /// Leading `!` marker.
    pub marked: bool,
}

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("no card name")]
    NoCardName,
    #[error("unknown card: {0}")]
    UnknownCard(String),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Parse a single card reference like `Fire Drake#+3` or `!Ambush(-2`.
///
/// Grammar: `marker? name (('#' | '(') sign? digits)?` where the name runs
/// to the first `#`, `(`, or carriage return. The name is resolved through
/// the catalog's canonical index, non-hidden entries first; when that
/// misses, a `[id]` bracket inside the canonical name is taken as a
/// literal card id.
pub fn parse_card_spec(catalog: &Catalog, spec: &str) -> Result<CardSpec, SpecError> {
    let chars: Vec<char> = spec.chars().collect();
    let mut name = String::new();
    let mut pos = read_token(&chars, 0, |c| matches!(c, '#' | '(' | '\r'), &mut name)?;
    let marked = name.starts_with('!');
    if marked {
        name.remove(0);
    }
    if name.is_empty() {
        return Err(SpecError::NoCardName);
    }

    let simple = simplify_name(&name);
    let mut card_id: u32 = 0;
    let resolved = catalog
        .by_name(&simple, false)?
        .or(catalog.by_name(&simple, true)?);
    if let Some(card) = resolved {
        card_id = card.id;
    } else {
        let key: Vec<char> = simple.chars().collect();
        let open = advance_until(&key, 0, |c| c == '[');
        if open < key.len() {
            read_token(&key, open + 1, |c| c == ']', &mut card_id)?;
        }
    }

    let mut count: u32 = 1;
    let mut sign = Sign::default();
    if pos < chars.len() && matches!(chars[pos], '#' | '(') {
        pos += 1;
        if pos < chars.len() {
            if let Some(parsed) = Sign::from_modifier(chars[pos]) {
                sign = parsed;
                pos += 1;
            }
        }
        read_token(&chars, pos, |c| !c.is_ascii_digit(), &mut count)?;
    }

    if card_id == 0 {
        return Err(SpecError::UnknownCard(name));
    }
    Ok(CardSpec {
        id: card_id,
        count,
        sign,
        marked,
    })
}
