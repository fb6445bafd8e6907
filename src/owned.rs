use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{error, warn};

use crate::catalog::Catalog;
use crate::spec::{Sign, parse_card_spec};

/// Accumulate an owned-cards file into the two quantity maps.
///
/// Each non-blank, non-`//` line is one card spec. The sign selects the
/// update: none sets `owned` absolutely, `+` adds, `-` subtracts with a
/// floor at zero, `$` sets `buyable` absolutely. The `!` marker is not
/// part of this format and rejects the line.
///
/// A missing file is a warning and a no-op. Per-line failures are logged
/// with file, line, and the offending text, and never abort the rest of
/// the file.
pub fn read_owned_cards(
    catalog: &Catalog,
    owned: &mut BTreeMap<u32, u32>,
    buyable: &mut BTreeMap<u32, u32>,
    path: &Path,
) {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(_) => {
            warn!("owned cards file '{}' does not exist", path.display());
            return;
        }
    };
    let reader = BufReader::new(file);
    let mut num_line = 0usize;
    for line in reader.lines() {
        num_line += 1;
        let raw = match line {
            Ok(raw) => raw,
            Err(err) => {
                error!(
                    "read fault in owned cards file {} at line {}: {}",
                    path.display(),
                    num_line,
                    err
                );
                return;
            }
        };
        let card_spec = raw.trim();
        if card_spec.is_empty() || card_spec.starts_with("//") {
            continue;
        }
        let spec = match parse_card_spec(catalog, card_spec) {
            Ok(spec) => spec,
            Err(err) => {
                error!(
                    "error in owned cards file {} at line {} while parsing card '{}': {}",
                    path.display(),
                    num_line,
                    card_spec,
                    err
                );
                continue;
            }
        };
        if spec.marked {
            error!(
                "error in owned cards file {} at line {} while parsing card '{}': marker '!' is not allowed here",
                path.display(),
                num_line,
                card_spec
            );
            continue;
        }
        match spec.sign {
            Sign::Assign => {
                owned.insert(spec.id, spec.count);
            }
            Sign::Add => {
                *owned.entry(spec.id).or_insert(0) += spec.count;
            }
            Sign::Subtract => {
                let quantity = owned.entry(spec.id).or_insert(0);
                *quantity = quantity.saturating_sub(spec.count);
            }
            Sign::Buyable => {
                buyable.insert(spec.id, spec.count);
            }
        }
    }
}
