//! Convenience helpers shared across command handlers.

use std::path::Path;

use anyhow::{Context, Result};
use cardstock::Catalog;

/// Load a card file and organize it, attaching path context to any error.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let mut catalog = Catalog::load(path)?;
    catalog
        .organize()
        .with_context(|| format!("failed to organize catalog from {}", path.display()))?;
    Ok(catalog)
}
