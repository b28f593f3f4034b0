//! Catalog payload decoding.
//!
//! The catalog answers with a JSON array of entries. Only `unicode[0]` matters
//! here; every other field is ignored.

use serde::Deserialize;
use thiserror::Error;

use seenit_types::{Glyph, GlyphError};

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    #[serde(default)]
    unicode: Vec<String>,
}

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("not a JSON array of catalog entries: {0}")]
    Json(#[from] serde_json::Error),
    #[error("entry {index} has no unicode reference")]
    MissingUnicode { index: usize },
    #[error("entry {index}: {source}")]
    BadCodepoint {
        index: usize,
        #[source]
        source: GlyphError,
    },
}

/// Decode a catalog payload into glyphs, in payload order.
pub fn parse_glyphs(body: &[u8]) -> Result<Vec<Glyph>, PayloadError> {
    let entries: Vec<CatalogEntry> = serde_json::from_slice(body)?;
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let raw = entry
                .unicode
                .first()
                .ok_or(PayloadError::MissingUnicode { index })?;
            Glyph::parse_unicode_ref(raw).map_err(|source| PayloadError::BadCodepoint { index, source })
        })
        .collect()
}
