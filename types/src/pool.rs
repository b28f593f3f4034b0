use std::collections::HashSet;

use crate::Glyph;

/// The glyphs eligible to appear in one round.
///
/// Invariant: no glyph appears twice. Order is preserved from construction so
/// index-based draws are reproducible under a seeded RNG.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphPool {
    glyphs: Vec<Glyph>,
}

impl GlyphPool {
    /// Build a pool, keeping the first occurrence of every glyph.
    pub fn new(glyphs: impl IntoIterator<Item = Glyph>) -> Self {
        let mut seen = HashSet::new();
        let glyphs = glyphs.into_iter().filter(|g| seen.insert(*g)).collect();
        Self { glyphs }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    #[must_use]
    pub fn contains(&self, glyph: Glyph) -> bool {
        self.glyphs.contains(&glyph)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Glyph> {
        self.glyphs.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Glyph> + '_ {
        self.glyphs.iter().copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Glyph] {
        &self.glyphs
    }
}

impl FromIterator<Glyph> for GlyphPool {
    fn from_iter<T: IntoIterator<Item = Glyph>>(iter: T) -> Self {
        Self::new(iter)
    }
}
