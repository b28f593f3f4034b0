//! Candidate list to glyph pool reduction.
//!
//! Rejection sampling: draw uniformly from the full candidate list and keep
//! only first sightings until the pool is full. Expected cost grows as the
//! pool approaches the number of distinct candidates, which is fine for pools
//! of a few hundred glyphs. A shuffle-and-take would be the replacement if
//! pools ever get large.

use std::collections::HashSet;

use rand::Rng;

use seenit_types::{Glyph, GlyphPool};

/// Reduce `candidates` to `min(count, distinct candidates)` unique glyphs.
///
/// Clamping to the distinct count (not the raw length) keeps the loop finite
/// when the catalog lists the same codepoint more than once.
pub fn draw_pool<R>(candidates: &[Glyph], count: usize, rng: &mut R) -> GlyphPool
where
    R: Rng + ?Sized,
{
    let distinct = candidates.iter().collect::<HashSet<_>>().len();
    let target = count.min(distinct);

    let mut picked = HashSet::with_capacity(target);
    let mut order = Vec::with_capacity(target);
    let mut draws = 0usize;
    while order.len() < target {
        let glyph = candidates[rng.random_range(0..candidates.len())];
        draws += 1;
        if picked.insert(glyph) {
            order.push(glyph);
        }
    }

    tracing::debug!(target, draws, "Sampled glyph pool");
    GlyphPool::new(order)
}
