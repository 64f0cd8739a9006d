//! Merging article lists: deduplication and shuffling.

use crate::models::ArticleRecord;
use itertools::Itertools;
use rand::Rng;
use rand::seq::SliceRandom;

/// Drop every article whose (title, link) key was already seen earlier in the list.
///
/// Single left-to-right pass; the first occurrence wins, so the result is
/// deterministic for a given input order.
pub fn deduplicate(articles: Vec<ArticleRecord>) -> Vec<ArticleRecord> {
    articles.into_iter().unique_by(ArticleRecord::dedup_key).collect()
}

/// Uniformly permute `articles` in place (Fisher-Yates).
pub fn shuffle<R: Rng + ?Sized>(articles: &mut [ArticleRecord], rng: &mut R) {
    articles.shuffle(rng);
}

/// Deduplicate a merged multi-language list and randomize its order.
pub fn prepare_mixed<R: Rng + ?Sized>(articles: Vec<ArticleRecord>, rng: &mut R) -> Vec<ArticleRecord> {
    let mut merged = deduplicate(articles);
    shuffle(&mut merged, rng);
    merged
}
