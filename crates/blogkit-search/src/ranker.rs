//! Cosine similarity and top-K ranking.

use std::cmp::Ordering;

use serde::Serialize;

pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn magnitude(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// `dot(a,b) / (|a|·|b|)`; NaN when either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    dot(a, b) / (magnitude(a) * magnitude(b))
}

/// A corpus position and its similarity to the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ranked {
    pub index: usize,
    pub score: f32,
}

/// Descending by score, NaN last.
fn by_score_desc(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Score every document against `query` and keep the best `k`.
///
/// The sort is stable, so equal scores keep corpus order.
pub fn rank(query: &[f32], docs: &[Vec<f32>], k: usize) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = docs
        .iter()
        .enumerate()
        .map(|(index, doc)| Ranked { index, score: cosine_similarity(query, doc) })
        .collect();
    ranked.sort_by(|a, b| by_score_desc(a.score, b.score));
    ranked.truncate(k);
    ranked
}
