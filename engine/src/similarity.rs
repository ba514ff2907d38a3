use crate::vectorizer::{CountVector, VectorMatrix};
use std::cmp::Ordering;

/// Cosine similarity of two count vectors. Zero when either is all-zero.
pub fn cosine(a: &CountVector, b: &CountVector) -> f32 {
    if a.is_zero() || b.is_zero() {
        return 0.0;
    }
    let (xs, ys) = (a.entries(), b.entries());
    let (mut i, mut j) = (0usize, 0usize);
    let mut dot = 0f64;
    while i < xs.len() && j < ys.len() {
        match xs[i].0.cmp(&ys[j].0) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                dot += xs[i].1 as f64 * ys[j].1 as f64;
                i += 1;
                j += 1;
            }
        }
    }
    (dot / (a.norm() * b.norm())).clamp(-1.0, 1.0) as f32
}

/// One score per matrix row, same order as the matrix.
pub fn scores(query: &CountVector, matrix: &VectorMatrix) -> Vec<f32> {
    matrix.iter().map(|row| cosine(query, row)).collect()
}
