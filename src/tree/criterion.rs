//! Defines the impurity measures used to grow a tree.
use serde::{Serialize, Deserialize};

use std::fmt;


/// Splitting criteria for growing decision tree.
/// A split is scored by how much it decreases the impurity
/// of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Criterion {
    /// Gini index. Takes value in `[0, 1]`.
    #[default]
    Gini,
    /// Entropy with the natural logarithm.
    /// Takes value in `[0, ln K]` for `K` labels.
    Entropy,
}


impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Gini => "Gini index",
            Self::Entropy => "Entropy",
        };

        write!(f, "{name}")
    }
}


impl Criterion {
    /// Returns the impurity of a node whose label counts are `counts`.
    /// A node without examples is pure.
    #[inline]
    pub fn impurity(&self, counts: &[usize]) -> f64 {
        let total = counts.iter().sum::<usize>();
        if total == 0 { return 0f64; }

        let total = total as f64;
        match self {
            Self::Gini => gini_impurity(counts, total),
            Self::Entropy => entropic_impurity(counts, total),
        }
    }
}


/// Returns the gini-impurity of the given counts.
#[inline(always)]
fn gini_impurity(counts: &[usize], total: f64) -> f64 {
    let correct = counts.iter()
        .map(|&c| (c as f64 / total).powi(2))
        .sum::<f64>();

    (1f64 - correct).max(0f64)
}


/// Returns the entropic-impurity of the given counts.
#[inline(always)]
fn entropic_impurity(counts: &[usize], total: f64) -> f64 {
    counts.iter()
        .map(|&c| {
            let r = c as f64 / total;
            if r <= 0f64 { 0f64 } else { -r * r.ln() }
        })
        .sum::<f64>()
        .max(0f64)
}
