//! Searches the best split of a node.
//!
//! Numeric features are cut at the midpoints between
//! consecutive distinct values.
//! Categorical features are split one level against the rest.
//! The candidate with the largest impurity decrease wins;
//! ties go to the first feature, then to the first candidate
//! in sorted threshold (or declared level) order.
use rayon::prelude::*;

use crate::sample::{Dataset, Value};
use super::criterion::Criterion;
use super::distribution::ClassDistribution;
use super::params::TreeParams;
use super::split_rule::{LeftRight, Splitter};


/// The best split of a node, alive only while the node grows.
pub(crate) struct SplitCandidate {
    pub(crate) rule: Splitter,
    pub(crate) reduction: f64,
    pub(crate) left: Vec<usize>,
    pub(crate) right: Vec<usize>,
}


/// Returns the best split of the examples at `indices`
/// over `features`.
/// Returns `None` if the node is pure or
/// no candidate leaves `params.min_n` examples on both sides.
pub(crate) fn find_best_split(
    dataset:  &Dataset,
    indices:  &[usize],
    features: &[usize],
    params:   &TreeParams,
) -> Option<SplitCandidate>
{
    let parent = ClassDistribution::from_indices(dataset, indices);
    let parent_impurity = params.criterion.impurity(parent.counts());
    if parent_impurity <= 0f64 { return None; }

    let scan = NodeScan {
        dataset,
        indices,
        parent: parent.counts(),
        parent_impurity,
        criterion: params.criterion,
        min_n: params.min_n,
        min_decrease: params.min_impurity_decrease,
    };

    // The per-feature searches are independent.
    // Collecting keeps the feature order for the tie-break.
    let bests = features.par_iter()
        .map(|&feature| scan.best_for(feature))
        .collect::<Vec<_>>();

    let (rule, reduction) = bests.into_iter()
        .flatten()
        .fold(None, |best: Option<(Splitter, f64)>, candidate| {
            match best {
                Some((_, r)) if candidate.1 <= r => best,
                _ => Some(candidate),
            }
        })?;

    let (left, right): (Vec<usize>, Vec<usize>) = indices.iter()
        .copied()
        .partition(|&i| {
            rule.split(dataset[i].values()) == LeftRight::Left
        });

    Some(SplitCandidate { rule, reduction, left, right, })
}


struct NodeScan<'a> {
    dataset: &'a Dataset,
    indices: &'a [usize],
    parent: &'a [usize],
    parent_impurity: f64,
    criterion: Criterion,
    min_n: usize,
    min_decrease: f64,
}


impl NodeScan<'_> {
    fn best_for(&self, feature: usize) -> Option<(Splitter, f64)> {
        if self.dataset.schema().features()[feature].is_categorical() {
            self.best_level(feature)
        } else {
            self.best_threshold(feature)
        }
    }


    /// Sweep the examples sorted by value,
    /// moving the label counts from the right to the left.
    fn best_threshold(&self, feature: usize) -> Option<(Splitter, f64)> {
        let mut pairs = self.indices.iter()
            .filter_map(|&i| {
                self.dataset.value(i, feature)
                    .as_numeric()
                    .map(|x| (x, self.dataset.target(i)))
            })
            .collect::<Vec<_>>();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let n_sample = pairs.len();
        let mut left = vec![0_usize; self.parent.len()];
        let mut right = self.parent.to_vec();

        let mut best: Option<(f64, f64)> = None;
        for k in 0..n_sample.saturating_sub(1) {
            let (x, y) = pairs[k];
            left[y] += 1;
            right[y] -= 1;

            let next = pairs[k + 1].0;
            if x == next { continue; }

            let n_left = k + 1;
            let n_right = n_sample - n_left;
            let Some(reduction) = self.score(&left, &right, n_left, n_right)
                else { continue; };

            if best.map_or(true, |(_, r)| reduction > r) {
                // Halving first keeps far apart values finite.
                // The midpoint of two adjacent floats may round to `x`.
                let mid = x / 2f64 + next / 2f64;
                let threshold = if x < mid && mid <= next { mid } else { next };
                best = Some((threshold, reduction));
            }
        }

        best.map(|(threshold, reduction)| {
            (Splitter::Threshold { feature, threshold }, reduction)
        })
    }


    fn best_level(&self, feature: usize) -> Option<(Splitter, f64)> {
        let spec = &self.dataset.schema().features()[feature];
        let levels = spec.levels();

        let mut counts = vec![vec![0_usize; self.parent.len()]; levels.len()];
        for &i in self.indices {
            if let Value::Categorical(level) = self.dataset.value(i, feature) {
                if let Some(l) = spec.level_index(level) {
                    counts[l][self.dataset.target(i)] += 1;
                }
            }
        }

        let n_sample = self.indices.len();
        let mut best: Option<(usize, f64)> = None;
        for (l, left) in counts.iter().enumerate() {
            let n_left = left.iter().sum::<usize>();
            if n_left == 0 { continue; }

            let right = self.parent.iter()
                .zip(left)
                .map(|(p, q)| p - q)
                .collect::<Vec<_>>();
            let n_right = n_sample - n_left;
            let Some(reduction) = self.score(left, &right, n_left, n_right)
                else { continue; };

            if best.map_or(true, |(_, r)| reduction > r) {
                best = Some((l, reduction));
            }
        }

        best.map(|(l, reduction)| {
            let level = levels[l].clone();
            (Splitter::Level { feature, level }, reduction)
        })
    }


    /// Impurity decrease of the split `left | right`.
    /// Returns `None` if the split violates the node size floor
    /// or the minimal decrease.
    fn score(
        &self,
        left:    &[usize],
        right:   &[usize],
        n_left:  usize,
        n_right: usize,
    ) -> Option<f64>
    {
        if n_left < self.min_n || n_right < self.min_n { return None; }

        let n_sample = (n_left + n_right) as f64;
        let lp = n_left as f64 / n_sample;
        let rp = n_right as f64 / n_sample;
        let reduction = self.parent_impurity
            - lp * self.criterion.impurity(left)
            - rp * self.criterion.impurity(right);

        if self.min_decrease > 0f64 && reduction < self.min_decrease {
            return None;
        }
        Some(reduction)
    }
}
