use serde::{Serialize, Deserialize};

use crate::sample::Dataset;


/// Class distribution of the training examples that reach a node.
/// Counts and probabilities are aligned with the declared label order
/// of the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDistribution {
    counts: Vec<usize>,
    probabilities: Vec<f64>,
    predicted: usize,
}


impl ClassDistribution {
    /// Construct the distribution from label counts.
    /// The predicted label is the one with the most examples;
    /// ties go to the label declared first.
    pub fn from_counts(counts: Vec<usize>) -> Self {
        let total = counts.iter().sum::<usize>();
        let probabilities = counts.iter()
            .map(|&c| if total > 0 { c as f64 / total as f64 } else { 0f64 })
            .collect();

        // First maximum wins.
        let mut predicted = 0;
        for (k, &c) in counts.iter().enumerate() {
            if c > counts[predicted] { predicted = k; }
        }

        Self { counts, probabilities, predicted, }
    }


    /// Count the labels of the examples at `indices`.
    pub(crate) fn from_indices(dataset: &Dataset, indices: &[usize]) -> Self {
        let mut counts = vec![0_usize; dataset.schema().n_labels()];
        indices.iter()
            .for_each(|&i| { counts[dataset.target(i)] += 1; });
        Self::from_counts(counts)
    }


    /// Returns the number of examples per label.
    pub fn counts(&self) -> &[usize] {
        &self.counts[..]
    }


    /// Returns the probability per label.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities[..]
    }


    /// Returns the position of the predicted label.
    pub fn predicted(&self) -> usize {
        self.predicted
    }


    /// Returns the number of examples.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }


    /// Returns `true` if at most one label has examples.
    pub fn is_pure(&self) -> bool {
        self.counts.iter()
            .filter(|&&c| c > 0)
            .count() <= 1
    }
}
