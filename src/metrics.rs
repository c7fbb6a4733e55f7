//! Evaluation of the predictions against the true labels.
use serde::{Serialize, Deserialize};

use std::fmt;

use crate::classifier::Classifier;
use crate::error::{Result, TreeError};
use crate::sample::Dataset;


/// Returns the fraction of `predictions` equal to `truths`.
///
/// Fails with `LengthMismatch` if the lengths differ
/// and with `InvalidInput` if both are empty.
pub fn accuracy<P, T>(predictions: &[P], truths: &[T]) -> Result<f64>
    where P: AsRef<str>,
          T: AsRef<str>,
{
    check_lengths(predictions.len(), truths.len())?;
    if truths.is_empty() {
        return Err(TreeError::invalid("accuracy of zero predictions"));
    }

    let n_correct = predictions.iter()
        .zip(truths)
        .filter(|(p, t)| p.as_ref() == t.as_ref())
        .count();
    Ok(n_correct as f64 / truths.len() as f64)
}


fn check_lengths(predictions: usize, truths: usize) -> Result<()> {
    if predictions == truths {
        Ok(())
    } else {
        Err(TreeError::LengthMismatch { predictions, truths })
    }
}


/// The table of counts of `(truth, prediction)` pairs
/// over the full declared label set.
/// Rows are the true labels, columns are the predicted labels.
/// Labels that never occur still get a row and a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    labels: Vec<String>,
    counts: Vec<Vec<usize>>,
}


impl ConfusionMatrix {
    /// Tabulate `predictions` against `truths`.
    /// Every prediction and truth must be one of `labels`.
    pub fn new<L, P, T>(labels: &[L], predictions: &[P], truths: &[T])
        -> Result<Self>
        where L: AsRef<str>,
              P: AsRef<str>,
              T: AsRef<str>,
    {
        check_lengths(predictions.len(), truths.len())?;
        let labels = labels.iter()
            .map(|l| l.as_ref().to_string())
            .collect::<Vec<_>>();

        let position = |label: &str| {
            labels.iter()
                .position(|l| l == label)
                .ok_or_else(|| TreeError::invalid(
                    format!("`{label}` is not a declared label")
                ))
        };

        let k = labels.len();
        let mut counts = vec![vec![0_usize; k]; k];
        for (p, t) in predictions.iter().zip(truths) {
            let row = position(t.as_ref())?;
            let col = position(p.as_ref())?;
            counts[row][col] += 1;
        }

        Ok(Self { labels, counts })
    }


    /// Returns the declared labels in row (and column) order.
    pub fn labels(&self) -> &[String] {
        &self.labels[..]
    }


    /// Returns the number of examples of label `truth`
    /// predicted as `predicted`.
    /// Returns `None` if either label is not declared.
    pub fn get(&self, truth: &str, predicted: &str) -> Option<usize> {
        let row = self.labels.iter().position(|l| l == truth)?;
        let col = self.labels.iter().position(|l| l == predicted)?;
        Some(self.counts[row][col])
    }


    /// Returns the table. `counts()[i][j]` is the number of examples
    /// of label `labels()[i]` predicted as `labels()[j]`.
    pub fn counts(&self) -> &[Vec<usize>] {
        &self.counts[..]
    }


    /// Returns the number of evaluated examples.
    pub fn total(&self) -> usize {
        self.counts.iter()
            .map(|row| row.iter().sum::<usize>())
            .sum()
    }


    /// Returns the number of correct predictions.
    pub fn correct(&self) -> usize {
        (0..self.labels.len())
            .map(|k| self.counts[k][k])
            .sum()
    }


    /// Returns the accuracy, or `None` for an empty table.
    pub fn accuracy(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.correct() as f64 / total as f64)
    }


    /// Returns Cohen's kappa, the agreement between the predictions
    /// and the truths corrected for chance.
    /// Returns `None` if the table is empty or
    /// the chance agreement is `1`.
    pub fn kappa(&self) -> Option<f64> {
        let total = self.total() as f64;
        let observed = self.accuracy()?;

        let k = self.labels.len();
        let expected = (0..k)
            .map(|i| {
                let row = self.counts[i].iter().sum::<usize>() as f64;
                let col = self.counts.iter().map(|r| r[i]).sum::<usize>() as f64;
                row * col
            })
            .sum::<f64>()
            / (total * total);

        if expected >= 1f64 { return None; }
        Some((observed - expected) / (1f64 - expected))
    }
}


impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const CORNER: &str = "truth \\ pred";

        let head = self.labels.iter()
            .map(String::len)
            .chain([CORNER.len()])
            .max()
            .unwrap_or(0);
        let cell = self.counts.iter()
            .flatten()
            .map(|c| c.to_string().len())
            .chain(self.labels.iter().map(String::len))
            .max()
            .unwrap_or(1);

        write!(f, "{CORNER:<head$}")?;
        for label in &self.labels {
            write!(f, "  {label:>cell$}")?;
        }
        writeln!(f)?;

        for (label, row) in self.labels.iter().zip(&self.counts) {
            write!(f, "{label:<head$}")?;
            for count in row {
                write!(f, "  {count:>cell$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}


/// Accuracy and confusion matrix of a classifier on a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Fraction of correct predictions.
    pub accuracy: f64,
    /// Counts of `(truth, prediction)` pairs.
    pub confusion: ConfusionMatrix,
}


impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "accuracy: {:.4}", self.accuracy)?;
        write!(f, "{}", self.confusion)
    }
}


/// Predict every example of `dataset` and evaluate the predictions.
pub fn evaluate<C>(classifier: &C, dataset: &Dataset) -> Result<Evaluation>
    where C: Classifier + ?Sized
{
    let predictions = classifier.predict_all(dataset)?;
    let truths = dataset.labels();
    let accuracy = accuracy(&predictions, &truths)?;
    let confusion = ConfusionMatrix::new(
        dataset.schema().labels(), &predictions, &truths,
    )?;
    Ok(Evaluation { accuracy, confusion, })
}
