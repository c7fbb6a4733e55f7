//! Defines the traits shared by learners and fitted classifiers.
use crate::error::{Result, TreeError};
use crate::sample::{Dataset, Schema, Value};
use crate::tree::ClassDistribution;


/// The outcome of a single prediction.
/// A `Prediction` borrows from the classifier that made it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction<'a> {
    label: &'a str,
    distribution: &'a ClassDistribution,
    labels: &'a [String],
}


impl<'a> Prediction<'a> {
    pub(crate) fn new(
        distribution: &'a ClassDistribution,
        labels: &'a [String],
    ) -> Self
    {
        let label = labels[distribution.predicted()].as_str();
        Self { label, distribution, labels, }
    }


    /// Returns the predicted label.
    pub fn label(&self) -> &'a str {
        self.label
    }


    /// Returns the class distribution of the leaf.
    pub fn distribution(&self) -> &'a ClassDistribution {
        self.distribution
    }


    /// Returns the probability of `label`,
    /// or `None` if `label` is not declared.
    pub fn probability_of(&self, label: &str) -> Option<f64> {
        self.labels.iter()
            .position(|l| l == label)
            .map(|k| self.distribution.probabilities()[k])
    }


    /// Returns the pairs of a label and its probability
    /// in the declared label order.
    pub fn probabilities(&self) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        self.labels.iter()
            .map(String::as_str)
            .zip(self.distribution.probabilities().iter().copied())
    }
}


/// A trait that defines the behavor of classifier.
/// You only need to implement `predict` and `schema` methods.
pub trait Classifier {
    /// Predicts the label of a single feature vector.
    /// `values` must follow the order of `self.schema().features()`.
    fn predict(&self, values: &[Value]) -> Result<Prediction<'_>>;


    /// Returns the schema this classifier was fitted on.
    fn schema(&self) -> &Schema;


    /// Predicts the labels of `dataset`.
    /// The schema of `dataset` must be compatible with `self.schema()`.
    fn predict_all(&self, dataset: &Dataset) -> Result<Vec<String>> {
        if !self.schema().is_compatible(dataset.schema()) {
            return Err(TreeError::mismatch(
                "the dataset does not have the features and labels \
                 the classifier was fitted on"
            ));
        }
        dataset.examples()
            .iter()
            .map(|example| {
                self.predict(example.values())
                    .map(|p| p.label().to_string())
            })
            .collect()
    }
}


/// A trait that defines the behavor of learner.
/// A learner turns a training set into a classifier.
pub trait Learner {
    /// Returned classifier type.
    type Output: Classifier;


    /// Returns the name of the learner.
    fn name(&self) -> &str;


    /// Returns the parameters of the learner as `(name, value)` pairs.
    /// Used by the verbose output of the research tools.
    fn info(&self) -> Option<Vec<(&str, String)>> {
        None
    }


    /// Fit a classifier on `dataset`.
    fn fit(&self, dataset: &Dataset) -> Result<Self::Output>;
}
