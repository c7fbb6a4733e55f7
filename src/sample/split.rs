use rand::prelude::*;

use crate::common::checkers;
use crate::error::{Result, TreeError};
use super::dataset::Dataset;


/// Training ratio set as default.
pub const DEFAULT_TRAIN_RATIO: f64 = 0.75;
/// Seed set as default.
pub const DEFAULT_SEED: u64 = 1234;


/// A struct that splits a dataset into training/test datasets
/// stratified by label:
/// each label keeps (up to rounding) the same share
/// in the training and the test dataset.
/// # Example
/// ```no_run
/// use minitrees::prelude::*;
///
/// let dataset = DatasetReader::default()
///     .file("/path/to/survey.csv")
///     .target_feature("satisfied")
///     .read()
///     .unwrap();
/// let (train, test) = TrainTestSplit::new(&dataset)
///     .train_ratio(0.8)
///     .seed(777)
///     .split()
///     .unwrap();
/// ```
pub struct TrainTestSplit<'a> {
    dataset: &'a Dataset,
    train_ratio: f64,
    seed: u64,
}


impl<'a> TrainTestSplit<'a> {
    /// Construct a new instance of `TrainTestSplit`.
    #[inline]
    pub fn new(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            train_ratio: DEFAULT_TRAIN_RATIO,
            seed: DEFAULT_SEED,
        }
    }


    /// Set the ratio of training examples.
    /// Default value is `0.75`.
    #[inline]
    pub fn train_ratio(mut self, ratio: f64) -> Self {
        self.train_ratio = ratio;
        self
    }


    /// Set the seed of the randomness for shuffling.
    /// Default value is `1234.`
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }


    /// Returns the pair `(train, test)`.
    /// Both datasets share the schema of the original one and
    /// keep the original example order.
    pub fn split(&self) -> Result<(Dataset, Dataset)> {
        checkers::train_ratio(self.train_ratio)?;
        if self.dataset.is_empty() {
            return Err(TreeError::invalid("cannot split an empty dataset"));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut train = Vec::new();
        let mut test = Vec::new();
        for mut stratum in strata(self.dataset) {
            stratum.shuffle(&mut rng);
            let n_train = (self.train_ratio * stratum.len() as f64).round() as usize;
            let (tr, te) = stratum.split_at(n_train);
            train.extend_from_slice(tr);
            test.extend_from_slice(te);
        }
        train.sort_unstable();
        test.sort_unstable();

        Ok((self.dataset.subset(&train), self.dataset.subset(&test)))
    }
}


/// Groups the example indices by label,
/// in the declared label order.
/// Each group keeps the example order.
pub(crate) fn strata(dataset: &Dataset) -> Vec<Vec<usize>> {
    let mut strata = vec![Vec::new(); dataset.schema().n_labels()];
    (0..dataset.len()).for_each(|i| strata[dataset.target(i)].push(i));
    strata
}
