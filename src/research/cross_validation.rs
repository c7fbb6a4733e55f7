use rand::prelude::*;
use colored::Colorize;

use crate::classifier::Learner;
use crate::common::checkers;
use crate::error::{Result, TreeError};
use crate::metrics::evaluate;
use crate::sample::Dataset;
use crate::sample::split::strata;

use std::iter::Iterator;

const WIDTH: usize = 9;

/// Number of folds set as default.
pub const DEFAULT_N_FOLDS: usize = 5;
/// Seed set as default.
pub const DEFAULT_SEED: u64 = 1234;


/// A struct that generates
/// pairs of training/test datasets for stratified cross validation.
/// Each label is dealt to the folds in turn,
/// so that every fold keeps (up to rounding)
/// the label proportions of the whole dataset.
/// The test datasets of the folds partition the dataset.
/// # Example
/// ```no_run
/// use minitrees::prelude::*;
///
/// let dataset = DatasetReader::default()
///     .file("/path/to/survey.csv")
///     .target_feature("voted")
///     .read()
///     .unwrap();
/// let folds = CrossValidation::new(&dataset)
///     .n_folds(5)
///     .verbose(true)
///     .seed(777)
///     .shuffle(true)
///     .split()
///     .unwrap();
/// for (train, test) in folds {
///     let f = DecisionTreeBuilder::new()
///         .max_depth(3)
///         .build()
///         .fit(&train)
///         .unwrap();
///     let eval = evaluate(&f, &test).unwrap();
///     println!("[test accuracy: {}]", eval.accuracy);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CrossValidation<'a> {
    dataset: &'a Dataset,
    n_folds: usize,
    seed: u64,
    shuffle: bool,
    verbose: bool,
}


impl<'a> CrossValidation<'a> {
    /// Construct a new instance of `CrossValidation.`
    #[inline]
    pub fn new(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            n_folds: DEFAULT_N_FOLDS,
            seed: DEFAULT_SEED,
            shuffle: true,
            verbose: false,
        }
    }


    /// Set the number of folds.
    /// Default value is `5.`
    #[inline]
    pub fn n_folds(mut self, n_folds: usize) -> Self {
        self.n_folds = n_folds;
        self
    }


    /// Set the seed of the randomness for shuffling.
    /// Default vaule is `1234.`
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }


    /// Shuffle the examples of each label before dealing them.
    /// Default value is `true`.
    /// Without shuffling, the folds follow the example order.
    #[inline]
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }


    /// Set the verbose parameter.
    /// If `true`, the folds print some information
    /// when generating a train/test pair.
    /// Default vaule is `false.`
    #[inline]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }


    /// Assign the examples to folds.
    /// Fails if `n_folds` is less than `2` or
    /// larger than the number of examples.
    pub fn split(&self) -> Result<Folds<'a>> {
        checkers::n_folds(self.n_folds, self.dataset.len())?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut assignment = vec![0_usize; self.dataset.len()];
        let mut next = 0_usize;
        for mut stratum in strata(self.dataset) {
            if self.shuffle { stratum.shuffle(&mut rng); }
            for i in stratum {
                assignment[i] = next;
                next = (next + 1) % self.n_folds;
            }
        }

        Ok(Folds {
            dataset: self.dataset,
            assignment,
            n_folds: self.n_folds,
            current_fold: 0,
            verbose: self.verbose,
        })
    }
}


/// The iterator over the `(train, test)` pairs
/// made by [`CrossValidation::split`].
pub struct Folds<'a> {
    dataset: &'a Dataset,
    // Fold of each example.
    assignment: Vec<usize>,
    n_folds: usize,
    current_fold: usize,
    verbose: bool,
}


impl Folds<'_> {
    /// Returns the number of folds.
    pub fn n_folds(&self) -> usize {
        self.n_folds
    }


    /// Returns the training/test datasets for `k`th fold.
    #[inline]
    fn fold_at(&self, k: usize) -> (Dataset, Dataset) {
        let (test, train): (Vec<usize>, Vec<usize>) = (0..self.dataset.len())
            .partition(|&i| self.assignment[i] == k);
        (self.dataset.subset(&train), self.dataset.subset(&test))
    }
}


impl Iterator for Folds<'_> {
    type Item = (Dataset, Dataset);
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_fold >= self.n_folds { return None; }

        let output = self.fold_at(self.current_fold);
        self.current_fold += 1;

        if self.verbose {
            let train_size = output.0.len();
            let test_size = output.1.len();
            println!(
                "{}    {}    {}",
                format!("  [{: >3}'th fold]", self.current_fold).bold().red(),
                format!("[TRAIN {:>WIDTH$}]", train_size).bold().green(),
                format!("[TEST {:>WIDTH$}]", test_size).bold().yellow(),
            );
        }

        Some(output)
    }
}


/// Fit `learner` on the training side of each fold and
/// returns the test accuracy per fold.
pub fn cross_validate<L>(learner: &L, folds: Folds<'_>) -> Result<Vec<f64>>
    where L: Learner
{
    let mut accuracies = Vec::with_capacity(folds.n_folds());
    for (train, test) in folds {
        if test.is_empty() {
            return Err(TreeError::invalid("a fold has no test example"));
        }
        let f = learner.fit(&train)?;
        accuracies.push(evaluate(&f, &test)?.accuracy);
    }
    Ok(accuracies)
}
