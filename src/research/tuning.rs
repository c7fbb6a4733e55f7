use colored::Colorize;
use rayon::prelude::*;
use serde::{Serialize, Deserialize};
use tracing::info;

use std::fmt;

use crate::error::{Result, TreeError};
use crate::metrics::evaluate;
use crate::sample::Dataset;
use crate::tree::{DecisionTreeBuilder, TreeParams};
use super::cross_validation::{
    CrossValidation,
    DEFAULT_N_FOLDS,
    DEFAULT_SEED,
};


/// Maximal depths searched by default.
pub const DEFAULT_MAX_DEPTHS: [usize; 3] = [1, 8, 15];
/// Minimal node sizes searched by default.
pub const DEFAULT_MIN_NS: [usize; 3] = [2, 21, 40];


/// A struct that tunes `max_depth` and `min_n` of a decision tree
/// by stratified cross validation.
/// Every pair of the grid is evaluated on the same folds.
/// # Example
/// ```no_run
/// use minitrees::prelude::*;
///
/// let dataset = DatasetReader::default()
///     .file("/path/to/survey.csv")
///     .target_feature("voted")
///     .read()
///     .unwrap();
/// let (train, test) = TrainTestSplit::new(&dataset)
///     .split()
///     .unwrap();
/// let results = GridSearch::new(&train)
///     .max_depths([1, 8, 15])
///     .min_ns([2, 21, 40])
///     .n_folds(5)
///     .verbose(true)
///     .run()
///     .unwrap();
/// println!("{results}");
///
/// let params = results.finalize(&TreeParams::default());
/// let f = build(&train, &params).unwrap();
/// let eval = evaluate(&f, &test).unwrap();
/// println!("{eval}");
/// ```
pub struct GridSearch<'a> {
    dataset: &'a Dataset,
    params: TreeParams,
    max_depths: Vec<usize>,
    min_ns: Vec<usize>,
    n_folds: usize,
    seed: u64,
    verbose: bool,
}


impl<'a> GridSearch<'a> {
    /// Construct a new instance of `GridSearch`
    /// over the default grid.
    pub fn new(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            params: TreeParams::default(),
            max_depths: DEFAULT_MAX_DEPTHS.to_vec(),
            min_ns: DEFAULT_MIN_NS.to_vec(),
            n_folds: DEFAULT_N_FOLDS,
            seed: DEFAULT_SEED,
            verbose: false,
        }
    }


    /// Set the parameters that are not tuned
    /// (e.g., the criterion).
    /// Default value is `TreeParams::default()`.
    pub fn params(mut self, params: TreeParams) -> Self {
        self.params = params;
        self
    }


    /// Set the maximal depths to search.
    pub fn max_depths<I>(mut self, depths: I) -> Self
        where I: IntoIterator<Item = usize>
    {
        self.max_depths = depths.into_iter().collect();
        self
    }


    /// Set the minimal node sizes to search.
    pub fn min_ns<I>(mut self, min_ns: I) -> Self
        where I: IntoIterator<Item = usize>
    {
        self.min_ns = min_ns.into_iter().collect();
        self
    }


    /// Set the number of folds.
    /// Default value is `5.`
    pub fn n_folds(mut self, n_folds: usize) -> Self {
        self.n_folds = n_folds;
        self
    }


    /// Set the seed of the fold assignment.
    /// Default vaule is `1234.`
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }


    /// Set the verbose parameter.
    /// If `true`, `GridSearch` prints the folds and
    /// the score of each pair of the grid.
    /// Default vaule is `false.`
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }


    /// Returns the grid in search order:
    /// `max_depth` in the outer loop, `min_n` in the inner loop.
    pub fn grid(&self) -> Vec<TreeParams> {
        self.max_depths.iter()
            .flat_map(|&depth| {
                self.min_ns.iter()
                    .map(move |&min_n| (depth, min_n))
            })
            .map(|(depth, min_n)| {
                self.params.with_max_depth(depth).with_min_n(min_n)
            })
            .collect()
    }


    /// Evaluate every pair of the grid.
    pub fn run(&self) -> Result<TuningResults> {
        let grid = self.grid();
        if grid.is_empty() {
            return Err(TreeError::invalid("the search grid is empty"));
        }

        let folds = CrossValidation::new(self.dataset)
            .n_folds(self.n_folds)
            .seed(self.seed)
            .verbose(self.verbose)
            .split()?
            .collect::<Vec<_>>();

        let records = grid.into_par_iter()
            .map(|params| -> Result<TuningRecord> {
                let tree = DecisionTreeBuilder::from_params(params.clone())
                    .build();
                let accuracies = folds.iter()
                    .map(|(train, test)| -> Result<f64> {
                        let f = tree.fit(train)?;
                        Ok(evaluate(&f, test)?.accuracy)
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(TuningRecord::new(params, accuracies))
            })
            .collect::<Result<Vec<_>>>()?;

        if self.verbose {
            for record in &records {
                println!(
                    "{}    {}",
                    format!(
                        "  [max_depth {:>3}, min_n {:>4}]",
                        record.params.max_depth, record.params.min_n,
                    ).bold().red(),
                    format!(
                        "[ACC {:.4} ± {:.4}]", record.mean, record.std_err
                    ).bold().green(),
                );
            }
        }

        let results = TuningResults { records };
        let best = results.select_best();
        info!(
            n_candidates = results.records.len(),
            n_folds = self.n_folds,
            best_mean = best.mean,
            "grid search finished, best {}", best.params,
        );
        Ok(results)
    }
}


/// Cross validation scores of one pair of the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningRecord {
    /// The evaluated parameters.
    pub params: TreeParams,
    /// Test accuracy per fold.
    pub accuracies: Vec<f64>,
    /// Mean of `accuracies`.
    pub mean: f64,
    /// Standard error of `mean`.
    pub std_err: f64,
}


impl TuningRecord {
    fn new(params: TreeParams, accuracies: Vec<f64>) -> Self {
        let k = accuracies.len() as f64;
        let mean = accuracies.iter().sum::<f64>() / k;
        let std_err = if accuracies.len() > 1 {
            let var = accuracies.iter()
                .map(|a| (a - mean).powi(2))
                .sum::<f64>()
                / (k - 1f64);
            (var / k).sqrt()
        } else {
            0f64
        };

        Self { params, accuracies, mean, std_err, }
    }
}


/// The output of [`GridSearch::run`].
/// Records follow the grid order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TuningResults {
    records: Vec<TuningRecord>,
}


impl TuningResults {
    /// Returns the records in grid order.
    pub fn records(&self) -> &[TuningRecord] {
        &self.records[..]
    }


    /// Returns the record with the highest mean accuracy.
    /// Ties go to the record that comes first in grid order.
    pub fn select_best(&self) -> &TuningRecord {
        // `GridSearch::run` never returns an empty result.
        let mut best = &self.records[0];
        for record in &self.records[1..] {
            if record.mean > best.mean { best = record; }
        }
        best
    }


    /// Returns the `n` best records, best first.
    pub fn show_best(&self, n: usize) -> Vec<&TuningRecord> {
        let mut records = self.records.iter().collect::<Vec<_>>();
        // Stable sort keeps the grid order among ties.
        records.sort_by(|a, b| b.mean.total_cmp(&a.mean));
        records.truncate(n);
        records
    }


    /// Returns a copy of `params` with `max_depth` and `min_n`
    /// of the best record.
    pub fn finalize(&self, params: &TreeParams) -> TreeParams {
        let best = &self.select_best().params;
        params.with_max_depth(best.max_depth)
            .with_min_n(best.min_n)
    }
}


impl fmt::Display for TuningResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>9}  {:>5}  {:>8}  {:>8}",
            "max_depth", "min_n", "accuracy", "std_err",
        )?;
        for record in &self.records {
            writeln!(
                f,
                "{:>9}  {:>5}  {:>8.4}  {:>8.4}",
                record.params.max_depth,
                record.params.min_n,
                record.mean,
                record.std_err,
            )?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{Example, FeatureSpec, Schema, Value};

    fn record(depth: usize, mean: f64) -> TuningRecord {
        let params = TreeParams::default().with_max_depth(depth);
        TuningRecord::new(params, vec![mean, mean])
    }

    #[test]
    fn test_record_01() {
        let params = TreeParams::default();
        let r = TuningRecord::new(params, vec![0.5, 0.7, 0.9]);
        assert!((r.mean - 0.7).abs() < 1e-12);
        // sd = 0.2, se = 0.2 / sqrt(3)
        assert!((r.std_err - 0.2 / 3f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_select_best_first_on_tie() {
        let results = TuningResults {
            records: vec![record(1, 0.6), record(2, 0.8), record(3, 0.8)],
        };
        let res = results.select_best().params.max_depth;
        assert_eq!(res, 2, "expected 2, got {res}.");

        let best = results.show_best(2)
            .into_iter()
            .map(|r| r.params.max_depth)
            .collect::<Vec<_>>();
        assert_eq!(best, vec![2, 3]);
    }

    #[test]
    fn test_finalize_keeps_other_params() {
        let results = TuningResults { records: vec![record(4, 0.9)] };
        let base = TreeParams::default()
            .with_criterion(crate::tree::Criterion::Entropy);
        let params = results.finalize(&base);
        assert_eq!(params.max_depth, 4);
        assert_eq!(params.criterion, crate::tree::Criterion::Entropy);
    }

    #[test]
    fn test_grid_order() {
        let schema = Schema::new(
            vec![FeatureSpec::numeric("x")], vec!["A", "B"]
        ).unwrap();
        let examples = vec![Example::new(vec![Value::from(0.0)], "A")];
        let data = Dataset::new(schema, examples).unwrap();
        let grid = GridSearch::new(&data)
            .max_depths([1, 2])
            .min_ns([5, 6])
            .grid()
            .into_iter()
            .map(|p| (p.max_depth, p.min_n))
            .collect::<Vec<_>>();
        assert_eq!(grid, vec![(1, 5), (1, 6), (2, 5), (2, 6)]);
    }

    #[test]
    fn test_empty_grid() {
        let schema = Schema::new(
            vec![FeatureSpec::numeric("x")], vec!["A"]
        ).unwrap();
        let examples = (0..4)
            .map(|i| Example::new(vec![Value::from(i as f64)], "A"))
            .collect();
        let data = Dataset::new(schema, examples).unwrap();
        let res = GridSearch::new(&data).min_ns([]).run();
        assert!(matches!(res, Err(TreeError::InvalidInput(_))));
    }
}
