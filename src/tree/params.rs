//! Defines the hyperparameters of the tree learner.
use serde::{Serialize, Deserialize};

use std::{cmp, fmt, ops};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::common::checkers;
use crate::error::Result;
use super::criterion::Criterion;


/// The maxmial depth set as default.
pub const DEFAULT_MAX_DEPTH: usize = 30;
/// The minimal number of examples in a child node set as default.
pub const DEFAULT_MIN_N: usize = 20;


/// Hyperparameters of [`DecisionTree`](crate::DecisionTree).
/// `TreeParams` is a plain value:
/// the `with_*` methods return an updated copy
/// and never touch a fitted tree.
///
/// Missing fields of a JSON file take the default values:
/// ```text
/// max_depth: DEFAULT_MAX_DEPTH == 30,
/// min_n: DEFAULT_MIN_N == 20,
/// criterion: Criterion::Gini,
/// min_impurity_decrease: 0.0,
/// max_nodes: None,
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeParams {
    /// Maximal depth of the tree. A tree of depth `0` is a single leaf.
    pub max_depth: usize,
    /// Minimal number of examples in each child of a split.
    pub min_n: usize,
    /// Impurity measure scoring the splits.
    pub criterion: Criterion,
    /// Splits that decrease the impurity less than this are discarded.
    pub min_impurity_decrease: f64,
    /// Upper bound of the number of nodes. `None` means unbounded.
    pub max_nodes: Option<usize>,
}


impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            min_n: DEFAULT_MIN_N,
            criterion: Criterion::default(),
            min_impurity_decrease: 0f64,
            max_nodes: None,
        }
    }
}


impl TreeParams {
    /// Read the hyperparameters from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let params: Self = serde_json::from_reader(BufReader::new(file))?;
        checkers::params(&params)?;
        Ok(params)
    }


    /// Returns a copy whose maximal depth is `max_depth`.
    pub fn with_max_depth(&self, max_depth: usize) -> Self {
        Self { max_depth, ..self.clone() }
    }


    /// Returns a copy whose minimal node size is `min_n`.
    pub fn with_min_n(&self, min_n: usize) -> Self {
        Self { min_n, ..self.clone() }
    }


    /// Returns a copy whose criterion is `criterion`.
    pub fn with_criterion(&self, criterion: Criterion) -> Self {
        Self { criterion, ..self.clone() }
    }
}


impl fmt::Display for TreeParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "max_depth = {}, min_n = {}, criterion = {}",
            self.max_depth, self.min_n, self.criterion,
        )?;
        if self.min_impurity_decrease > 0f64 {
            write!(f, ", min_impurity_decrease = {}", self.min_impurity_decrease)?;
        }
        if let Some(max_nodes) = self.max_nodes {
            write!(f, ", max_nodes = {max_nodes}")?;
        }
        Ok(())
    }
}


/// Struct `Depth` defines the remaining depth of a tree.
/// This is just a wrapper for `usize`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(transparent)]
pub(crate) struct Depth(usize);


impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let depth = self.0;
        write!(f, "{depth}")
    }
}


impl From<usize> for Depth {
    fn from(depth: usize) -> Self {
        Self(depth)
    }
}


impl ops::Sub<usize> for Depth {
    type Output = Self;
    /// Define the subtraction of the `Depth` struct.
    /// The subtraction does not return a value less than `0`.
    #[inline]
    fn sub(self, other: usize) -> Self::Output {
        Self(self.0.saturating_sub(other))
    }
}


impl cmp::PartialEq<usize> for Depth {
    #[inline]
    fn eq(&self, rhs: &usize) -> bool {
        self.0.eq(rhs)
    }
}


impl cmp::PartialOrd<usize> for Depth {
    #[inline]
    fn partial_cmp(&self, other: &usize) -> Option<cmp::Ordering> {
        self.0.partial_cmp(other)
    }
}
