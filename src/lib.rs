#![warn(missing_docs)]

//!
//! A crate that provides CART-style classification trees
//! for tabular survey data.
//! Features are numeric or categorical,
//! and the outcome is one categorical label.
//!
//! This crate covers the following steps.
//!
//! - Loading
//!     A [`Dataset`] is read from a CSV file by [`DatasetReader`]
//!     or converted from `polars::DataFrame`.
//!     Every example is checked once against an explicit [`Schema`].
//!
//!
//! - Fitting
//!     [`DecisionTree`] grows a binary tree by recursive partitioning.
//!     The splits are scored by the Gini impurity or the entropy,
//!     and the growth is controlled by `max_depth` and `min_n`.
//!     Categorical features are split natively,
//!     one level against the rest.
//!
//!
//! - Evaluation and tuning
//!     [`accuracy`] and [`ConfusionMatrix`] evaluate the predictions.
//!     [`TrainTestSplit`], [`CrossValidation`], and [`GridSearch`]
//!     choose the hyperparameters on held-out examples.
//!
//! # Example
//! ```no_run
//! use minitrees::prelude::*;
//!
//! let dataset = DatasetReader::default()
//!     .file("/path/to/survey.csv")
//!     .target_feature("voted")
//!     .read()
//!     .unwrap();
//! let (train, test) = TrainTestSplit::new(&dataset)
//!     .split()
//!     .unwrap();
//!
//! let params = TreeParams::default()
//!     .with_max_depth(8)
//!     .with_min_n(21);
//! let f = build(&train, &params).unwrap();
//! println!("{f}");
//!
//! let eval = evaluate(&f, &test).unwrap();
//! println!("{eval}");
//! ```

pub mod error;
pub(crate) mod common;
pub mod sample;
pub mod classifier;
pub mod tree;
pub mod metrics;
pub mod research;
pub mod prelude;


pub use error::{Result, TreeError};

pub use sample::{
    Dataset,
    DatasetReader,
    Example,
    FeatureKind,
    FeatureSpec,
    Schema,
    TrainTestSplit,
    Value,
};

pub use classifier::{
    Classifier,
    Learner,
    Prediction,
};

pub use tree::{
    build,
    ClassDistribution,
    Criterion,
    DecisionTree,
    DecisionTreeBuilder,
    DecisionTreeClassifier,
    Node,
    TreeParams,
};

pub use metrics::{
    accuracy,
    evaluate,
    ConfusionMatrix,
    Evaluation,
};

pub use research::{
    cross_validate,
    CrossValidation,
    GridSearch,
    TuningResults,
};
