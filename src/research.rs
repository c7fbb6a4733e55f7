//! This directory provides the tools to choose hyperparameters:
//! - Stratified cross validation
//! - Grid search over `max_depth` and `min_n`

/// Provides stratified k-fold cross validation.
pub mod cross_validation;

/// Provides the grid search of the tree hyperparameters.
pub mod tuning;


pub use cross_validation::{
    CrossValidation,
    Folds,
    cross_validate,
};

pub use tuning::{
    GridSearch,
    TuningRecord,
    TuningResults,
};
