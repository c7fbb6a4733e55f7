//! Exports the standard structs, traits, and functions.
//!

pub use crate::sample::{
    // Data -------------------------------------
    Dataset,
    DatasetReader,
    Example,
    FeatureSpec,
    Schema,
    Value,

    // Splitting --------------------------------
    TrainTestSplit,
};


pub use crate::classifier::{
    Classifier,
    Learner,
};


pub use crate::tree::{
    // Decision tree
    build,
    Criterion,
    DecisionTree,
    DecisionTreeBuilder,
    DecisionTreeClassifier,
    TreeParams,
};


pub use crate::metrics::{
    accuracy,
    evaluate,
    ConfusionMatrix,
};


pub use crate::research::{
    CrossValidation,
    GridSearch,
};
