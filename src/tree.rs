//! The files in `tree/` directory defines
//! the classification tree learner and the fitted tree.

/// Defines the impurity measures.
pub mod criterion;
/// Defines the hyperparameters.
pub mod params;
/// Defines the builder of `DecisionTree`.
pub mod builder;
/// Defines the decision tree learner.
pub mod dtree;
/// Defines the classifier produced by `DecisionTree`.
pub mod dtree_classifier;

/// Defines the inner representations of `DecisionTreeClassifier`.
pub mod node;
mod distribution;
mod split_rule;
mod split_finder;
mod tree_file;


pub use criterion::Criterion;
pub use params::TreeParams;
pub use builder::DecisionTreeBuilder;
pub use dtree::{build, DecisionTree};
pub use dtree_classifier::DecisionTreeClassifier;
pub use distribution::ClassDistribution;
pub use node::{Node, Nodes};
pub use split_rule::{LeftRight, Splitter};
