use tracing::{debug, info};

use crate::classifier::Learner;
use crate::common::checkers;
use crate::error::{Result, TreeError};
use crate::sample::Dataset;
use super::distribution::ClassDistribution;
use super::dtree_classifier::DecisionTreeClassifier;
use super::node::Node;
use super::params::{Depth, TreeParams};
use super::split_finder::find_best_split;


/// The Decision Tree algorithm.
/// Given a set of labeled training examples,
/// [`DecisionTree`] outputs a decision tree classifier
/// named [`DecisionTreeClassifier`]
/// under the specified parameters.
///
/// The code is based on the book:
/// [Classification and Regression Trees](https://www.amazon.com/Classification-Regression-Wadsworth-Statistics-Probability/dp/0412048418)
/// by Leo Breiman, Jerome H. Friedman, Richard A. Olshen, and Charles J. Stone.
///
/// [`DecisionTree`] is constructed
/// by [`DecisionTreeBuilder`](crate::DecisionTreeBuilder).
///
/// A node becomes a leaf when, checked in this order,
/// 1. all of its examples share one label,
/// 2. it sits at depth `max_depth`,
/// 3. the node budget `max_nodes` is exhausted,
/// 4. no split leaves `min_n` examples on both sides.
///
/// Growing recurses once per level.
/// Every split sends at least one example to each side,
/// so the depth stays below the number of training examples.
///
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
///     .train_ratio(0.75)
///     .seed(1234)
///     .split()
///     .unwrap();
///
/// let tree = DecisionTreeBuilder::new()
///     .max_depth(8)
///     .min_n(21)
///     .build();
/// let f = tree.fit(&train).unwrap();
///
/// let predictions = f.predict_all(&test).unwrap();
/// let acc = accuracy(&predictions, &test.labels()).unwrap();
/// println!("accuracy (test) is: {acc}");
/// ```
#[derive(Debug, Clone)]
pub struct DecisionTree {
    params: TreeParams,
    features: Option<Vec<String>>,
}


impl DecisionTree {
    /// Initialize [`DecisionTree`].
    /// This method is called only via `DecisionTreeBuilder::build`.
    #[inline]
    pub(super) fn new(params: TreeParams, features: Option<Vec<String>>)
        -> Self
    {
        Self { params, features, }
    }


    /// Returns the hyperparameters of this learner.
    pub fn params(&self) -> &TreeParams {
        &self.params
    }


    /// Fit a tree on `dataset`.
    pub fn fit(&self, dataset: &Dataset) -> Result<DecisionTreeClassifier> {
        checkers::params(&self.params)?;
        if dataset.is_empty() {
            return Err(TreeError::invalid("the training set is empty"));
        }
        let features = self.feature_indices(dataset)?;

        let indices = (0..dataset.len()).collect::<Vec<_>>();
        let mut grower = Grower {
            dataset,
            features: &features[..],
            params: &self.params,
            n_nodes: 1,
        };
        let root = grower.grow(indices, Depth::from(self.params.max_depth));

        info!(
            n_examples = dataset.len(),
            depth = root.depth(),
            n_leaves = root.n_leaves(),
            "fitted a decision tree ({})", self.params,
        );

        Ok(DecisionTreeClassifier::new(
            *root,
            dataset.shared_schema(),
            self.params.clone(),
            features,
        ))
    }


    /// Resolve the feature selection into schema positions.
    fn feature_indices(&self, dataset: &Dataset) -> Result<Vec<usize>> {
        let schema = dataset.schema();
        let Some(names) = &self.features else {
            return Ok((0..schema.n_features()).collect());
        };

        if names.is_empty() {
            return Err(TreeError::invalid("no feature is selected"));
        }
        names.iter()
            .map(|name| {
                schema.feature_index(name)
                    .ok_or_else(|| TreeError::invalid(
                        format!("the feature named `{name}` does not exist")
                    ))
            })
            .collect()
    }
}


impl Learner for DecisionTree {
    type Output = DecisionTreeClassifier;

    fn name(&self) -> &str {
        "Decision Tree"
    }

    fn info(&self) -> Option<Vec<(&str, String)>> {
        let info = Vec::from([
            ("Max depth", format!("{}", self.params.max_depth)),
            ("Min node size", format!("{}", self.params.min_n)),
            ("Criterion", format!("{}", self.params.criterion)),
        ]);
        Some(info)
    }

    fn fit(&self, dataset: &Dataset) -> Result<Self::Output> {
        DecisionTree::fit(self, dataset)
    }
}


/// Fit a tree on `dataset` under `params`, using every feature.
/// `build` is a pure function of its inputs:
/// the same dataset and parameters always give the same tree.
pub fn build(dataset: &Dataset, params: &TreeParams)
    -> Result<DecisionTreeClassifier>
{
    DecisionTree::new(params.clone(), None).fit(dataset)
}


/// State of one recursive fit.
struct Grower<'a> {
    dataset: &'a Dataset,
    features: &'a [usize],
    params: &'a TreeParams,
    // Nodes created so far, the root included.
    n_nodes: usize,
}


impl Grower<'_> {
    /// Grow the sub-tree over the examples at `indices`.
    /// `depth` is the remaining depth.
    fn grow(&mut self, indices: Vec<usize>, depth: Depth) -> Box<Node> {
        let distribution = ClassDistribution::from_indices(
            self.dataset, &indices[..]
        );

        if distribution.is_pure() || depth < 1 || !self.has_room() {
            return Box::new(Node::leaf(distribution));
        }

        let best = find_best_split(
            self.dataset, &indices[..], self.features, self.params,
        );
        let Some(best) = best else {
            return Box::new(Node::leaf(distribution));
        };

        debug!(
            rule = %best.rule.describe(self.dataset.schema()),
            reduction = best.reduction,
            n_left = best.left.len(),
            n_right = best.right.len(),
            "split a node of {} examples", indices.len(),
        );

        self.n_nodes += 2;
        let depth = depth - 1;
        let left  = self.grow(best.left, depth);
        let right = self.grow(best.right, depth);

        Box::new(Node::branch(best.rule, left, right, distribution))
    }


    /// Returns `true` if two more nodes fit in the budget.
    fn has_room(&self) -> bool {
        self.params.max_nodes
            .map_or(true, |max| self.n_nodes + 2 <= max)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{Example, FeatureSpec, Schema, Value};

    fn staircase() -> Dataset {
        let schema = Schema::new(
            vec![FeatureSpec::numeric("x")], vec!["A", "B"]
        ).unwrap();
        let examples = (0..8)
            .map(|i| {
                let y = if (i / 2) % 2 == 0 { "A" } else { "B" };
                Example::new(vec![Value::from(i as f64)], y)
            })
            .collect();
        Dataset::new(schema, examples).unwrap()
    }

    #[test]
    fn test_empty_training_set() {
        let schema = Schema::new(
            vec![FeatureSpec::numeric("x")], vec!["A"]
        ).unwrap();
        let data = Dataset::new(schema, Vec::new()).unwrap();
        let res = build(&data, &TreeParams::default());
        assert!(matches!(res, Err(TreeError::InvalidInput(_))));
    }

    #[test]
    fn test_zero_min_n() {
        let params = TreeParams::default().with_min_n(0);
        let res = build(&staircase(), &params);
        assert!(matches!(res, Err(TreeError::InvalidInput(_))));
    }

    #[test]
    fn test_unknown_feature() {
        let tree = crate::tree::DecisionTreeBuilder::new()
            .features(["y"])
            .build();
        let res = tree.fit(&staircase());
        assert!(matches!(res, Err(TreeError::InvalidInput(_))));
    }

    #[test]
    fn test_empty_feature_selection() {
        let tree = crate::tree::DecisionTreeBuilder::new()
            .features(Vec::<String>::new())
            .build();
        let res = tree.fit(&staircase());
        assert!(matches!(res, Err(TreeError::InvalidInput(_))));
    }

    #[test]
    fn test_depth_bound() {
        let params = TreeParams::default().with_min_n(1);
        for max_depth in 0..4 {
            let f = build(&staircase(), &params.with_max_depth(max_depth))
                .unwrap();
            let res = f.depth();
            assert!(
                res <= max_depth,
                "expected depth <= {max_depth}, got {res}."
            );
        }
    }

    #[test]
    fn test_node_budget() {
        let params = TreeParams {
            min_n: 1,
            max_nodes: Some(3),
            ..TreeParams::default()
        };
        let f = build(&staircase(), &params).unwrap();
        assert_eq!(f.n_nodes(), 3);

        let free = build(&staircase(), &TreeParams::default().with_min_n(1))
            .unwrap();
        assert!(free.n_nodes() > 3);
    }
}
