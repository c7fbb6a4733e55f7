use super::criterion::Criterion;
use super::dtree::DecisionTree;
use super::params::TreeParams;


/// A struct that builds `DecisionTree`.
/// `DecisionTreeBuilder` keeps parameters for constructing `DecisionTree`.
///
/// # Example
///
/// ```no_run
/// use minitrees::prelude::*;
///
/// let file = "/path/to/survey.csv";
/// let dataset = DatasetReader::default()
///     .file(file)
///     .target_feature("voted")
///     .read()
///     .unwrap();
/// let tree = DecisionTreeBuilder::new()
///     .max_depth(4)
///     .min_n(10)
///     .criterion(Criterion::Entropy)
///     .build();
/// let f = tree.fit(&dataset).unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct DecisionTreeBuilder {
    params: TreeParams,
    features: Option<Vec<String>>,
}


impl DecisionTreeBuilder {
    /// Construct a new instance of [`DecisionTreeBuilder`]
    /// with the default parameters.
    pub fn new() -> Self {
        Self::default()
    }


    /// Start from the given parameters.
    pub fn from_params(params: TreeParams) -> Self {
        Self { params, features: None, }
    }


    /// Specify the maximal depth of the tree.
    /// Default maximal depth is `30`.
    /// `0` yields a single leaf predicting the majority label.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.params.max_depth = depth;
        self
    }


    /// Specify the minimal number of examples in each child of a split.
    /// Default value is `20`.
    pub fn min_n(mut self, min_n: usize) -> Self {
        self.params.min_n = min_n;
        self
    }


    /// Set the impurity measure.
    /// Default value is `Criterion::Gini`.
    pub fn criterion(mut self, criterion: Criterion) -> Self {
        self.params.criterion = criterion;
        self
    }


    /// Discard the splits that decrease the impurity less than `decrease`.
    pub fn min_impurity_decrease(mut self, decrease: f64) -> Self {
        self.params.min_impurity_decrease = decrease;
        self
    }


    /// Bound the number of nodes of the tree.
    pub fn max_nodes(mut self, max_nodes: usize) -> Self {
        self.params.max_nodes = Some(max_nodes);
        self
    }


    /// Restrict the splits to the features named `names`.
    /// By default, every feature of the dataset is a candidate.
    pub fn features<I, S>(mut self, names: I) -> Self
        where I: IntoIterator<Item = S>,
              S: ToString,
    {
        let names = names.into_iter()
            .map(|name| name.to_string())
            .collect();
        self.features = Some(names);
        self
    }


    /// Build a `DecisionTree`.
    /// This method consumes `self`.
    /// The parameters are checked when the tree is fitted.
    pub fn build(self) -> DecisionTree {
        DecisionTree::new(self.params, self.features)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_01() {
        let tree = DecisionTreeBuilder::new()
            .max_depth(3)
            .min_n(2)
            .criterion(Criterion::Entropy)
            .build();
        let exp = TreeParams {
            max_depth: 3,
            min_n: 2,
            criterion: Criterion::Entropy,
            ..TreeParams::default()
        };
        let res = tree.params();
        assert_eq!(&exp, res, "expected {exp:?}, got {res:?}.");
    }
}
