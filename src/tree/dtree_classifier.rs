//! Defines the decision tree classifier.
use serde::{Serialize, Serializer, Deserialize};

use std::fmt;
use std::fs::File;
use std::io::{prelude::*, BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;

use crate::classifier::{Classifier, Prediction};
use crate::error::{Result, TreeError};
use crate::sample::{Schema, Value};
use super::node::Node;
use super::params::TreeParams;
use super::tree_file::{self, TreeFile};


/// Decision tree classifier.
/// This struct is the output of [`DecisionTree`](crate::DecisionTree).
/// It keeps the schema it was fitted on,
/// so that predictions can be checked and reported by label name.
///
/// A serialized tree stores its nodes as a flat list.
/// Deserializing checks the nodes against the stored schema,
/// so a loaded tree predicts without panicking.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "TreeFile")]
pub struct DecisionTreeClassifier {
    root: Node,
    schema: Arc<Schema>,
    params: TreeParams,
    features: Vec<usize>,
}


impl DecisionTreeClassifier {
    #[inline]
    pub(super) fn new(
        root: Node,
        schema: Arc<Schema>,
        params: TreeParams,
        features: Vec<usize>,
    ) -> Self
    {
        Self { root, schema, params, features, }
    }


    /// Returns the root node.
    pub fn root(&self) -> &Node {
        &self.root
    }


    /// Returns the hyperparameters this tree was fitted under.
    pub fn params(&self) -> &TreeParams {
        &self.params
    }


    /// Returns the names of the features the splits were searched over.
    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter()
            .map(|&k| self.schema.features()[k].name())
            .collect()
    }


    /// Returns the depth of the tree. A single leaf has depth `0`.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }


    /// Returns the number of leaves.
    pub fn n_leaves(&self) -> usize {
        self.root.n_leaves()
    }


    /// Returns the number of nodes.
    pub fn n_nodes(&self) -> usize {
        self.root.n_nodes()
    }


    /// Write the current decision tree to dot file.
    #[inline]
    pub fn to_dot_file<P>(&self, path: P) -> Result<()>
        where P: AsRef<Path>
    {
        let mut f = BufWriter::new(File::create(path)?);
        f.write_all(b"graph DecisionTree {\n")?;

        let info = self.root.to_dot_info(0, &self.schema).0;
        for row in info {
            f.write_all(row.as_bytes())?;
        }

        f.write_all(b"}\n")?;
        f.flush()?;

        Ok(())
    }


    /// Serialize the tree into a JSON string.
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(json)
    }


    /// Deserialize a tree from a JSON string.
    /// Fails with `InvalidInput` if the nodes disagree with the schema.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: TreeFile = serde_json::from_str(json)?;
        Self::try_from(file)
    }


    /// Write the tree to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut f = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut f, self)?;
        f.flush()?;
        Ok(())
    }


    /// Read a tree from a JSON file written by [`save`](Self::save).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = BufReader::new(File::open(path)?);
        let file: TreeFile = serde_json::from_reader(f)?;
        Self::try_from(file)
    }
}


impl Serialize for DecisionTreeClassifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where S: Serializer
    {
        TreeFile {
            schema: Arc::clone(&self.schema),
            params: self.params.clone(),
            features: self.features.clone(),
            nodes: tree_file::flatten(&self.root),
        }.serialize(serializer)
    }
}


impl TryFrom<TreeFile> for DecisionTreeClassifier {
    type Error = TreeError;
    fn try_from(file: TreeFile) -> Result<Self> {
        let (root, schema, params, features) = file.into_parts()?;
        Ok(Self::new(root, schema, params, features))
    }
}


impl Classifier for DecisionTreeClassifier {
    /// Walk the tree to a leaf and returns its majority label.
    /// A categorical level unseen at training time
    /// is sent to the right child of every level split.
    fn predict(&self, values: &[Value]) -> Result<Prediction<'_>> {
        self.schema.check_shape(values)
            .map_err(TreeError::mismatch)?;
        let distribution = self.root.route(values);
        Ok(Prediction::new(distribution, self.schema.labels()))
    }


    fn schema(&self) -> &Schema {
        &self.schema
    }
}


impl fmt::Display for DecisionTreeClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "DecisionTreeClassifier (depth = {}, leaves = {})",
            self.depth(), self.n_leaves(),
        )?;
        writeln!(f, "{}", self.params)?;
        self.root.write_tree(f, &self.schema, 0)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{Dataset, Example, FeatureSpec};
    use crate::tree::build;

    fn region_dataset() -> Dataset {
        let schema = Schema::new(
            vec![
                FeatureSpec::categorical("region", ["north", "south"]),
                FeatureSpec::numeric("age"),
            ],
            vec!["yes", "no"],
        ).unwrap();
        let examples = (0..6)
            .map(|i| {
                let (region, y) = if i % 2 == 0 {
                    ("north", "no")
                } else {
                    ("south", "yes")
                };
                let values = vec![Value::from(region), Value::from(i as f64)];
                Example::new(values, y)
            })
            .collect();
        Dataset::new(schema, examples).unwrap()
    }

    fn fitted() -> DecisionTreeClassifier {
        let params = TreeParams::default().with_min_n(1);
        build(&region_dataset(), &params).unwrap()
    }

    #[test]
    fn test_predict_01() {
        let f = fitted();
        let values = [Value::from("south"), Value::from(10.0)];
        let p = f.predict(&values).unwrap();
        assert_eq!(p.label(), "yes");
        assert_eq!(p.probability_of("yes"), Some(1.0));
        assert_eq!(p.probability_of("maybe"), None);
    }

    #[test]
    fn test_unseen_level_goes_right() {
        let f = fitted();
        let Node::Branch { splitter, right, .. } = f.root() else {
            panic!("expected a branch at the root");
        };
        assert_eq!(splitter.feature(), 0);

        let values = [Value::from("west"), Value::from(1.0)];
        let p = f.predict(&values).unwrap();
        let exp = right.distribution();
        assert_eq!(p.distribution(), exp);
    }

    #[test]
    fn test_predict_wrong_arity() {
        let f = fitted();
        let res = f.predict(&[Value::from("north")]);
        assert!(matches!(res, Err(TreeError::SchemaMismatch(_))));
    }

    #[test]
    fn test_predict_wrong_kind() {
        let f = fitted();
        let res = f.predict(&[Value::from(1.0), Value::from(1.0)]);
        assert!(matches!(res, Err(TreeError::SchemaMismatch(_))));
    }

    #[test]
    fn test_predict_all_incompatible() {
        let f = fitted();
        let other = region_dataset().select(&["age"]).unwrap();
        let res = f.predict_all(&other);
        assert!(matches!(res, Err(TreeError::SchemaMismatch(_))));
    }

    #[test]
    fn test_json_01() {
        let f = fitted();
        let json = f.to_json().unwrap();
        let g = DecisionTreeClassifier::from_json(&json).unwrap();
        assert_eq!(f, g);
    }

    #[test]
    fn test_json_out_of_range_feature() {
        let f = fitted();
        let json = f.to_json().unwrap();
        assert!(json.contains("\"feature\":0"), "got {json}");

        let json = json.replace("\"feature\":0", "\"feature\":7");
        let res = DecisionTreeClassifier::from_json(&json);
        assert!(matches!(res, Err(TreeError::InvalidInput(_))), "got {res:?}");
    }

    #[test]
    fn test_json_wrong_kind_and_label() {
        let f = fitted();
        let json = f.to_json().unwrap();

        // The root tests `region`, a categorical feature.
        let json = json.replace("\"feature\":0", "\"feature\":1");
        let res = DecisionTreeClassifier::from_json(&json);
        assert!(matches!(res, Err(TreeError::InvalidInput(_))), "got {res:?}");

        let json = f.to_json().unwrap()
            .replace("\"predicted\":0", "\"predicted\":5");
        let res = DecisionTreeClassifier::from_json(&json);
        assert!(matches!(res, Err(TreeError::InvalidInput(_))), "got {res:?}");
    }

    #[test]
    fn test_json_invalid_schema() {
        let f = fitted();
        let json = f.to_json().unwrap()
            .replace("\"no\"]", "\"yes\"]");
        let res = DecisionTreeClassifier::from_json(&json);
        assert!(matches!(res, Err(TreeError::InvalidInput(_))), "got {res:?}");
    }

    #[test]
    fn test_serde_goes_through_checks() {
        let f = fitted();
        let json = serde_json::to_string(&f).unwrap()
            .replace("\"feature\":0", "\"feature\":7");
        let res = serde_json::from_str::<DecisionTreeClassifier>(&json);
        assert!(res.is_err());
    }

    #[test]
    fn test_display_01() {
        let f = fitted();
        let text = f.to_string();
        assert!(text.contains("region == north"), "got {text}");
        assert!(text.contains("leaf"), "got {text}");
    }
}
