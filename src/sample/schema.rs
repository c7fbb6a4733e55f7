use serde::{Serialize, Deserialize};

use std::collections::HashSet;

use crate::error::{Result, TreeError};
use super::value::Value;


/// The type of a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureKind {
    /// Real valued feature.
    Numeric,
    /// Feature that takes one of the declared levels.
    Categorical(Vec<String>),
}


/// Name and type of a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    name: String,
    kind: FeatureKind,
}


impl FeatureSpec {
    /// Construct a numeric feature named `name`.
    pub fn numeric<T: ToString>(name: T) -> Self {
        Self { name: name.to_string(), kind: FeatureKind::Numeric, }
    }


    /// Construct a categorical feature named `name`
    /// that takes one of `levels`.
    pub fn categorical<T, I, S>(name: T, levels: I) -> Self
        where T: ToString,
              I: IntoIterator<Item = S>,
              S: ToString,
    {
        let levels = levels.into_iter()
            .map(|level| level.to_string())
            .collect();
        Self { name: name.to_string(), kind: FeatureKind::Categorical(levels), }
    }


    /// Get the feature name.
    pub fn name(&self) -> &str {
        &self.name
    }


    /// Get the feature type.
    pub fn kind(&self) -> &FeatureKind {
        &self.kind
    }


    /// Returns `true` if this feature is categorical.
    pub fn is_categorical(&self) -> bool {
        matches!(self.kind, FeatureKind::Categorical(_))
    }


    /// Returns the declared levels.
    /// Numeric features have no level.
    pub fn levels(&self) -> &[String] {
        match &self.kind {
            FeatureKind::Numeric => &[],
            FeatureKind::Categorical(levels) => &levels[..],
        }
    }


    /// Returns the position of `level` in the declared levels.
    pub fn level_index(&self, level: &str) -> Option<usize> {
        self.levels()
            .iter()
            .position(|l| l == level)
    }


    /// Check that `value` has the type of this feature.
    /// Levels are not checked here.
    pub(crate) fn accepts(&self, value: &Value) -> bool {
        matches!(
            (&self.kind, value),
            (FeatureKind::Numeric, Value::Numeric(_))
            | (FeatureKind::Categorical(_), Value::Categorical(_))
        )
    }
}


/// The explicit schema of a dataset:
/// the ordered features and the declared label order.
/// The label order breaks ties between majority classes
/// and fixes the shape of confusion matrices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    features: Vec<FeatureSpec>,
    labels: Vec<String>,
}


impl Schema {
    /// Construct a new schema.
    /// Feature names and labels must be unique and non-empty,
    /// and every categorical feature needs at least one level.
    pub fn new<S: ToString>(features: Vec<FeatureSpec>, labels: Vec<S>)
        -> Result<Self>
    {
        let labels = labels.into_iter()
            .map(|label| label.to_string())
            .collect::<Vec<_>>();

        if features.is_empty() {
            return Err(TreeError::invalid("schema has no feature"));
        }
        if labels.is_empty() {
            return Err(TreeError::invalid("schema has no label"));
        }
        if let Some(dup) = first_duplicate(features.iter().map(|f| f.name())) {
            return Err(TreeError::invalid(
                format!("feature `{dup}` is declared twice")
            ));
        }
        if let Some(dup) = first_duplicate(labels.iter().map(|l| &l[..])) {
            return Err(TreeError::invalid(
                format!("label `{dup}` is declared twice")
            ));
        }

        for feature in features.iter().filter(|f| f.is_categorical()) {
            let name = feature.name();
            if feature.levels().is_empty() {
                return Err(TreeError::invalid(
                    format!("categorical feature `{name}` has no level")
                ));
            }
            if let Some(dup) = first_duplicate(feature.levels().iter().map(|l| &l[..])) {
                return Err(TreeError::invalid(
                    format!("level `{dup}` of `{name}` is declared twice")
                ));
            }
        }

        Ok(Self { features, labels })
    }


    /// Returns a slice of type `FeatureSpec`.
    pub fn features(&self) -> &[FeatureSpec] {
        &self.features[..]
    }


    /// Returns the declared labels in order.
    pub fn labels(&self) -> &[String] {
        &self.labels[..]
    }


    /// Returns the number of features.
    pub fn n_features(&self) -> usize {
        self.features.len()
    }


    /// Returns the number of labels.
    pub fn n_labels(&self) -> usize {
        self.labels.len()
    }


    /// Returns the position of the feature named `name`.
    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.features.iter()
            .position(|f| f.name() == name)
    }


    /// Returns the position of `label` in the declared label order.
    pub fn label_index(&self, label: &str) -> Option<usize> {
        self.labels.iter()
            .position(|l| l == label)
    }


    /// Check the arity and the types of `values`.
    /// Returns a message describing the first violation.
    pub(crate) fn check_shape(&self, values: &[Value])
        -> std::result::Result<(), String>
    {
        let expected = self.n_features();
        if values.len() != expected {
            return Err(format!(
                "expected {expected} feature values, got {}", values.len()
            ));
        }

        for (feature, value) in self.features.iter().zip(values) {
            if !feature.accepts(value) {
                return Err(format!(
                    "feature `{}` expects a {} value, got {} value `{value}`",
                    feature.name(),
                    if feature.is_categorical() { "categorical" } else { "numeric" },
                    value.kind_name(),
                ));
            }
        }
        Ok(())
    }


    /// Returns `true` if examples of `other` can be fed
    /// to a tree fitted on `self`:
    /// same feature names and types in the same order, same labels.
    /// The declared levels may differ.
    pub fn is_compatible(&self, other: &Schema) -> bool {
        self.labels == other.labels
            && self.features.len() == other.features.len()
            && self.features.iter()
                .zip(&other.features)
                .all(|(a, b)| {
                    a.name() == b.name()
                        && a.is_categorical() == b.is_categorical()
                })
    }


    /// Returns a new schema that keeps the features at `indices`.
    pub(crate) fn project(&self, indices: &[usize]) -> Result<Self> {
        let features = indices.iter()
            .map(|&k| self.features[k].clone())
            .collect();
        Self::new(features, self.labels.clone())
    }


    /// Returns a new schema with the label order replaced.
    pub(crate) fn with_labels(&self, labels: Vec<String>) -> Result<Self> {
        Self::new(self.features.clone(), labels)
    }
}


fn first_duplicate<'a, I>(items: I) -> Option<&'a str>
    where I: IntoIterator<Item = &'a str>
{
    let mut seen = HashSet::new();
    items.into_iter()
        .find(|item| !seen.insert(*item))
}


#[cfg(test)]
mod tests {
    use super::*;

    fn toy_schema() -> Schema {
        let features = vec![
            FeatureSpec::numeric("age"),
            FeatureSpec::categorical("region", ["north", "south"]),
        ];
        Schema::new(features, vec!["yes", "no"]).unwrap()
    }

    #[test]
    fn test_schema_lookup_01() {
        let schema = toy_schema();
        assert_eq!(schema.feature_index("region"), Some(1));
        assert_eq!(schema.label_index("no"), Some(1));
        assert_eq!(schema.features()[1].level_index("south"), Some(1));
        assert_eq!(schema.features()[0].levels().len(), 0);
    }

    #[test]
    fn test_schema_duplicate_feature() {
        let features = vec![
            FeatureSpec::numeric("age"),
            FeatureSpec::numeric("age"),
        ];
        let res = Schema::new(features, vec!["yes"]);
        assert!(matches!(res, Err(TreeError::InvalidInput(_))));
    }

    #[test]
    fn test_schema_no_feature() {
        let res = Schema::new(Vec::new(), vec!["yes"]);
        assert!(matches!(res, Err(TreeError::InvalidInput(_))));
    }

    #[test]
    fn test_schema_no_level() {
        let features = vec![
            FeatureSpec::categorical("region", Vec::<String>::new()),
        ];
        let res = Schema::new(features, vec!["yes"]);
        assert!(matches!(res, Err(TreeError::InvalidInput(_))));
    }

    #[test]
    fn test_check_shape_01() {
        let schema = toy_schema();
        let ok = vec![Value::from(31.0), Value::from("north")];
        assert!(schema.check_shape(&ok).is_ok());

        let short = vec![Value::from(31.0)];
        assert!(schema.check_shape(&short).is_err());

        let swapped = vec![Value::from("north"), Value::from(31.0)];
        assert!(schema.check_shape(&swapped).is_err());
    }

    #[test]
    fn test_is_compatible_ignores_levels() {
        let schema = toy_schema();
        let features = vec![
            FeatureSpec::numeric("age"),
            FeatureSpec::categorical("region", ["north"]),
        ];
        let other = Schema::new(features, vec!["yes", "no"]).unwrap();
        assert!(schema.is_compatible(&other));

        let reordered = schema.with_labels(
            vec!["no".to_string(), "yes".to_string()]
        ).unwrap();
        assert!(!schema.is_compatible(&reordered));
    }
}
