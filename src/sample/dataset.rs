use polars::prelude::*;

use std::ops::Index;
use std::sync::Arc;

use crate::error::{Result, TreeError};
use super::schema::{FeatureSpec, Schema};
use super::value::Value;


/// A labeled example: a fixed-length vector of feature values
/// and one categorical label.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    values: Vec<Value>,
    label: String,
}


impl Example {
    /// Construct a new example.
    pub fn new<S: ToString>(values: Vec<Value>, label: S) -> Self {
        Self { values, label: label.to_string(), }
    }


    /// Returns the feature values.
    pub fn values(&self) -> &[Value] {
        &self.values[..]
    }


    /// Returns the label.
    pub fn label(&self) -> &str {
        &self.label
    }
}


/// Struct `Dataset` holds an ordered sequence of examples
/// that conform to one [`Schema`].
/// Every example is checked against the schema on construction,
/// so downstream code relies on the arity, the types, the levels,
/// and the labels without checking again.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: Arc<Schema>,
    examples: Vec<Example>,
    // Position of each example's label in `schema.labels()`.
    targets: Vec<usize>,
}


impl Dataset {
    /// Construct a new dataset.
    pub fn new(schema: Schema, examples: Vec<Example>) -> Result<Self> {
        Self::with_schema(Arc::new(schema), examples)
    }


    /// Construct a new dataset that shares `schema` with other datasets.
    pub fn with_schema(schema: Arc<Schema>, examples: Vec<Example>)
        -> Result<Self>
    {
        let mut targets = Vec::with_capacity(examples.len());
        for (row, example) in examples.iter().enumerate() {
            schema.check_shape(example.values())
                .map_err(|msg| TreeError::invalid(format!("example {row}: {msg}")))?;

            let features = schema.features().iter().zip(example.values());
            for (feature, value) in features {
                match value {
                    Value::Numeric(x) if !x.is_finite() => {
                        return Err(TreeError::invalid(format!(
                            "example {row}: feature `{}` is not finite ({x})",
                            feature.name()
                        )));
                    },
                    Value::Categorical(level)
                        if feature.level_index(level).is_none() =>
                    {
                        return Err(TreeError::invalid(format!(
                            "example {row}: `{level}` is not a level of `{}`",
                            feature.name()
                        )));
                    },
                    _ => {},
                }
            }

            let label = example.label();
            let target = schema.label_index(label)
                .ok_or_else(|| TreeError::invalid(format!(
                    "example {row}: label `{label}` is not declared"
                )))?;
            targets.push(target);
        }

        Ok(Self { schema, examples, targets })
    }


    /// Convert `polars::DataFrame` into `Dataset`.
    /// The column named `target` becomes the label.
    /// Numeric columns become numeric features and
    /// all the other columns become categorical features
    /// whose levels are ordered by first appearance.
    /// The label order is also the order of first appearance.
    pub fn from_dataframe(data: &DataFrame, target: &str) -> Result<Self> {
        let labels_column = data.column(target)?
            .cast(&DataType::Utf8)?;
        let labels_column = labels_column.utf8()?
            .into_iter()
            .enumerate()
            .map(|(row, y)| {
                y.map(|y| y.to_string())
                    .ok_or_else(|| TreeError::invalid(format!(
                        "row {row}: target `{target}` is missing"
                    )))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut labels = Vec::new();
        labels_column.iter()
            .for_each(|y| push_unique(&mut labels, y));

        let mut specs = Vec::new();
        let mut columns = Vec::new();
        for series in data.get_columns() {
            let name = series.name();
            if name == target { continue; }

            let missing = |row: usize| TreeError::invalid(format!(
                "row {row}: feature `{name}` is missing"
            ));

            if series.dtype().is_numeric() {
                let series = series.cast(&DataType::Float64)?;
                let column = series.f64()?
                    .into_iter()
                    .enumerate()
                    .map(|(row, x)| x.map(Value::Numeric).ok_or_else(|| missing(row)))
                    .collect::<Result<Vec<_>>>()?;
                specs.push(FeatureSpec::numeric(name));
                columns.push(column);
            } else {
                let series = series.cast(&DataType::Utf8)?;
                let mut levels = Vec::new();
                let column = series.utf8()?
                    .into_iter()
                    .enumerate()
                    .map(|(row, level)| {
                        let level = level.ok_or_else(|| missing(row))?;
                        push_unique(&mut levels, level);
                        Ok(Value::from(level))
                    })
                    .collect::<Result<Vec<_>>>()?;
                specs.push(FeatureSpec::categorical(name, levels));
                columns.push(column);
            }
        }

        let schema = Schema::new(specs, labels)?;

        let mut columns = columns.into_iter()
            .map(|column| column.into_iter())
            .collect::<Vec<_>>();
        let examples = labels_column.into_iter()
            .map(|label| {
                let values = columns.iter_mut()
                    .filter_map(Iterator::next)
                    .collect::<Vec<_>>();
                Example::new(values, label)
            })
            .collect::<Vec<_>>();

        Self::new(schema, examples)
    }


    /// Returns the schema of this dataset.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }


    /// Returns the shared pointer to the schema.
    pub fn shared_schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }


    /// Returns a slice of type `Example`.
    pub fn examples(&self) -> &[Example] {
        &self.examples[..]
    }


    /// Returns the number of examples.
    pub fn len(&self) -> usize {
        self.examples.len()
    }


    /// Returns `true` if this dataset has no example.
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }


    /// Returns the pair of the number of examples and
    /// the number of features
    pub fn shape(&self) -> (usize, usize) {
        (self.examples.len(), self.schema.n_features())
    }


    /// Returns the labels in example order.
    pub fn labels(&self) -> Vec<&str> {
        self.examples.iter()
            .map(|example| example.label())
            .collect()
    }


    /// Returns the number of examples per label,
    /// in the declared label order.
    pub fn label_counts(&self) -> Vec<usize> {
        let mut counts = vec![0_usize; self.schema.n_labels()];
        self.targets.iter()
            .for_each(|&y| { counts[y] += 1; });
        counts
    }


    /// Position of the label of the `row`-th example
    /// in the declared label order.
    #[inline]
    pub(crate) fn target(&self, row: usize) -> usize {
        self.targets[row]
    }


    /// Value of the `feature`-th feature of the `row`-th example.
    #[inline]
    pub(crate) fn value(&self, row: usize, feature: usize) -> &Value {
        &self.examples[row].values[feature]
    }


    /// Returns the examples at `indices` as a new dataset
    /// that shares the schema of `self`.
    pub(crate) fn subset(&self, indices: &[usize]) -> Self {
        let examples = indices.iter()
            .map(|&i| self.examples[i].clone())
            .collect();
        let targets = indices.iter()
            .map(|&i| self.targets[i])
            .collect();
        Self { schema: self.shared_schema(), examples, targets, }
    }


    /// Returns a new dataset that keeps only the features named `names`,
    /// in the given order.
    /// This is how the predictors of a model are chosen.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        if names.is_empty() {
            return Err(TreeError::invalid("no feature is selected"));
        }
        let indices = names.iter()
            .map(|name| {
                let name = name.as_ref();
                self.schema.feature_index(name)
                    .ok_or_else(|| TreeError::invalid(
                        format!("the feature named `{name}` does not exist")
                    ))
            })
            .collect::<Result<Vec<_>>>()?;

        let schema = Arc::new(self.schema.project(&indices)?);
        let examples = self.examples.iter()
            .map(|example| {
                let values = indices.iter()
                    .map(|&k| example.values[k].clone())
                    .collect();
                Example::new(values, example.label())
            })
            .collect();

        Ok(Self { schema, examples, targets: self.targets.clone(), })
    }


    /// Engineer a new outcome.
    /// Returns a new dataset whose label order is `labels`
    /// and whose label of each example is `outcome(example)`.
    pub fn relabel<S, F>(&self, labels: Vec<S>, outcome: F) -> Result<Self>
        where S: ToString,
              F: Fn(&Example) -> String,
    {
        let labels = labels.into_iter()
            .map(|label| label.to_string())
            .collect();
        let schema = self.schema.with_labels(labels)?;
        let examples = self.examples.iter()
            .map(|example| Example::new(example.values.clone(), outcome(example)))
            .collect();

        Self::new(schema, examples)
    }
}


impl Index<usize> for Dataset {
    type Output = Example;


    fn index(&self, row: usize) -> &Self::Output {
        &self.examples[row]
    }
}


pub(super) fn push_unique(items: &mut Vec<String>, item: &str) {
    if !items.iter().any(|x| x == item) {
        items.push(item.to_string());
    }
}
