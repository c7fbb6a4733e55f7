//! This file defines split rules for decision tree.
use serde::{Serialize, Deserialize};

use crate::sample::{Schema, Value};


/// The output of the function `split` of `Splitter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeftRight {
    /// Go to the left child.
    Left,
    /// Go to the right child.
    Right,
}


/// A rule that sends an example to the left or the right child.
/// Features are referred by their position in the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Splitter {
    /// `value < threshold` goes left.
    Threshold {
        /// Position of a numeric feature.
        feature: usize,
        /// Midpoint between two consecutive observed values.
        threshold: f64,
    },
    /// `value == level` goes left, every other level goes right.
    /// A level unseen at training time always goes right.
    Level {
        /// Position of a categorical feature.
        feature: usize,
        /// The level sent to the left.
        level: String,
    },
}


impl Splitter {
    /// Returns the position of the feature this rule tests.
    #[inline]
    pub fn feature(&self) -> usize {
        match self {
            Self::Threshold { feature, .. } => *feature,
            Self::Level { feature, .. } => *feature,
        }
    }


    /// Defines the splitting.
    /// `values` must already conform to the schema.
    #[inline]
    pub fn split(&self, values: &[Value]) -> LeftRight {
        let value = &values[self.feature()];
        let left = match (self, value) {
            (Self::Threshold { threshold, .. }, Value::Numeric(x)) => {
                x < threshold
            },
            (Self::Level { level, .. }, Value::Categorical(y)) => {
                level == y
            },
            _ => false,
        };

        if left { LeftRight::Left } else { LeftRight::Right }
    }


    /// Human readable form of the test that sends an example left.
    pub fn describe(&self, schema: &Schema) -> String {
        let name = schema.features()[self.feature()].name();
        match self {
            Self::Threshold { threshold, .. } => {
                format!("{name} < {threshold:.3}")
            },
            Self::Level { level, .. } => {
                format!("{name} == {level}")
            },
        }
    }
}
