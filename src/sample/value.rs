use serde::{Serialize, Deserialize};
use std::fmt;


/// A single feature value of an example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Value of a numeric feature.
    Numeric(f64),
    /// Level of a categorical feature.
    Categorical(String),
}


impl Value {
    /// Returns the number if `self` is numeric.
    #[inline]
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            Self::Numeric(x) => Some(*x),
            Self::Categorical(_) => None,
        }
    }


    /// Returns the level if `self` is categorical.
    #[inline]
    pub fn as_category(&self) -> Option<&str> {
        match self {
            Self::Numeric(_) => None,
            Self::Categorical(level) => Some(level),
        }
    }


    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Self::Numeric(_) => "numeric",
            Self::Categorical(_) => "categorical",
        }
    }
}


impl From<f64> for Value {
    #[inline]
    fn from(x: f64) -> Self {
        Self::Numeric(x)
    }
}


impl From<&str> for Value {
    #[inline]
    fn from(level: &str) -> Self {
        Self::Categorical(level.to_string())
    }
}


impl From<String> for Value {
    #[inline]
    fn from(level: String) -> Self {
        Self::Categorical(level)
    }
}


impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(x) => write!(f, "{x}"),
            Self::Categorical(level) => write!(f, "{level}"),
        }
    }
}
