//! Struct `Dataset` represents a labeled batch of examples
//! that shares one [`Schema`].

// Provides the feature value type.
pub(crate) mod value;
// Provides the schema checked once at load time.
pub(crate) mod schema;
// Provides dataset struct.
pub(crate) mod dataset;

// Provides a struct that reads a file.
pub(crate) mod reader;

// Provides the stratified train/test split.
pub(crate) mod split;


pub use value::Value;
pub use schema::{FeatureKind, FeatureSpec, Schema};
pub use dataset::{Dataset, Example};
pub use reader::DatasetReader;
pub use split::TrainTestSplit;
