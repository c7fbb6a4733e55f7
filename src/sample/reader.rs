use std::path::Path;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::collections::HashSet;

use crate::error::{Result, TreeError};
use super::dataset::{push_unique, Dataset, Example};
use super::schema::{FeatureSpec, Schema};
use super::value::Value;


/// A struct that returns [`Dataset`].
/// Using this struct, one can read a CSV file with a header row
/// to [`Dataset`].
/// A column is read as a categorical feature when it is declared
/// by [`DatasetReader::categorical`] or
/// when some of its cells are not numbers.
/// A cell may be wrapped in double quotes
/// to hold the delimiter, and `""` in a quoted cell is one `"`.
/// # Example
/// The following code is a simple example to read a CSV file.
/// ```no_run
/// use minitrees::DatasetReader;
/// let filename = "/path/to/csv/file.csv";
/// let dataset = DatasetReader::default()
///     .file(filename)
///     .target_feature("satisfied")
///     .categorical(["region"])
///     .read()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DatasetReader<P> {
    file: Option<P>,
    target: Option<String>,
    categorical: HashSet<String>,
    labels: Option<Vec<String>>,
    delimiter: char,
}


impl<P> Default for DatasetReader<P> {
    fn default() -> Self {
        Self {
            file: None,
            target: None,
            categorical: HashSet::new(),
            labels: None,
            delimiter: ',',
        }
    }
}


impl<P> DatasetReader<P> {
    /// Set the column name that is used for target label.
    pub fn target_feature<S: ToString>(mut self, column: S) -> Self {
        self.target = Some(column.to_string());
        self
    }


    /// Declare the columns read as categorical features
    /// even if all the cells are numbers.
    pub fn categorical<I, S>(mut self, columns: I) -> Self
        where I: IntoIterator<Item = S>,
              S: ToString,
    {
        self.categorical.extend(columns.into_iter().map(|c| c.to_string()));
        self
    }


    /// Declare the label order.
    /// By default, labels are ordered by first appearance.
    pub fn labels<I, S>(mut self, labels: I) -> Self
        where I: IntoIterator<Item = S>,
              S: ToString,
    {
        self.labels = Some(labels.into_iter().map(|l| l.to_string()).collect());
        self
    }


    /// Set the delimiter. Default is `,`.
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
}


impl<P> DatasetReader<P>
    where P: AsRef<Path>
{
    /// Set the file name.
    pub fn file(mut self, file: P) -> Self {
        self.file = Some(file);
        self
    }


    /// Reads the file based on the arguments,
    /// and returns [`Dataset`].
    /// This method consumes `self`.
    pub fn read(self) -> Result<Dataset> {
        let file = self.file.as_ref()
            .ok_or_else(|| TreeError::invalid("the file name is not set"))?;
        let target = self.target.as_deref()
            .ok_or_else(|| TreeError::invalid(
                "target (class) column is not specified. \
                 Use `DatasetReader::target_feature`."
            ))?;

        let file = File::open(file)?;
        let mut lines = BufReader::new(file).lines();

        let header = lines.next()
            .ok_or_else(|| TreeError::Parse {
                line: 1, message: "the file is empty".to_string(),
            })??;
        let names = self.cells(&header);
        if !names.iter().any(|name| name == target) {
            return Err(TreeError::invalid(
                format!("the target column `{target}` does not exist")
            ));
        }

        // Keep raw cells column by column;
        // the type of a column is known only after all rows are read.
        let n_columns = names.len();
        let mut columns = vec![Vec::new(); n_columns];
        for (k, line) in lines.enumerate() {
            let line = line?;
            if line.trim().is_empty() { continue; }

            let lineno = k + 2;
            let cells = self.cells(&line);
            if cells.len() != n_columns {
                return Err(TreeError::Parse {
                    line: lineno,
                    message: format!(
                        "expected {n_columns} cells, got {}", cells.len()
                    ),
                });
            }
            for (j, cell) in cells.into_iter().enumerate() {
                if cell.is_empty() {
                    return Err(TreeError::Parse {
                        line: lineno,
                        message: format!("column `{}` is missing", names[j]),
                    });
                }
                columns[j].push(cell);
            }
        }

        let mut label_column = Vec::new();
        let mut specs = Vec::new();
        let mut feature_columns = Vec::new();
        for (name, cells) in names.iter().zip(columns) {
            if name == target {
                label_column = cells;
                continue;
            }

            let numbers = if self.categorical.contains(name) {
                None
            } else {
                cells.iter()
                    .map(|cell| cell.parse::<f64>().ok())
                    .collect::<Option<Vec<_>>>()
            };

            match numbers {
                Some(numbers) => {
                    specs.push(FeatureSpec::numeric(name));
                    feature_columns.push(
                        numbers.into_iter().map(Value::Numeric).collect::<Vec<_>>()
                    );
                },
                None => {
                    let mut levels = Vec::new();
                    cells.iter().for_each(|cell| push_unique(&mut levels, cell));
                    specs.push(FeatureSpec::categorical(name, levels));
                    feature_columns.push(
                        cells.into_iter().map(Value::Categorical).collect::<Vec<_>>()
                    );
                },
            }
        }

        let labels = match self.labels {
            Some(labels) => labels,
            None => {
                let mut labels = Vec::new();
                label_column.iter().for_each(|y| push_unique(&mut labels, y));
                labels
            },
        };
        let schema = Schema::new(specs, labels)?;

        let mut feature_columns = feature_columns.into_iter()
            .map(|column| column.into_iter())
            .collect::<Vec<_>>();
        let examples = label_column.into_iter()
            .map(|label| {
                let values = feature_columns.iter_mut()
                    .filter_map(Iterator::next)
                    .collect::<Vec<_>>();
                Example::new(values, label)
            })
            .collect();

        Dataset::new(schema, examples)
    }


    fn cells(&self, line: &str) -> Vec<String> {
        split_cells(line, self.delimiter)
    }
}


/// Split a line into trimmed cells.
/// A delimiter between double quotes belongs to the cell,
/// and `""` inside quotes stands for one `"`.
fn split_cells(line: &str, delimiter: char) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                chars.next();
                cell.push('"');
            },
            '"' => quoted = !quoted,
            c if c == delimiter && !quoted => {
                cells.push(cell.trim().to_string());
                cell.clear();
            },
            c => cell.push(c),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_cells_01() {
        let res = split_cells(" 31, north ,12.5,yes", ',');
        let exp = vec!["31", "north", "12.5", "yes"];
        assert_eq!(exp, res, "expected {exp:?}, got {res:?}.");
    }

    #[test]
    fn test_split_cells_quoted_delimiter() {
        let res = split_cells("31,\"north, coast\",yes", ',');
        let exp = vec!["31", "north, coast", "yes"];
        assert_eq!(exp, res, "expected {exp:?}, got {res:?}.");
    }

    #[test]
    fn test_split_cells_escaped_quote() {
        let res = split_cells("\"say \"\"yes\"\"\";no", ';');
        let exp = vec!["say \"yes\"", "no"];
        assert_eq!(exp, res, "expected {exp:?}, got {res:?}.");
    }
}
