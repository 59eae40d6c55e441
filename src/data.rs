//! Data
//!
//! Labelled training examples, the tagged attribute values flowing through the
//! domain logic, and the column major matrix holding binned training data.
use crate::errors::ChiTreeError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::io::Read;

/// A single example, mapping attribute names to their raw textual values.
pub type Row = HashMap<String, String>;

/// A value stored in an attribute domain.
///
/// Categorical domains hold the raw strings seen during training, continuous
/// domains hold split thresholds. Both are consumed uniformly by the registry
/// lookups and labelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Categorical(String),
    Numeric(f64),
}

impl Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AttributeValue::Categorical(v) => write!(f, "{}", v),
            AttributeValue::Numeric(v) => write!(f, "{}", v),
        }
    }
}

/// Class predicate used when none is provided: a class text is positive
/// unless it mentions "no".
pub fn default_classifier(class_text: &str) -> bool {
    !class_text.to_lowercase().contains("no")
}

/// Training rows together with their boolean class labels.
///
/// The attribute order is pinned to the header order (minus the class
/// attribute) and drives every enumeration done by the learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    attributes: Vec<String>,
    class_attribute: String,
    rows: Vec<Row>,
    labels: Vec<bool>,
}

impl Dataset {
    /// Create a dataset from already keyed rows.
    ///
    /// * `header` - All column names, in column order, including the class attribute.
    /// * `rows` - The examples, each must have a value for every header column.
    /// * `class_attribute` - Name of the column holding the class text.
    /// * `classify` - Predicate turning class text into a positive/negative label.
    pub fn new<F>(header: &[String], rows: Vec<Row>, class_attribute: &str, classify: F) -> Result<Self, ChiTreeError>
    where
        F: Fn(&str) -> bool,
    {
        if !header.iter().any(|h| h == class_attribute) {
            return Err(ChiTreeError::UnknownAttribute(class_attribute.to_string()));
        }
        let attributes: Vec<String> = header.iter().filter(|h| *h != class_attribute).cloned().collect();

        let mut labels = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if let Some(missing) = header.iter().find(|h| !row.contains_key(*h)) {
                return Err(ChiTreeError::InvalidInput(format!(
                    "row {} has no value for attribute `{}`",
                    i, missing
                )));
            }
            labels.push(classify(&row[class_attribute]));
        }

        Ok(Dataset {
            attributes,
            class_attribute: class_attribute.to_string(),
            rows,
            labels,
        })
    }

    /// Create a dataset from positional records.
    pub fn from_records<F>(
        header: &[&str],
        records: &[&[&str]],
        class_attribute: &str,
        classify: F,
    ) -> Result<Self, ChiTreeError>
    where
        F: Fn(&str) -> bool,
    {
        let header: Vec<String> = header.iter().map(|h| h.to_string()).collect();
        let mut rows = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if record.len() != header.len() {
                return Err(ChiTreeError::InvalidInput(format!(
                    "record {} has {} values, expected {}",
                    i,
                    record.len(),
                    header.len()
                )));
            }
            rows.push(header.iter().cloned().zip(record.iter().map(|v| v.to_string())).collect());
        }
        Self::new(&header, rows, class_attribute, classify)
    }

    /// Read a dataset from delimited text with a header row.
    ///
    /// * `reader` - Source of comma separated records.
    /// * `class_attribute` - Class column, the last column is used when `None`.
    /// * `classify` - Predicate turning class text into a positive/negative label.
    pub fn from_csv<R, F>(reader: R, class_attribute: Option<&str>, classify: F) -> Result<Self, ChiTreeError>
    where
        R: Read,
        F: Fn(&str) -> bool,
    {
        let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
        let header: Vec<String> = csv_reader
            .headers()
            .map_err(|e| ChiTreeError::UnableToRead(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let class_attribute = match class_attribute {
            Some(c) => c.to_string(),
            None => header
                .last()
                .cloned()
                .ok_or_else(|| ChiTreeError::InvalidInput("csv input has an empty header".to_string()))?,
        };

        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let record = result.map_err(|e| ChiTreeError::UnableToRead(e.to_string()))?;
            rows.push(
                header
                    .iter()
                    .cloned()
                    .zip(record.iter().map(|v| v.trim().to_string()))
                    .collect(),
            );
        }
        Self::new(&header, rows, &class_attribute, classify)
    }

    /// Non-class attributes, in header order.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn class_attribute(&self) -> &str {
        &self.class_attribute
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn labels(&self) -> &[bool] {
        &self.labels
    }

    fn row(&self, i: usize) -> Result<&Row, ChiTreeError> {
        self.rows.get(i).ok_or_else(|| {
            ChiTreeError::InvalidInput(format!("row {} is out of range for {} examples", i, self.rows.len()))
        })
    }

    /// Raw value of `attribute` in row `i`.
    pub fn value(&self, i: usize, attribute: &str) -> Result<&str, ChiTreeError> {
        self.row(i)?
            .get(attribute)
            .map(String::as_str)
            .ok_or_else(|| ChiTreeError::UnknownAttribute(attribute.to_string()))
    }

    /// Row `i` without its class attribute, as passed to prediction.
    pub fn probe(&self, i: usize) -> Result<Row, ChiTreeError> {
        Ok(self
            .row(i)?
            .iter()
            .filter(|(k, _)| **k != self.class_attribute)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    /// Collect the `(raw value, label)` column of an attribute.
    pub fn column(&self, attribute: &str) -> Result<Vec<(&str, bool)>, ChiTreeError> {
        if !self.attributes.iter().any(|a| a == attribute) {
            return Err(ChiTreeError::UnknownAttribute(attribute.to_string()));
        }
        Ok(self
            .rows
            .iter()
            .zip(self.labels.iter())
            .map(|(row, label)| (row[attribute].as_str(), *label))
            .collect())
    }

    /// Number of positive and negative examples among `index`.
    pub fn class_counts(&self, index: &[usize]) -> (usize, usize) {
        let p = index.iter().filter(|i| self.labels[**i]).count();
        (p, index.len() - p)
    }
}

/// Contiguous Column Major Matrix data container.
///
/// Holds the bin index of every training example for every attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matrix<T> {
    /// The raw data stored in a single vector.
    pub data: Vec<T>,
    /// Number of rows in the matrix.
    pub rows: usize,
    /// Number of columns in the matrix.
    pub cols: usize,
}

impl<T> Matrix<T> {
    /// Create a new Matrix.
    pub fn new(data: Vec<T>, rows: usize, cols: usize) -> Self {
        Matrix { data, rows, cols }
    }

    fn item_index(&self, i: usize, j: usize) -> usize {
        i + j * self.rows
    }

    /// Get an entire column in the matrix.
    ///
    /// * `col` - The index of the column to get.
    pub fn get_col(&self, col: usize) -> &[T] {
        let start = self.item_index(0, col);
        &self.data[start..start + self.rows]
    }
}
