//! Tree Prediction Methods
//!
//! Routing of probe rows from the root to a leaf.
use super::tree::DecisionTree;
use crate::data::Row;
use crate::errors::ChiTreeError;
use crate::node::Node;

impl DecisionTree {
    /// Predict the class of a single probe row.
    ///
    /// The row maps every training attribute, and nothing else, to a raw
    /// value. At each split the value is turned into its bin label and the
    /// matching child is followed.
    ///
    /// * `row` - Attribute name to raw value, without the class attribute.
    pub fn predict(&self, row: &Row) -> Result<bool, ChiTreeError> {
        if row.len() != self.registry.len() {
            return Err(ChiTreeError::InvalidInput(format!(
                "example has {} attributes, the tree was trained on {}",
                row.len(),
                self.registry.len()
            )));
        }

        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { label } => return Ok(*label),
                Node::Internal {
                    attribute, children, ..
                } => {
                    let raw = row.get(attribute).ok_or_else(|| {
                        ChiTreeError::InvalidInput(format!("example has no value for attribute `{}`", attribute))
                    })?;
                    let label = self.registry.label_raw(attribute, raw)?;
                    node = children.get(&label).ok_or_else(|| ChiTreeError::UnknownBranch {
                        attribute: attribute.clone(),
                        label,
                    })?;
                }
            }
        }
    }

    /// Predict every row in turn, stopping at the first failure.
    pub fn predict_rows(&self, rows: &[Row]) -> Result<Vec<bool>, ChiTreeError> {
        rows.iter().map(|row| self.predict(row)).collect()
    }
}
