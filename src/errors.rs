//! Errors
//!
//! Custom error types used throughout the `chitree` crate.
use thiserror::Error;

/// Errors that can occur while fitting, pruning or predicting with a decision tree.
#[derive(Debug, Error)]
pub enum ChiTreeError {
    /// A row or value that cannot be used by the tree.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A probe value maps to a branch label the tree never learned at this node.
    #[error("No branch labelled `{label}` for attribute `{attribute}`.")]
    UnknownBranch { attribute: String, label: String },
    /// An attribute name that is not part of the training header.
    #[error("Unknown attribute `{0}`.")]
    UnknownAttribute(String),
    /// Fitting requires at least one training example.
    #[error("Unable to fit a tree on an empty dataset.")]
    EmptyDataset,
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// Unable to write model or config to file.
    #[error("Unable to write to file: {0}")]
    UnableToWrite(String),
    /// Unable to read model, config or data from file.
    #[error("Unable to read from file: {0}")]
    UnableToRead(String),
}
