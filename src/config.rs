//! Tree Configuration
//!
//! Parameters controlling discretization, tree growth and pruning, plus the
//! json IO shared by the configuration and fitted trees.
use crate::constants::{LABEL_PRECISION, MAX_SPLITS, MULTIVALUE_THRESHOLD, SIGNIFICANCE_LEVEL};
use crate::errors::ChiTreeError;
use crate::utils::{validate_float_parameter, validate_positive_usize_parameter};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_significance_level() -> f64 {
    SIGNIFICANCE_LEVEL
}
fn default_max_splits() -> usize {
    MAX_SPLITS
}
fn default_multivalue_threshold() -> usize {
    MULTIVALUE_THRESHOLD
}
fn default_label_precision() -> usize {
    LABEL_PRECISION
}

/// Configuration for the `DecisionTree`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Significance level of the chi-squared pruning test, in (0, 1).
    /// Lower values prune more aggressively.
    #[serde(default = "default_significance_level")]
    pub significance_level: f64,
    /// Split budget when discretizing a continuous attribute.
    #[serde(default = "default_max_splits")]
    pub max_splits: usize,
    /// Domain size above which information gain only considers a random subset of the values.
    #[serde(default = "default_multivalue_threshold")]
    pub multivalue_threshold: usize,
    /// Fraction digits of continuous bin labels.
    #[serde(default = "default_label_precision")]
    pub label_precision: usize,
    /// Seed for random tie-breaking.
    #[serde(default)]
    pub seed: u64,
    /// Whether to prune right after fitting.
    #[serde(default)]
    pub prune: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            significance_level: SIGNIFICANCE_LEVEL,
            max_splits: MAX_SPLITS,
            multivalue_threshold: MULTIVALUE_THRESHOLD,
            label_precision: LABEL_PRECISION,
            seed: 0,
            prune: false,
        }
    }
}

impl TreeConfig {
    // Set methods for paramters

    /// Set the significance level used when pruning.
    /// * `significance_level` - Value in (0, 1), lower values collapse more splits.
    pub fn set_significance_level(mut self, significance_level: f64) -> Self {
        self.significance_level = significance_level;
        self
    }

    /// Set the split budget of continuous attributes.
    pub fn set_max_splits(mut self, max_splits: usize) -> Self {
        self.max_splits = max_splits;
        self
    }

    /// Set the multivalue threshold.
    /// * `multivalue_threshold` - Attributes with more values than this only have a
    ///   shuffled subset of that many values looked at when computing information gain.
    pub fn set_multivalue_threshold(mut self, multivalue_threshold: usize) -> Self {
        self.multivalue_threshold = multivalue_threshold;
        self
    }

    pub fn set_label_precision(mut self, label_precision: usize) -> Self {
        self.label_precision = label_precision;
        self
    }

    /// Set the seed of the random generator used for tie-breaking.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set whether `fit` also prunes the tree.
    pub fn set_prune(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }

    /// Check all parameters are in range.
    pub fn validate(&self) -> Result<(), ChiTreeError> {
        validate_float_parameter(self.significance_level, 0.0, 1.0, "significance_level")?;
        validate_positive_usize_parameter(self.max_splits, "max_splits")?;
        validate_positive_usize_parameter(self.multivalue_threshold, "multivalue_threshold")?;
        Ok(())
    }
}

/// IO
pub trait ConfigIO: Serialize + DeserializeOwned + Sized {
    /// Save as a json object to a file.
    ///
    /// * `path` - Path to save to.
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ChiTreeError> {
        fs::write(path, self.json_dump()?).map_err(|e| ChiTreeError::UnableToWrite(e.to_string()))
    }

    /// Dump as a json object
    fn json_dump(&self) -> Result<String, ChiTreeError> {
        serde_json::to_string(self).map_err(|e| ChiTreeError::UnableToWrite(e.to_string()))
    }

    /// Load from Json string
    ///
    /// * `json_str` - String object, which can be serialized to json.
    fn from_json(json_str: &str) -> Result<Self, ChiTreeError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| ChiTreeError::UnableToRead(e.to_string()))
    }

    /// Load from a path to a json object.
    ///
    /// * `path` - Path to load from.
    fn load<P: AsRef<Path>>(path: P) -> Result<Self, ChiTreeError> {
        let json_str = fs::read_to_string(path).map_err(|e| ChiTreeError::UnableToRead(e.to_string()))?;
        Self::from_json(&json_str)
    }
}

impl ConfigIO for TreeConfig {}
