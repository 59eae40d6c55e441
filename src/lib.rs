// Modules
pub mod attribute;
pub mod binning;
pub mod config;
pub mod constants;
pub mod data;
pub mod errors;
pub mod grower;
pub mod node;
pub mod prune;
pub mod stats;
pub mod tree;
pub mod utils;

// Individual classes, and functions
pub use attribute::{AttributeDomain, AttributeRegistry};
pub use config::{ConfigIO, TreeConfig};
pub use data::{default_classifier, AttributeValue, Dataset, Row};
pub use errors::ChiTreeError;
pub use node::Node;
pub use prune::PruneSummary;
pub use tree::tree::DecisionTree;
