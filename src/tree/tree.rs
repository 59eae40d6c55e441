use crate::attribute::AttributeRegistry;
use crate::config::{ConfigIO, TreeConfig};
use crate::data::{Dataset, Matrix};
use crate::errors::ChiTreeError;
use crate::grower::DepthFirstGrower;
use crate::node::Node;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A binary decision tree, together with the training data and attribute
/// domains it was grown from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub cfg: TreeConfig,
    pub(crate) registry: AttributeRegistry,
    pub(crate) dataset: Dataset,
    pub(crate) binned: Matrix<usize>,
    pub(crate) root: Node,
}

impl DecisionTree {
    /// Fit a tree, using a generator seeded from `cfg.seed` for tie-breaking.
    ///
    /// * `dataset` - Labelled training examples.
    /// * `cfg` - Tree configuration.
    pub fn fit(dataset: Dataset, cfg: TreeConfig) -> Result<Self, ChiTreeError> {
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        Self::fit_with_rng(dataset, cfg, &mut rng)
    }

    /// Fit a tree, drawing every random tie-break from `rng`.
    pub fn fit_with_rng<R: Rng + ?Sized>(dataset: Dataset, cfg: TreeConfig, rng: &mut R) -> Result<Self, ChiTreeError> {
        cfg.validate()?;
        if dataset.is_empty() {
            return Err(ChiTreeError::EmptyDataset);
        }

        let registry = AttributeRegistry::from_dataset(&dataset, cfg.max_splits, cfg.label_precision)?;
        let binned = registry.bin_dataset(&dataset)?;
        let root = {
            let grower = DepthFirstGrower::new(&dataset, &registry, &binned, cfg.multivalue_threshold)?;
            let index: Vec<usize> = (0..dataset.len()).collect();
            grower.grow(&index, &grower.all_columns(), &[], rng)?
        };

        let mut tree = DecisionTree {
            cfg,
            registry,
            dataset,
            binned,
            root,
        };
        info!(
            "Fitted a tree on {} examples: {} nodes, {} leaves, depth {}.",
            tree.dataset.len(),
            tree.n_nodes(),
            tree.n_leaves(),
            tree.depth()
        );

        if tree.cfg.prune {
            let significance_level = tree.cfg.significance_level;
            tree.prune_with_rng(significance_level, rng)?;
        }
        Ok(tree)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn registry(&self) -> &AttributeRegistry {
        &self.registry
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn n_nodes(&self) -> usize {
        self.root.n_nodes()
    }

    pub fn n_leaves(&self) -> usize {
        self.root.n_leaves()
    }

    /// Number of internal, splitting, nodes.
    pub fn n_internal(&self) -> usize {
        self.root.n_internal()
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

impl DecisionTree {
    /// Check that the stored training data, bins and nodes agree with each
    /// other, as they do for a freshly fitted tree.
    fn check_consistency(&self) -> Result<(), String> {
        let (rows, cols) = (self.dataset.len(), self.registry.len());
        if self.dataset.labels().len() != rows {
            return Err(format!("{} labels for {} examples", self.dataset.labels().len(), rows));
        }
        if self.binned.rows != rows || self.binned.cols != cols || self.binned.data.len() != rows * cols {
            return Err(format!(
                "binned data is {}x{} with {} cells, expected {}x{}",
                self.binned.rows,
                self.binned.cols,
                self.binned.data.len(),
                rows,
                cols
            ));
        }
        for (col, attribute) in self.registry.attributes().enumerate() {
            let size = self.registry.size(attribute).map_err(|e| e.to_string())?;
            if let Some(bin) = self.binned.get_col(col).iter().find(|b| **b >= size) {
                return Err(format!("bin {} of `{}` is outside its {} values", bin, attribute, size));
            }
        }
        check_node(&self.root, &self.registry, rows)
    }
}

fn check_node(node: &Node, registry: &AttributeRegistry, rows: usize) -> Result<(), String> {
    if let Node::Internal {
        attribute,
        children,
        index,
        ..
    } = node
    {
        registry.position(attribute).map_err(|e| e.to_string())?;
        if let Some(i) = index.iter().find(|i| **i >= rows) {
            return Err(format!("node on `{}` holds example {} of {}", attribute, i, rows));
        }
        for child in children.values() {
            check_node(child, registry, rows)?;
        }
    }
    Ok(())
}

impl ConfigIO for DecisionTree {
    /// Load a fitted tree from a json string, rejecting inconsistent trees.
    fn from_json(json_str: &str) -> Result<Self, ChiTreeError> {
        let tree: DecisionTree =
            serde_json::from_str(json_str).map_err(|e| ChiTreeError::UnableToRead(e.to_string()))?;
        tree.check_consistency().map_err(ChiTreeError::UnableToRead)?;
        Ok(tree)
    }
}

impl Display for DecisionTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.root.outline())
    }
}
