use crate::attribute::AttributeRegistry;
use crate::data::Matrix;
use crate::errors::ChiTreeError;
use crate::node::Node;
use crate::stats::chi_squared_inverse_cdf;
use crate::tree::tree::DecisionTree;
use crate::utils::{majority_label, validate_float_parameter};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// Internal node counts around a pruning pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PruneSummary {
    pub internal_before: usize,
    pub internal_after: usize,
}

impl PruneSummary {
    /// Number of splits turned into leaves.
    pub fn collapsed(&self) -> usize {
        self.internal_before - self.internal_after
    }
}

struct ChiSquaredPruner<'a> {
    registry: &'a AttributeRegistry,
    binned: &'a Matrix<usize>,
    labels: &'a [bool],
    alpha: f64,
    critical: HashMap<usize, f64>,
}

impl ChiSquaredPruner<'_> {
    fn critical_value(&mut self, df: usize) -> f64 {
        let alpha = self.alpha;
        *self
            .critical
            .entry(df)
            .or_insert_with(|| chi_squared_inverse_cdf(alpha, df))
    }

    /// Chi-squared deviation of the per bin class counts from the counts
    /// expected if the split attribute were independent of the class.
    fn deviation(&self, col: usize, size: usize, index: &[usize]) -> f64 {
        let feature = self.binned.get_col(col);
        let mut bin_counts = vec![(0usize, 0usize); size];
        for &i in index {
            let c = &mut bin_counts[feature[i]];
            if self.labels[i] {
                c.0 += 1;
            } else {
                c.1 += 1;
            }
        }
        let p = bin_counts.iter().map(|c| c.0).sum::<usize>() as f64;
        let n = bin_counts.iter().map(|c| c.1).sum::<usize>() as f64;
        let total = p + n;
        if total == 0.0 {
            return 0.0;
        }

        let mut delta = 0.0;
        for (pk, nk) in bin_counts {
            let weight = (pk + nk) as f64 / total;
            for (observed, expected) in [(pk as f64, p * weight), (nk as f64, n * weight)] {
                if expected > 0.0 {
                    delta += (observed - expected).powi(2) / expected;
                }
            }
        }
        delta
    }

    /// Prune the subtree below `node`, returns true if it ends up a leaf.
    fn prune_node<R: Rng + ?Sized>(&mut self, node: &mut Node, rng: &mut R) -> Result<bool, ChiTreeError> {
        let collapsed = match node {
            Node::Leaf { .. } => return Ok(true),
            Node::Internal {
                attribute,
                children,
                index,
                ..
            } => {
                let mut all_leaves = true;
                for child in children.values_mut() {
                    all_leaves &= self.prune_node(child, rng)?;
                }
                if !all_leaves {
                    return Ok(false);
                }

                let col = self.registry.position(attribute)?;
                let size = self.registry.size(attribute)?;
                let delta = self.deviation(col, size, index);
                let df = size.saturating_sub(1);
                let critical = self.critical_value(df);
                if df > 0 && delta >= critical {
                    return Ok(false);
                }
                Node::leaf(majority_label(children.values().filter_map(Node::leaf_label), rng))
            }
        };
        *node = collapsed;
        Ok(true)
    }
}

impl DecisionTree {
    /// Chi-squared prune the tree with a generator seeded from `cfg.seed`.
    pub fn prune(&mut self, significance_level: f64) -> Result<PruneSummary, ChiTreeError> {
        let mut rng = StdRng::seed_from_u64(self.cfg.seed);
        self.prune_with_rng(significance_level, &mut rng)
    }

    /// Collapse, bottom-up, every split whose children are all leaves and whose
    /// class distribution is not significantly different from its parent's.
    ///
    /// A lower `significance_level` raises the critical value, so more splits
    /// collapse.
    ///
    /// * `significance_level` - Pruning parameter, strictly between 0 and 1.
    /// * `rng` - Tie-break source when a collapsed node's children disagree.
    pub fn prune_with_rng<R: Rng + ?Sized>(
        &mut self,
        significance_level: f64,
        rng: &mut R,
    ) -> Result<PruneSummary, ChiTreeError> {
        validate_float_parameter(significance_level, 0.0, 1.0, "significance_level")?;
        let internal_before = self.n_internal();

        let DecisionTree {
            registry,
            dataset,
            binned,
            root,
            ..
        } = self;
        let mut pruner = ChiSquaredPruner {
            registry,
            binned,
            labels: dataset.labels(),
            alpha: 1.0 - significance_level,
            critical: HashMap::new(),
        };
        pruner.prune_node(root, rng)?;

        let summary = PruneSummary {
            internal_before,
            internal_after: self.n_internal(),
        };
        info!(
            "Pruned at significance level {}, collapsed nodes: {} -> {}.",
            significance_level, summary.internal_before, summary.internal_after
        );
        Ok(summary)
    }
}
