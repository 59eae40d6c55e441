//! Grower
//!
//! Depth-first, greedy construction of a decision tree. Every node splits on
//! the candidate attribute with the highest information gain and recurses on
//! the examples of each observed bin label, with that attribute removed from
//! the candidates.
use crate::attribute::AttributeRegistry;
use crate::data::{Dataset, Matrix};
use crate::errors::ChiTreeError;
use crate::node::Node;
use crate::utils::{count_entropy, majority, same_classification};
use indexmap::IndexMap;
use rand::Rng;

/// Recursive tree builder over a binned training set.
pub struct DepthFirstGrower<'a> {
    dataset: &'a Dataset,
    registry: &'a AttributeRegistry,
    binned: &'a Matrix<usize>,
    bin_labels: Vec<Vec<String>>,
    multivalue_threshold: usize,
}

impl<'a> DepthFirstGrower<'a> {
    /// * `dataset` - The root training set.
    /// * `registry` - Domains built from `dataset`.
    /// * `binned` - Bin index of every example for every registry attribute.
    /// * `multivalue_threshold` - Domains larger than this are sampled when computing gain.
    pub fn new(
        dataset: &'a Dataset,
        registry: &'a AttributeRegistry,
        binned: &'a Matrix<usize>,
        multivalue_threshold: usize,
    ) -> Result<Self, ChiTreeError> {
        let bin_labels = registry
            .attributes()
            .map(|a| registry.bin_labels(a))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DepthFirstGrower {
            dataset,
            registry,
            binned,
            bin_labels,
            multivalue_threshold,
        })
    }

    /// Columns of every attribute, in enumeration order.
    pub fn all_columns(&self) -> Vec<usize> {
        (0..self.registry.len()).collect()
    }

    fn counts(&self, index: &[usize]) -> (usize, usize) {
        self.dataset.class_counts(index)
    }

    /// Grow the subtree for the examples in `index`.
    ///
    /// * `index` - Examples reaching this node.
    /// * `candidates` - Columns still available for splitting.
    /// * `parent` - Examples of the parent node, used when `index` is empty.
    /// * `rng` - Source for tie-breaking and domain sampling.
    pub fn grow<R: Rng + ?Sized>(
        &self,
        index: &[usize],
        candidates: &[usize],
        parent: &[usize],
        rng: &mut R,
    ) -> Result<Node, ChiTreeError> {
        let labels = self.dataset.labels();
        if index.is_empty() {
            let (p, n) = self.counts(parent);
            return Ok(Node::leaf(majority(p, n, rng)));
        }
        if let Some(label) = same_classification(index.iter().map(|i| labels[*i])) {
            return Ok(Node::leaf(label));
        }
        let (p, n) = self.counts(index);
        if candidates.is_empty() {
            return Ok(Node::leaf(majority(p, n, rng)));
        }

        let mut best: Option<(usize, f64)> = None;
        for &col in candidates {
            let gain = self.information_gain(col, index, rng)?;
            if best.map_or(true, |(_, g)| gain > g) {
                best = Some((col, gain));
            }
        }
        // candidates is not empty
        let (col, _) = best.ok_or(ChiTreeError::EmptyDataset)?;
        let attribute = self.attribute_name(col)?;

        let remaining: Vec<usize> = candidates.iter().copied().filter(|c| *c != col).collect();
        let mut children = IndexMap::new();
        for (label, subset) in self.partition(col, index) {
            let child = self.grow(&subset, &remaining, index, rng)?;
            children.insert(label, child);
        }

        Ok(Node::Internal {
            attribute: attribute.to_string(),
            children,
            index: index.to_vec(),
            positives: p,
            negatives: n,
        })
    }

    /// Split `index` by the bin label of attribute `col`. Labels come out in
    /// domain order, bins that share a label are merged.
    pub fn partition(&self, col: usize, index: &[usize]) -> IndexMap<String, Vec<usize>> {
        let feature = self.binned.get_col(col);
        let labels = &self.bin_labels[col];
        let mut by_bin: Vec<Vec<usize>> = vec![Vec::new(); labels.len()];
        for &i in index {
            by_bin[feature[i]].push(i);
        }
        let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (bin, members) in by_bin.into_iter().enumerate() {
            if !members.is_empty() {
                groups.entry(labels[bin].clone()).or_default().extend(members);
            }
        }
        groups
    }

    /// Reduction of class entropy from splitting `index` on attribute `col`.
    ///
    /// Domains larger than the multivalue threshold only contribute a random
    /// sample of their bins. Bins without examples add nothing.
    pub fn information_gain<R: Rng + ?Sized>(
        &self,
        col: usize,
        index: &[usize],
        rng: &mut R,
    ) -> Result<f64, ChiTreeError> {
        let attribute = self.attribute_name(col)?;
        let size = self.registry.size(attribute)?;

        let labels = self.dataset.labels();
        let feature = self.binned.get_col(col);
        let mut bin_counts = vec![(0usize, 0usize); size];
        for &i in index {
            let c = &mut bin_counts[feature[i]];
            if labels[i] {
                c.0 += 1;
            } else {
                c.1 += 1;
            }
        }

        let (p, n) = self.counts(index);
        let total = (p + n) as f64;
        let weighted = |(pk, nk): (usize, usize)| {
            if pk + nk == 0 {
                0.0
            } else {
                (pk + nk) as f64 / total * count_entropy(pk, nk)
            }
        };
        let remainder: f64 = if size > self.multivalue_threshold {
            self.registry
                .sample_bins(attribute, self.multivalue_threshold, rng)?
                .into_iter()
                .map(|bin| weighted(bin_counts[bin]))
                .sum()
        } else {
            bin_counts.iter().copied().map(weighted).sum()
        };
        Ok(count_entropy(p, n) - remainder)
    }

    fn attribute_name(&self, col: usize) -> Result<&'a str, ChiTreeError> {
        self.registry
            .name(col)
            .ok_or_else(|| ChiTreeError::InvalidInput(format!("no attribute at column {}", col)))
    }
}
