//! Attribute
//!
//! Value domains of the training attributes. Categorical attributes keep their
//! distinct raw values, continuous attributes are discretized into supervised
//! bins. The registry is built once from the root training set and then only
//! read by the learner.
use crate::binning::supervised_cuts;
use crate::data::{AttributeValue, Dataset, Matrix};
use crate::errors::ChiTreeError;
use crate::utils::{fmt_threshold, parse_numeric};
use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

/// The values an attribute can take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeDomain {
    /// Distinct raw values, in first-seen order.
    Categorical { values: IndexSet<String> },
    /// Ascending cut points, the last one is `f64::INFINITY`.
    Continuous {
        #[serde(deserialize_with = "parse_cuts")]
        cuts: Vec<f64>,
    },
}

// Json has no infinity, serde_json writes it as null.
fn parse_cuts<'de, D>(d: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Deserialize::deserialize(d).map(|x: Vec<Option<f64>>| x.into_iter().map(|c| c.unwrap_or(f64::INFINITY)).collect())
}

/// Index of the first cut greater or equal to `v`. Values above every finite
/// cut fall into the last bin.
///
/// * `cuts` - Ascending cut points.
/// * `v` - The value to bin.
#[inline]
pub fn find_bin(cuts: &[f64], v: f64) -> usize {
    let idx = cuts.partition_point(|c| *c < v);
    idx.min(cuts.len().saturating_sub(1))
}

impl AttributeDomain {
    /// Number of values, or bins, in the domain.
    pub fn size(&self) -> usize {
        match self {
            AttributeDomain::Categorical { values } => values.len(),
            AttributeDomain::Continuous { cuts } => cuts.len(),
        }
    }

    pub fn is_continuous(&self) -> bool {
        matches!(self, AttributeDomain::Continuous { .. })
    }

    /// The domain values, thresholds for a continuous domain.
    pub fn values(&self) -> Vec<AttributeValue> {
        match self {
            AttributeDomain::Categorical { values } => {
                values.iter().cloned().map(AttributeValue::Categorical).collect()
            }
            AttributeDomain::Continuous { cuts } => cuts.iter().copied().map(AttributeValue::Numeric).collect(),
        }
    }

    /// The value at position `bin` of the domain.
    pub fn value(&self, bin: usize) -> Option<AttributeValue> {
        match self {
            AttributeDomain::Categorical { values } => values.get_index(bin).cloned().map(AttributeValue::Categorical),
            AttributeDomain::Continuous { cuts } => cuts.get(bin).copied().map(AttributeValue::Numeric),
        }
    }
}

/// Per attribute domains, shared read-only by every node of a tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeRegistry {
    domains: IndexMap<String, AttributeDomain>,
    label_precision: usize,
}

// A raw column after type inference, before discretization.
enum Column {
    Categorical(IndexSet<String>),
    Continuous(Vec<(f64, bool)>),
}

/// Infer the type of an attribute from its first value and collect its column.
fn collect_column(attribute: &str, rows: &[(&str, bool)]) -> Result<Column, ChiTreeError> {
    let first = rows.first().ok_or(ChiTreeError::EmptyDataset)?;
    if parse_numeric(first.0).is_some() {
        let mut values = Vec::with_capacity(rows.len());
        for (raw, label) in rows {
            let v = parse_numeric(raw).ok_or_else(|| {
                ChiTreeError::InvalidInput(format!(
                    "value `{}` of continuous attribute `{}` is not numeric",
                    raw, attribute
                ))
            })?;
            values.push((v, *label));
        }
        Ok(Column::Continuous(values))
    } else {
        let mut values: IndexSet<String> = IndexSet::new();
        for (raw, _) in rows {
            if !values.contains(*raw) {
                values.insert(raw.to_string());
            }
        }
        Ok(Column::Categorical(values))
    }
}

impl AttributeRegistry {
    /// Build the domains of every non-class attribute of `dataset`.
    ///
    /// All columns are collected first, the continuous ones are then
    /// discretized in a single pass.
    ///
    /// * `dataset` - The full root training set.
    /// * `max_splits` - Split budget of each continuous attribute.
    /// * `label_precision` - Fraction digits used in continuous bin labels.
    pub fn from_dataset(dataset: &Dataset, max_splits: usize, label_precision: usize) -> Result<Self, ChiTreeError> {
        if dataset.is_empty() {
            return Err(ChiTreeError::EmptyDataset);
        }
        let mut columns = Vec::with_capacity(dataset.attributes().len());
        for attribute in dataset.attributes() {
            let rows = dataset.column(attribute)?;
            columns.push((attribute.clone(), collect_column(attribute, &rows)?));
        }

        let domains = columns
            .into_iter()
            .map(|(attribute, column)| {
                let domain = match column {
                    Column::Categorical(values) => AttributeDomain::Categorical { values },
                    Column::Continuous(mut values) => AttributeDomain::Continuous {
                        cuts: supervised_cuts(&mut values, max_splits),
                    },
                };
                if domain.is_continuous() && domain.size() == 1 {
                    warn!("continuous attribute {} has no informative split, it keeps a single bin", attribute);
                }
                debug!(
                    "attribute {}: {} with {} values",
                    attribute,
                    if domain.is_continuous() { "continuous" } else { "categorical" },
                    domain.size()
                );
                (attribute, domain)
            })
            .collect();

        Ok(AttributeRegistry {
            domains,
            label_precision,
        })
    }

    /// Attribute names, in the pinned enumeration order.
    pub fn attributes(&self) -> impl Iterator<Item = &String> {
        self.domains.keys()
    }

    /// Number of attributes in the registry.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Position of `attribute` in the enumeration order, also its column in
    /// the binned training matrix.
    pub fn position(&self, attribute: &str) -> Result<usize, ChiTreeError> {
        self.domains
            .get_index_of(attribute)
            .ok_or_else(|| ChiTreeError::UnknownAttribute(attribute.to_string()))
    }

    /// Attribute name at position `col`.
    pub fn name(&self, col: usize) -> Option<&str> {
        self.domains.get_index(col).map(|(k, _)| k.as_str())
    }

    pub fn domain(&self, attribute: &str) -> Result<&AttributeDomain, ChiTreeError> {
        self.domains
            .get(attribute)
            .ok_or_else(|| ChiTreeError::UnknownAttribute(attribute.to_string()))
    }

    pub fn is_continuous(&self, attribute: &str) -> Result<bool, ChiTreeError> {
        Ok(self.domain(attribute)?.is_continuous())
    }

    /// Cardinality of the domain of `attribute`.
    pub fn size(&self, attribute: &str) -> Result<usize, ChiTreeError> {
        Ok(self.domain(attribute)?.size())
    }

    /// All values of the domain of `attribute`.
    pub fn values(&self, attribute: &str) -> Result<Vec<AttributeValue>, ChiTreeError> {
        Ok(self.domain(attribute)?.values())
    }

    /// Positions of up to `k` distinct domain values of `attribute`, in random order.
    pub fn sample_bins<R: Rng + ?Sized>(&self, attribute: &str, k: usize, rng: &mut R) -> Result<Vec<usize>, ChiTreeError> {
        let size = self.size(attribute)?;
        Ok(index::sample(rng, size, k.min(size)).into_vec())
    }

    /// A random permutation of the domain of `attribute`, cut to its first `k` values.
    /// The registry itself is left untouched.
    pub fn shuffled_sublist<R: Rng + ?Sized>(
        &self,
        attribute: &str,
        k: usize,
        rng: &mut R,
    ) -> Result<Vec<AttributeValue>, ChiTreeError> {
        let domain = self.domain(attribute)?;
        Ok(self
            .sample_bins(attribute, k, rng)?
            .into_iter()
            .filter_map(|bin| domain.value(bin))
            .collect())
    }

    /// Bin of a numeric value of a continuous attribute.
    pub fn find_bin(&self, attribute: &str, v: f64) -> Result<usize, ChiTreeError> {
        match self.domain(attribute)? {
            AttributeDomain::Continuous { cuts } => Ok(find_bin(cuts, v)),
            AttributeDomain::Categorical { .. } => Err(ChiTreeError::InvalidInput(format!(
                "attribute `{}` is categorical and has no bins",
                attribute
            ))),
        }
    }

    /// Index into the domain of `attribute` a raw value maps to, `None` for
    /// a categorical value that was never seen in training.
    pub fn bin_raw(&self, attribute: &str, raw: &str) -> Result<Option<usize>, ChiTreeError> {
        match self.domain(attribute)? {
            AttributeDomain::Categorical { values } => Ok(values.get_index_of(raw)),
            AttributeDomain::Continuous { cuts } => Ok(Some(find_bin(cuts, parse_probe(attribute, raw)?))),
        }
    }

    /// Index into the domain of `attribute` a domain value maps to.
    pub fn bin_value(&self, attribute: &str, value: &AttributeValue) -> Result<Option<usize>, ChiTreeError> {
        match (self.domain(attribute)?, value) {
            (AttributeDomain::Continuous { cuts }, AttributeValue::Numeric(v)) => Ok(Some(find_bin(cuts, *v))),
            (_, AttributeValue::Categorical(raw)) => self.bin_raw(attribute, raw),
            (AttributeDomain::Categorical { values }, AttributeValue::Numeric(v)) => {
                Ok(values.get_index_of(v.to_string().as_str()))
            }
        }
    }

    /// Whether the raw `probe` matches the learned `value` of `attribute`.
    ///
    /// Categorical values are compared as strings, continuous ones by bin.
    pub fn contained_in(&self, attribute: &str, probe: &str, value: &AttributeValue) -> Result<bool, ChiTreeError> {
        if self.is_continuous(attribute)? {
            Ok(self.bin_raw(attribute, probe)? == self.bin_value(attribute, value)?)
        } else {
            Ok(probe == value.to_string())
        }
    }

    /// Edge label of a domain value.
    pub fn label(&self, attribute: &str, value: &AttributeValue) -> Result<String, ChiTreeError> {
        match (self.domain(attribute)?, value) {
            (AttributeDomain::Categorical { .. }, v) => Ok(v.to_string()),
            (AttributeDomain::Continuous { cuts }, AttributeValue::Numeric(v)) => {
                Ok(self.cut_label(cuts, find_bin(cuts, *v)))
            }
            (AttributeDomain::Continuous { .. }, AttributeValue::Categorical(raw)) => self.label_raw(attribute, raw),
        }
    }

    /// Edge label of a raw probe value.
    pub fn label_raw(&self, attribute: &str, raw: &str) -> Result<String, ChiTreeError> {
        match self.domain(attribute)? {
            AttributeDomain::Categorical { .. } => Ok(raw.to_string()),
            AttributeDomain::Continuous { cuts } => Ok(self.cut_label(cuts, find_bin(cuts, parse_probe(attribute, raw)?))),
        }
    }

    /// Edge labels of every bin of `attribute`, indexed like its domain.
    pub fn bin_labels(&self, attribute: &str) -> Result<Vec<String>, ChiTreeError> {
        match self.domain(attribute)? {
            AttributeDomain::Categorical { values } => Ok(values.iter().cloned().collect()),
            AttributeDomain::Continuous { cuts } => Ok((0..cuts.len()).map(|b| self.cut_label(cuts, b)).collect()),
        }
    }

    fn cut_label(&self, cuts: &[f64], bin: usize) -> String {
        let fmt = |v: f64| fmt_threshold(v, self.label_precision);
        let last = cuts.len().saturating_sub(1);
        if last == 0 {
            "(-inf, inf)".to_string()
        } else if bin >= last {
            format!(">{}", fmt(cuts[last - 1]))
        } else if bin == 0 {
            format!("≤{}", fmt(cuts[0]))
        } else {
            format!("({}, {}]", fmt(cuts[bin - 1]), fmt(cuts[bin]))
        }
    }

    /// Map every training example to the domain index of every attribute.
    ///
    /// Columns follow the registry order. Every training value is part of its
    /// domain, so every cell is set.
    pub fn bin_dataset(&self, dataset: &Dataset) -> Result<Matrix<usize>, ChiTreeError> {
        let mut data = Vec::with_capacity(dataset.len() * self.len());
        for attribute in self.attributes() {
            for i in 0..dataset.len() {
                let raw = dataset.value(i, attribute)?;
                let bin = self.bin_raw(attribute, raw)?.ok_or_else(|| {
                    ChiTreeError::InvalidInput(format!("value `{}` of `{}` is not in its domain", raw, attribute))
                })?;
                data.push(bin);
            }
        }
        Ok(Matrix::new(data, dataset.len(), self.len()))
    }
}

fn parse_probe(attribute: &str, raw: &str) -> Result<f64, ChiTreeError> {
    parse_numeric(raw).ok_or_else(|| {
        ChiTreeError::InvalidInput(format!(
            "value `{}` of continuous attribute `{}` is not numeric",
            raw, attribute
        ))
    })
}
