/// Split budget for the supervised binning of a single continuous attribute.
pub const MAX_SPLITS: usize = 10;
/// Domain size above which information gain only looks at a shuffled prefix of the values.
pub const MULTIVALUE_THRESHOLD: usize = 10;
/// Fraction digits used when formatting continuous bin labels.
pub const LABEL_PRECISION: usize = 2;
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;
pub const POSITIVE_LABEL: &str = "+";
pub const NEGATIVE_LABEL: &str = "-";
