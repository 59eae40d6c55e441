use crate::errors::ChiTreeError;
use rand::Rng;

// Validation
pub fn validate_float_parameter(value: f64, min: f64, max: f64, parameter: &str) -> Result<(), ChiTreeError> {
    if value.is_nan() || value <= min || max <= value {
        let ex_msg = format!("real value strictly between {} and {}", min, max);
        Err(ChiTreeError::InvalidParameter(
            parameter.to_string(),
            ex_msg,
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

pub fn validate_positive_usize_parameter(value: usize, parameter: &str) -> Result<(), ChiTreeError> {
    if value == 0 {
        Err(ChiTreeError::InvalidParameter(
            parameter.to_string(),
            "a positive integer".to_string(),
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Entropy, in bits, of a Bernoulli variable with success probability `q`.
///
/// An undefined ratio (`q` is NaN, e.g. from an empty subset) yields zero.
#[inline]
pub fn binary_entropy(q: f64) -> f64 {
    if q.is_nan() || q <= 0.0 || q >= 1.0 {
        return 0.0;
    }
    let one_minus = 1.0 - q;
    -(q * q.log2() + one_minus * one_minus.log2())
}

/// Entropy of a `(p, n)` class count pair.
#[inline]
pub fn count_entropy(p: usize, n: usize) -> f64 {
    if p + n == 0 {
        return 0.0;
    }
    binary_entropy(p as f64 / (p + n) as f64)
}

/// Pick the majority of `p` positives against `n` negatives,
/// a tie is broken uniformly at random.
pub fn majority<R: Rng + ?Sized>(p: usize, n: usize, rng: &mut R) -> bool {
    match p.cmp(&n) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => rng.gen_bool(0.5),
    }
}

/// Majority class of a list of labels.
pub fn majority_label<R: Rng + ?Sized>(labels: impl IntoIterator<Item = bool>, rng: &mut R) -> bool {
    let (p, n) = labels
        .into_iter()
        .fold((0, 0), |(p, n), l| if l { (p + 1, n) } else { (p, n + 1) });
    majority(p, n, rng)
}

/// If every label is the same, return it.
pub fn same_classification(labels: impl IntoIterator<Item = bool>) -> Option<bool> {
    let mut labels = labels.into_iter();
    let first = labels.next()?;
    labels.all(|l| l == first).then_some(first)
}

/// Parse a raw value as a number. NaN is not considered numeric.
#[inline]
pub fn parse_numeric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Format a threshold with at most `precision` fraction digits,
/// dropping trailing zeros.
pub fn fmt_threshold(v: f64, precision: usize) -> String {
    if v.is_infinite() {
        return if v > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    let s = format!("{:.*}", precision, precision_round(v, precision as i32));
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    };
    if s == "-0" {
        "0".to_string()
    } else {
        s
    }
}

#[inline]
pub fn precision_round(n: f64, precision: i32) -> f64 {
    let p = (10.0_f64).powi(precision);
    (n * p).round() / p
}
