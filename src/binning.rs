//! Binning
//!
//! Supervised discretization of a continuous attribute. Split points are chosen
//! recursively, each one maximizing the information gain of the class labels
//! over the values it partitions.
use crate::utils::count_entropy;

/// Splits with a gain at or below this are not worth a bin.
const MIN_GAIN: f64 = 1e-12;

// Best boundary found while scanning one sorted slice.
struct Boundary {
    gain: f64,
    threshold: f64,
    // Index of the first value on the right side.
    right_start: usize,
    p_left: usize,
    n_left: usize,
}

/// Discretize a continuous column into ascending cut points.
///
/// The `(value, label)` pairs are sorted in place, then split recursively
/// until no boundary improves the class entropy or `max_splits` cuts have been
/// accepted. The returned cuts always end with `f64::INFINITY`, so every value
/// larger than the last finite cut still falls in a bin.
///
/// * `values` - `(value, label)` pairs of a single attribute.
/// * `max_splits` - Split budget shared by the whole recursion.
pub fn supervised_cuts(values: &mut [(f64, bool)], max_splits: usize) -> Vec<f64> {
    values.sort_by(|a, b| a.0.total_cmp(&b.0));
    let p = values.iter().filter(|(_, l)| *l).count();
    let n = values.len() - p;
    let mut n_splits = 0;
    let mut cuts = bin(p, n, values, &mut n_splits, max_splits);
    cuts.push(f64::INFINITY);
    cuts.dedup();
    cuts
}

/// Recursively bin a sorted slice holding `p` positives and `n` negatives.
fn bin(p: usize, n: usize, values: &[(f64, bool)], n_splits: &mut usize, max_splits: usize) -> Vec<f64> {
    if *n_splits >= max_splits || values.len() <= 1 || p + n == 0 {
        return Vec::new();
    }

    let best = match best_boundary(p, n, values) {
        Some(b) => b,
        None => return Vec::new(),
    };
    *n_splits += 1;

    let (left, right) = values.split_at(best.right_start);
    let mut cuts = bin(best.p_left, best.n_left, left, n_splits, max_splits);
    cuts.push(best.threshold);
    cuts.extend(bin(p - best.p_left, n - best.n_left, right, n_splits, max_splits));
    cuts
}

/// Scan the sorted slice for the label change whose midpoint threshold has the
/// highest information gain. Values equal to a threshold always stay on its
/// left side, so a run of ties is never split apart.
fn best_boundary(p: usize, n: usize, values: &[(f64, bool)]) -> Option<Boundary> {
    let base_entropy = count_entropy(p, n);
    let total = (p + n) as f64;
    let mut best: Option<Boundary> = None;

    let (mut p_seen, mut n_seen) = if values[0].1 { (1, 0) } else { (0, 1) };
    let mut i = 1;
    while i < values.len() {
        let (prev_value, prev_label) = values[i - 1];
        let (value, label) = values[i];
        if label == prev_label {
            if label {
                p_seen += 1;
            } else {
                n_seen += 1;
            }
            i += 1;
            continue;
        }

        let threshold = 0.5 * (prev_value + value);
        let mut right_start = i;
        let (mut p_left, mut n_left) = (p_seen, n_seen);
        while right_start < values.len() && values[right_start].0 <= threshold {
            if values[right_start].1 {
                p_left += 1;
            } else {
                n_left += 1;
            }
            right_start += 1;
        }

        if right_start < values.len() {
            let (p_right, n_right) = (p - p_left, n - n_left);
            let entropy = (p_left + n_left) as f64 / total * count_entropy(p_left, n_left)
                + (p_right + n_right) as f64 / total * count_entropy(p_right, n_right);
            let gain = base_entropy - entropy;
            if gain > best.as_ref().map_or(MIN_GAIN, |b| b.gain) {
                best = Some(Boundary {
                    gain,
                    threshold,
                    right_start,
                    p_left,
                    n_left,
                });
            }
        }

        // Resume after the tie run, it can not hold another boundary.
        let next = right_start.max(i + 1);
        for (_, l) in &values[i..next] {
            if *l {
                p_seen += 1;
            } else {
                n_seen += 1;
            }
        }
        i = next;
    }
    best
}
