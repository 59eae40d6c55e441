//! Stats
//!
//! The chi-squared distribution used by the pruning significance test.

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEF: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];
const MAX_ITER: usize = 500;
const EPS: f64 = 1e-15;

/// Natural logarithm of the gamma function, for `x > 0`.
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // Reflection formula.
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let mut a = LANCZOS_COEF[0];
    let t = x + LANCZOS_G + 0.5;
    for (i, c) in LANCZOS_COEF.iter().enumerate().skip(1) {
        a += c / (x + i as f64);
    }
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + a.ln()
}

/// Regularized lower incomplete gamma function `P(a, x)`.
pub fn regularized_lower_gamma(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x.is_infinite() {
        return 1.0;
    }
    let ln_prefix = a * x.ln() - x - ln_gamma(a);
    if x < a + 1.0 {
        // Series representation.
        let mut ap = a;
        let mut del = 1.0 / a;
        let mut sum = del;
        for _ in 0..MAX_ITER {
            ap += 1.0;
            del *= x / ap;
            sum += del;
            if del.abs() < sum.abs() * EPS {
                break;
            }
        }
        (sum * ln_prefix.exp()).clamp(0.0, 1.0)
    } else {
        // Continued fraction for Q(a, x), evaluated with the modified Lentz method.
        let tiny = f64::MIN_POSITIVE / EPS;
        let mut b = x + 1.0 - a;
        let mut c = 1.0 / tiny;
        let mut d = 1.0 / b;
        let mut h = d;
        for i in 1..=MAX_ITER {
            let an = -(i as f64) * (i as f64 - a);
            b += 2.0;
            d = an * d + b;
            if d.abs() < tiny {
                d = tiny;
            }
            c = b + an / c;
            if c.abs() < tiny {
                c = tiny;
            }
            d = 1.0 / d;
            let del = d * c;
            h *= del;
            if (del - 1.0).abs() < EPS {
                break;
            }
        }
        (1.0 - ln_prefix.exp() * h).clamp(0.0, 1.0)
    }
}

/// Cumulative distribution function of the chi-squared distribution.
///
/// * `x` - The value to evaluate.
/// * `df` - Degrees of freedom, must be positive.
pub fn chi_squared_cdf(x: f64, df: usize) -> f64 {
    if df == 0 || x <= 0.0 {
        return 0.0;
    }
    regularized_lower_gamma(df as f64 / 2.0, x / 2.0)
}

/// Inverse of [`chi_squared_cdf`], the value below which a fraction `p`
/// of the distribution lies.
///
/// Zero degrees of freedom is a point mass at zero.
pub fn chi_squared_inverse_cdf(p: f64, df: usize) -> f64 {
    if df == 0 || p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    let mut low = 0.0;
    let mut high = (df as f64).max(1.0);
    while chi_squared_cdf(high, df) < p {
        low = high;
        high *= 2.0;
    }
    for _ in 0..MAX_ITER {
        let mid = 0.5 * (low + high);
        if chi_squared_cdf(mid, df) < p {
            low = mid;
        } else {
            high = mid;
        }
        if high - low <= 1e-12 * high.max(1.0) {
            break;
        }
    }
    0.5 * (low + high)
}
