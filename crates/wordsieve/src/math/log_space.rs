//! # Log-Space and Vector Helpers

/// `ln(Σ exp(x))` over `values`, computed stably around the maximum.
///
/// * An empty slice yields `0.0`.
/// * A slice of only `-inf` yields `-inf`.
pub fn log_sum_exp(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }

    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if !max.is_finite() {
        // all `-inf`, or some `+inf` / NaN which dominates anyway.
        return max;
    }

    let sum: f32 = values.iter().map(|&v| (v - max).exp()).sum();
    max + sum.ln()
}

/// `ln(exp(a) + exp(b))`.
pub fn log_add_exp(
    a: f32,
    b: f32,
) -> f32 {
    if a == f32::NEG_INFINITY {
        return b;
    }
    if b == f32::NEG_INFINITY {
        return a;
    }
    let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
    hi + (lo - hi).exp().ln_1p()
}

/// Dot product of two equal-length vectors.
///
/// ## Panics
/// Panics if the lengths differ.
pub fn dot(
    a: &[f32],
    b: &[f32],
) -> f32 {
    assert_eq!(a.len(), b.len(), "dot of vectors with different lengths");
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Euclidean norm.
pub fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity of two vectors.
///
/// A zero vector has no direction; the result is then non-finite (NaN),
/// and callers decide how to treat it.
pub fn cosine_similarity(
    a: &[f32],
    b: &[f32],
) -> f32 {
    dot(a, b) / (norm(a) * norm(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_sum_exp() {
        assert_eq!(log_sum_exp(&[]), 0.0);
        assert_eq!(
            log_sum_exp(&[f32::NEG_INFINITY, f32::NEG_INFINITY]),
            f32::NEG_INFINITY
        );

        let v = [0.5_f32.ln(), 0.25_f32.ln(), 0.25_f32.ln()];
        assert!(log_sum_exp(&v).abs() < 1e-6);

        // large values do not overflow.
        let v = [1000.0, 1000.0];
        assert!((log_sum_exp(&v) - (1000.0 + 2.0_f32.ln())).abs() < 1e-3);

        // `-inf` entries contribute nothing.
        let v = [f32::NEG_INFINITY, 1.5];
        assert!((log_sum_exp(&v) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_log_add_exp() {
        let a = 0.3_f32.ln();
        let b = 0.2_f32.ln();
        assert!((log_add_exp(a, b) - 0.5_f32.ln()).abs() < 1e-6);
        assert_eq!(log_add_exp(f32::NEG_INFINITY, b), b);
        assert_eq!(log_add_exp(a, f32::NEG_INFINITY), a);
    }

    #[test]
    fn test_cosine() {
        assert!((cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 3.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 1.0], &[-1.0, -1.0]) + 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).is_nan());
        assert_eq!(norm(&[3.0, 4.0]), 5.0);
    }
}
