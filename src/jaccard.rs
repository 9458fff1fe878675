//! Jaccard similarity estimates from pairs of completed signatures.

use log::debug;

use crate::error::SketchError;
use crate::min_hash::{BottomKSignature, MatrixSignature, OphSignature, Signature};

/// Estimate the Jaccard index of the sets underlying two signatures.
///
/// Both signatures must use the same strategy and the same hash coefficients; anything
/// else is rejected before an estimate is computed.
pub fn jaccard(sig_a: &Signature, sig_b: &Signature) -> Result<f64, SketchError> {
    if sig_a.num_positions() == 0 || sig_b.num_positions() == 0 {
        return Err(SketchError::EmptyInput);
    }

    match (sig_a, sig_b) {
        (Signature::Matrix(a), Signature::Matrix(b)) => matrix_jaccard(a, b),
        (Signature::BottomK(a), Signature::BottomK(b)) => bottom_k_jaccard(a, b),
        (Signature::Oph(a), Signature::Oph(b)) => oph_jaccard(a, b),
        _ => Err(SketchError::MismatchedSignature(format!(
            "cannot compare a {} signature with a {} signature",
            sig_a.strategy_name(),
            sig_b.strategy_name()
        ))),
    }
}

/// Fraction of hash functions whose minima agree.
pub fn matrix_jaccard(
    sig_a: &MatrixSignature,
    sig_b: &MatrixSignature,
) -> Result<f64, SketchError> {
    if sig_a.len() != sig_b.len() {
        return Err(SketchError::MismatchedSignature(format!(
            "signature lengths differ ({} vs {})",
            sig_a.len(),
            sig_b.len()
        )));
    }

    if sig_a.family() != sig_b.family() {
        return Err(SketchError::MismatchedSignature(
            "signatures were built with different hash coefficients".to_string(),
        ));
    }

    if sig_a.is_empty() {
        return Err(SketchError::MismatchedSignature(
            "signatures contain no hash functions".to_string(),
        ));
    }

    let same = sig_a
        .minima()
        .iter()
        .zip(sig_b.minima())
        .filter(|(a, b)| a == b)
        .count();

    Ok(same as f64 / sig_a.len() as f64)
}

/// Bottom-k estimate: the `k` smallest hashes of the union are found by merging the two
/// sketches, and the estimate is the fraction of those present in both sketches.
///
/// The denominator is the size of the merged sketch. This is `k` whenever the union
/// holds at least `k` positions, and keeps the estimate exact for smaller sets.
pub fn bottom_k_jaccard(
    sig_a: &BottomKSignature,
    sig_b: &BottomKSignature,
) -> Result<f64, SketchError> {
    if sig_a.k() != sig_b.k() {
        return Err(SketchError::MismatchedSignature(format!(
            "sketch sizes differ ({} vs {})",
            sig_a.k(),
            sig_b.k()
        )));
    }

    if sig_a.hasher() != sig_b.hasher() {
        return Err(SketchError::MismatchedSignature(
            "sketches were built with different hash coefficients".to_string(),
        ));
    }

    let merged = sig_a.queue().merge(sig_b.queue())?;
    if merged.is_empty() {
        return Err(SketchError::EmptyInput);
    }

    let positions_a = sig_a.queue().elements();
    let positions_b = sig_b.queue().elements();
    let shared = merged
        .iter()
        .filter(|entry| {
            positions_a.contains(&entry.position) && positions_b.contains(&entry.position)
        })
        .count();

    debug!(
        "Bottom-k merge retained {} entries, {} shared by both sketches.",
        merged.len(),
        shared
    );

    Ok(shared as f64 / merged.len() as f64)
}

/// Fraction of densified bins holding the same value in both signatures.
pub fn oph_jaccard(sig_a: &OphSignature, sig_b: &OphSignature) -> Result<f64, SketchError> {
    if sig_a.num_bins() != sig_b.num_bins() {
        return Err(SketchError::MismatchedSignature(format!(
            "numbers of bins differ ({} vs {})",
            sig_a.num_bins(),
            sig_b.num_bins()
        )));
    }

    if sig_a.hasher() != sig_b.hasher() {
        return Err(SketchError::MismatchedSignature(
            "sketches were built with different hash coefficients".to_string(),
        ));
    }

    let same = sig_a
        .bins()
        .iter()
        .zip(sig_b.bins())
        .filter(|(a, b)| a == b)
        .count();

    Ok(same as f64 / sig_a.num_bins() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use indicatif::ProgressBar;

    use crate::hashing::{BinnedHash, HashFamily, LinearHash, CHR_1_PRIME, CHR_1_SIZE};
    use crate::interval::Interval;
    use crate::min_hash::{BottomKSketcher, MatrixSketcher, OphSketcher, Sketcher};

    fn bottom_k(intervals: &[Interval], k: usize, seed: u64) -> Signature {
        let hasher = Arc::new(LinearHash::generate(CHR_1_SIZE + 1, CHR_1_PRIME, seed).unwrap());
        let mut sketcher = BottomKSketcher::new(hasher, k).unwrap();
        sketcher.sketch_intervals(intervals, &ProgressBar::hidden()).unwrap();
        sketcher.finish().unwrap()
    }

    fn matrix(intervals: &[Interval], num_hashes: usize, seed: u64) -> Signature {
        let family = Arc::new(
            HashFamily::generate(num_hashes, CHR_1_SIZE + 1, CHR_1_PRIME, seed).unwrap(),
        );
        let mut sketcher = MatrixSketcher::new(family);
        sketcher.sketch_intervals(intervals, &ProgressBar::hidden()).unwrap();
        sketcher.finish().unwrap()
    }

    fn oph(intervals: &[Interval], num_bins: usize, seed: u64) -> Signature {
        let hasher = Arc::new(
            BinnedHash::generate(num_bins, CHR_1_SIZE + 1, CHR_1_PRIME, seed).unwrap(),
        );
        let mut sketcher = OphSketcher::new(hasher);
        sketcher.sketch_intervals(intervals, &ProgressBar::hidden()).unwrap();
        sketcher.finish().unwrap()
    }

    fn set_a() -> Vec<Interval> {
        vec![Interval::new(1, 5), Interval::new(3, 8)]
    }

    fn set_b() -> Vec<Interval> {
        vec![Interval::new(4, 6), Interval::new(10, 12)]
    }

    #[test]
    fn test_bottom_k_small_sets_exact() {
        // union {1..7, 10, 11} has 9 positions, intersection {4, 5}
        for seed in [1, 30, 99] {
            for k in [9, 10, 100] {
                let a = bottom_k(&set_a(), k, seed);
                let b = bottom_k(&set_b(), k, seed);
                let estimate = jaccard(&a, &b).unwrap();
                assert!((estimate - 2.0 / 9.0).abs() < 1e-12, "k = {k}: {estimate}");
            }
        }
    }

    #[test]
    fn test_self_comparison_is_one() {
        let intervals = vec![Interval::new(100, 5_000), Interval::new(4_000, 9_000)];

        let a = bottom_k(&intervals, 100, 30);
        assert_eq!(jaccard(&a, &a).unwrap(), 1.0);

        let a = bottom_k(&set_a(), 100, 30);
        assert_eq!(jaccard(&a, &a).unwrap(), 1.0);

        let m = matrix(&intervals, 100, 30);
        assert_eq!(jaccard(&m, &m).unwrap(), 1.0);

        let o = oph(&intervals, 100, 30);
        assert_eq!(jaccard(&o, &o).unwrap(), 1.0);

        // sparse: most bins are filled by densification
        let o = oph(&set_a(), 100, 30);
        assert_eq!(jaccard(&o, &o).unwrap(), 1.0);
    }

    #[test]
    fn test_oph_identical_sets_from_separate_sketches() {
        let intervals = vec![Interval::new(100, 5_000), Interval::new(4_000, 9_000)];
        let a = oph(&intervals, 64, 30);
        let b = oph(&intervals, 64, 30);
        assert_eq!(jaccard(&a, &b).unwrap(), 1.0);
    }

    #[test]
    fn test_disjoint_sets_near_zero() {
        let a_intervals = vec![Interval::new(1, 20_000)];
        let b_intervals = vec![Interval::new(1_000_000, 1_020_000)];

        let a = bottom_k(&a_intervals, 200, 30);
        let b = bottom_k(&b_intervals, 200, 30);
        assert_eq!(jaccard(&a, &b).unwrap(), 0.0);

        let a = matrix(&a_intervals, 200, 30);
        let b = matrix(&b_intervals, 200, 30);
        assert!(jaccard(&a, &b).unwrap() < 0.05);

        let a = oph(&a_intervals, 64, 30);
        let b = oph(&b_intervals, 64, 30);
        assert!(jaccard(&a, &b).unwrap() < 0.05);
    }

    #[test]
    fn test_estimates_within_range() {
        let a_intervals = vec![Interval::new(1, 3_000), Interval::new(5_000, 7_000)];
        let b_intervals = vec![Interval::new(2_000, 6_000)];
        for seed in 0..5 {
            for sig in [
                (bottom_k(&a_intervals, 64, seed), bottom_k(&b_intervals, 64, seed)),
                (matrix(&a_intervals, 64, seed), matrix(&b_intervals, 64, seed)),
                (oph(&a_intervals, 64, seed), oph(&b_intervals, 64, seed)),
            ] {
                let estimate = jaccard(&sig.0, &sig.1).unwrap();
                assert!((0.0..=1.0).contains(&estimate));
            }
        }
    }

    #[test]
    fn test_estimates_close_over_repeated_trials() {
        // |A| = |B| = 2000, |A n B| = 1000, true Jaccard 1/3
        let a_intervals = vec![Interval::new(10_000, 12_000)];
        let b_intervals = vec![Interval::new(11_000, 13_000)];
        let trials = 20;

        let mut bottom_k_total = 0.0;
        let mut matrix_total = 0.0;
        for seed in 0..trials {
            let a = bottom_k(&a_intervals, 200, seed);
            let b = bottom_k(&b_intervals, 200, seed);
            bottom_k_total += jaccard(&a, &b).unwrap();

            let a = matrix(&a_intervals, 100, seed);
            let b = matrix(&b_intervals, 100, seed);
            matrix_total += jaccard(&a, &b).unwrap();
        }

        let bottom_k_mean = bottom_k_total / trials as f64;
        let matrix_mean = matrix_total / trials as f64;
        assert!((bottom_k_mean - 1.0 / 3.0).abs() < 0.1, "bottom-k mean {bottom_k_mean}");
        assert!((matrix_mean - 1.0 / 3.0).abs() < 0.1, "matrix mean {matrix_mean}");
    }

    #[test]
    fn test_deterministic_estimate() {
        let a1 = bottom_k(&set_a(), 4, 30);
        let b1 = bottom_k(&set_b(), 4, 30);
        let a2 = bottom_k(&set_a(), 4, 30);
        let b2 = bottom_k(&set_b(), 4, 30);
        assert_eq!(
            jaccard(&a1, &b1).unwrap().to_bits(),
            jaccard(&a2, &b2).unwrap().to_bits()
        );
    }

    #[test]
    fn test_mismatched_strategies() {
        let a = bottom_k(&set_a(), 10, 30);
        let b = matrix(&set_b(), 10, 30);
        assert!(matches!(jaccard(&a, &b), Err(SketchError::MismatchedSignature(_))));

        let c = oph(&set_b(), 10, 30);
        assert!(matches!(jaccard(&a, &c), Err(SketchError::MismatchedSignature(_))));
        assert!(matches!(jaccard(&c, &b), Err(SketchError::MismatchedSignature(_))));
    }

    #[test]
    fn test_mismatched_coefficients() {
        let a = bottom_k(&set_a(), 10, 30);
        let b = bottom_k(&set_b(), 10, 31);
        assert!(matches!(jaccard(&a, &b), Err(SketchError::MismatchedSignature(_))));

        let a = matrix(&set_a(), 10, 30);
        let b = matrix(&set_b(), 10, 31);
        assert!(matches!(jaccard(&a, &b), Err(SketchError::MismatchedSignature(_))));

        let a = oph(&set_a(), 10, 30);
        let b = oph(&set_b(), 10, 31);
        assert!(matches!(jaccard(&a, &b), Err(SketchError::MismatchedSignature(_))));
    }

    #[test]
    fn test_mismatched_sizes() {
        let a = bottom_k(&set_a(), 10, 30);
        let b = bottom_k(&set_b(), 12, 30);
        assert!(matches!(jaccard(&a, &b), Err(SketchError::MismatchedSignature(_))));

        let a = matrix(&set_a(), 10, 30);
        let b = matrix(&set_b(), 12, 30);
        assert!(matches!(jaccard(&a, &b), Err(SketchError::MismatchedSignature(_))));

        let a = oph(&set_a(), 10, 30);
        let b = oph(&set_b(), 12, 30);
        assert!(matches!(jaccard(&a, &b), Err(SketchError::MismatchedSignature(_))));
    }

    #[test]
    fn test_empty_signature_rejected() {
        let hasher = Arc::new(LinearHash::generate(CHR_1_SIZE + 1, CHR_1_PRIME, 30).unwrap());
        let empty = BottomKSketcher::new(hasher, 10).unwrap().finish().unwrap();
        let a = bottom_k(&set_a(), 10, 30);
        assert!(matches!(jaccard(&empty, &a), Err(SketchError::EmptyInput)));
    }
}
