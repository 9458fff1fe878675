//! Estimates the Jaccard similarity of two interval sets on one chromosome.
//!
//! Hash functions are drawn once and shared by both sets. Each set is then read,
//! compacted, and sketched in its own rayon task; the two tasks share nothing mutable
//! and are joined before the estimate is computed. A failure in either task fails the
//! whole comparison.

use std::sync::Arc;

use anyhow::{Context, Result};
use indicatif::MultiProgress;
use log::{error, info};
use num_format::{Locale, ToFormattedString};

use crate::bed::IntervalProvider;
use crate::error::SketchError;
use crate::interval::compact;
use crate::jaccard::jaccard;
use crate::min_hash::{BottomKSketcher, MatrixSketcher, OphSketcher, Signature, Sketcher};
use crate::progress::progress_bar_msg;
use crate::sketch_params::{SharedHashes, SketchParams};

/// Estimate the Jaccard similarity of the positions covered by two interval sets.
pub fn compare_sets<A, B>(
    set_a: &A,
    set_b: &B,
    chrom: &str,
    params: &SketchParams,
) -> Result<f64>
where
    A: IntervalProvider + Sync,
    B: IntervalProvider + Sync,
{
    let k = params.k();
    let (sig_a, sig_b) = match params.hash_functions()? {
        SharedHashes::Single(hasher) => {
            let coeffs = hasher.coefficients();
            info!("Hash coefficients: a = {}, b = {}.", coeffs.a, coeffs.b);
            sketch_pair(set_a, set_b, chrom, || {
                BottomKSketcher::new(Arc::clone(&hasher), k)
            })?
        }
        SharedHashes::Family(family) => {
            info!("Drew {} hash functions.", family.len());
            sketch_pair(set_a, set_b, chrom, || {
                Ok(MatrixSketcher::new(Arc::clone(&family)))
            })?
        }
        SharedHashes::Binned(hasher) => {
            let coeffs = hasher.coefficients();
            info!(
                "Hash coefficients: a = {}, b = {}, split into {} bins of width {}.",
                coeffs.a,
                coeffs.b,
                hasher.num_bins(),
                hasher.bin_width()
            );
            sketch_pair(set_a, set_b, chrom, || {
                Ok(OphSketcher::new(Arc::clone(&hasher)))
            })?
        }
    };

    let estimate = jaccard(&sig_a, &sig_b)?;
    Ok(estimate)
}

/// Sketch both sets concurrently, each with a fresh sketcher from `new_sketcher`.
fn sketch_pair<A, B, S, F>(
    set_a: &A,
    set_b: &B,
    chrom: &str,
    new_sketcher: F,
) -> Result<(Signature, Signature)>
where
    A: IntervalProvider + Sync,
    B: IntervalProvider + Sync,
    S: Sketcher,
    F: Fn() -> Result<S, SketchError> + Sync,
{
    // one draw target for both bars so they stack instead of overwriting each other
    let multi_progress = MultiProgress::new();
    let (sig_a, sig_b) = rayon::join(
        || sketch_set(set_a, chrom, new_sketcher()?, &multi_progress),
        || sketch_set(set_b, chrom, new_sketcher()?, &multi_progress),
    );

    match (sig_a, sig_b) {
        (Ok(sig_a), Ok(sig_b)) => Ok((sig_a, sig_b)),
        (Err(e), Ok(_)) => Err(e.context(format!("Failed to sketch {}", set_a.name()))),
        (Ok(_), Err(e)) => Err(e.context(format!("Failed to sketch {}", set_b.name()))),
        (Err(e_a), Err(e_b)) => {
            error!("Failed to sketch {}: {:#}", set_b.name(), e_b);
            Err(e_a.context(format!("Failed to sketch {}", set_a.name())))
        }
    }
}

/// Read the intervals of one set and sketch the distinct positions they cover.
pub fn sketch_set<P, S>(
    set: &P,
    chrom: &str,
    mut sketcher: S,
    multi_progress: &MultiProgress,
) -> Result<Signature>
where
    P: IntervalProvider + ?Sized,
    S: Sketcher,
{
    let name = set.name();
    let intervals = set
        .intervals(chrom)
        .context(format!("Failed to read intervals for {} on {}", name, chrom))?;
    info!(
        "Read {} intervals on {} from {}.",
        intervals.len().to_formatted_string(&Locale::en),
        chrom,
        name
    );

    let total_positions = compact(&intervals)?.position_count();
    let progress_bar = multi_progress.add(progress_bar_msg(total_positions, name.clone()));
    let num_positions = sketcher.sketch_intervals(&intervals, &progress_bar)?;
    progress_bar.finish();

    info!(
        "Sketched {} distinct positions from {}.",
        num_positions.to_formatted_string(&Locale::en),
        name
    );

    Ok(sketcher.finish()?)
}
