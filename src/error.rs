//! Error types raised while compacting intervals, building sketches, and comparing them.
//!
//! All of these represent correctness violations rather than transient conditions, so
//! callers are expected to propagate them and abort the comparison.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SketchError {
    /// The interval sequence for a set contained no intervals.
    #[error("interval sequence is empty; at least one interval is required")]
    EmptyInput,

    /// An interval was zero-length, inverted, or out of start order.
    #[error("invalid interval #{index} [{start}, {end}): {reason}")]
    InvalidInterval {
        index: usize,
        start: u32,
        end: u32,
        reason: &'static str,
    },

    /// Two signatures cannot be compared meaningfully.
    #[error("signatures are not comparable: {0}")]
    MismatchedSignature(String),

    /// Hash arithmetic would wrap for the configured coefficient domain.
    #[error("a * x + b overflows 64-bit arithmetic for coefficients up to {max_coeff} and positions up to {max_position}")]
    OverflowRisk { max_coeff: u64, max_position: u64 },

    /// A sketching parameter is outside its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The interval source holds no records for the requested chromosome.
    #[error("no intervals found for chromosome '{chrom}' in {source_name}")]
    ChromNotFound { chrom: String, source_name: String },
}
