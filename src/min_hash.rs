//! MinHash signatures over the positions covered by a set of genomic intervals.
//!
//! Three strategies are provided:
//! - `MatrixSketcher` applies `n` independent hash functions to every position and keeps
//!   the running minimum of each, giving the classic signature vector.
//! - `BottomKSketcher` applies a single hash function and keeps the `k` positions with
//!   the smallest hashes, together with the positions themselves so sketches can later
//!   be merged. Only one hash is computed per position, which is much cheaper when sets
//!   hold hundreds of millions of positions.
//! - `OphSketcher` (one-permutation hashing) also computes a single hash per position,
//!   splits the hash range into bins and keeps the minimum hash of each bin. Empty bins
//!   are filled at the end by borrowing from a neighbouring bin.
//!
//! See https://en.wikipedia.org/wiki/MinHash#Variant_with_a_single_hash_function
//! and Shrivastava and Li, 2014: http://www.auai.org/uai2014/proceedings/individuals/225.pdf

use std::sync::Arc;

use indicatif::ProgressBar;

use crate::bounded_queue::{BoundedPriorityQueue, PriorityItem};
use crate::error::SketchError;
use crate::hashing::{BinnedHash, HashFamily, HashValue, LinearHash};
use crate::interval::{compact, Interval, Position};

/// Hash of a position paired with the position itself.
///
/// Ordering is by hash, then position, so positions sharing a hash value are still
/// distinct entries and are never collapsed when sketches are merged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinHashEntry {
    pub hash: HashValue,
    pub position: Position,
}

impl PriorityItem for MinHashEntry {
    type Element = Position;

    fn element(&self) -> Position {
        self.position
    }
}

/// Accumulates positions into a signature.
pub trait Sketcher {
    fn add_position(&mut self, position: Position);

    fn finish(self) -> Result<Signature, SketchError>;

    /// Add every distinct position covered by `intervals`. Returns the number of
    /// positions added.
    fn sketch_intervals(
        &mut self,
        intervals: &[Interval],
        progress_bar: &ProgressBar,
    ) -> Result<u64, SketchError> {
        let mut num_positions = 0;
        for range in compact(intervals)? {
            let len = (range.end - range.start) as u64;
            for position in range {
                self.add_position(position);
            }
            num_positions += len;
            progress_bar.inc(len);
        }

        Ok(num_positions)
    }
}

pub struct MatrixSketcher {
    family: Arc<HashFamily>,
    minima: Vec<HashValue>,
    num_positions: u64,
}

impl MatrixSketcher {
    pub fn new(family: Arc<HashFamily>) -> Self {
        // sentinel exceeds any hash, which are all below the prime
        let minima = vec![HashValue::MAX; family.len()];
        MatrixSketcher {
            family,
            minima,
            num_positions: 0,
        }
    }
}

impl Sketcher for MatrixSketcher {
    #[inline]
    fn add_position(&mut self, position: Position) {
        for (min, hasher) in self.minima.iter_mut().zip(self.family.hashers()) {
            let hash = hasher.hash(position);
            if hash < *min {
                *min = hash;
            }
        }
        self.num_positions += 1;
    }

    fn finish(self) -> Result<Signature, SketchError> {
        Ok(Signature::Matrix(MatrixSignature {
            family: self.family,
            minima: self.minima,
            num_positions: self.num_positions,
        }))
    }
}

pub struct BottomKSketcher {
    hasher: Arc<LinearHash>,
    queue: BoundedPriorityQueue<MinHashEntry>,
    num_positions: u64,
}

impl BottomKSketcher {
    pub fn new(hasher: Arc<LinearHash>, k: usize) -> Result<Self, SketchError> {
        Ok(BottomKSketcher {
            hasher,
            queue: BoundedPriorityQueue::new(k)?,
            num_positions: 0,
        })
    }
}

impl Sketcher for BottomKSketcher {
    #[inline]
    fn add_position(&mut self, position: Position) {
        // the queue keeps its least entries, i.e. the smallest hashes
        self.queue.push(MinHashEntry {
            hash: self.hasher.hash(position),
            position,
        });
        self.num_positions += 1;
    }

    fn finish(self) -> Result<Signature, SketchError> {
        Ok(Signature::BottomK(BottomKSignature {
            hasher: self.hasher,
            queue: self.queue,
            num_positions: self.num_positions,
        }))
    }
}

pub struct OphSketcher {
    hasher: Arc<BinnedHash>,
    bins: Vec<Option<HashValue>>,
    num_positions: u64,
}

impl OphSketcher {
    pub fn new(hasher: Arc<BinnedHash>) -> Self {
        let bins = vec![None; hasher.num_bins()];
        OphSketcher {
            hasher,
            bins,
            num_positions: 0,
        }
    }
}

impl Sketcher for OphSketcher {
    #[inline]
    fn add_position(&mut self, position: Position) {
        let (bin, hash) = self.hasher.bin_and_hash(position);
        let min = &mut self.bins[bin];
        if min.is_none_or(|m| hash < m) {
            *min = Some(hash);
        }
        self.num_positions += 1;
    }

    fn finish(self) -> Result<Signature, SketchError> {
        let bins = densify(&self.bins, &self.hasher)?;
        Ok(Signature::Oph(OphSignature {
            hasher: self.hasher,
            bins,
            num_positions: self.num_positions,
        }))
    }
}

/// Fill every empty bin from the nearest non-empty bin in the bin's seeded direction,
/// wrapping around the ends. A value borrowed from `d` bins away is offset by
/// `d * bin_width`.
pub fn densify(
    bins: &[Option<HashValue>],
    hasher: &BinnedHash,
) -> Result<Vec<HashValue>, SketchError> {
    let n = bins.len();
    let mut dense = Vec::with_capacity(n);
    for (i, value) in bins.iter().enumerate() {
        if let Some(value) = value {
            dense.push(*value);
            continue;
        }

        let borrowed = (1..n).find_map(|distance| {
            let neighbour = if hasher.borrows_right(i) {
                (i + distance) % n
            } else {
                (i + n - distance) % n
            };
            bins[neighbour].map(|v| v + distance as u64 * hasher.bin_width())
        });

        match borrowed {
            Some(value) => dense.push(value),
            None => return Err(SketchError::EmptyInput),
        }
    }

    Ok(dense)
}

#[derive(Clone, Debug)]
pub struct MatrixSignature {
    family: Arc<HashFamily>,
    minima: Vec<HashValue>,
    num_positions: u64,
}

impl MatrixSignature {
    pub fn family(&self) -> &HashFamily {
        &self.family
    }

    pub fn minima(&self) -> &[HashValue] {
        &self.minima
    }

    pub fn len(&self) -> usize {
        self.minima.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minima.is_empty()
    }

    pub fn num_positions(&self) -> u64 {
        self.num_positions
    }
}

#[derive(Clone, Debug)]
pub struct BottomKSignature {
    hasher: Arc<LinearHash>,
    queue: BoundedPriorityQueue<MinHashEntry>,
    num_positions: u64,
}

impl BottomKSignature {
    pub fn hasher(&self) -> &LinearHash {
        &self.hasher
    }

    pub fn queue(&self) -> &BoundedPriorityQueue<MinHashEntry> {
        &self.queue
    }

    pub fn k(&self) -> usize {
        self.queue.capacity()
    }

    pub fn num_positions(&self) -> u64 {
        self.num_positions
    }
}

#[derive(Clone, Debug)]
pub struct OphSignature {
    hasher: Arc<BinnedHash>,
    bins: Vec<HashValue>,
    num_positions: u64,
}

impl OphSignature {
    pub fn hasher(&self) -> &BinnedHash {
        &self.hasher
    }

    /// Densified bin minima.
    pub fn bins(&self) -> &[HashValue] {
        &self.bins
    }

    pub fn num_bins(&self) -> usize {
        self.bins.len()
    }

    pub fn num_positions(&self) -> u64 {
        self.num_positions
    }
}

/// Completed sketch of one interval set.
#[derive(Clone, Debug)]
pub enum Signature {
    Matrix(MatrixSignature),
    BottomK(BottomKSignature),
    Oph(OphSignature),
}

impl Signature {
    pub fn num_positions(&self) -> u64 {
        match self {
            Signature::Matrix(sig) => sig.num_positions(),
            Signature::BottomK(sig) => sig.num_positions(),
            Signature::Oph(sig) => sig.num_positions(),
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        match self {
            Signature::Matrix(_) => "matrix",
            Signature::BottomK(_) => "bottom-k",
            Signature::Oph(_) => "oph",
        }
    }
}
