//! This module defines the `SketchParams` struct, which encapsulates the parameters
//! required to build comparable MinHash signatures: the sketching strategy, the sketch
//! size, the prime modulus and coefficient range of the hash family, and the seed used
//! to draw coefficients. Parameters are validated once at setup so that configuration
//! errors surface before any interval data is read.

use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::SketchError;
use crate::hashing::{
    check_overflow, check_prime_modulus, BinnedHash, HashFamily, LinearHash, CHR_1_PRIME,
    CHR_1_SIZE,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Single hash function, keep the k positions with the smallest hashes
    BottomK,
    /// k hash functions, keep the minimum hash of each
    Matrix,
    /// Single hash function split into k bins, keep the minimum hash of each bin
    Oph,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::BottomK => write!(f, "bottom-k"),
            Strategy::Matrix => write!(f, "matrix"),
            Strategy::Oph => write!(f, "oph"),
        }
    }
}

/// Hash functions shared read-only by every pipeline of a comparison.
#[derive(Clone, Debug)]
pub enum SharedHashes {
    Single(Arc<LinearHash>),
    Family(Arc<HashFamily>),
    Binned(Arc<BinnedHash>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SketchParams {
    strategy: Strategy,
    queue_size: usize,
    prime: u64,
    chrom_size: u64,
    seed: u64,
}

impl Default for SketchParams {
    fn default() -> Self {
        SketchParams {
            strategy: Strategy::BottomK,
            queue_size: 100,
            prime: CHR_1_PRIME,
            chrom_size: CHR_1_SIZE,
            seed: 30,
        }
    }
}

impl SketchParams {
    pub fn new(
        strategy: Strategy,
        queue_size: usize,
        prime: u64,
        chrom_size: u64,
        seed: u64,
    ) -> Self {
        SketchParams {
            strategy,
            queue_size,
            prime,
            chrom_size,
            seed,
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Retained positions for bottom-k, number of hash functions for the matrix strategy,
    /// or number of bins for one-permutation hashing.
    pub fn k(&self) -> usize {
        self.queue_size
    }

    pub fn prime(&self) -> u64 {
        self.prime
    }

    pub fn chrom_size(&self) -> u64 {
        self.chrom_size
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Upper bound (inclusive) of the range hash coefficients are drawn from.
    pub fn max_coeff(&self) -> Result<u64, SketchError> {
        self.chrom_size.checked_add(1).ok_or(SketchError::OverflowRisk {
            max_coeff: self.chrom_size,
            max_position: self.chrom_size,
        })
    }

    pub fn validate(&self) -> Result<(), SketchError> {
        if self.queue_size == 0 {
            return Err(SketchError::InvalidParameter(
                "queue size must be greater than zero".to_string(),
            ));
        }

        check_prime_modulus(self.prime, self.chrom_size)?;
        check_overflow(self.max_coeff()?)?;

        Ok(())
    }

    /// Draw the hash functions for this run. Every set in a comparison must be sketched
    /// with the value returned here.
    pub fn hash_functions(&self) -> Result<SharedHashes, SketchError> {
        self.validate()?;

        let max_coeff = self.max_coeff()?;
        let hashes = match self.strategy {
            Strategy::BottomK => SharedHashes::Single(Arc::new(LinearHash::generate(
                max_coeff, self.prime, self.seed,
            )?)),
            Strategy::Matrix => SharedHashes::Family(Arc::new(HashFamily::generate(
                self.queue_size,
                max_coeff,
                self.prime,
                self.seed,
            )?)),
            Strategy::Oph => SharedHashes::Binned(Arc::new(BinnedHash::generate(
                self.queue_size,
                max_coeff,
                self.prime,
                self.seed,
            )?)),
        };

        Ok(hashes)
    }
}
