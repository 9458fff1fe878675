//! Pairwise-independent hashing of genomic positions.
//!
//! Positions are hashed with `h(x) = (a * x + b) mod P` where `P` is a prime larger than
//! any coordinate on the chromosome and `a`, `b` are drawn uniformly from `[0, M]`. All
//! arithmetic is done in 64 bits; parameters are checked up front so `a * x + b` can
//! never wrap for a 32-bit position.
//!
//! See Thorup, 2013: https://arxiv.org/pdf/1303.5479v2.pdf

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;

use crate::error::SketchError;
use crate::interval::Position;

pub type HashValue = u64;

/// Smallest prime larger than chr1 (248,956,422 bp on GRCh38).
pub const CHR_1_PRIME: u64 = 248_956_429;
pub const CHR_1_SIZE: u64 = 248_956_422;

// keeps trial division in `is_prime` cheap
const MAX_PRIME: u64 = 1 << 33;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HashCoefficients {
    pub a: u64,
    pub b: u64,
}

/// A single member of the `(a * x + b) mod P` family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinearHash {
    coeffs: HashCoefficients,
    prime: u64,
}

impl LinearHash {
    pub fn new(coeffs: HashCoefficients, prime: u64) -> Result<Self, SketchError> {
        check_overflow(coeffs.a.max(coeffs.b))?;
        if prime == 0 {
            return Err(SketchError::InvalidParameter(
                "prime modulus must be non-zero".to_string(),
            ));
        }

        Ok(LinearHash { coeffs, prime })
    }

    /// Draw a single hash function with coefficients in `[0, max_coeff]`.
    pub fn generate(max_coeff: u64, prime: u64, seed: u64) -> Result<Self, SketchError> {
        let mut rng = StdRng::seed_from_u64(seed);
        LinearHash::new(draw_coefficients(&mut rng, max_coeff), prime)
    }

    #[inline]
    pub fn hash(&self, x: Position) -> HashValue {
        (self.coeffs.a * x as u64 + self.coeffs.b) % self.prime
    }

    pub fn coefficients(&self) -> HashCoefficients {
        self.coeffs
    }
}

/// A fixed set of hash functions sharing one prime modulus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashFamily {
    hashers: Vec<LinearHash>,
}

impl HashFamily {
    pub fn new(coeffs: &[HashCoefficients], prime: u64) -> Result<Self, SketchError> {
        let hashers = coeffs
            .iter()
            .map(|c| LinearHash::new(*c, prime))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(HashFamily { hashers })
    }

    /// Draw `num_hashes` functions. The `a` values are pairwise distinct, as are the `b`
    /// values, so no two functions in the family coincide.
    pub fn generate(
        num_hashes: usize,
        max_coeff: u64,
        prime: u64,
        seed: u64,
    ) -> Result<Self, SketchError> {
        if num_hashes as u128 > max_coeff as u128 + 1 {
            return Err(SketchError::InvalidParameter(format!(
                "cannot draw {} distinct coefficients from [0, {}]",
                num_hashes, max_coeff
            )));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let coeffs_a = distinct_coefficients(&mut rng, num_hashes, max_coeff);
        let coeffs_b = distinct_coefficients(&mut rng, num_hashes, max_coeff);

        let coeffs: Vec<HashCoefficients> = coeffs_a
            .into_iter()
            .zip(coeffs_b)
            .map(|(a, b)| HashCoefficients { a, b })
            .collect();

        HashFamily::new(&coeffs, prime)
    }

    pub fn len(&self) -> usize {
        self.hashers.len()
    }

    pub fn hashers(&self) -> &[LinearHash] {
        &self.hashers
    }
}

/// One hash function whose range `[0, P)` is split into equal-width bins, as used by
/// one-permutation hashing.
///
/// Each bin also carries a seeded direction used to fill it from a neighbour when no
/// position hashes into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinnedHash {
    hasher: LinearHash,
    bin_width: u64,
    borrow_right: Vec<bool>,
}

impl BinnedHash {
    /// The number of bins is the length of `borrow_right`.
    pub fn new(
        coeffs: HashCoefficients,
        prime: u64,
        borrow_right: Vec<bool>,
    ) -> Result<Self, SketchError> {
        let hasher = LinearHash::new(coeffs, prime)?;
        let num_bins = borrow_right.len() as u64;
        if num_bins == 0 || num_bins > prime {
            return Err(SketchError::InvalidParameter(format!(
                "number of bins must be in [1, {}], got {}",
                prime, num_bins
            )));
        }

        Ok(BinnedHash {
            hasher,
            // rounded up so the largest hash, P - 1, still lands in the last bin
            bin_width: prime / num_bins + 1,
            borrow_right,
        })
    }

    /// Draw the coefficients and the per-bin densification directions from `seed`.
    pub fn generate(
        num_bins: usize,
        max_coeff: u64,
        prime: u64,
        seed: u64,
    ) -> Result<Self, SketchError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let coeffs = draw_coefficients(&mut rng, max_coeff);
        let borrow_right = (0..num_bins).map(|_| rng.random_bool(0.5)).collect();
        BinnedHash::new(coeffs, prime, borrow_right)
    }

    pub fn num_bins(&self) -> usize {
        self.borrow_right.len()
    }

    pub fn bin_width(&self) -> u64 {
        self.bin_width
    }

    /// Bin index and hash of a position.
    #[inline]
    pub fn bin_and_hash(&self, x: Position) -> (usize, HashValue) {
        let hash = self.hasher.hash(x);
        ((hash / self.bin_width) as usize, hash)
    }

    /// Whether an empty `bin` is filled from the next non-empty bin to its right.
    pub fn borrows_right(&self, bin: usize) -> bool {
        self.borrow_right[bin]
    }

    pub fn coefficients(&self) -> HashCoefficients {
        self.hasher.coefficients()
    }
}

fn draw_coefficients(rng: &mut StdRng, max_coeff: u64) -> HashCoefficients {
    let a = rng.random_range(0..=max_coeff);
    let b = rng.random_range(0..=max_coeff);
    HashCoefficients { a, b }
}

fn distinct_coefficients(rng: &mut StdRng, count: usize, max_coeff: u64) -> Vec<u64> {
    let mut seen = FxHashSet::default();
    let mut coeffs = Vec::with_capacity(count);
    while coeffs.len() < count {
        let coeff = rng.random_range(0..=max_coeff);
        if seen.insert(coeff) {
            coeffs.push(coeff);
        }
    }

    coeffs
}

/// Reject coefficient bounds for which `a * x + b` could wrap for some 32-bit position.
pub fn check_overflow(max_coeff: u64) -> Result<(), SketchError> {
    let max_position = Position::MAX as u64;
    max_coeff
        .checked_mul(max_position)
        .and_then(|ax| ax.checked_add(max_coeff))
        .map(|_| ())
        .ok_or(SketchError::OverflowRisk {
            max_coeff,
            max_position,
        })
}

/// Check that `prime` is a usable modulus for a chromosome of `chrom_size` bases.
pub fn check_prime_modulus(prime: u64, chrom_size: u64) -> Result<(), SketchError> {
    if prime >= MAX_PRIME {
        return Err(SketchError::InvalidParameter(format!(
            "prime modulus {} must be below {}",
            prime, MAX_PRIME
        )));
    }

    if prime <= chrom_size {
        return Err(SketchError::InvalidParameter(format!(
            "prime modulus {} must exceed the chromosome size {}",
            prime, chrom_size
        )));
    }

    if !is_prime(prime) {
        return Err(SketchError::InvalidParameter(format!(
            "{} is not prime",
            prime
        )));
    }

    Ok(())
}

/// Trial division; only intended for moduli below 2^33.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }

    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }

    true
}
