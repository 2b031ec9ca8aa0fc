//! Bloom filter for probabilistic set membership
//!
//! A Bloom filter is a space-efficient probabilistic data structure that tests
//! whether an element is a member of a set. False positives are possible, but
//! false negatives are not.
//!
//! Hash positions are derived from SHA-256 and depend only on the item, the
//! hash index and the filter size, so equally configured filters agree bit
//! for bit and can be merged.

use crate::config::FilterConfig;
use crate::error::{Error, Result};
use sha2::{Digest, Sha256};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bloom filter for set membership testing
///
/// # Example
///
/// ```
/// use kmertree::membership::BloomFilter;
///
/// let mut bloom = BloomFilter::new(1000, 3).unwrap();
///
/// bloom.insert(b"ACGT");
/// bloom.insert(b"TGCA");
///
/// assert!(bloom.contains(b"ACGT"));  // true - definitely inserted
/// assert!(bloom.contains(b"TGCA"));  // true - definitely inserted
/// assert!(!bloom.contains(b"GGGG")); // probably false (might be false positive)
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawBloomFilter"))]
pub struct BloomFilter {
    /// Bit array packed into u64 words
    bits: Vec<u64>,
    /// Number of bits (m)
    size: usize,
    /// Number of hash functions (k)
    num_hashes: usize,
}

impl BloomFilter {
    /// Create an empty filter with `size` bits and `num_hashes` positions per item
    ///
    /// Fails with [`Error::InvalidConfiguration`] if either is zero.
    pub fn new(size: usize, num_hashes: usize) -> Result<Self> {
        Ok(Self::from_config(&FilterConfig::new(size, num_hashes)?))
    }

    /// Create an empty filter from a validated configuration
    pub fn from_config(config: &FilterConfig) -> Self {
        let size = config.size();
        let num_words = size.div_ceil(64);

        Self {
            bits: vec![0u64; num_words],
            size,
            num_hashes: config.num_hashes(),
        }
    }

    /// Bit positions selected for `item`, one per hash index
    ///
    /// Position `i` is the SHA-256 digest of the decimal form of `i` followed
    /// by the item bytes, read as a big-endian integer modulo the filter size.
    /// Positions for one item may repeat.
    pub fn hash_positions(&self, item: &[u8]) -> Vec<usize> {
        positions(item, self.size, self.num_hashes).collect()
    }

    /// Insert an item into the filter
    pub fn insert(&mut self, item: &[u8]) {
        for bit_idx in positions(item, self.size, self.num_hashes) {
            self.bits[bit_idx / 64] |= 1u64 << (bit_idx % 64);
        }
    }

    /// Check if an item might be in the filter
    ///
    /// Returns `true` if the item might be in the set (possibly a false positive),
    /// or `false` if the item is definitely not in the set.
    pub fn contains(&self, item: &[u8]) -> bool {
        positions(item, self.size, self.num_hashes).all(|bit_idx| self.bit(bit_idx))
    }

    /// Union of two filters of equal size
    ///
    /// Returns a new filter; neither operand changes. The hash count is taken
    /// from `self`, so both operands should share it.
    pub fn merge(&self, other: &Self) -> Result<Self> {
        if self.size != other.size {
            return Err(Error::SizeMismatch {
                expected: self.size,
                found: other.size,
            });
        }

        let bits = self
            .bits
            .iter()
            .zip(other.bits.iter())
            .map(|(a, b)| a | b)
            .collect();

        Ok(Self {
            bits,
            size: self.size,
            num_hashes: self.num_hashes,
        })
    }

    /// Whether the bit at `pos` is set
    ///
    /// # Panics
    ///
    /// Panics if `pos >= size`
    pub fn bit(&self, pos: usize) -> bool {
        assert!(pos < self.size, "bit position {} out of range", pos);
        self.bits[pos / 64] & (1u64 << (pos % 64)) != 0
    }

    /// Get the number of bits in the filter
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get the number of hash functions
    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    /// Configuration this filter was built with
    pub fn config(&self) -> FilterConfig {
        FilterConfig::new_unchecked(self.size, self.num_hashes)
    }

    /// Get the number of bits set to 1
    pub fn bits_set(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// True if no bit is set
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&w| w == 0)
    }

    /// Memory used by the bit vector
    pub fn size_bytes(&self) -> usize {
        self.bits.len() * 8
    }

    /// Estimate the current false positive rate
    ///
    /// This is based on the actual fill ratio of the filter.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        let fill_ratio = self.bits_set() as f64 / self.size as f64;
        fill_ratio.powi(self.num_hashes as i32)
    }

    /// Estimate the number of distinct items in the filter
    ///
    /// Uses the fill ratio to estimate cardinality.
    pub fn estimated_count(&self) -> f64 {
        let bits_set = self.bits_set() as f64;
        let m = self.size as f64;
        let k = self.num_hashes as f64;

        if bits_set >= m {
            return f64::INFINITY;
        }

        // n ≈ -m/k * ln(1 - X/m) where X is bits set
        -(m / k) * (1.0 - bits_set / m).ln()
    }
}

/// Unvalidated form used when deserializing
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawBloomFilter {
    bits: Vec<u64>,
    size: usize,
    num_hashes: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<RawBloomFilter> for BloomFilter {
    type Error = Error;

    fn try_from(raw: RawBloomFilter) -> Result<Self> {
        let config = FilterConfig::new(raw.size, raw.num_hashes)?;
        let expected = config.size().div_ceil(64);
        if raw.bits.len() != expected {
            return Err(Error::BitLengthMismatch {
                expected,
                found: raw.bits.len(),
            });
        }

        Ok(Self {
            bits: raw.bits,
            size: config.size(),
            num_hashes: config.num_hashes(),
        })
    }
}

fn positions(item: &[u8], size: usize, num_hashes: usize) -> impl Iterator<Item = usize> + '_ {
    (0..num_hashes).map(move |i| {
        let mut hasher = Sha256::new();
        hasher.update(i.to_string().as_bytes());
        hasher.update(item);
        reduce(&hasher.finalize(), size)
    })
}

/// Big-endian digest value modulo `modulus`
fn reduce(digest: &[u8], modulus: usize) -> usize {
    let m = modulus as u128;
    digest
        .iter()
        .fold(0u128, |acc, &byte| ((acc << 8) | byte as u128) % m) as usize
}
