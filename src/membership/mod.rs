//! Membership testing data structures
//!
//! This module provides the probabilistic filter stored at every node of the
//! index. It trades a small probability of false positives for significant
//! space savings compared to exact set representations.
//!
//! # Example
//!
//! ```
//! use kmertree::membership::BloomFilter;
//!
//! let mut bloom = BloomFilter::new(1000, 3).unwrap();
//! bloom.insert(b"ACGT");
//! assert!(bloom.contains(b"ACGT"));
//! ```

mod bloom;

pub use bloom::BloomFilter;

/// Expected false positive rate after inserting `items` distinct items
///
/// Standard bound `(1 - e^(-k·n/m))^k` for `m = size` and `k = num_hashes`.
pub fn false_positive_rate(size: usize, num_hashes: usize, items: usize) -> f64 {
    if size == 0 {
        return 1.0;
    }
    let k = num_hashes as f64;
    let exponent = -k * items as f64 / size as f64;
    (1.0 - exponent.exp()).powf(k)
}
