//! Filter configuration shared by every node of an index
//!
//! All filters in one tree must agree on bit-vector size and hash count,
//! otherwise merging fails or the pruning traversal loses its guarantee.
//! [`FilterConfig`] is validated once and then handed to every filter.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default bit-vector length for index filters
pub const DEFAULT_FILTER_SIZE: usize = 10_000;

/// Default number of hash positions per item
pub const DEFAULT_NUM_HASHES: usize = 3;

/// Validated Bloom filter parameters
///
/// # Example
///
/// ```
/// use kmertree::config::FilterConfig;
///
/// let config = FilterConfig::new(4096, 3).unwrap();
/// assert_eq!(config.size(), 4096);
///
/// assert!(FilterConfig::new(0, 3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawFilterConfig"))]
pub struct FilterConfig {
    size: usize,
    num_hashes: usize,
}

impl FilterConfig {
    /// Create a configuration, rejecting a zero size or hash count
    pub fn new(size: usize, num_hashes: usize) -> Result<Self> {
        if size == 0 || num_hashes == 0 {
            return Err(Error::InvalidConfiguration { size, num_hashes });
        }
        Ok(Self { size, num_hashes })
    }

    /// Skip validation for parameters that already passed it
    pub(crate) fn new_unchecked(size: usize, num_hashes: usize) -> Self {
        debug_assert!(size > 0 && num_hashes > 0);
        Self { size, num_hashes }
    }

    /// Size filters for an expected number of k-mers per dataset
    ///
    /// Uses the optimal `m = -n·ln(p) / ln(2)²` and `k = (m/n)·ln(2)`.
    /// The hash count is clamped to `[1, 32]` and the size to at least 64.
    ///
    /// Fails with [`Error::InvalidCapacity`] if `expected_items` is 0 or
    /// `false_positive_rate` is not in (0, 1).
    pub fn for_capacity(expected_items: usize, false_positive_rate: f64) -> Result<Self> {
        if expected_items == 0 {
            return Err(Error::InvalidCapacity(
                "expected_items must be positive".to_string(),
            ));
        }
        if !(false_positive_rate > 0.0 && false_positive_rate < 1.0) {
            return Err(Error::InvalidCapacity(format!(
                "false_positive_rate must be in (0, 1), got {}",
                false_positive_rate
            )));
        }

        let ln2_squared = core::f64::consts::LN_2 * core::f64::consts::LN_2;
        let size = (-(expected_items as f64) * false_positive_rate.ln() / ln2_squared).ceil()
            as usize;
        let size = size.max(64);

        let num_hashes =
            ((size as f64 / expected_items as f64) * core::f64::consts::LN_2).ceil() as usize;
        let num_hashes = num_hashes.clamp(1, 32);

        Ok(Self { size, num_hashes })
    }

    /// Bit-vector length
    pub fn size(&self) -> usize {
        self.size
    }

    /// Hash positions computed per item
    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_FILTER_SIZE,
            num_hashes: DEFAULT_NUM_HASHES,
        }
    }
}

/// Unvalidated form used when deserializing
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawFilterConfig {
    size: usize,
    num_hashes: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<RawFilterConfig> for FilterConfig {
    type Error = Error;

    fn try_from(raw: RawFilterConfig) -> Result<Self> {
        Self::new(raw.size, raw.num_hashes)
    }
}
