//! Error types for filter and index construction

use thiserror::Error;

/// Errors returned by filter and tree operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Filter size or hash count is zero
    #[error("invalid configuration: size={size}, num_hashes={num_hashes} (both must be positive)")]
    InvalidConfiguration { size: usize, num_hashes: usize },

    /// Filters of different sizes cannot be merged
    #[error("size mismatch: expected {expected} bits, found {found}")]
    SizeMismatch { expected: usize, found: usize },

    /// Serialized bit vector does not match the declared size
    #[error("bit vector length mismatch: expected {expected} words, found {found}")]
    BitLengthMismatch { expected: usize, found: usize },

    /// Capacity sizing parameters out of range
    #[error("invalid capacity: {0}")]
    InvalidCapacity(String),

    /// A dataset label has no k-mer set in the build input
    #[error("unknown dataset: no k-mers supplied for '{0}'")]
    UnknownDataset(String),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
