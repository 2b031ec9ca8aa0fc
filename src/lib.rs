//! # kmertree
//!
//! Approximate k-mer membership queries across many datasets.
//!
//! Every dataset is summarized by a Bloom filter over its k-mers. The filters
//! are the leaves of a binary merge tree whose internal nodes hold the union
//! of their children, so a query can skip any subtree whose filter rejects
//! the k-mer.
//!
//! ## Features
//!
//! - **Deterministic filters**: SHA-256 derived hash positions, identical
//!   across builds and machines
//! - **Mergeable**: filters of equal size combine by bitwise OR
//! - **Pruning queries**: no false negatives, false positives bounded by the
//!   filter parameters
//! - **Immutable index**: a built tree is `Send + Sync` and needs no locking
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//! use kmertree::prelude::*;
//!
//! let labels = ["d1", "d2", "d3"];
//! let kmers = HashMap::from([
//!     ("d1".to_string(), vec!["ACGT"]),
//!     ("d2".to_string(), vec!["ACGT", "GGCC"]),
//!     ("d3".to_string(), vec!["TTAA"]),
//! ]);
//!
//! let tree = IndexTree::build(&labels, &kmers, 10_000, 3)?;
//! assert_eq!(tree.query("ACGT"), vec!["d1", "d2"]);
//! # Ok::<(), kmertree::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel`: build leaf filters, merge levels and query batches on rayon
//! - `serde`: serialize [`FilterConfig`] and [`BloomFilter`]
//! - `full`: enable everything

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod error;
pub mod index;
pub mod membership;

pub mod prelude {
    pub use crate::config::FilterConfig;
    pub use crate::error::{Error, Result};
    pub use crate::index::{IndexNode, IndexTree, NodeId};
    pub use crate::membership::BloomFilter;
}

pub use config::FilterConfig;
pub use error::{Error, Result};
pub use index::IndexTree;
pub use membership::BloomFilter;
