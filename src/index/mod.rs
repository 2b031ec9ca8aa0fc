//! Dataset index built from a binary merge tree of Bloom filters
//!
//! Each dataset gets a leaf filter over its k-mers. Internal nodes hold the
//! union of their children, so a query only descends into subtrees whose
//! filter reports the k-mer.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use kmertree::index::IndexTree;
//!
//! let labels = ["sample_a", "sample_b"];
//! let kmers = HashMap::from([
//!     ("sample_a".to_string(), vec!["ACGT", "TGCA"]),
//!     ("sample_b".to_string(), vec!["TGCA"]),
//! ]);
//!
//! let tree = IndexTree::build(&labels, &kmers, 10_000, 3).unwrap();
//! assert_eq!(tree.query("TGCA"), vec!["sample_a", "sample_b"]);
//! ```

mod node;
mod tree;

pub use node::{IndexNode, NodeId};
pub use tree::IndexTree;
