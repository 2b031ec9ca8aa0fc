//! Bloom filter merge tree
//!
//! Construction runs in two phases. The leaf phase builds one filter per
//! dataset. The merge phase then pairs consecutive nodes level by level,
//! giving each pair a parent whose filter is the union of theirs, until a
//! single root remains. An odd node at the end of a level is carried up
//! unchanged.
//!
//! Queries walk down from the root and skip every subtree whose filter
//! rejects the k-mer. A parent's bits are a superset of each child's, so a
//! rejected subtree cannot hold a matching leaf.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::node::{IndexNode, NodeId};
use crate::config::FilterConfig;
use crate::error::{Error, Result};
use crate::membership::BloomFilter;

/// Index answering "which datasets contain this k-mer?"
///
/// Nodes live in an arena and refer to their children by [`NodeId`]. The
/// tree is immutable once built and can be shared freely across threads.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use kmertree::index::IndexTree;
///
/// let labels = ["d1", "d2", "d3"];
/// let kmers = HashMap::from([
///     ("d1".to_string(), vec!["ACG", "CGT"]),
///     ("d2".to_string(), vec!["CGT"]),
///     ("d3".to_string(), vec!["TTT"]),
/// ]);
///
/// let tree = IndexTree::build(&labels, &kmers, 10_000, 3).unwrap();
/// assert_eq!(tree.query("CGT"), vec!["d1", "d2"]);
/// assert_eq!(tree.query("TTT"), vec!["d3"]);
/// ```
#[derive(Clone, Debug)]
pub struct IndexTree {
    nodes: Vec<IndexNode>,
    root: Option<NodeId>,
    /// Dataset label to its leaf
    leaves: HashMap<String, NodeId>,
    config: FilterConfig,
}

impl IndexTree {
    /// Build an index over `dataset_labels`
    ///
    /// Every label must have an entry in `kmers_by_dataset`, and labels are
    /// expected to be unique. Fails with [`Error::InvalidConfiguration`] if
    /// `filter_size` or `num_hashes` is zero.
    pub fn build<S, K>(
        dataset_labels: &[S],
        kmers_by_dataset: &HashMap<String, Vec<K>>,
        filter_size: usize,
        num_hashes: usize,
    ) -> Result<Self>
    where
        S: AsRef<str> + Sync,
        K: AsRef<str> + Sync,
    {
        let config = FilterConfig::new(filter_size, num_hashes)?;
        Self::build_with_config(dataset_labels, kmers_by_dataset, &config)
    }

    /// Build an index with an already validated configuration
    pub fn build_with_config<S, K>(
        dataset_labels: &[S],
        kmers_by_dataset: &HashMap<String, Vec<K>>,
        config: &FilterConfig,
    ) -> Result<Self>
    where
        S: AsRef<str> + Sync,
        K: AsRef<str> + Sync,
    {
        debug!(
            datasets = dataset_labels.len(),
            filter_size = config.size(),
            num_hashes = config.num_hashes(),
            "building index tree"
        );

        // Resolve every dataset before doing any hashing
        let inputs = dataset_labels
            .iter()
            .map(|label| {
                let label = label.as_ref();
                kmers_by_dataset
                    .get(label)
                    .map(|kmers| (label, kmers.as_slice()))
                    .ok_or_else(|| Error::UnknownDataset(label.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        let filters = leaf_filters(&inputs, config);

        let mut nodes = Vec::with_capacity(inputs.len().saturating_mul(2));
        let mut leaves = HashMap::with_capacity(inputs.len());
        let mut level = Vec::with_capacity(inputs.len());

        for ((label, _), filter) in inputs.iter().zip(filters) {
            let id = NodeId(nodes.len());
            nodes.push(IndexNode::leaf(label.to_string(), filter));
            if leaves.insert(label.to_string(), id).is_some() {
                warn!(label, "duplicate dataset label, lookup keeps the last leaf");
            }
            level.push(id);
        }

        let mut height = 0usize;
        while level.len() > 1 {
            let merged = merge_level(&nodes, &level)?;
            let mut next = Vec::with_capacity(level.len().div_ceil(2));

            for (pair, filter) in level.chunks_exact(2).zip(merged) {
                let (left, right) = (pair[0], pair[1]);
                let mut labels = nodes[left.0].labels().to_vec();
                labels.extend_from_slice(nodes[right.0].labels());

                next.push(NodeId(nodes.len()));
                nodes.push(IndexNode::internal(filter, (left, right), labels));
            }

            if level.len() % 2 == 1 {
                let promoted = level[level.len() - 1];
                trace!(node = promoted.0, "promoting unpaired node");
                next.push(promoted);
            }

            height += 1;
            debug!(level = height, nodes = next.len(), "merged level");
            level = next;
        }

        let root = level.first().copied();
        debug!(
            nodes = nodes.len(),
            levels = height,
            empty = root.is_none(),
            "index tree built"
        );

        Ok(Self {
            nodes,
            root,
            leaves,
            config: *config,
        })
    }

    /// Labels of every dataset whose filter reports `kmer`
    ///
    /// Never omits a dataset that contains the k-mer; may include false
    /// positives. Labels come back in build order. An empty tree returns an
    /// empty list.
    pub fn query(&self, kmer: &str) -> Vec<&str> {
        let mut matches = Vec::new();
        if let Some(root) = self.root {
            self.collect_matches(root, kmer.as_bytes(), &mut matches);
        }
        trace!(kmer, matches = matches.len(), "query");
        matches
    }

    /// Run [`query`](Self::query) for each k-mer, preserving input order
    pub fn query_batch<Q>(&self, kmers: &[Q]) -> Vec<Vec<&str>>
    where
        Q: AsRef<str> + Sync,
    {
        #[cfg(feature = "parallel")]
        {
            kmers.par_iter().map(|kmer| self.query(kmer.as_ref())).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            kmers.iter().map(|kmer| self.query(kmer.as_ref())).collect()
        }
    }

    fn collect_matches<'a>(&'a self, id: NodeId, kmer: &[u8], matches: &mut Vec<&'a str>) {
        let node = &self.nodes[id.0];
        if !node.filter().contains(kmer) {
            return;
        }

        match node.children() {
            None => matches.extend(node.labels().iter().map(String::as_str)),
            // A match here says nothing about which child matched
            Some((left, right)) => {
                self.collect_matches(left, kmer, matches);
                self.collect_matches(right, kmer, matches);
            }
        }
    }

    /// Root node, `None` if built from zero datasets
    pub fn root(&self) -> Option<&IndexNode> {
        self.root.map(|id| &self.nodes[id.0])
    }

    /// Arena id of the root
    pub fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    /// Node by id
    pub fn node(&self, id: NodeId) -> Option<&IndexNode> {
        self.nodes.get(id.0)
    }

    /// Leaf carrying `label`
    pub fn leaf(&self, label: &str) -> Option<&IndexNode> {
        self.leaf_id(label).and_then(|id| self.node(id))
    }

    /// Arena id of the leaf carrying `label`
    pub fn leaf_id(&self, label: &str) -> Option<NodeId> {
        self.leaves.get(label).copied()
    }

    /// Dataset labels in build order
    pub fn labels(&self) -> &[String] {
        self.root().map_or(&[][..], IndexNode::labels)
    }

    /// Number of datasets indexed
    pub fn len(&self) -> usize {
        self.labels().len()
    }

    /// True if built from zero datasets
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Total number of nodes, leaves included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes on the longest root-to-leaf path, 0 for an empty tree
    pub fn depth(&self) -> usize {
        self.root.map_or(0, |root| self.depth_from(root))
    }

    fn depth_from(&self, id: NodeId) -> usize {
        match self.nodes[id.0].children() {
            None => 1,
            Some((left, right)) => 1 + self.depth_from(left).max(self.depth_from(right)),
        }
    }

    /// Filter configuration shared by every node
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Memory held by all node filters
    pub fn size_bytes(&self) -> usize {
        self.nodes.iter().map(|node| node.filter().size_bytes()).sum()
    }
}

fn leaf_filter<K: AsRef<str>>(kmers: &[K], config: &FilterConfig) -> BloomFilter {
    let mut filter = BloomFilter::from_config(config);
    for kmer in kmers {
        filter.insert(kmer.as_ref().as_bytes());
    }
    filter
}

#[cfg(feature = "parallel")]
fn leaf_filters<K>(inputs: &[(&str, &[K])], config: &FilterConfig) -> Vec<BloomFilter>
where
    K: AsRef<str> + Sync,
{
    inputs
        .par_iter()
        .map(|&(_, kmers)| leaf_filter(kmers, config))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn leaf_filters<K>(inputs: &[(&str, &[K])], config: &FilterConfig) -> Vec<BloomFilter>
where
    K: AsRef<str> + Sync,
{
    inputs
        .iter()
        .map(|&(_, kmers)| leaf_filter(kmers, config))
        .collect()
}

/// Union filters for each complete pair of `level`, in pair order
#[cfg(feature = "parallel")]
fn merge_level(nodes: &[IndexNode], level: &[NodeId]) -> Result<Vec<BloomFilter>> {
    level
        .par_chunks_exact(2)
        .map(|pair| nodes[pair[0].0].filter().merge(nodes[pair[1].0].filter()))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn merge_level(nodes: &[IndexNode], level: &[NodeId]) -> Result<Vec<BloomFilter>> {
    level
        .chunks_exact(2)
        .map(|pair| nodes[pair[0].0].filter().merge(nodes[pair[1].0].filter()))
        .collect()
}
