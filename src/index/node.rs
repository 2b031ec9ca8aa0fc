//! Index tree nodes

use crate::membership::BloomFilter;

/// Position of a node in its tree's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Arena index
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node of the index tree
///
/// Leaves carry a single dataset label and the filter of that dataset's
/// k-mers. Internal nodes carry the union of their two children's filters and
/// the concatenation of their label lists, left first.
#[derive(Clone, Debug)]
pub struct IndexNode {
    filter: BloomFilter,
    children: Option<(NodeId, NodeId)>,
    labels: Vec<String>,
}

impl IndexNode {
    pub(crate) fn leaf(label: String, filter: BloomFilter) -> Self {
        Self {
            filter,
            children: None,
            labels: vec![label],
        }
    }

    pub(crate) fn internal(
        filter: BloomFilter,
        children: (NodeId, NodeId),
        labels: Vec<String>,
    ) -> Self {
        Self {
            filter,
            children: Some(children),
            labels,
        }
    }

    /// Filter summarizing every dataset below this node
    pub fn filter(&self) -> &BloomFilter {
        &self.filter
    }

    /// Left and right children, `None` for a leaf
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        self.children
    }

    /// Dataset labels covered by this node, in build order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// True for a dataset leaf
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}
