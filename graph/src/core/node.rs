use std::fmt;

use super::edge::EdgeId;
use crate::log::Hash;

/// Stable index of a node in a [`MutableGraph`](super::MutableGraph)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// A commit placed in its own row
    Commit,
    /// A line segment crossing a row on its way to a commit further down
    Edge,
    /// A parent that has been referenced but not read yet
    EndCommit,
}

impl NodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Commit => "COMMIT_NODE",
            NodeType::Edge => "EDGE_NODE",
            NodeType::EndCommit => "END_COMMIT_NODE",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lineage a node or edge is drawn with; stable across appends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Branch(pub usize);

impl Branch {
    pub fn color_index(self, palette: usize) -> usize {
        if palette == 0 {
            0
        } else {
            self.0 % palette
        }
    }
}

/// A node of the mutable commit graph
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) hash: Hash,
    pub(crate) node_type: NodeType,
    pub(crate) row: usize,
    pub(crate) branch: Branch,
    pub(crate) up_edges: Vec<EdgeId>,
    pub(crate) down_edges: Vec<EdgeId>,
    pub(crate) visible: bool,
    pub(crate) selected: bool,
}

impl Node {
    pub(crate) fn new(hash: Hash, node_type: NodeType, row: usize, branch: Branch) -> Self {
        Self {
            hash,
            node_type,
            row,
            branch,
            up_edges: Vec::new(),
            down_edges: Vec::new(),
            visible: true,
            selected: false,
        }
    }

    /// Commit this node is (or leads to, for edge and end nodes)
    pub fn hash(&self) -> &Hash {
        &self.hash
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn branch(&self) -> Branch {
        self.branch
    }

    /// Attached edges towards children, in insertion order
    pub fn up_edges(&self) -> &[EdgeId] {
        &self.up_edges
    }

    /// Attached edges towards parents, main parent first
    pub fn down_edges(&self) -> &[EdgeId] {
        &self.down_edges
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_commit(&self) -> bool {
        self.node_type == NodeType::Commit
    }

    /// Exactly one edge in and one edge out
    pub fn is_linear(&self) -> bool {
        self.up_edges.len() == 1 && self.down_edges.len() == 1
    }
}
