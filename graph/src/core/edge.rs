use std::fmt;

use super::node::{Branch, NodeId};

/// Stable index of an edge in a [`MutableGraph`](super::MutableGraph)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeType {
    /// Regular child -> parent link between adjacent rows
    Usual,
    /// Synthetic link standing in for a collapsed piece
    HidePiece,
}

impl EdgeType {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeType::Usual => "USUAL",
            EdgeType::HidePiece => "HIDE_PIECE",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An edge from a child (up) node to a parent (down) node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub(crate) up: NodeId,
    pub(crate) down: NodeId,
    pub(crate) edge_type: EdgeType,
    pub(crate) branch: Branch,
    pub(crate) selected: bool,
    pub(crate) attached: bool,
}

impl Edge {
    pub fn up(&self) -> NodeId {
        self.up
    }

    pub fn down(&self) -> NodeId {
        self.down
    }

    pub fn edge_type(&self) -> EdgeType {
        self.edge_type
    }

    pub fn branch(&self) -> Branch {
        self.branch
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Detached edges keep their slot but are absent from both endpoint lists
    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

/// Where a detached edge sat in its endpoints' edge lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSplice {
    /// Position in the up node's down-edge list
    pub up_position: usize,
    /// Position in the down node's up-edge list
    pub down_position: usize,
}
