use std::collections::HashSet;

use crate::core::{EdgeId, EdgeType, MutableGraph, NodeId};
use crate::error::{GraphError, Result};

/// Bounds of a region that can be collapsed: `up` has exactly one down-edge
/// and `down` exactly one up-edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphFragment {
    up: NodeId,
    down: NodeId,
}

impl GraphFragment {
    pub fn new(graph: &MutableGraph, up: NodeId, down: NodeId) -> Result<Self> {
        let invalid = |reason| GraphError::InvalidFragment { up, down, reason };

        let up_node = graph.get_node(up).ok_or(GraphError::UnknownNode(up))?;
        let down_node = graph.get_node(down).ok_or(GraphError::UnknownNode(down))?;
        if up_node.down_edges().len() != 1 {
            return Err(invalid("upper node needs exactly one down edge"));
        }
        if down_node.up_edges().len() != 1 {
            return Err(invalid("lower node needs exactly one up edge"));
        }
        if down_node.row() < up_node.row() {
            return Err(invalid("lower node sits above upper node"));
        }

        Ok(Self { up, down })
    }

    /// Longest run of visible single-in/single-out nodes through `node`,
    /// bounded by regular edges on both ends
    pub fn around(graph: &MutableGraph, node: NodeId) -> Option<Self> {
        let start = graph.get_node(node)?;
        if !start.is_visible() || !start.is_linear() {
            return None;
        }

        let mut up = node;
        while let Some(next) = chain_step(graph, graph.node(up).up_edges()[0], Direction::Up) {
            up = next;
        }
        let mut down = node;
        while let Some(next) = chain_step(graph, graph.node(down).down_edges()[0], Direction::Down) {
            down = next;
        }

        let up_boundary = graph.edge(graph.node(up).up_edges()[0]);
        let down_boundary = graph.edge(graph.node(down).down_edges()[0]);
        if up_boundary.edge_type() != EdgeType::Usual || down_boundary.edge_type() != EdgeType::Usual {
            return None;
        }

        Some(Self { up, down })
    }

    pub fn up(&self) -> NodeId {
        self.up
    }

    pub fn down(&self) -> NodeId {
        self.down
    }

    /// Every node between `up` and `down`, both included
    pub fn nodes(&self, graph: &MutableGraph) -> Result<Vec<NodeId>> {
        walk_between(graph, self.up, self.down).map_err(|reason| GraphError::InvalidFragment {
            up: self.up,
            down: self.down,
            reason,
        })
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Up,
    Down,
}

fn chain_step(graph: &MutableGraph, edge: EdgeId, direction: Direction) -> Option<NodeId> {
    let edge = graph.edge(edge);
    if edge.edge_type() != EdgeType::Usual {
        return None;
    }
    let next = match direction {
        Direction::Up => edge.up(),
        Direction::Down => edge.down(),
    };
    let node = graph.node(next);
    (node.is_visible() && node.is_linear()).then_some(next)
}

/// Walk down from `from` until `to`.
///
/// Runs along single down-edge chains and forks at branch points. A node
/// reachable along several chains is visited once; the visited set belongs to
/// this call only.
pub(crate) fn walk_between(
    graph: &MutableGraph,
    from: NodeId,
    to: NodeId,
) -> std::result::Result<Vec<NodeId>, &'static str> {
    let to_row = graph.node(to).row();
    let mut visited = HashSet::new();
    let mut order = Vec::new();
    let mut branches = vec![from];

    while let Some(mut current) = branches.pop() {
        loop {
            if !visited.insert(current) {
                break;
            }
            order.push(current);
            if current == to {
                break;
            }

            let node = graph.node(current);
            if node.row() >= to_row {
                return Err("walk passes the lower node");
            }
            match node.down_edges() {
                [] => return Err("walk ends before the lower node"),
                [single] => current = graph.edge(*single).down(),
                many => {
                    branches.extend(many.iter().rev().map(|&e| graph.edge(e).down()));
                    break;
                }
            }
        }
    }

    Ok(order)
}
