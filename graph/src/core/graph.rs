use std::collections::HashMap;

use super::edge::{Edge, EdgeId, EdgeSplice, EdgeType};
use super::node::{Branch, Node, NodeId, NodeType};
use crate::error::{GraphError, Result};
use crate::log::Hash;

/// A node or an edge, as handed to piece lookups and UI actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphElement {
    Node(NodeId),
    Edge(EdgeId),
}

/// Row-indexed commit graph, mutated in place.
///
/// Nodes and edges live in arenas and are addressed by stable ids. Removing an
/// edge only detaches it from its endpoints, so it can be re-attached later
/// under the same id.
#[derive(Debug, Clone, Default)]
pub struct MutableGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    rows: Vec<Vec<NodeId>>,
    commits: HashMap<Hash, NodeId>,
}

impl MutableGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, hash: Hash, node_type: NodeType, row: usize, branch: Branch) -> NodeId {
        let id = NodeId(self.nodes.len());
        if node_type == NodeType::Commit {
            self.commits.insert(hash.clone(), id);
        }
        self.nodes.push(Node::new(hash, node_type, row, branch));
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        self.rows[row].push(id);
        id
    }

    pub(crate) fn set_node_type(&mut self, id: NodeId, node_type: NodeType) {
        let node = &mut self.nodes[id.0];
        node.node_type = node_type;
        if node_type == NodeType::Commit {
            self.commits.insert(node.hash.clone(), id);
        }
    }

    /// Create an attached edge; `down` may not sit above `up`
    pub fn add_edge(&mut self, up: NodeId, down: NodeId, edge_type: EdgeType, branch: Branch) -> Result<EdgeId> {
        self.add_edge_at(up, down, edge_type, branch, None)
    }

    /// Like [`MutableGraph::add_edge`], spliced in at the given list positions
    pub fn add_edge_at(
        &mut self,
        up: NodeId,
        down: NodeId,
        edge_type: EdgeType,
        branch: Branch,
        splice: Option<EdgeSplice>,
    ) -> Result<EdgeId> {
        self.check_node(up)?;
        self.check_node(down)?;
        let (up_row, down_row) = (self.nodes[up.0].row, self.nodes[down.0].row);
        if down_row < up_row {
            return Err(GraphError::RowOrder { up_row, down_row });
        }

        let id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            up,
            down,
            edge_type,
            branch,
            selected: false,
            attached: false,
        });
        self.attach_edge(id, splice)?;
        Ok(id)
    }

    /// Splice `id` out of both endpoint lists, returning where it was
    pub fn detach_edge(&mut self, id: EdgeId) -> Result<EdgeSplice> {
        let edge = self.edges.get(id.0).ok_or(GraphError::UnknownEdge(id))?;
        if !edge.attached {
            return Err(GraphError::DetachedEdge(id));
        }
        let (up, down) = (edge.up, edge.down);

        let up_position = remove_id(&mut self.nodes[up.0].down_edges, id);
        let down_position = remove_id(&mut self.nodes[down.0].up_edges, id);
        self.edges[id.0].attached = false;

        Ok(EdgeSplice {
            up_position,
            down_position,
        })
    }

    /// Splice a detached edge back in; `None` appends to both lists
    pub fn attach_edge(&mut self, id: EdgeId, splice: Option<EdgeSplice>) -> Result<()> {
        let edge = self.edges.get(id.0).ok_or(GraphError::UnknownEdge(id))?;
        if edge.attached {
            return Ok(());
        }
        let (up, down) = (edge.up, edge.down);

        let down_edges = &mut self.nodes[up.0].down_edges;
        let at = splice.map_or(down_edges.len(), |s| s.up_position.min(down_edges.len()));
        down_edges.insert(at, id);

        let up_edges = &mut self.nodes[down.0].up_edges;
        let at = splice.map_or(up_edges.len(), |s| s.down_position.min(up_edges.len()));
        up_edges.insert(at, id);

        self.edges[id.0].attached = true;
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    pub(crate) fn set_node_visible(&mut self, id: NodeId, visible: bool) {
        self.nodes[id.0].visible = visible;
    }

    pub(crate) fn set_node_selected(&mut self, id: NodeId, selected: bool) {
        self.nodes[id.0].selected = selected;
    }

    pub(crate) fn set_edge_selected(&mut self, id: EdgeId, selected: bool) {
        self.edges[id.0].selected = selected;
    }

    /// Node placed for a commit hash
    pub fn commit_node(&self, hash: &Hash) -> Option<NodeId> {
        self.commits.get(hash).copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edge slots, attached or not
    pub fn edge_slots(&self) -> usize {
        self.edges.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<NodeId>] {
        &self.rows
    }

    /// Nodes of `row` in placement order; empty past the last row
    pub fn row(&self, row: usize) -> &[NodeId] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    /// Attached edges
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| edge.attached)
            .map(|(i, edge)| (EdgeId(i), edge))
    }

    pub fn up_nodes(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.0].up_edges.iter().map(move |e| self.edges[e.0].up)
    }

    pub fn down_nodes(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.0].down_edges.iter().map(move |e| self.edges[e.0].down)
    }

    /// Attached with both endpoints visible
    pub fn is_edge_visible(&self, id: EdgeId) -> bool {
        let edge = &self.edges[id.0];
        edge.attached && self.nodes[edge.up.0].visible && self.nodes[edge.down.0].visible
    }

    fn check_node(&self, id: NodeId) -> Result<()> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(GraphError::UnknownNode(id))
        }
    }
}

fn remove_id(list: &mut Vec<EdgeId>, id: EdgeId) -> usize {
    match list.iter().position(|&e| e == id) {
        Some(position) => {
            list.remove(position);
            position
        }
        None => list.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_nodes() -> (MutableGraph, NodeId, NodeId) {
        let mut graph = MutableGraph::new();
        let a = graph.add_node(Hash::from("a"), NodeType::Commit, 0, Branch(0));
        let b = graph.add_node(Hash::from("b"), NodeType::Commit, 1, Branch(0));
        (graph, a, b)
    }

    #[test]
    fn test_add_edge_links_both_ends() {
        let (mut graph, a, b) = two_nodes();
        let edge = graph.add_edge(a, b, EdgeType::Usual, Branch(0)).unwrap();

        assert_eq!(graph.node(a).down_edges(), &[edge]);
        assert_eq!(graph.node(b).up_edges(), &[edge]);
        assert_eq!(graph.down_nodes(a).collect::<Vec<_>>(), vec![b]);
        assert_eq!(graph.commit_node(&Hash::from("b")), Some(b));
    }

    #[test]
    fn test_upward_edge_rejected() {
        let (mut graph, a, b) = two_nodes();
        let err = graph.add_edge(b, a, EdgeType::Usual, Branch(0)).unwrap_err();
        assert_eq!(err, GraphError::RowOrder { up_row: 1, down_row: 0 });
    }

    #[test]
    fn test_detach_and_reattach_keeps_position() {
        let mut graph = MutableGraph::new();
        let a = graph.add_node(Hash::from("a"), NodeType::Commit, 0, Branch(0));
        let b = graph.add_node(Hash::from("b"), NodeType::Commit, 1, Branch(0));
        let c = graph.add_node(Hash::from("c"), NodeType::Commit, 1, Branch(1));
        let ab = graph.add_edge(a, b, EdgeType::Usual, Branch(0)).unwrap();
        let ac = graph.add_edge(a, c, EdgeType::Usual, Branch(1)).unwrap();

        let splice = graph.detach_edge(ab).unwrap();
        assert_eq!(splice.up_position, 0);
        assert_eq!(graph.node(a).down_edges(), &[ac]);
        assert!(!graph.edge(ab).is_attached());
        assert_eq!(graph.edges().count(), 1);

        graph.attach_edge(ab, Some(splice)).unwrap();
        assert_eq!(graph.node(a).down_edges(), &[ab, ac]);
        assert_eq!(graph.node(b).up_edges(), &[ab]);
    }

    #[test]
    fn test_detach_twice_fails() {
        let (mut graph, a, b) = two_nodes();
        let edge = graph.add_edge(a, b, EdgeType::Usual, Branch(0)).unwrap();
        graph.detach_edge(edge).unwrap();
        assert_eq!(graph.detach_edge(edge), Err(GraphError::DetachedEdge(edge)));
    }

    #[test]
    fn test_edge_visibility_follows_nodes() {
        let (mut graph, a, b) = two_nodes();
        let edge = graph.add_edge(a, b, EdgeType::Usual, Branch(0)).unwrap();
        assert!(graph.is_edge_visible(edge));

        graph.set_node_visible(b, false);
        assert!(!graph.is_edge_visible(edge));
    }

    #[test]
    fn test_rows_grow_on_demand() {
        let mut graph = MutableGraph::new();
        graph.add_node(Hash::from("x"), NodeType::EndCommit, 3, Branch(0));
        assert_eq!(graph.row_count(), 4);
        assert!(graph.row(1).is_empty());
        assert!(graph.row(10).is_empty());
    }
}
