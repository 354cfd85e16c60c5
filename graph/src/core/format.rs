use super::edge::EdgeId;
use super::graph::MutableGraph;
use super::node::NodeId;
use crate::log::SEPARATOR;

/// One line per node, rows top to bottom:
/// `hash|-TYPE|-up edges|-down edges|-row`, edges written `up:down:TYPE`.
pub fn to_str(graph: &MutableGraph) -> String {
    let mut lines = Vec::with_capacity(graph.node_count());
    for row in graph.rows() {
        for &id in row {
            lines.push(node_str(graph, id));
        }
    }
    lines.join("\n")
}

pub fn node_str(graph: &MutableGraph, id: NodeId) -> String {
    let node = graph.node(id);
    format!(
        "{}{sep}{}{sep}{}{sep}{}{sep}{}",
        node.hash(),
        node.node_type(),
        edges_str(graph, node.up_edges()),
        edges_str(graph, node.down_edges()),
        node.row(),
        sep = SEPARATOR,
    )
}

pub fn edge_str(graph: &MutableGraph, id: EdgeId) -> String {
    let edge = graph.edge(id);
    format!(
        "{}:{}:{}",
        graph.node(edge.up()).hash(),
        graph.node(edge.down()).hash(),
        edge.edge_type()
    )
}

fn edges_str(graph: &MutableGraph, edges: &[EdgeId]) -> String {
    edges
        .iter()
        .map(|&id| edge_str(graph, id))
        .collect::<Vec<_>>()
        .join(" ")
}
