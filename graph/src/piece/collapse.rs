use std::collections::HashSet;
use tracing::debug;

use super::fragment::GraphFragment;
use crate::core::{Branch, EdgeId, EdgeSplice, EdgeType, GraphElement, MutableGraph, NodeId, Replace};
use crate::error::{GraphError, Result};

/// A collapsible region of the graph.
///
/// Expanded, the region is drawn as `up_visible -> up_hide -> .. -> down_hide
/// -> down_visible`. Collapsed, the interior is hidden and a single
/// `HidePiece` edge joins `up_visible` to `down_visible`.
///
/// The piece owns no reference to the graph; every transition takes the graph
/// it was created on.
#[derive(Debug, Clone)]
pub struct GraphPiece {
    up_visible: NodeId,
    up_hide: NodeId,
    down_hide: NodeId,
    down_visible: NodeId,
    up_boundary: EdgeId,
    down_boundary: EdgeId,
    branch: Branch,
    interior: Vec<NodeId>,
    hide_edge: Option<EdgeId>,
    splices: Option<(EdgeSplice, EdgeSplice)>,
    visible: bool,
    selected: bool,
}

impl GraphPiece {
    /// Piece hiding the fragment's nodes, anchored on the nodes right outside it
    pub fn new(graph: &MutableGraph, fragment: GraphFragment) -> Result<Self> {
        let (up_hide, down_hide) = (fragment.up(), fragment.down());
        let invalid = |reason| GraphError::InvalidFragment {
            up: up_hide,
            down: down_hide,
            reason,
        };

        let up_edges = graph.node(up_hide).up_edges();
        let down_edges = graph.node(down_hide).down_edges();
        let (up_boundary, down_boundary) = match (up_edges, down_edges) {
            ([up], [down]) => (*up, *down),
            ([_], _) => return Err(invalid("lower node needs exactly one down edge")),
            _ => return Err(invalid("upper node needs exactly one up edge")),
        };
        if graph.edge(up_boundary).edge_type() != EdgeType::Usual
            || graph.edge(down_boundary).edge_type() != EdgeType::Usual
        {
            return Err(invalid("boundary edge belongs to a collapsed piece"));
        }
        if !graph.node(up_hide).is_visible() {
            return Err(invalid("fragment is already hidden"));
        }

        let interior = fragment.nodes(graph)?;
        let members: HashSet<NodeId> = interior.iter().copied().collect();
        let entered_from_outside = interior
            .iter()
            .filter(|&&node| node != up_hide)
            .any(|&node| graph.up_nodes(node).any(|up| !members.contains(&up)));
        if entered_from_outside {
            return Err(invalid("fragment is entered from outside"));
        }

        Ok(Self {
            up_visible: graph.edge(up_boundary).up(),
            up_hide,
            down_hide,
            down_visible: graph.edge(down_boundary).down(),
            up_boundary,
            down_boundary,
            branch: graph.edge(up_boundary).branch(),
            interior,
            hide_edge: None,
            splices: None,
            visible: true,
            selected: false,
        })
    }

    /// Show or hide the interior.
    ///
    /// Returns the rows to lay out again, or `None` when the piece already was
    /// in the requested state and nothing changed.
    pub fn set_visible(&mut self, graph: &mut MutableGraph, visible: bool) -> Result<Option<Replace>> {
        if self.visible == visible {
            return Ok(None);
        }

        if visible {
            if let Some(hide_edge) = self.hide_edge {
                graph.detach_edge(hide_edge)?;
            }
            let (up_splice, down_splice) = match self.splices.take() {
                Some((up, down)) => (Some(up), Some(down)),
                None => (None, None),
            };
            graph.attach_edge(self.up_boundary, up_splice)?;
            graph.attach_edge(self.down_boundary, down_splice)?;
        } else {
            let up_splice = graph.detach_edge(self.up_boundary)?;
            let down_splice = graph.detach_edge(self.down_boundary)?;
            // the hide edge takes the boundary edges' places in the visible nodes' lists
            let splice = EdgeSplice {
                up_position: up_splice.up_position,
                down_position: down_splice.down_position,
            };
            match self.hide_edge {
                Some(hide_edge) => graph.attach_edge(hide_edge, Some(splice))?,
                None => {
                    let hide_edge = graph.add_edge_at(
                        self.up_visible,
                        self.down_visible,
                        EdgeType::HidePiece,
                        self.branch,
                        Some(splice),
                    )?;
                    self.hide_edge = Some(hide_edge);
                }
            }
            self.splices = Some((up_splice, down_splice));
        }

        for &node in &self.interior {
            graph.set_node_visible(node, visible);
        }
        self.visible = visible;
        if self.selected {
            self.mark_selected(graph, true);
        }

        let replace = self.replace(graph);
        debug!(
            visible,
            from = replace.from,
            to = replace.to,
            hidden = self.interior.len(),
            "piece toggled"
        );
        Ok(Some(replace))
    }

    /// Highlight the piece from `up_visible` to `down_visible`, hidden parts
    /// included; edges are not rewired
    pub fn set_selected(&mut self, graph: &mut MutableGraph, selected: bool) -> Option<Replace> {
        if self.selected == selected {
            return None;
        }
        self.selected = selected;
        self.mark_selected(graph, selected);
        Some(self.replace(graph))
    }

    pub fn up_visible(&self) -> NodeId {
        self.up_visible
    }

    pub fn up_hide(&self) -> NodeId {
        self.up_hide
    }

    pub fn down_hide(&self) -> NodeId {
        self.down_hide
    }

    pub fn down_visible(&self) -> NodeId {
        self.down_visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Nodes hidden while collapsed
    pub fn interior(&self) -> &[NodeId] {
        &self.interior
    }

    /// The attached `HidePiece` edge, only while collapsed
    pub fn hide_edge(&self) -> Option<EdgeId> {
        if self.visible {
            None
        } else {
            self.hide_edge
        }
    }

    pub fn boundary_edges(&self) -> [EdgeId; 2] {
        [self.up_boundary, self.down_boundary]
    }

    pub fn replace(&self, graph: &MutableGraph) -> Replace {
        Replace::new(graph.node(self.up_visible).row(), graph.node(self.down_visible).row())
    }

    /// Nodes and edges on the currently drawn path between the visible ends
    pub fn elements(&self, graph: &MutableGraph) -> Vec<GraphElement> {
        let mut elements = vec![GraphElement::Node(self.up_visible)];
        match self.hide_edge() {
            Some(hide_edge) => elements.push(GraphElement::Edge(hide_edge)),
            None => {
                elements.push(GraphElement::Edge(self.up_boundary));
                for &node in &self.interior {
                    elements.push(GraphElement::Node(node));
                    elements.extend(graph.node(node).down_edges().iter().map(|&e| GraphElement::Edge(e)));
                }
            }
        }
        elements.push(GraphElement::Node(self.down_visible));
        elements
    }

    /// Every node and edge the piece owns, drawn or not
    fn owned_elements(&self, graph: &MutableGraph) -> Vec<GraphElement> {
        let mut elements = vec![
            GraphElement::Node(self.up_visible),
            GraphElement::Node(self.down_visible),
            GraphElement::Edge(self.up_boundary),
            GraphElement::Edge(self.down_boundary),
        ];
        elements.extend(self.hide_edge.map(GraphElement::Edge));
        for &node in &self.interior {
            elements.push(GraphElement::Node(node));
            elements.extend(graph.node(node).down_edges().iter().map(|&e| GraphElement::Edge(e)));
        }
        elements
    }

    fn mark_selected(&self, graph: &mut MutableGraph, selected: bool) {
        for element in self.owned_elements(graph) {
            match element {
                GraphElement::Node(node) => graph.set_node_selected(node, selected),
                GraphElement::Edge(edge) => graph.set_edge_selected(edge, selected),
            }
        }
    }
}
