use std::collections::HashMap;

use super::collapse::GraphPiece;
use super::fragment::GraphFragment;
use crate::core::{EdgeId, GraphElement, MutableGraph, NodeId, Replace};
use crate::error::{GraphError, Result};

/// Handle of a piece inside a [`PieceRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(usize);

impl PieceId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Resolves a graph element to the piece that owns it.
///
/// `None` means the element belongs to no piece.
pub trait GraphPieceController {
    fn piece_for(&self, graph: &MutableGraph, element: GraphElement) -> Option<PieceId>;
}

/// Controller for graphs without pieces
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleGraphPieceController;

impl GraphPieceController for SimpleGraphPieceController {
    fn piece_for(&self, _graph: &MutableGraph, _element: GraphElement) -> Option<PieceId> {
        None
    }
}

/// Owns the pieces of one graph and indexes them by element.
///
/// Interior nodes are indexed for the piece's lifetime; a `HidePiece` edge is
/// indexed only while its piece is collapsed.
#[derive(Debug, Clone, Default)]
pub struct PieceRegistry {
    pieces: Vec<GraphPiece>,
    by_node: HashMap<NodeId, PieceId>,
    by_hide_edge: HashMap<EdgeId, PieceId>,
}

impl PieceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a piece over `fragment`; pieces may not share interior nodes.
    ///
    /// A fragment that grew around a single expanded, unselected piece (after
    /// an append lengthened its chain) takes over that piece's id.
    pub fn register(&mut self, graph: &MutableGraph, fragment: GraphFragment) -> Result<PieceId> {
        let piece = GraphPiece::new(graph, fragment)?;
        let mut overlapping: Vec<PieceId> = [piece.up_visible(), piece.down_visible()]
            .iter()
            .chain(piece.interior())
            .filter_map(|node| self.by_node.get(node).copied())
            .collect();
        overlapping.sort();
        overlapping.dedup();

        let id = match overlapping.as_slice() {
            [] => {
                self.pieces.push(piece);
                PieceId(self.pieces.len() - 1)
            }
            [old] if self.covers(*old, &piece) => {
                let old = *old;
                self.by_node.retain(|_, owner| *owner != old);
                self.pieces[old.0] = piece;
                old
            }
            _ => {
                return Err(GraphError::InvalidFragment {
                    up: fragment.up(),
                    down: fragment.down(),
                    reason: "overlaps another piece",
                })
            }
        };

        for &node in self.pieces[id.0].interior() {
            self.by_node.insert(node, id);
        }
        Ok(id)
    }

    fn covers(&self, old: PieceId, piece: &GraphPiece) -> bool {
        let old = &self.pieces[old.0];
        old.is_visible()
            && !old.is_selected()
            && old.interior().iter().all(|node| piece.interior().contains(node))
    }

    pub fn piece(&self, id: PieceId) -> &GraphPiece {
        &self.pieces[id.0]
    }

    pub fn get(&self, id: PieceId) -> Option<&GraphPiece> {
        self.pieces.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PieceId, &GraphPiece)> {
        self.pieces.iter().enumerate().map(|(i, piece)| (PieceId(i), piece))
    }

    /// Collapse or expand a piece, keeping the hide-edge index in step
    pub fn set_visible(&mut self, graph: &mut MutableGraph, id: PieceId, visible: bool) -> Result<Option<Replace>> {
        let piece = &mut self.pieces[id.0];
        let replace = piece.set_visible(graph, visible)?;
        if replace.is_some() {
            match piece.hide_edge() {
                Some(hide_edge) => {
                    self.by_hide_edge.insert(hide_edge, id);
                }
                None => self.by_hide_edge.retain(|_, owner| *owner != id),
            }
        }
        Ok(replace)
    }

    pub fn set_selected(&mut self, graph: &mut MutableGraph, id: PieceId, selected: bool) -> Option<Replace> {
        self.pieces[id.0].set_selected(graph, selected)
    }
}

impl GraphPieceController for PieceRegistry {
    fn piece_for(&self, graph: &MutableGraph, element: GraphElement) -> Option<PieceId> {
        match element {
            GraphElement::Node(node) => self.by_node.get(&node).copied(),
            GraphElement::Edge(edge) => {
                if let Some(&id) = self.by_hide_edge.get(&edge) {
                    return Some(id);
                }
                let edge = graph.get_edge(edge)?;
                self.by_node
                    .get(&edge.down())
                    .or_else(|| self.by_node.get(&edge.up()))
                    .copied()
            }
        }
    }
}
