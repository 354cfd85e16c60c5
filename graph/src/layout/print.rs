use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::trace;

use crate::core::{Branch, EdgeId, EdgeType, GraphElement, MutableGraph, NodeId, Replace};

/// Something occupying a column of a printed row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowItem {
    Node(NodeId),
    /// An edge crossing this row on its way further down
    PassThrough(EdgeId),
}

/// What to draw for one row; `Edge` elements run down to the next row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintElement {
    Node {
        position: usize,
        node: NodeId,
        selected: bool,
    },
    Pass {
        position: usize,
        edge: EdgeId,
        edge_type: EdgeType,
        branch: Branch,
        selected: bool,
    },
    Edge {
        from: usize,
        to: usize,
        edge: EdgeId,
        edge_type: EdgeType,
        branch: Branch,
        selected: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintRow {
    row: usize,
    items: Vec<RowItem>,
    elements: Vec<PrintElement>,
}

impl PrintRow {
    pub fn row(&self) -> usize {
        self.row
    }

    /// Columns, left to right
    pub fn items(&self) -> &[RowItem] {
        &self.items
    }

    pub fn elements(&self) -> &[PrintElement] {
        &self.elements
    }

    pub fn width(&self) -> usize {
        self.items.len()
    }

    /// Visible commit node of this row, if any
    pub fn commit(&self, graph: &MutableGraph) -> Option<NodeId> {
        self.items.iter().find_map(|item| match *item {
            RowItem::Node(node) if graph.node(node).is_commit() => Some(node),
            _ => None,
        })
    }

    pub fn position_of(&self, element: GraphElement) -> Option<usize> {
        self.items.iter().position(|item| match (*item, element) {
            (RowItem::Node(node), GraphElement::Node(wanted)) => node == wanted,
            (RowItem::PassThrough(edge), GraphElement::Edge(wanted)) => edge == wanted,
            _ => false,
        })
    }
}

/// Print rows of a graph, updated row range by row range.
///
/// The column order of a row follows the row above it: every column hands its
/// place to what its down-edges lead to, first seen first; nodes nobody leads
/// to are appended at the right.
#[derive(Debug, Clone, Default)]
pub struct PrintModel {
    rows: Vec<PrintRow>,
}

impl PrintModel {
    pub fn new(graph: &MutableGraph) -> Self {
        let mut model = Self::default();
        model.recalculate(graph, Replace::new(0, graph.row_count()));
        model
    }

    pub fn rows(&self) -> &[PrintRow] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> Option<&PrintRow> {
        self.rows.get(row)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Lay out `replace` again, then continue downwards only while column
    /// orders keep changing. Returns the number of rows touched.
    pub fn recalculate(&mut self, graph: &MutableGraph, replace: Replace) -> usize {
        let total = graph.row_count();
        self.rows.truncate(total);
        let start = replace.from.min(total);

        let mut end = start;
        for row in start..total {
            let items = match row {
                0 => next_items(graph, &[], 0),
                _ => next_items(graph, &self.rows[row - 1].items, row),
            };
            let unchanged = match self.rows.get_mut(row) {
                Some(existing) => {
                    let unchanged = existing.items == items;
                    existing.items = items;
                    unchanged
                }
                None => {
                    self.rows.push(PrintRow {
                        row,
                        items,
                        elements: Vec::new(),
                    });
                    false
                }
            };
            end = row + 1;
            if unchanged && row > replace.to {
                break;
            }
        }

        // elements of a row depend on the columns of the row below
        let first = start.saturating_sub(1);
        for row in first..end {
            let next = self.rows.get(row + 1).map(|r| r.items.as_slice()).unwrap_or(&[]);
            let elements = build_elements(graph, row, &self.rows[row].items, next);
            self.rows[row].elements = elements;
        }

        trace!(from = first, to = end, "print rows recalculated");
        end - first
    }
}

fn link_target(graph: &MutableGraph, edge: EdgeId, row: usize) -> Option<RowItem> {
    let down = graph.edge(edge).down();
    match graph.node(down).row().cmp(&row) {
        Ordering::Equal => Some(RowItem::Node(down)),
        Ordering::Greater => Some(RowItem::PassThrough(edge)),
        Ordering::Less => None,
    }
}

fn next_items(graph: &MutableGraph, previous: &[RowItem], row: usize) -> Vec<RowItem> {
    let mut items = Vec::with_capacity(previous.len() + 1);
    let mut seen = HashSet::with_capacity(previous.len() + 1);
    let mut push = |items: &mut Vec<RowItem>, item: RowItem| {
        if seen.insert(item) {
            items.push(item);
        }
    };

    for &item in previous {
        match item {
            RowItem::Node(node) => {
                for &edge in graph.node(node).down_edges() {
                    if !graph.is_edge_visible(edge) {
                        continue;
                    }
                    if let Some(target) = link_target(graph, edge, row) {
                        push(&mut items, target);
                    }
                }
            }
            RowItem::PassThrough(edge) => {
                if let Some(target) = link_target(graph, edge, row) {
                    push(&mut items, target);
                }
            }
        }
    }
    for &node in graph.row(row) {
        if graph.node(node).is_visible() {
            push(&mut items, RowItem::Node(node));
        }
    }

    items
}

fn build_elements(graph: &MutableGraph, row: usize, items: &[RowItem], next: &[RowItem]) -> Vec<PrintElement> {
    let mut elements = Vec::with_capacity(items.len() * 2);
    let link = |elements: &mut Vec<PrintElement>, from: usize, edge: EdgeId| {
        let Some(target) = link_target(graph, edge, row + 1) else {
            return;
        };
        if let Some(to) = next.iter().position(|&item| item == target) {
            let edge_ref = graph.edge(edge);
            elements.push(PrintElement::Edge {
                from,
                to,
                edge,
                edge_type: edge_ref.edge_type(),
                branch: edge_ref.branch(),
                selected: edge_ref.is_selected(),
            });
        }
    };

    for (position, &item) in items.iter().enumerate() {
        match item {
            RowItem::Node(node) => {
                elements.push(PrintElement::Node {
                    position,
                    node,
                    selected: graph.node(node).is_selected(),
                });
                for &edge in graph.node(node).down_edges() {
                    if graph.is_edge_visible(edge) {
                        link(&mut elements, position, edge);
                    }
                }
            }
            RowItem::PassThrough(edge) => {
                let edge_ref = graph.edge(edge);
                elements.push(PrintElement::Pass {
                    position,
                    edge,
                    edge_type: edge_ref.edge_type(),
                    branch: edge_ref.branch(),
                    selected: edge_ref.is_selected(),
                });
                link(&mut elements, position, edge);
            }
        }
    }

    elements
}
