use std::collections::HashMap;
use tracing::debug;

use crate::builder::GraphBuilder;
use crate::core::{GraphElement, MutableGraph, NodeId, Replace};
use crate::error::{GraphError, Result};
use crate::layout::{PrintModel, PrintRow};
use crate::log::{parse_log, parse_parents_log, Commit, CommitParents, Hash};
use crate::piece::{GraphFragment, GraphPieceController, PieceId, PieceRegistry};

/// A laid-out commit graph with its collapsible pieces and print rows.
///
/// Every mutation goes through here so the print rows always match the graph.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    graph: MutableGraph,
    builder: GraphBuilder,
    pieces: PieceRegistry,
    print: PrintModel,
    commits: HashMap<Hash, Commit>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_commits(commits: impl IntoIterator<Item = Commit>) -> Result<Self> {
        let mut model = Self::new();
        model.append_commits(commits)?;
        Ok(model)
    }

    /// Build from full `hash|-parents|-author|-timestamp|-message` lines
    pub fn from_log(text: &str) -> Result<Self> {
        Self::from_commits(parse_log(text)?)
    }

    /// Build from `hash|-parents` lines; there are no commit details to show
    pub fn from_parents_log(text: &str) -> Result<Self> {
        let mut model = Self::new();
        model.append_records(parse_parents_log(text)?)?;
        Ok(model)
    }

    pub fn append_commits(&mut self, commits: impl IntoIterator<Item = Commit>) -> Result<Replace> {
        let commits: Vec<Commit> = commits.into_iter().collect();
        let first = self.builder.next_row();
        let appended = self.append_records(commits.iter().map(Commit::to_parents));
        // one row per placed commit, also when a later record failed
        let placed = self.builder.next_row() - first;
        self.commits.extend(
            commits
                .into_iter()
                .take(placed)
                .map(|commit| (commit.hash.clone(), commit)),
        );
        appended
    }

    pub fn append_log(&mut self, text: &str) -> Result<Replace> {
        self.append_commits(parse_log(text)?)
    }

    fn append_records(&mut self, records: impl IntoIterator<Item = CommitParents>) -> Result<Replace> {
        let first = self.builder.next_row();
        // commits before a bad record stay in the graph, so relayout either way
        let appended = self.builder.append(&mut self.graph, records);
        let replace = Replace::new(first, self.graph.row_count().max(first));
        self.print.recalculate(&self.graph, replace);
        appended.map(|_| replace)
    }

    pub fn graph(&self) -> &MutableGraph {
        &self.graph
    }

    pub fn print_rows(&self) -> &[PrintRow] {
        self.print.rows()
    }

    pub fn print_model(&self) -> &PrintModel {
        &self.print
    }

    pub fn pieces(&self) -> &PieceRegistry {
        &self.pieces
    }

    /// Details of a commit read from a full log line
    pub fn commit(&self, hash: &Hash) -> Option<&Commit> {
        self.commits.get(hash)
    }

    pub fn commit_node(&self, hash: &Hash) -> Option<NodeId> {
        self.graph.commit_node(hash)
    }

    pub fn piece_at(&self, element: GraphElement) -> Option<PieceId> {
        self.pieces.piece_for(&self.graph, element)
    }

    /// Hide the piece around `element`, creating it on first use.
    ///
    /// `Ok(None)` when nothing around the element can be collapsed or it
    /// already is.
    pub fn collapse(&mut self, element: GraphElement) -> Result<Option<Replace>> {
        let id = match self.piece_at(element) {
            Some(id) => id,
            None => match self.new_piece(element)? {
                Some(id) => id,
                None => return Ok(None),
            },
        };
        self.set_piece_visible(id, false)
    }

    /// Show the piece owning `element` again
    pub fn expand(&mut self, element: GraphElement) -> Result<Option<Replace>> {
        match self.piece_at(element) {
            Some(id) => self.set_piece_visible(id, true),
            None => Ok(None),
        }
    }

    pub fn toggle(&mut self, element: GraphElement) -> Result<Option<Replace>> {
        match self.piece_at(element) {
            Some(id) if !self.pieces.piece(id).is_visible() => self.set_piece_visible(id, true),
            _ => self.collapse(element),
        }
    }

    /// Select the piece owning `element`, or the element alone if it has none
    pub fn select(&mut self, element: GraphElement, selected: bool) -> Result<Option<Replace>> {
        let replace = match self.piece_at(element) {
            Some(id) => self.pieces.set_selected(&mut self.graph, id, selected),
            None => self.select_element(element, selected)?,
        };
        if let Some(replace) = replace {
            self.print.recalculate(&self.graph, replace);
        }
        Ok(replace)
    }

    fn select_element(&mut self, element: GraphElement, selected: bool) -> Result<Option<Replace>> {
        match element {
            GraphElement::Node(id) => {
                let node = self.graph.get_node(id).ok_or(GraphError::UnknownNode(id))?;
                if node.is_selected() == selected {
                    return Ok(None);
                }
                let row = node.row();
                self.graph.set_node_selected(id, selected);
                Ok(Some(Replace::new(row, row)))
            }
            GraphElement::Edge(id) => {
                let edge = self.graph.get_edge(id).ok_or(GraphError::UnknownEdge(id))?;
                if edge.is_selected() == selected {
                    return Ok(None);
                }
                let replace = Replace::new(self.graph.node(edge.up()).row(), self.graph.node(edge.down()).row());
                self.graph.set_edge_selected(id, selected);
                Ok(Some(replace))
            }
        }
    }

    fn new_piece(&mut self, element: GraphElement) -> Result<Option<PieceId>> {
        let anchor = match element {
            GraphElement::Node(id) => {
                self.graph.get_node(id).ok_or(GraphError::UnknownNode(id))?;
                id
            }
            GraphElement::Edge(id) => {
                let edge = self.graph.get_edge(id).ok_or(GraphError::UnknownEdge(id))?;
                let down = self.graph.node(edge.down());
                if down.is_visible() && down.is_linear() {
                    edge.down()
                } else {
                    edge.up()
                }
            }
        };
        let Some(fragment) = GraphFragment::around(&self.graph, anchor) else {
            return Ok(None);
        };
        // chains bounded by, or partly owned by, other pieces stay as they are
        match self.pieces.register(&self.graph, fragment) {
            Ok(id) => {
                debug!(piece = id.index(), "piece created");
                Ok(Some(id))
            }
            Err(GraphError::InvalidFragment { reason, .. }) => {
                debug!(reason, "chain cannot become a piece");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn set_piece_visible(&mut self, id: PieceId, visible: bool) -> Result<Option<Replace>> {
        let replace = self.pieces.set_visible(&mut self.graph, id, visible)?;
        if let Some(replace) = replace {
            self.print.recalculate(&self.graph, replace);
        }
        Ok(replace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::format::to_str;
    use crate::layout::RowItem;
    use pretty_assertions::assert_eq;

    const LOG: &str = "\
m|-a b|-alice|-1700000300|-Merge feature
a|-c|-alice|-1700000200|-Tweak parser
b|-d|-bob|-1700000150|-Feature step two
d|-c|-bob|-1700000100|-Feature step one
c|-|-alice|-1700000000|-Initial commit";

    fn node(model: &GraphModel, hash: &str) -> GraphElement {
        GraphElement::Node(model.commit_node(&Hash::from(hash)).unwrap())
    }

    fn fresh_rows(model: &GraphModel) -> Vec<PrintRow> {
        PrintModel::new(model.graph()).rows().to_vec()
    }

    #[test]
    fn test_from_log_keeps_commit_details() {
        let model = GraphModel::from_log(LOG).unwrap();

        assert_eq!(model.print_rows().len(), model.graph().row_count());
        let commit = model.commit(&Hash::from("d")).unwrap();
        assert_eq!(commit.author, "bob");
        assert_eq!(commit.message, "Feature step one");
    }

    #[test]
    fn test_collapse_and_expand_side_line() {
        let mut model = GraphModel::from_log(LOG).unwrap();
        let original = model.print_rows().to_vec();
        let d = node(&model, "d");

        let replace = model.collapse(d).unwrap().unwrap();
        assert_eq!(replace.from, 0);
        let id = model.piece_at(d).unwrap();
        assert!(!model.pieces().piece(id).is_visible());
        assert_eq!(model.print_rows().to_vec(), fresh_rows(&model));
        assert!(model
            .print_rows()
            .iter()
            .any(|row| row.items().iter().any(|item| matches!(item, RowItem::PassThrough(_)))));

        // collapsing again changes nothing
        assert_eq!(model.collapse(d).unwrap(), None);

        model.expand(d).unwrap().unwrap();
        assert_eq!(model.print_rows().to_vec(), original);
    }

    #[test]
    fn test_toggle_flips_piece() {
        let mut model = GraphModel::from_log(LOG).unwrap();
        let before = to_str(model.graph());
        let b = node(&model, "b");

        model.toggle(b).unwrap().unwrap();
        let id = model.piece_at(b).unwrap();
        assert!(!model.pieces().piece(id).is_visible());

        // the hide edge resolves to the same piece
        let hide_edge = model.pieces().piece(id).hide_edge().unwrap();
        model.toggle(GraphElement::Edge(hide_edge)).unwrap().unwrap();
        assert!(model.pieces().piece(id).is_visible());
        assert_eq!(to_str(model.graph()), before);
    }

    #[test]
    fn test_collapse_without_piece_is_none() {
        let mut model = GraphModel::from_log(LOG).unwrap();
        // merge commit has two down edges
        assert_eq!(model.collapse(node(&model, "m")).unwrap(), None);
        assert_eq!(model.expand(node(&model, "a")).unwrap(), None);
        assert!(model.pieces().is_empty());
    }

    #[test]
    fn test_select_single_node_and_piece() {
        let mut model = GraphModel::from_log(LOG).unwrap();
        let m = node(&model, "m");

        assert!(model.select(m, true).unwrap().is_some());
        assert_eq!(model.select(m, true).unwrap(), None);
        assert!(model.print_rows()[0]
            .elements()
            .iter()
            .any(|element| matches!(element, crate::layout::PrintElement::Node { selected: true, .. })));

        model.collapse(node(&model, "d")).unwrap();
        let d = node(&model, "d");
        model.select(d, true).unwrap().unwrap();
        let id = model.piece_at(d).unwrap();
        assert!(model.pieces().piece(id).is_selected());
        assert_eq!(model.print_rows().to_vec(), fresh_rows(&model));
    }

    fn selected_nodes(model: &GraphModel) -> usize {
        model
            .print_rows()
            .iter()
            .flat_map(|row| row.elements())
            .filter(|element| matches!(element, crate::layout::PrintElement::Node { selected: true, .. }))
            .count()
    }

    #[test]
    fn test_deselected_piece_stays_clear_across_toggles() {
        let mut model = GraphModel::from_log(LOG).unwrap();
        let d = node(&model, "d");

        model.collapse(d).unwrap();
        model.expand(d).unwrap();
        model.select(d, true).unwrap().unwrap();
        model.collapse(d).unwrap();
        model.select(d, false).unwrap().unwrap();
        model.expand(d).unwrap();
        assert_eq!(selected_nodes(&model), 0);

        model.select(d, true).unwrap().unwrap();
        model.select(d, false).unwrap().unwrap();
        model.collapse(d).unwrap();
        let id = model.piece_at(d).unwrap();
        let hide_edge = model.pieces().piece(id).hide_edge().unwrap();
        assert!(!model.graph().edge(hide_edge).is_selected());
        assert_eq!(selected_nodes(&model), 0);
    }

    #[test]
    fn test_collapse_after_append_extends_piece() {
        let mut model = GraphModel::from_parents_log("a|-b\nb|-c").unwrap();
        let b = node(&model, "b");
        model.collapse(b).unwrap().unwrap();
        model.expand(b).unwrap().unwrap();
        let id = model.piece_at(b).unwrap();

        model
            .append_log("c|-d|-x|-3|-third\nd|-e|-x|-2|-fourth\ne|-|-x|-1|-fifth")
            .unwrap();
        let c = node(&model, "c");
        model.collapse(c).unwrap().unwrap();

        assert_eq!(model.pieces().len(), 1);
        assert_eq!(model.piece_at(b), Some(id));
        assert_eq!(model.piece_at(c), Some(id));
        for hash in ["b", "c", "d"] {
            let hidden = model.commit_node(&Hash::from(hash)).unwrap();
            assert!(!model.graph().node(hidden).is_visible());
        }
        assert_eq!(model.print_rows().to_vec(), fresh_rows(&model));
    }

    #[test]
    fn test_selected_piece_is_not_taken_over() {
        let mut model = GraphModel::from_parents_log("a|-b\nb|-c").unwrap();
        let b = node(&model, "b");
        model.collapse(b).unwrap().unwrap();
        model.expand(b).unwrap().unwrap();
        model.select(b, true).unwrap().unwrap();

        model.append_log("c|-d|-x|-2|-third\nd|-|-x|-1|-fourth").unwrap();
        assert_eq!(model.collapse(node(&model, "c")).unwrap(), None);
        assert_eq!(model.pieces().len(), 1);
    }

    #[test]
    fn test_failed_append_keeps_placed_details() {
        let mut model = GraphModel::from_log("a|-b|-x|-1|-first").unwrap();
        let err = model
            .append_log("b|-c|-x|-2|-second\na|-|-x|-3|-again")
            .unwrap_err();
        assert_eq!(err, GraphError::DuplicateCommit(Hash::from("a")));

        assert!(model.commit_node(&Hash::from("b")).is_some());
        assert_eq!(model.commit(&Hash::from("b")).unwrap().message, "second");
        assert_eq!(model.commit(&Hash::from("a")).unwrap().message, "first");
    }

    #[test]
    fn test_append_matches_single_build() {
        let lines: Vec<&str> = LOG.lines().collect();
        let mut model = GraphModel::from_log(&lines[..2].join("\n")).unwrap();
        let replace = model.append_log(&lines[2..].join("\n")).unwrap();
        assert_eq!(replace.from, 2);

        let whole = GraphModel::from_log(LOG).unwrap();
        assert_eq!(to_str(model.graph()), to_str(whole.graph()));
        assert_eq!(model.print_rows().to_vec(), whole.print_rows().to_vec());
    }

    #[test]
    fn test_duplicate_commit_rejected() {
        let mut model = GraphModel::from_parents_log("a|-b\nb|-").unwrap();
        let err = model.append_log("a|-|-x|-1|-again").unwrap_err();
        assert_eq!(err, GraphError::DuplicateCommit(Hash::from("a")));
        assert_eq!(model.print_rows().to_vec(), fresh_rows(&model));
    }
}
