use std::collections::HashMap;
use tracing::debug;

use crate::core::{Branch, EdgeType, MutableGraph, NodeId, NodeType};
use crate::error::{GraphError, Result};
use crate::log::{parse_parents_log, CommitParents, Hash};

/// Lays commits out into a [`MutableGraph`], one row per commit, and keeps
/// enough state to append more commits later without rebuilding.
///
/// Every edge the builder creates joins adjacent rows: a line that has to
/// cross a row without a commit in it gets an edge node there. Parents that
/// were named but not read yet wait in the row below the last commit as end
/// nodes.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    pending: HashMap<Hash, NodeId>,
    next_row: usize,
    next_branch: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(records: impl IntoIterator<Item = CommitParents>) -> Result<(MutableGraph, Self)> {
        let mut graph = MutableGraph::new();
        let mut builder = Self::new();
        builder.append(&mut graph, records)?;
        Ok((graph, builder))
    }

    /// Build from `hash|-parents` lines
    pub fn build_from_str(text: &str) -> Result<(MutableGraph, Self)> {
        Self::build(parse_parents_log(text)?)
    }

    /// Append records below the current last commit.
    ///
    /// Returns the first row whose nodes changed. Records before a failing
    /// one stay appended.
    pub fn append(
        &mut self,
        graph: &mut MutableGraph,
        records: impl IntoIterator<Item = CommitParents>,
    ) -> Result<usize> {
        let first_row = self.next_row;
        let mut appended = 0usize;
        for record in records {
            self.append_one(graph, &record)?;
            appended += 1;
        }
        debug!(
            appended,
            rows = graph.row_count(),
            pending = self.pending.len(),
            "graph append"
        );
        Ok(first_row)
    }

    pub fn append_str(&mut self, graph: &mut MutableGraph, text: &str) -> Result<usize> {
        let records = parse_parents_log(text)?;
        self.append(graph, records)
    }

    /// Row the next appended commit goes to
    pub fn next_row(&self) -> usize {
        self.next_row
    }

    /// Parents referenced but not read yet
    pub fn pending(&self) -> impl Iterator<Item = &Hash> {
        self.pending.keys()
    }

    fn append_one(&mut self, graph: &mut MutableGraph, record: &CommitParents) -> Result<()> {
        let row = self.next_row;
        let hash = &record.hash;

        if graph.commit_node(hash).is_some() {
            return Err(GraphError::DuplicateCommit(hash.clone()));
        }
        if let Some(parent) = record
            .parents
            .iter()
            .find(|p| *p == hash || graph.commit_node(p).is_some())
        {
            return Err(GraphError::ParentAboveChild {
                child: hash.clone(),
                parent: parent.clone(),
            });
        }

        let node = match self.pending.remove(hash) {
            Some(id) => {
                graph.set_node_type(id, NodeType::Commit);
                id
            }
            None => {
                let branch = self.new_branch();
                graph.add_node(hash.clone(), NodeType::Commit, row, branch)
            }
        };
        let branch = graph.node(node).branch();

        // lines waiting for other commits pass through this row
        let waiting: Vec<NodeId> = graph
            .row(row)
            .iter()
            .copied()
            .filter(|&id| graph.node(id).node_type() == NodeType::EndCommit)
            .collect();
        for id in waiting {
            graph.set_node_type(id, NodeType::Edge);
            let (target, line_branch) = {
                let node = graph.node(id);
                (node.hash().clone(), node.branch())
            };
            let next = graph.add_node(target.clone(), NodeType::EndCommit, row + 1, line_branch);
            graph.add_edge(id, next, EdgeType::Usual, line_branch)?;
            self.pending.insert(target, next);
        }

        for (position, parent) in record.parents.iter().enumerate() {
            let target = match self.pending.get(parent) {
                Some(&target) => target,
                None => {
                    let line_branch = if position == 0 { branch } else { self.new_branch() };
                    let target = graph.add_node(parent.clone(), NodeType::EndCommit, row + 1, line_branch);
                    self.pending.insert(parent.clone(), target);
                    target
                }
            };
            let edge_branch = if position == 0 {
                branch
            } else {
                graph.node(target).branch()
            };
            graph.add_edge(node, target, EdgeType::Usual, edge_branch)?;
        }

        self.next_row = row + 1;
        Ok(())
    }

    fn new_branch(&mut self) -> Branch {
        let branch = Branch(self.next_branch);
        self.next_branch += 1;
        branch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::format::to_str;
    use pretty_assertions::assert_eq;

    fn build_str(log: &str) -> String {
        let (graph, _) = GraphBuilder::build_from_str(log).unwrap();
        to_str(&graph)
    }

    #[test]
    fn test_simple() {
        assert_eq!(
            build_str("a0|-a1\na1|-"),
            "a0|-COMMIT_NODE|-|-a0:a1:USUAL|-0\n\
             a1|-COMMIT_NODE|-a0:a1:USUAL|-|-1"
        );
    }

    #[test]
    fn test_more_parents() {
        assert_eq!(
            build_str("a0|-a1 a2 a3\na1|-\na2|-\na3|-"),
            "a0|-COMMIT_NODE|-|-a0:a1:USUAL a0:a2:USUAL a0:a3:USUAL|-0\n\
             a1|-COMMIT_NODE|-a0:a1:USUAL|-|-1\n\
             a2|-EDGE_NODE|-a0:a2:USUAL|-a2:a2:USUAL|-1\n\
             a3|-EDGE_NODE|-a0:a3:USUAL|-a3:a3:USUAL|-1\n\
             a2|-COMMIT_NODE|-a2:a2:USUAL|-|-2\n\
             a3|-EDGE_NODE|-a3:a3:USUAL|-a3:a3:USUAL|-2\n\
             a3|-COMMIT_NODE|-a3:a3:USUAL|-|-3"
        );
    }

    #[test]
    fn test_merge_lines_converge() {
        assert_eq!(
            build_str("m|-a b\na|-c\nb|-c\nc|-"),
            "m|-COMMIT_NODE|-|-m:a:USUAL m:b:USUAL|-0\n\
             a|-COMMIT_NODE|-m:a:USUAL|-a:c:USUAL|-1\n\
             b|-EDGE_NODE|-m:b:USUAL|-b:b:USUAL|-1\n\
             b|-COMMIT_NODE|-b:b:USUAL|-b:c:USUAL|-2\n\
             c|-EDGE_NODE|-a:c:USUAL|-c:c:USUAL|-2\n\
             c|-COMMIT_NODE|-c:c:USUAL b:c:USUAL|-|-3"
        );
    }

    #[test]
    fn test_missing_parent_is_end_node() {
        assert_eq!(
            build_str("a0|-a1"),
            "a0|-COMMIT_NODE|-|-a0:a1:USUAL|-0\n\
             a1|-END_COMMIT_NODE|-a0:a1:USUAL|-|-1"
        );
    }

    #[test]
    fn test_append_simple_end() {
        let (mut graph, mut builder) = GraphBuilder::build_from_str("a0|-").unwrap();
        let first = builder.append_str(&mut graph, "a1|-").unwrap();

        assert_eq!(first, 1);
        assert_eq!(
            to_str(&graph),
            "a0|-COMMIT_NODE|-|-|-0\n\
             a1|-COMMIT_NODE|-|-|-1"
        );
        assert_eq!(graph.edges().count(), 0);
    }

    #[test]
    fn test_append_resolves_end_nodes() {
        let log = "a0|-a1 a2\na1|-a3\na2|-a3\na3|-";
        let (mut graph, mut builder) = GraphBuilder::build_from_str("a0|-a1 a2\na1|-a3").unwrap();
        builder.append_str(&mut graph, "a2|-a3\na3|-").unwrap();

        assert_eq!(to_str(&graph), build_str(log));
        assert_eq!(builder.pending().count(), 0);
    }

    #[test]
    fn test_edges_join_adjacent_rows() {
        let (graph, _) = GraphBuilder::build_from_str(
            "h|-g e\ng|-f\nf|-c\ne|-d\nd|-c b\nc|-a\nb|-a\na|-",
        )
        .unwrap();

        for (_, edge) in graph.edges() {
            assert_eq!(graph.node(edge.down()).row(), graph.node(edge.up()).row() + 1);
        }
    }

    #[test]
    fn test_duplicate_commit_rejected() {
        let err = GraphBuilder::build_from_str("a|-\na|-").unwrap_err();
        assert_eq!(err, GraphError::DuplicateCommit(Hash::from("a")));
    }

    #[test]
    fn test_parent_above_child_rejected() {
        let err = GraphBuilder::build_from_str("a|-\nb|-a").unwrap_err();
        assert_eq!(
            err,
            GraphError::ParentAboveChild {
                child: Hash::from("b"),
                parent: Hash::from("a")
            }
        );
    }

    #[test]
    fn test_parse_error_is_wrapped() {
        let err = GraphBuilder::build_from_str("a0").unwrap_err();
        assert!(matches!(err, GraphError::Parse(_)));
    }
}
