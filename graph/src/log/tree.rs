use smallvec::SmallVec;
use std::collections::HashMap;
use tracing::debug;

use super::commit::{log_lines, Commit, Hash};
use super::queue::{CommitNode, CommitQueue, NodeSlot};
use crate::error::ParseError;

/// Commits of a log linked to their parents, in log order.
///
/// Built in a single pass; links only point from child to parent, so ancestry
/// walks start at a node and follow [`CommitsTree::parents`].
#[derive(Debug, Clone)]
pub struct CommitsTree {
    nodes: Vec<CommitNode>,
    order: Vec<NodeSlot>,
    by_hash: HashMap<Hash, NodeSlot>,
    unresolved: HashMap<Hash, NodeSlot>,
}

impl CommitsTree {
    /// Parse `hash|-parents|-author|-date|-message` lines, skipping blank ones
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut builder = TreeBuilder::default();
        for (line_no, line) in log_lines(text) {
            builder.push(Commit::parse(line, line_no)?)?;
        }
        Ok(builder.finish())
    }

    pub fn from_commits(commits: impl IntoIterator<Item = Commit>) -> Result<Self, ParseError> {
        let mut builder = TreeBuilder::default();
        for commit in commits {
            builder.push(commit)?;
        }
        Ok(builder.finish())
    }

    pub fn size(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Node at log position `index`
    ///
    /// # Panics
    /// When `index >= self.size()`.
    pub fn node(&self, index: usize) -> &CommitNode {
        &self.nodes[self.order[index]]
    }

    pub fn get(&self, index: usize) -> Option<&CommitNode> {
        self.order.get(index).map(|&slot| &self.nodes[slot])
    }

    pub fn index_of(&self, hash: &Hash) -> Option<usize> {
        self.by_hash
            .get(hash)
            .and_then(|&slot| self.nodes[slot].log_index())
    }

    /// Log indices of the parents of `index` that appear in the log, main parent first
    pub fn parents(&self, index: usize) -> SmallVec<[usize; 2]> {
        self.node(index)
            .parent_slots()
            .iter()
            .filter_map(|&slot| self.nodes[slot].log_index())
            .collect()
    }

    pub fn main_parent(&self, index: usize) -> Option<usize> {
        self.parent_at(index, 0)
    }

    pub fn second_parent(&self, index: usize) -> Option<usize> {
        self.parent_at(index, 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommitNode> + '_ {
        self.order.iter().map(move |&slot| &self.nodes[slot])
    }

    /// Parent hashes that never got a line of their own
    pub fn unresolved_parents(&self) -> impl Iterator<Item = &Hash> {
        self.unresolved.keys()
    }

    fn parent_at(&self, index: usize, position: usize) -> Option<usize> {
        self.node(index)
            .parent_slots()
            .get(position)
            .and_then(|&slot| self.nodes[slot].log_index())
    }
}

#[derive(Default)]
struct TreeBuilder {
    queue: CommitQueue,
    order: Vec<NodeSlot>,
    by_hash: HashMap<Hash, NodeSlot>,
}

impl TreeBuilder {
    fn push(&mut self, commit: Commit) -> Result<(), ParseError> {
        if self.by_hash.contains_key(&commit.hash) {
            return Err(ParseError::DuplicateCommit(commit.hash));
        }
        if commit.parents.contains(&commit.hash) {
            return Err(ParseError::SelfParent(commit.hash));
        }

        let slot = self.queue.pop_commit_node(&commit.hash);
        let mut parents = SmallVec::new();
        for parent in &commit.parents {
            // a parent read earlier is linked directly, otherwise it waits in the queue
            let parent_slot = match self.by_hash.get(parent) {
                Some(&read) => read,
                None => self.queue.get_commit_node(parent),
            };
            parents.push(parent_slot);
        }

        let hash = commit.hash.clone();
        self.queue.node_mut(slot).fill(commit, self.order.len(), parents);
        self.by_hash.insert(hash, slot);
        self.order.push(slot);
        Ok(())
    }

    fn finish(self) -> CommitsTree {
        let (nodes, unresolved) = self.queue.into_parts();
        debug!(
            commits = self.order.len(),
            unresolved = unresolved.len(),
            "commit tree built"
        );
        CommitsTree {
            nodes,
            order: self.order,
            by_hash: self.by_hash,
            unresolved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "\
c3|-c2 c1|-Dave|-40|-Merge feature
c2|-c0|-Carol|-30|-Main work
c1|-c0|-Bob|-20|-Feature
c0|-|-Alice|-10|-Initial
";

    #[test]
    fn test_size_matches_lines() {
        let tree = CommitsTree::parse(LOG).unwrap();
        assert_eq!(tree.size(), 4);
        for i in 0..tree.size() {
            assert_eq!(tree.node(i).log_index(), Some(i));
        }
    }

    #[test]
    fn test_parents_resolved_lazily() {
        let tree = CommitsTree::parse(LOG).unwrap();

        assert_eq!(tree.main_parent(0), Some(1));
        assert_eq!(tree.second_parent(0), Some(2));
        assert_eq!(tree.parents(1).as_slice(), &[3]);
        assert_eq!(tree.parents(2).as_slice(), &[3]);
        assert!(tree.parents(3).is_empty());
        assert_eq!(tree.unresolved_parents().count(), 0);
    }

    #[test]
    fn test_commit_data_is_kept() {
        let tree = CommitsTree::parse(LOG).unwrap();
        let commit = tree.node(0).commit().unwrap();
        assert_eq!(commit.author, "Dave");
        assert_eq!(commit.message, "Merge feature");
        assert_eq!(tree.index_of(&Hash::from("c1")), Some(2));
    }

    #[test]
    fn test_missing_parent_stays_unresolved() {
        let tree = CommitsTree::parse("a|-b|-A|-1|-m\n").unwrap();
        assert_eq!(tree.main_parent(0), None);
        let missing: Vec<_> = tree.unresolved_parents().collect();
        assert_eq!(missing, vec![&Hash::from("b")]);
    }

    #[test]
    fn test_bad_date_aborts_parse() {
        let err = CommitsTree::parse("a|-|-A|-1|-m\nb|-|-A|-soon|-m\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidDate { line: 2, .. }));
    }

    #[test]
    fn test_bad_layout_aborts_parse() {
        let err = CommitsTree::parse("a|-|-A").unwrap_err();
        assert!(matches!(err, ParseError::MissingSeparator { line: 1, .. }));
    }

    #[test]
    fn test_duplicate_commit_rejected() {
        let err = CommitsTree::parse("a|-|-A|-1|-m\na|-|-A|-1|-m\n").unwrap_err();
        assert_eq!(err, ParseError::DuplicateCommit(Hash::from("a")));
    }

    #[test]
    fn test_self_parent_rejected() {
        let err = CommitsTree::parse("a|-a|-A|-1|-m\n").unwrap_err();
        assert_eq!(err, ParseError::SelfParent(Hash::from("a")));
    }

    #[test]
    fn test_empty_log() {
        let tree = CommitsTree::parse("\n\n").unwrap();
        assert!(tree.is_empty());
    }
}
