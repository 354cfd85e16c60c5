use smallvec::SmallVec;
use std::collections::HashMap;

use super::commit::{Commit, Hash};

/// Slot of a [`CommitNode`] inside a [`CommitQueue`]; stable for the queue's lifetime
pub type NodeSlot = usize;

/// A commit as seen while reading the log.
///
/// A node starts out as a placeholder (only its hash is known because a child
/// named it as a parent) and is filled once its own line is read.
#[derive(Debug, Clone)]
pub struct CommitNode {
    hash: Hash,
    commit: Option<Commit>,
    parents: SmallVec<[NodeSlot; 2]>,
    log_index: Option<usize>,
}

impl CommitNode {
    fn placeholder(hash: Hash) -> Self {
        Self {
            hash,
            commit: None,
            parents: SmallVec::new(),
            log_index: None,
        }
    }

    pub fn hash(&self) -> &Hash {
        &self.hash
    }

    /// Commit data, `None` while this is still a placeholder
    pub fn commit(&self) -> Option<&Commit> {
        self.commit.as_ref()
    }

    /// Position in the log, assigned once when the node's line is read
    pub fn log_index(&self) -> Option<usize> {
        self.log_index
    }

    pub fn is_placeholder(&self) -> bool {
        self.log_index.is_none()
    }

    pub(crate) fn parent_slots(&self) -> &[NodeSlot] {
        &self.parents
    }

    pub(crate) fn fill(&mut self, commit: Commit, log_index: usize, parents: SmallVec<[NodeSlot; 2]>) {
        debug_assert!(self.log_index.is_none(), "log index assigned twice");
        self.commit = Some(commit);
        self.log_index = Some(log_index);
        self.parents = parents;
    }
}

/// Hands out nodes for hashes while the log is read front to back.
///
/// Parents referenced before their own line are cached as placeholders until
/// that line is reached.
#[derive(Debug, Default)]
pub struct CommitQueue {
    nodes: Vec<CommitNode>,
    pending: HashMap<Hash, NodeSlot>,
}

impl CommitQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node for `hash`, creating and caching a placeholder if none is pending
    pub fn get_commit_node(&mut self, hash: &Hash) -> NodeSlot {
        if let Some(&slot) = self.pending.get(hash) {
            return slot;
        }
        let slot = self.push(hash.clone());
        self.pending.insert(hash.clone(), slot);
        slot
    }

    /// Take the pending placeholder for `hash`.
    ///
    /// When nothing is pending a fresh node is created but not cached, since
    /// the caller fills it right away.
    pub fn pop_commit_node(&mut self, hash: &Hash) -> NodeSlot {
        match self.pending.remove(hash) {
            Some(slot) => slot,
            None => self.push(hash.clone()),
        }
    }

    pub fn node(&self, slot: NodeSlot) -> &CommitNode {
        &self.nodes[slot]
    }

    pub(crate) fn node_mut(&mut self, slot: NodeSlot) -> &mut CommitNode {
        &mut self.nodes[slot]
    }

    /// Hashes referenced as parents whose lines have not been read
    pub fn pending_hashes(&self) -> impl Iterator<Item = &Hash> {
        self.pending.keys()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn into_parts(self) -> (Vec<CommitNode>, HashMap<Hash, NodeSlot>) {
        (self.nodes, self.pending)
    }

    fn push(&mut self, hash: Hash) -> NodeSlot {
        self.nodes.push(CommitNode::placeholder(hash));
        self.nodes.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_caches_placeholder() {
        let mut queue = CommitQueue::new();
        let a = queue.get_commit_node(&Hash::from("a"));
        let again = queue.get_commit_node(&Hash::from("a"));

        assert_eq!(a, again);
        assert_eq!(queue.pending_len(), 1);
        assert!(queue.node(a).is_placeholder());
    }

    #[test]
    fn test_pop_returns_cached_node() {
        let mut queue = CommitQueue::new();
        let a = queue.get_commit_node(&Hash::from("a"));

        assert_eq!(queue.pop_commit_node(&Hash::from("a")), a);
        assert_eq!(queue.pending_len(), 0);
    }

    #[test]
    fn test_pop_without_placeholder_does_not_cache() {
        let mut queue = CommitQueue::new();
        let first = queue.pop_commit_node(&Hash::from("b"));
        let second = queue.pop_commit_node(&Hash::from("b"));

        assert_ne!(first, second);
        assert_eq!(queue.pending_len(), 0);
    }
}
