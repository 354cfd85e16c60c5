pub mod commit;
pub mod queue;
pub mod tree;
pub mod lines;

pub use commit::{parse_log, parse_parents_log, Commit, CommitParents, Hash, Parents, SEPARATOR};
pub use queue::{CommitNode, CommitQueue, NodeSlot};
pub use tree::CommitsTree;
pub use lines::CommitsLines;
