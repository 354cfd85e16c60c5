use thiserror::Error;

use crate::core::{EdgeId, NodeId};
use crate::log::Hash;

/// Errors raised while reading the text commit log
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: missing `|-` separator before the {field} field")]
    MissingSeparator { line: usize, field: &'static str },
    #[error("line {line}: invalid date `{token}`")]
    InvalidDate { line: usize, token: String },
    #[error("line {line}: empty commit hash")]
    EmptyHash { line: usize },
    #[error("commit {0} appears more than once in the log")]
    DuplicateCommit(Hash),
    #[error("commit {0} lists itself as a parent")]
    SelfParent(Hash),
}

/// Errors raised by graph construction and mutation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("commit {0} was already added to the graph")]
    DuplicateCommit(Hash),
    #[error("commit {child} lists parent {parent}, which is placed above it")]
    ParentAboveChild { child: Hash, parent: Hash },
    #[error("edge would point upwards: row {up_row} -> row {down_row}")]
    RowOrder { up_row: usize, down_row: usize },
    #[error("invalid fragment {up:?}..{down:?}: {reason}")]
    InvalidFragment {
        up: NodeId,
        down: NodeId,
        reason: &'static str,
    },
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("unknown edge {0:?}")]
    UnknownEdge(EdgeId),
    #[error("edge {0:?} is not attached")]
    DetachedEdge(EdgeId),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub type Result<T, E = GraphError> = std::result::Result<T, E>;
