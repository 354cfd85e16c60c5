//! Commit-graph layout engine for text git log views.
//!
//! Commits are read from a line based log, laid out into a mutable graph of
//! rows, and drawn as print rows. Linear runs of the graph can be collapsed
//! into a single hidden line and expanded again in place.

pub mod error;
pub mod log;
pub mod core;
pub mod builder;
pub mod piece;
pub mod layout;
pub mod model;
pub mod render;
pub mod git_backend;

pub use builder::GraphBuilder;
pub use crate::core::{Branch, Edge, EdgeId, EdgeType, GraphElement, MutableGraph, Node, NodeId, NodeType, Replace};
pub use error::{GraphError, ParseError, Result};
pub use git_backend::GitWalker;
pub use layout::{PrintElement, PrintModel, PrintRow, RowItem};
pub use crate::log::{Commit, CommitParents, CommitsLines, CommitsTree, Hash};
pub use model::GraphModel;
pub use piece::{GraphFragment, GraphPiece, GraphPieceController, PieceId, PieceRegistry, SimpleGraphPieceController};
pub use render::{CharsetProfile, TextRenderer};
