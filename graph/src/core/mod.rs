pub mod node;
pub mod edge;
pub mod graph;
pub mod replace;
pub mod format;

pub use node::{Branch, Node, NodeId, NodeType};
pub use edge::{Edge, EdgeId, EdgeSplice, EdgeType};
pub use graph::{GraphElement, MutableGraph};
pub use replace::Replace;
