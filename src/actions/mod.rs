//! Graph edits offered as issue remediations. Each action takes a snapshot and
//! returns a new one; nothing is mutated in place.

pub mod merge_nodes;

pub use merge_nodes::{MERGE_CLOSE_VERTICES_ANNOTATION, merge_nodes};

use thiserror::Error;

use crate::osm::{GraphError, NodeId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("merging needs at least two distinct nodes, got {0}")]
    NotEnoughNodes(usize),
    #[error("node {0} is not in the graph")]
    MissingNode(NodeId),
    #[error("edit left the graph inconsistent: {0}")]
    Graph(#[from] GraphError),
}
