mod node;
mod reorganize;
mod tree;

pub use super::TreeFloat;

pub use node::{Node, NodeId, NodeType};
pub use reorganize::{dominant_family, reorganize};
pub use tree::{Tree, TreeError};
