use super::TreeFloat;
use slotmap::new_key_type;
use std::{fmt::Display, sync::Arc};

new_key_type! { pub struct NodeId; }

#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd, Ord, Eq)]
pub enum NodeType {
    #[default]
    Unset,
    Tip,
    Internal,
    Root,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Node {
    node_id: Option<NodeId>,
    parent_id: Option<NodeId>,
    child_ids: Vec<NodeId>,
    name: Option<Arc<str>>,
    confidence: Option<TreeFloat>,
    x: Option<TreeFloat>,
    y: Option<TreeFloat>,
    node_type: NodeType,
}

impl Node {
    pub fn new() -> Self { Self::default() }
    pub fn is_tip(&self) -> bool { self.child_ids.is_empty() }
    pub fn child_ids(&self) -> &[NodeId] { &self.child_ids }
    pub(crate) fn set_child_ids(&mut self, child_ids: Vec<NodeId>) { self.child_ids = child_ids }
    pub fn add_child_id(&mut self, node_id: NodeId) { self.child_ids.push(node_id) }
    pub fn node_id(&self) -> Option<&NodeId> { self.node_id.as_ref() }
    pub fn set_node_id(&mut self, node_id: NodeId) { self.node_id = Some(node_id); }
    pub fn parent_id(&self) -> Option<&NodeId> { self.parent_id.as_ref() }
    pub fn set_parent_id(&mut self, node_id: Option<NodeId>) { self.parent_id = node_id; }
    pub fn name(&self) -> Option<Arc<str>> { self.name.clone() }

    /// Borrowing variant of [Node::name], for lookups on hot paths.
    pub fn name_str(&self) -> Option<&str> { self.name.as_deref() }

    pub fn set_name<'a>(&mut self, name: Option<impl Into<&'a str>>) {
        self.name = name.map(|name| name.into().into());
    }

    pub fn confidence(&self) -> Option<TreeFloat> { self.confidence }
    pub fn set_confidence(&mut self, confidence: Option<TreeFloat>) { self.confidence = confidence; }

    /// Coordinates assigned by the layout adapter; `None` before layout.
    pub fn position(&self) -> Option<(TreeFloat, TreeFloat)> { self.x.zip(self.y) }

    pub fn set_position(&mut self, x: TreeFloat, y: TreeFloat) {
        self.x = Some(x);
        self.y = Some(y);
    }

    pub fn node_type(&self) -> NodeType { self.node_type }

    pub fn set_node_type(&mut self) -> NodeType {
        self.node_type = if self.parent_id.is_none() {
            NodeType::Root
        } else if self.child_ids.is_empty() {
            NodeType::Tip
        } else {
            NodeType::Internal
        };
        self.node_type
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let disp = format!("{self:?}");
        write!(f, "{}", &disp[7..disp.len() - 1])
    }
}

impl Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                NodeType::Unset => "Unset",
                NodeType::Tip => "Tip",
                NodeType::Internal => "Internal",
                NodeType::Root => "Root",
            }
        )
    }
}
