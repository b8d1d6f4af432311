use super::TreeFloat;
use super::node::{Node, NodeId, NodeType};
use slotmap::SlotMap;
use std::fmt::Display;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Default, Clone)]
pub struct Tree {
    nodes: SlotMap<NodeId, Node>,
    first_node_id: Option<NodeId>,
    tip_count_all: usize,
    internal_node_count_all: usize,
    node_count_all: usize,
}

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Parent node with NodeId: {0} does not exist.")]
    ParentNodeDoesNotExist(NodeId),
    #[error("Tree validation failed: {0}.")]
    InvalidTree(String),
}

impl Tree {
    // =========================================================================
    // Construction & Validation
    // =========================================================================

    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(
        &mut self,
        mut node: Node,
        parent_node_id: Option<NodeId>,
    ) -> Result<NodeId, TreeError> {
        if let Some(parent_node_id_value) = parent_node_id
            && !self.node_exists(parent_node_id)
        {
            return Err(TreeError::ParentNodeDoesNotExist(parent_node_id_value));
        }

        node.set_parent_id(parent_node_id);
        let node_id = self.nodes.insert_with_key(|node_id| {
            node.set_node_id(node_id);
            node
        });

        match self.node_mut(parent_node_id) {
            Some(parent_node) => parent_node.add_child_id(node_id),
            None => {
                if self.first_node_id.is_none() {
                    self.first_node_id = Some(node_id);
                }
            }
        }

        Ok(node_id)
    }

    /// Makes `node` the only child of `parent_node_id`. Subtrees that were
    /// attached to the parent before are removed from the tree.
    pub fn seed_children(
        &mut self,
        node: Node,
        parent_node_id: NodeId,
    ) -> Result<NodeId, TreeError> {
        if !self.node_exists(Some(parent_node_id)) {
            return Err(TreeError::ParentNodeDoesNotExist(parent_node_id));
        }

        let previous = self.nodes[parent_node_id].child_ids().to_vec();
        self.nodes[parent_node_id].set_child_ids(Vec::new());
        for child_id in previous {
            self.remove_subtree(child_id);
        }

        self.add_node(node, Some(parent_node_id))
    }

    fn remove_subtree(&mut self, node_id: NodeId) {
        let mut stack: Vec<NodeId> = vec![node_id];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.remove(id) {
                stack.extend_from_slice(node.child_ids());
            }
        }
    }

    pub fn validate(&mut self) -> Result<NodeId, TreeError> {
        let mut count_of_tip: usize = 0;
        let mut count_of_internal: usize = 0;
        let mut count_of_root: usize = 0;

        for node in self.nodes.values_mut() {
            match node.set_node_type() {
                NodeType::Unset => {}
                NodeType::Tip => count_of_tip += 1,
                NodeType::Internal => count_of_internal += 1,
                NodeType::Root => {
                    count_of_root += 1;
                    if let Some(node_id) = node.node_id() {
                        self.first_node_id = Some(*node_id);
                    }
                    if node.is_tip() {
                        count_of_tip += 1;
                    } else {
                        count_of_internal += 1;
                    }
                }
            };
        }

        if count_of_root != 1 {
            return Err(TreeError::InvalidTree(format!(
                "count_of_root({count_of_root}) should equal 1"
            )));
        }

        self.tip_count_all = count_of_tip;
        self.internal_node_count_all = count_of_internal;
        self.node_count_all = self.nodes.len();

        self.first_node_id.ok_or_else(|| {
            TreeError::InvalidTree("tree has no first node".to_string())
        })
    }

    // =========================================================================
    // Tree Properties
    // =========================================================================

    pub fn has_confidence_values(&self) -> bool {
        self.nodes.values().any(|n| n.confidence().is_some())
    }

    pub fn tip_count_all(&self) -> usize {
        self.tip_count_all
    }

    pub fn internal_node_count_all(&self) -> usize {
        self.internal_node_count_all
    }

    pub fn node_count_all(&self) -> usize {
        self.node_count_all
    }

    /// Number of edges on the longest root-to-tip path.
    pub fn max_depth(&self) -> usize {
        let Some(first_node_id) = self.first_node_id else {
            return 0;
        };
        let mut max_depth: usize = 0;
        let mut stack: Vec<(NodeId, usize)> = vec![(first_node_id, 0)];
        while let Some((node_id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for &child_id in self.child_ids(&node_id) {
                stack.push((child_id, depth + 1));
            }
        }
        max_depth
    }

    // =========================================================================
    // Node Access
    // =========================================================================

    pub fn node(&self, node_id: Option<NodeId>) -> Option<&Node> {
        if let Some(node_id) = node_id { self.nodes.get(node_id) } else { None }
    }

    pub fn node_mut(&mut self, node_id: Option<NodeId>) -> Option<&mut Node> {
        if let Some(node_id) = node_id {
            self.nodes.get_mut(node_id)
        } else {
            None
        }
    }

    pub fn node_exists(&self, node_id: Option<NodeId>) -> bool {
        self.node(node_id).is_some()
    }

    pub fn first_node_id(&self) -> Option<NodeId> {
        self.first_node_id
    }

    pub fn node_id_by_name<'a>(&self, name: impl Into<&'a str>) -> Option<NodeId> {
        let name: &str = name.into();
        self.nodes.iter().find_map(|(node_id, node)| {
            if node.name_str() == Some(name) { Some(node_id) } else { None }
        })
    }

    pub fn name(&self, node_id: &NodeId) -> Option<Arc<str>> {
        self.nodes[*node_id].name()
    }

    pub fn confidence(&self, node_id: &NodeId) -> Option<TreeFloat> {
        self.nodes[*node_id].confidence()
    }

    pub(crate) fn set_position(&mut self, node_id: NodeId, x: TreeFloat, y: TreeFloat) {
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.set_position(x, y);
        }
    }

    // =========================================================================
    // Tree Traversal
    // =========================================================================

    pub fn parent_id(&self, node_id: &NodeId) -> Option<&NodeId> {
        self.nodes[*node_id].parent_id()
    }

    pub fn child_ids(&self, node_id: &NodeId) -> &[NodeId] {
        self.nodes[*node_id].child_ids()
    }

    pub(crate) fn set_child_ids(&mut self, node_id: NodeId, child_ids: Vec<NodeId>) {
        self.nodes[node_id].set_child_ids(child_ids);
    }

    pub fn children(&self, node_id: &NodeId) -> Vec<&Node> {
        self.child_ids(node_id).iter().map(|&child_id| &self.nodes[child_id]).collect()
    }

    pub fn is_tip(&self, node_id: &NodeId) -> bool {
        self.nodes[*node_id].is_tip()
    }

    /// Tips below `node_id` in left-to-right order; a tip yields itself.
    pub fn tip_node_ids(&self, node_id: &NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = vec![*node_id];
        while let Some(id) = stack.pop() {
            let child_ids = self.child_ids(&id);
            if child_ids.is_empty() {
                result.push(id);
            } else {
                stack.extend(child_ids.iter().rev());
            }
        }
        result
    }

    pub fn tip_node_ids_all(&self) -> Vec<NodeId> {
        if let Some(id) = self.first_node_id {
            self.tip_node_ids(&id)
        } else {
            Vec::new()
        }
    }

    /// Parents before children, siblings left to right.
    pub fn preorder_ids(&self) -> Vec<NodeId> {
        let mut result = Vec::with_capacity(self.nodes.len());
        let Some(first_node_id) = self.first_node_id else {
            return result;
        };
        let mut stack: Vec<NodeId> = vec![first_node_id];
        while let Some(id) = stack.pop() {
            result.push(id);
            stack.extend(self.child_ids(&id).iter().rev());
        }
        result
    }

    /// Children before parents, siblings left to right.
    pub fn postorder_ids(&self) -> Vec<NodeId> {
        let mut result = Vec::with_capacity(self.nodes.len());
        let Some(first_node_id) = self.first_node_id else {
            return result;
        };
        let mut stack: Vec<(NodeId, bool)> = vec![(first_node_id, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                result.push(id);
            } else {
                stack.push((id, true));
                for &child_id in self.child_ids(&id).iter().rev() {
                    stack.push((child_id, false));
                }
            }
        }
        result
    }

    // =========================================================================
    // Display
    // =========================================================================

    fn print_tree(&self) -> String {
        let mut result: String = String::new();
        result.push_str(&format!(
            "Internal Nodes: {}\nTips: {}\nAll Nodes: {}\nConfidence values: {}\n\n",
            self.internal_node_count_all,
            self.tip_count_all,
            self.node_count_all,
            self.has_confidence_values()
        ));

        let Some(first_node_id) = self.first_node_id else {
            return result;
        };

        let mut stack: Vec<(NodeId, usize)> = vec![(first_node_id, 0)];
        while let Some((node_id, level)) = stack.pop() {
            result.push_str(&self.print_node(&self.nodes[node_id], level));
            for &child_id in self.child_ids(&node_id).iter().rev() {
                stack.push((child_id, level + 1));
            }
        }

        result
    }

    fn print_node(&self, node: &Node, level: usize) -> String {
        format!(
            "{}- {} | {} | {:<5.3} | {}\n",
            " ".repeat(level * 4),
            if let Some(node_id) = node.node_id() {
                node_id.to_string()
            } else {
                "None".to_string()
            },
            if let Some(name) = &node.name() { name.to_string() } else { "None".to_string() },
            node.confidence().unwrap_or(TreeFloat::NAN),
            node.node_type(),
        )
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.print_tree())
    }
}
