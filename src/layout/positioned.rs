use crate::TreeFloat;
use crate::groups::Direction;
use crate::phylo::{NodeId, Tree};
use serde::Serialize;
use slotmap::SecondaryMap;

/// A laid out tree: the input tree with `x`/`y` set on every node, plus the
/// canvas the coordinates were computed for.
#[derive(Debug, Clone)]
pub struct PositionedTree {
    tree: Tree,
    direction: Direction,
    width: TreeFloat,
    height: TreeFloat,
    padding: TreeFloat,
}

/// Nested, renderer-friendly form of one positioned node and its subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    pub name: Option<String>,
    pub confidence: Option<TreeFloat>,
    pub x: TreeFloat,
    pub y: TreeFloat,
    pub children: Vec<PositionedNode>,
}

/// One row of the flat form. `id` is the node's pre-order position and
/// `parent` the pre-order position of its parent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedRecord {
    pub id: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<TreeFloat>,
    pub x: TreeFloat,
    pub y: TreeFloat,
}

#[derive(Serialize)]
struct PositionedDocument<'a> {
    width: TreeFloat,
    height: TreeFloat,
    padding: TreeFloat,
    direction: Direction,
    nodes: &'a [PositionedRecord],
}

impl PositionedTree {
    pub(crate) fn new(
        tree: Tree,
        direction: Direction,
        width: TreeFloat,
        height: TreeFloat,
        padding: TreeFloat,
    ) -> Self {
        Self { tree, direction, width, height, padding }
    }

    pub fn tree(&self) -> &Tree { &self.tree }
    pub fn into_tree(self) -> Tree { self.tree }
    pub fn direction(&self) -> Direction { self.direction }
    pub fn width(&self) -> TreeFloat { self.width }
    pub fn height(&self) -> TreeFloat { self.height }
    pub fn padding(&self) -> TreeFloat { self.padding }

    pub fn position(&self, node_id: NodeId) -> Option<(TreeFloat, TreeFloat)> {
        self.tree.node(Some(node_id))?.position()
    }

    pub fn position_by_name<'a>(&self, name: impl Into<&'a str>) -> Option<(TreeFloat, TreeFloat)> {
        self.position(self.tree.node_id_by_name(name)?)
    }

    /// Builds the nested form bottom-up, without recursion.
    pub fn to_nested(&self) -> Option<PositionedNode> {
        let mut built: SecondaryMap<NodeId, PositionedNode> = SecondaryMap::new();
        for node_id in self.tree.postorder_ids() {
            let node = self.tree.node(Some(node_id))?;
            let (x, y) = node.position()?;
            let children: Vec<PositionedNode> =
                node.child_ids().iter().filter_map(|&child_id| built.remove(child_id)).collect();
            let _ = built.insert(
                node_id,
                PositionedNode {
                    name: node.name_str().map(str::to_string),
                    confidence: node.confidence(),
                    x,
                    y,
                    children,
                },
            );
        }
        built.remove(self.tree.first_node_id()?)
    }

    /// Every positioned node in pre-order, parents referenced by index.
    pub fn to_records(&self) -> Vec<PositionedRecord> {
        let order = self.tree.preorder_ids();
        let mut ids: SecondaryMap<NodeId, usize> = SecondaryMap::with_capacity(order.len());
        let mut records: Vec<PositionedRecord> = Vec::with_capacity(order.len());
        for node_id in order {
            let Some(node) = self.tree.node(Some(node_id)) else {
                continue;
            };
            let Some((x, y)) = node.position() else {
                continue;
            };
            let id = records.len();
            let _ = ids.insert(node_id, id);
            records.push(PositionedRecord {
                id,
                parent: node.parent_id().and_then(|parent_id| ids.get(*parent_id).copied()),
                name: node.name_str().map(str::to_string),
                confidence: node.confidence(),
                x,
                y,
            });
        }
        records
    }

    /// JSON document with the canvas frame and the flat node list under
    /// `nodes`. Nesting depth of the output does not grow with the tree.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let nodes = self.to_records();
        serde_json::to_string(&PositionedDocument {
            width: self.width,
            height: self.height,
            padding: self.padding,
            direction: self.direction,
            nodes: &nodes,
        })
    }
}
