use crate::TreeFloat;
use crate::phylo::{Node, NodeId, Tree};
use slotmap::SecondaryMap;

/// Engine-native coordinates: `breadth` spreads siblings apart, `depth`
/// grows from the root towards the tips.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BasePoint {
    pub breadth: TreeFloat,
    pub depth: TreeFloat,
}

/// Spacing between two nodes that end up next to each other, in units of
/// the engine's minimum spacing.
pub type Separation<'a> = dyn Fn(&Node, &Node) -> TreeFloat + 'a;

/// A generic tree layout: assigns every node of `tree` a [BasePoint] inside
/// `size` (`(breadth extent, depth extent)`).
pub trait LayoutEngine {
    fn layout(
        &self,
        tree: &Tree,
        size: (TreeFloat, TreeFloat),
        separation: &Separation<'_>,
    ) -> SecondaryMap<NodeId, BasePoint>;
}
