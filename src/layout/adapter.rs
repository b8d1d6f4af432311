use super::engine::{BasePoint, LayoutEngine};
use super::positioned::PositionedTree;
use super::tidy::TidyTreeLayout;
use crate::TreeFloat;
use crate::groups::{BranchLengthConfig, Direction, GroupIndex};
use crate::phylo::{Node, NodeId, Tree};
use slotmap::SecondaryMap;
use thiserror::Error;
use tracing::{debug, instrument};

pub const CANVAS_WIDTH: TreeFloat = 1000e0;
pub const CANVAS_HEIGHT: TreeFloat = 1000e0;
pub const CANVAS_PADDING: TreeFloat = 120e0;

const SAME_GROUP_SEPARATION: TreeFloat = 1e0;
const OTHER_GROUP_SEPARATION: TreeFloat = 2e0;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Cannot lay out an empty tree.")]
    EmptyTree,
    #[error("Layout engine returned no coordinates for node {0}.")]
    MissingCoordinates(NodeId),
    #[error("Node {0} ended up with a non-finite coordinate.")]
    NonFiniteCoordinate(NodeId),
}

/// Neighbours from the same group sit half as far apart as neighbours from
/// different groups. Unnamed or unindexed nodes count as different.
pub fn group_separation(index: &GroupIndex) -> impl Fn(&Node, &Node) -> TreeFloat + '_ {
    move |a, b| match (a.name_str(), b.name_str()) {
        (Some(a), Some(b)) if index.same_group(a, b) => SAME_GROUP_SEPARATION,
        _ => OTHER_GROUP_SEPARATION,
    }
}

/// Lays `tree` out with the default [TidyTreeLayout] engine.
pub fn layout(
    tree: &Tree,
    index: &GroupIndex,
    branch_length: Option<&BranchLengthConfig>,
    direction: Direction,
) -> Result<PositionedTree, LayoutError> {
    layout_with(&TidyTreeLayout, tree, index, branch_length, direction)
}

/// Lays `tree` out with `engine`, then replaces every edge's depth with a
/// length derived from the child's confidence and grows the tree in
/// `direction`.
///
/// `right` and `left` swap the engine's axes so that depth becomes `x`;
/// `up` and `down` keep breadth as `x` and move children along breadth.
#[instrument(level = "debug", skip_all, fields(direction = ?direction, nodes = tree.node_count_all()))]
pub fn layout_with<E: LayoutEngine + ?Sized>(
    engine: &E,
    tree: &Tree,
    index: &GroupIndex,
    branch_length: Option<&BranchLengthConfig>,
    direction: Direction,
) -> Result<PositionedTree, LayoutError> {
    if tree.first_node_id().is_none() {
        return Err(LayoutError::EmptyTree);
    }
    let branch_length = branch_length.copied().unwrap_or_default();
    let separation = group_separation(index);
    let size = (CANVAS_HEIGHT - 2e0 * CANVAS_PADDING, CANVAS_WIDTH - 2e0 * CANVAS_PADDING);

    let mut points = engine.layout(tree, size, &separation);
    let order = tree.preorder_ids();
    apply_branch_lengths(tree, &order, &mut points, &branch_length, direction)?;

    let mut positioned = tree.clone();
    for &node_id in &order {
        let point = points.get(node_id).ok_or(LayoutError::MissingCoordinates(node_id))?;
        let (x, y) = match direction {
            Direction::Right | Direction::Left => (point.depth, point.breadth),
            Direction::Up | Direction::Down => (point.breadth, point.depth),
        };
        if !x.is_finite() || !y.is_finite() {
            return Err(LayoutError::NonFiniteCoordinate(node_id));
        }
        positioned.set_position(node_id, x, y);
    }

    debug!(nodes = order.len(), "layout finished");
    Ok(PositionedTree::new(positioned, direction, CANVAS_WIDTH, CANVAS_HEIGHT, CANVAS_PADDING))
}

/// Parents come before children in `order`, so each child is placed
/// relative to its parent's final coordinates.
fn apply_branch_lengths(
    tree: &Tree,
    order: &[NodeId],
    points: &mut SecondaryMap<NodeId, BasePoint>,
    branch_length: &BranchLengthConfig,
    direction: Direction,
) -> Result<(), LayoutError> {
    for node_id in order {
        let Some(&parent_id) = tree.parent_id(node_id) else {
            continue;
        };
        let parent = *points.get(parent_id).ok_or(LayoutError::MissingCoordinates(parent_id))?;
        let length = branch_length.length_for(tree.confidence(node_id));
        let point = points.get_mut(*node_id).ok_or(LayoutError::MissingCoordinates(*node_id))?;
        match direction {
            Direction::Right => point.depth = parent.depth + length,
            Direction::Left => point.depth = parent.depth - length,
            Direction::Down => point.breadth = parent.breadth + length,
            Direction::Up => point.breadth = parent.breadth - length,
        }
    }
    Ok(())
}
