// -------------------------------------
// #![allow(dead_code)]
// #![allow(unused_mut)]
// #![allow(unused_imports)]
// #![allow(unused_variables)]
// #![allow(clippy::type_complexity)]
// #![allow(clippy::too_many_arguments)]
// -------------------------------------

mod groups;
mod layout;
mod parsers;
mod phylo;

use thiserror::Error;
use tracing::instrument;

pub type TreeFloat = f64;

pub use groups::BranchLengthConfig;
pub use groups::ConfigError;
pub use groups::Direction;
pub use groups::Group;
pub use groups::GroupConfig;
pub use groups::GroupIndex;
pub use groups::GroupMembership;
pub use groups::Groups;
pub use groups::LayoutOptions;
pub use layout::BasePoint;
pub use layout::CANVAS_HEIGHT;
pub use layout::CANVAS_PADDING;
pub use layout::CANVAS_WIDTH;
pub use layout::LayoutEngine;
pub use layout::LayoutError;
pub use layout::PositionedNode;
pub use layout::PositionedRecord;
pub use layout::PositionedTree;
pub use layout::Separation;
pub use layout::TidyTreeLayout;
pub use layout::group_separation;
pub use layout::layout;
pub use layout::layout_with;
pub use parsers::TreeParseError;
pub use parsers::newick::parse_newick;
pub use phylo::Node;
pub use phylo::NodeId;
pub use phylo::NodeType;
pub use phylo::Tree;
pub use phylo::TreeError;
pub use phylo::dominant_family;
pub use phylo::reorganize;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] TreeParseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Parses `newick`, orders sibling subtrees by the groups in `config` and
/// lays the result out in the configured direction.
#[instrument(level = "debug", skip_all, fields(len = newick.len()))]
pub fn layout_newick(
    newick: &str,
    config: &GroupConfig,
    branch_length: Option<&BranchLengthConfig>,
) -> Result<PositionedTree, Error> {
    let index = GroupIndex::build(config);
    let tree = reorganize(parse_newick(newick)?, &index, index.group_order());
    Ok(layout(&tree, &index, branch_length, config.direction())?)
}
