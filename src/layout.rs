mod adapter;
mod engine;
mod positioned;
mod tidy;

pub use adapter::{
    CANVAS_HEIGHT, CANVAS_PADDING, CANVAS_WIDTH, LayoutError, group_separation, layout,
    layout_with,
};
pub use engine::{BasePoint, LayoutEngine, Separation};
pub use positioned::{PositionedNode, PositionedRecord, PositionedTree};
pub use tidy::TidyTreeLayout;
