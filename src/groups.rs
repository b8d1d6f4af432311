mod config;
mod index;

pub use config::{
    BranchLengthConfig, ConfigError, Direction, Group, GroupConfig, Groups, LayoutOptions,
};
pub use index::{GroupIndex, GroupMembership};
