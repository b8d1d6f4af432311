use super::config::GroupConfig;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Where a named node sits in the grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMembership {
    pub group_name: Arc<str>,
    /// Position of the group in the group order.
    pub group_rank: usize,
    /// Position of the node in its group's member list.
    pub node_index: usize,
}

/// Read-only lookup from node name to [GroupMembership].
///
/// Built once per [GroupConfig] and passed by reference to whoever needs it.
#[derive(Debug, Default, Clone)]
pub struct GroupIndex {
    members: FxHashMap<Arc<str>, GroupMembership>,
    group_order: Vec<Arc<str>>,
}

impl GroupIndex {
    /// Walks the effective group order and registers each member. Groups
    /// that are not defined, or define no members, are skipped. A name that
    /// is listed more than once keeps its last registration.
    pub fn build(config: &GroupConfig) -> Self {
        let group_order: Vec<Arc<str>> =
            config.group_order().into_iter().map(Arc::from).collect();
        let mut members: FxHashMap<Arc<str>, GroupMembership> = FxHashMap::default();

        for (group_rank, group_name) in group_order.iter().enumerate() {
            let Some(order) = config.groups.get(group_name).and_then(|group| group.order.as_ref())
            else {
                trace!(group = %group_name, "group has no members; skipped");
                continue;
            };

            for (node_index, node_name) in order.iter().enumerate() {
                let membership =
                    GroupMembership { group_name: group_name.clone(), group_rank, node_index };
                if let Some(previous) = members.insert(Arc::from(node_name.as_str()), membership) {
                    trace!(
                        node = %node_name,
                        from = %previous.group_name,
                        to = %group_name,
                        "membership overwritten"
                    );
                }
            }
        }

        debug!(groups = group_order.len(), members = members.len(), "built group index");
        Self { members, group_order }
    }

    pub fn get(&self, name: &str) -> Option<&GroupMembership> {
        self.members.get(name)
    }

    /// Position of `group_name` in the group order.
    pub fn group_rank(&self, group_name: &str) -> Option<usize> {
        self.group_order.iter().position(|name| name.as_ref() == group_name)
    }

    /// True when both names are indexed and share a group rank.
    pub fn same_group(&self, a: &str, b: &str) -> bool {
        match (self.get(a), self.get(b)) {
            (Some(a), Some(b)) => a.group_rank == b.group_rank,
            _ => false,
        }
    }

    pub fn group_order(&self) -> &[Arc<str>] {
        &self.group_order
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
