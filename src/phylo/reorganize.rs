use super::node::NodeId;
use super::tree::Tree;
use crate::groups::GroupIndex;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{instrument, trace};

fn position_in<S: AsRef<str>>(group_order: &[S], family: &str) -> Option<usize> {
    group_order.iter().position(|name| name.as_ref() == family)
}

/// The group most common among the tips below `node_id`.
///
/// Tips without a name or without an index entry do not vote. On a tied
/// count the family listed first in `group_order` wins; families missing from
/// `group_order` lose ties to listed ones and, among themselves, the one met
/// first in tip order wins. Returns `None` when no tip votes.
pub fn dominant_family<S: AsRef<str>>(
    tree: &Tree,
    node_id: &NodeId,
    index: &GroupIndex,
    group_order: &[S],
) -> Option<Arc<str>> {
    let mut tallies: Vec<(Arc<str>, usize)> = Vec::new();
    for tip_id in tree.tip_node_ids(node_id) {
        let Some(membership) = tree.node(Some(tip_id)).and_then(|tip| tip.name_str()).and_then(|name| index.get(name))
        else {
            continue;
        };
        match tallies.iter_mut().find(|(family, _)| *family == membership.group_name) {
            Some((_, count)) => *count += 1,
            None => tallies.push((membership.group_name.clone(), 1)),
        }
    }

    let mut best: Option<(Arc<str>, usize, usize)> = None;
    for (family, count) in tallies {
        let rank = position_in(group_order, &family).unwrap_or(usize::MAX);
        let replace = match &best {
            None => true,
            Some((_, best_count, best_rank)) => {
                count > *best_count || (count == *best_count && rank < *best_rank)
            }
        };
        if replace {
            best = Some((family, count, rank));
        }
    }
    best.map(|(family, _, _)| family)
}

impl Tree {
    /// Reorders every node's children so that sibling subtrees are clustered
    /// by dominant family, in `group_order` order.
    ///
    /// Subtrees whose family is unknown, or not listed in `group_order`, go
    /// first. Siblings with the same family keep their relative order.
    /// Running this twice gives the same tree as running it once.
    pub fn reorganize<S: AsRef<str> + Sync>(&mut self, index: &GroupIndex, group_order: &[S]) {
        for node_id in self.postorder_ids() {
            let tree: &Tree = self;
            let child_ids = tree.child_ids(&node_id);
            if child_ids.len() < 2 {
                continue;
            }

            let mut keyed: Vec<(Option<usize>, NodeId)> = child_ids
                .par_iter()
                .map(|child_id| {
                    let family = dominant_family(tree, child_id, index, group_order);
                    let key = family.as_deref().and_then(|family| position_in(group_order, family));
                    (key, *child_id)
                })
                .collect();

            // Stable: equal keys keep their parse order.
            keyed.par_sort_by_key(|(key, _)| *key);

            trace!(node = %node_id, keys = ?keyed.iter().map(|(key, _)| *key).collect::<Vec<_>>());
            self.set_child_ids(node_id, keyed.into_iter().map(|(_, child_id)| child_id).collect());
        }
    }
}

/// Owned form of [Tree::reorganize].
#[instrument(level = "debug", skip_all, fields(nodes = tree.node_count_all()))]
pub fn reorganize<S: AsRef<str> + Sync>(mut tree: Tree, index: &GroupIndex, group_order: &[S]) -> Tree {
    tree.reorganize(index, group_order);
    tree
}
