//! Tidy tree layout.
//!
//! Buchheim, Jünger and Leipert's linear-time form of the Reingold-Tilford
//! algorithm. Adjacent nodes on the facing contours of two subtrees are kept
//! `separation(a, b)` apart; parents are centered over their first and last
//! child. The result is scaled into the requested size.

use super::engine::{BasePoint, LayoutEngine, Separation};
use crate::TreeFloat;
use crate::phylo::{NodeId, Tree};
use slotmap::SecondaryMap;
use tracing::debug;

/// Per-node walk state. Index 0 is a synthetic parent of the root.
#[derive(Debug)]
struct Walker {
    node_id: Option<NodeId>,
    parent: Option<usize>,
    children: Vec<usize>,
    /// Left-to-right index among siblings.
    number: usize,
    depth: usize,
    prelim: TreeFloat,
    modifier: TreeFloat,
    change: TreeFloat,
    shift: TreeFloat,
    thread: Option<usize>,
    ancestor: usize,
    /// Default ancestor for the apportion step of this node's children.
    default_ancestor: Option<usize>,
    x: TreeFloat,
}

impl Walker {
    fn new(index: usize, node_id: Option<NodeId>, parent: Option<usize>, number: usize, depth: usize) -> Self {
        Self {
            node_id,
            parent,
            children: Vec::new(),
            number,
            depth,
            prelim: 0e0,
            modifier: 0e0,
            change: 0e0,
            shift: 0e0,
            thread: None,
            ancestor: index,
            default_ancestor: None,
            x: 0e0,
        }
    }
}

struct Walk<'a, 't> {
    tree: &'t Tree,
    separation: &'a Separation<'a>,
    walkers: Vec<Walker>,
}

impl Walk<'_, '_> {
    fn separation(&self, a: usize, b: usize) -> TreeFloat {
        let node_a = self.tree.node(self.walkers[a].node_id);
        let node_b = self.tree.node(self.walkers[b].node_id);
        match (node_a, node_b) {
            (Some(node_a), Some(node_b)) => (self.separation)(node_a, node_b),
            _ => 1e0,
        }
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.walkers[v].children.first().copied().or(self.walkers[v].thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.walkers[v].children.last().copied().or(self.walkers[v].thread)
    }

    fn next_ancestor(&self, vim: usize, v: usize, default_ancestor: usize) -> usize {
        let candidate = self.walkers[vim].ancestor;
        if self.walkers[candidate].parent == self.walkers[v].parent {
            candidate
        } else {
            default_ancestor
        }
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: TreeFloat) {
        let subtrees = self.walkers[wp].number.saturating_sub(self.walkers[wm].number).max(1);
        let change = shift / subtrees as TreeFloat;
        self.walkers[wp].change -= change;
        self.walkers[wp].shift += shift;
        self.walkers[wm].change += change;
        self.walkers[wp].prelim += shift;
        self.walkers[wp].modifier += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift: TreeFloat = 0e0;
        let mut change: TreeFloat = 0e0;
        for i in (0..self.walkers[v].children.len()).rev() {
            let w = self.walkers[v].children[i];
            self.walkers[w].prelim += shift;
            self.walkers[w].modifier += shift;
            change += self.walkers[w].change;
            shift += self.walkers[w].shift + change;
        }
    }

    fn first_walk(&mut self, v: usize) {
        let Some(parent) = self.walkers[v].parent else {
            return;
        };
        let number = self.walkers[v].number;
        let left_sibling = if number > 0 { Some(self.walkers[parent].children[number - 1]) } else { None };

        let first = self.walkers[v].children.first().copied();
        let last = self.walkers[v].children.last().copied();
        if let (Some(first), Some(last)) = (first, last) {
            self.execute_shifts(v);
            let midpoint = (self.walkers[first].prelim + self.walkers[last].prelim) / 2e0;
            match left_sibling {
                Some(w) => {
                    self.walkers[v].prelim = self.walkers[w].prelim + self.separation(v, w);
                    self.walkers[v].modifier = self.walkers[v].prelim - midpoint;
                }
                None => self.walkers[v].prelim = midpoint,
            }
        } else if let Some(w) = left_sibling {
            self.walkers[v].prelim = self.walkers[w].prelim + self.separation(v, w);
        }

        let default_ancestor = self.walkers[parent]
            .default_ancestor
            .unwrap_or(self.walkers[parent].children[0]);
        let default_ancestor = self.apportion(v, left_sibling, default_ancestor);
        self.walkers[parent].default_ancestor = Some(default_ancestor);
    }

    fn apportion(&mut self, v: usize, left_sibling: Option<usize>, mut default_ancestor: usize) -> usize {
        let (Some(w), Some(parent)) = (left_sibling, self.walkers[v].parent) else {
            return default_ancestor;
        };

        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = self.walkers[parent].children[0];
        let mut sip = self.walkers[vip].modifier;
        let mut sop = self.walkers[vop].modifier;
        let mut sim = self.walkers[vim].modifier;
        let mut som = self.walkers[vom].modifier;

        let (next_vim, next_vip) = loop {
            let (Some(next_vim), Some(next_vip)) = (self.next_right(vim), self.next_left(vip)) else {
                break (self.next_right(vim), self.next_left(vip));
            };
            vim = next_vim;
            vip = next_vip;
            let (Some(next_vom), Some(next_vop)) = (self.next_left(vom), self.next_right(vop)) else {
                break (None, None);
            };
            vom = next_vom;
            vop = next_vop;
            self.walkers[vop].ancestor = v;

            let shift = self.walkers[vim].prelim + sim - self.walkers[vip].prelim - sip
                + self.separation(vim, vip);
            if shift > 0e0 {
                let ancestor = self.next_ancestor(vim, v, default_ancestor);
                self.move_subtree(ancestor, v, shift);
                sip += shift;
                sop += shift;
            }

            sim += self.walkers[vim].modifier;
            sip += self.walkers[vip].modifier;
            som += self.walkers[vom].modifier;
            sop += self.walkers[vop].modifier;
        };

        if let Some(next_vim) = next_vim
            && self.next_right(vop).is_none()
        {
            self.walkers[vop].thread = Some(next_vim);
            self.walkers[vop].modifier += sim - sop;
        }

        if let Some(next_vip) = next_vip
            && self.next_left(vom).is_none()
        {
            self.walkers[vom].thread = Some(next_vip);
            self.walkers[vom].modifier += sip - som;
            default_ancestor = v;
        }

        default_ancestor
    }

    fn second_walk(&mut self, v: usize) {
        let Some(parent) = self.walkers[v].parent else {
            return;
        };
        let parent_modifier = self.walkers[parent].modifier;
        self.walkers[v].x = self.walkers[v].prelim + parent_modifier;
        self.walkers[v].modifier += parent_modifier;
    }
}

/// Reingold-Tilford style layout honoring a separation function.
#[derive(Debug, Default, Clone, Copy)]
pub struct TidyTreeLayout;

impl TidyTreeLayout {
    pub fn new() -> Self {
        Self
    }

    fn build_walkers(tree: &Tree) -> Vec<Walker> {
        let mut walkers: Vec<Walker> = vec![Walker::new(0, None, None, 0, 0)];
        let Some(first_node_id) = tree.first_node_id() else {
            return walkers;
        };

        let mut stack: Vec<(NodeId, usize, usize, usize)> = vec![(first_node_id, 0, 0, 0)];
        while let Some((node_id, parent, number, depth)) = stack.pop() {
            let index = walkers.len();
            walkers.push(Walker::new(index, Some(node_id), Some(parent), number, depth));
            walkers[parent].children.push(index);
            for (child_number, &child_id) in tree.child_ids(&node_id).iter().enumerate().rev() {
                stack.push((child_id, index, child_number, depth + 1));
            }
        }
        walkers
    }
}

/// Walker indices with children before parents; the synthetic parent is
/// left out.
fn postorder(walkers: &[Walker]) -> Vec<usize> {
    let mut result = Vec::with_capacity(walkers.len());
    let mut stack: Vec<(usize, bool)> = walkers[0].children.iter().map(|&v| (v, false)).collect();
    while let Some((v, expanded)) = stack.pop() {
        if expanded {
            result.push(v);
        } else {
            stack.push((v, true));
            for &child in walkers[v].children.iter().rev() {
                stack.push((child, false));
            }
        }
    }
    result
}

impl LayoutEngine for TidyTreeLayout {
    fn layout(
        &self,
        tree: &Tree,
        size: (TreeFloat, TreeFloat),
        separation: &Separation<'_>,
    ) -> SecondaryMap<NodeId, BasePoint> {
        let mut points: SecondaryMap<NodeId, BasePoint> = SecondaryMap::new();
        let mut walk = Walk { tree, separation, walkers: Self::build_walkers(tree) };
        if walk.walkers.len() < 2 {
            return points;
        }

        let order = postorder(&walk.walkers);
        for &v in &order {
            walk.first_walk(v);
        }

        walk.walkers[0].modifier = -walk.walkers[1].prelim;
        for &v in order.iter().rev() {
            walk.second_walk(v);
        }

        // Walkers are stored in pre-order; ties go to the earlier node.
        let (mut left, mut right, mut bottom) = (1, 1, 1);
        for v in 1..walk.walkers.len() {
            let walker = &walk.walkers[v];
            if walker.x < walk.walkers[left].x {
                left = v;
            }
            if walker.x > walk.walkers[right].x {
                right = v;
            }
            if walker.depth > walk.walkers[bottom].depth {
                bottom = v;
            }
        }

        let (dx, dy) = size;
        let s = if left == right { 1e0 } else { walk.separation(left, right) / 2e0 };
        let tx = s - walk.walkers[left].x;
        let kx = dx / (walk.walkers[right].x + s + tx);
        let ky = dy / walk.walkers[bottom].depth.max(1) as TreeFloat;

        for walker in &walk.walkers[1..] {
            if let Some(node_id) = walker.node_id {
                let _ = points.insert(
                    node_id,
                    BasePoint { breadth: (walker.x + tx) * kx, depth: walker.depth as TreeFloat * ky },
                );
            }
        }

        debug!(nodes = points.len(), max_depth = walk.walkers[bottom].depth, "tidy layout");
        points
    }
}
