//! Arena-backed node hierarchy
//!
//! Every node of a graph lives in one [`NodeTree`], a `slotmap` keyed by a
//! generational id. A slot stores the node, a non-owning parent key and the
//! ordered child keys; the tree keeps both directions in sync so that
//! `parent(c) == Some(p)` exactly when `c` is in `children(p)`.
//!
//! Stale ids are detected rather than dangling: every lookup on a despawned
//! node simply misses.

use std::fmt::Debug;
use std::ops::Mul;

use slotmap::{Key, SlotMap};

use crate::error::{SceneError, SceneResult};

slotmap::new_key_type! {
    /// Handle to a node in a 3D graph
    pub struct Node3Id;

    /// Handle to a node in a 2D graph
    pub struct Node2Id;
}

/// Spatial node that can take part in a world-transform pass
pub trait SceneNode {
    /// Matrix type composing local into world space
    type Matrix: Copy + Mul<Output = Self::Matrix>;

    /// Recompose the local matrix from position/rotation/scale when the node
    /// opts into automatic updates
    fn refresh_local_matrix(&mut self);

    /// Current local matrix
    fn local_matrix(&self) -> Self::Matrix;

    /// Last computed world matrix
    fn world_matrix(&self) -> Self::Matrix;

    /// Store a freshly computed world matrix
    fn set_world_matrix(&mut self, world: Self::Matrix);

    /// Whether the node and its subtree are drawn
    fn is_visible(&self) -> bool;
}

#[derive(Debug, Clone)]
struct Slot<K, N> {
    node: N,
    parent: Option<K>,
    children: Vec<K>,
}

/// Owning arena of nodes linked into a forest
#[derive(Debug, Clone)]
pub struct NodeTree<K: Key, N> {
    slots: SlotMap<K, Slot<K, N>>,
}

impl<K: Key + Debug, N> Default for NodeTree<K, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key + Debug, N> NodeTree<K, N> {
    /// Create an empty tree
    pub fn new() -> Self {
        Self { slots: SlotMap::with_key() }
    }

    /// Insert a detached node
    pub fn insert(&mut self, node: N) -> K {
        let id = self.slots.insert(Slot {
            node,
            parent: None,
            children: Vec::new(),
        });
        log::trace!("Inserted node {:?}", id);
        id
    }

    /// Whether `id` refers to a live node
    #[inline]
    pub fn contains(&self, id: K) -> bool {
        self.slots.contains_key(id)
    }

    /// Borrow a node
    #[inline]
    pub fn get(&self, id: K) -> Option<&N> {
        self.slots.get(id).map(|slot| &slot.node)
    }

    /// Mutably borrow a node
    #[inline]
    pub fn get_mut(&mut self, id: K) -> Option<&mut N> {
        self.slots.get_mut(id).map(|slot| &mut slot.node)
    }

    /// Number of live nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the tree holds no nodes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate over every live node in arena order
    pub fn iter(&self) -> impl Iterator<Item = (K, &N)> {
        self.slots.iter().map(|(id, slot)| (id, &slot.node))
    }

    /// Parent of `id`, if attached
    #[inline]
    pub fn parent(&self, id: K) -> Option<K> {
        self.slots.get(id).and_then(|slot| slot.parent)
    }

    /// Ordered children of `id`; empty for unknown ids
    #[inline]
    pub fn children(&self, id: K) -> &[K] {
        self.slots.get(id).map_or(&[][..], |slot| slot.children.as_slice())
    }

    /// Strict ancestors of `id`, nearest first
    pub fn ancestors(&self, id: K) -> impl Iterator<Item = K> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Strict descendants of `id` in preorder
    pub fn descendants(&self, id: K) -> Vec<K> {
        let mut out = Vec::new();
        let mut stack: Vec<K> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Topmost ancestor of `id` (itself when detached)
    pub fn root_of(&self, id: K) -> Option<K> {
        if !self.contains(id) {
            return None;
        }
        Some(self.ancestors(id).last().unwrap_or(id))
    }

    /// Whether `ancestor` lies strictly above `id`
    pub fn is_ancestor(&self, ancestor: K, id: K) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Attach `child` as the last child of `parent`
    ///
    /// A child that already has a parent is detached from it first.
    /// Attaching a node below itself is rejected.
    pub fn add_child(&mut self, parent: K, child: K) -> SceneResult<()> {
        for id in [parent, child] {
            if !self.contains(id) {
                return Err(SceneError::NodeNotFound(format!("{:?}", id)));
            }
        }
        if parent == child {
            return Err(SceneError::SelfParenting(format!("{:?}", child)));
        }
        if self.is_ancestor(child, parent) {
            return Err(SceneError::CycleDetected {
                parent: format!("{:?}", parent),
                child: format!("{:?}", child),
            });
        }

        // Re-adding to the same parent moves the child to the end
        if let Some(old_parent) = self.parent(child) {
            if old_parent != parent {
                log::debug!("Re-parenting {:?} from {:?} to {:?}", child, old_parent, parent);
            }
            self.unlink(old_parent, child);
        }

        if let Some(slot) = self.slots.get_mut(parent) {
            slot.children.push(child);
        }
        if let Some(slot) = self.slots.get_mut(child) {
            slot.parent = Some(parent);
        }
        Ok(())
    }

    /// Detach `child` from `parent`
    ///
    /// Returns the child, or `None` (leaving everything untouched) when it is
    /// not a direct child of `parent`.
    pub fn remove_child(&mut self, parent: K, child: K) -> Option<K> {
        if self.parent(child) != Some(parent) {
            return None;
        }
        self.unlink(parent, child);
        Some(child)
    }

    /// Detach `id` from its parent; `false` when it has none
    pub fn remove(&mut self, id: K) -> bool {
        match self.parent(id) {
            Some(parent) => self.remove_child(parent, id).is_some(),
            None => false,
        }
    }

    /// Detach `id` and destroy it with its whole subtree
    ///
    /// Returns the removed node itself.
    pub fn despawn(&mut self, id: K) -> Option<N> {
        if !self.contains(id) {
            return None;
        }
        self.remove(id);

        for descendant in self.descendants(id) {
            self.slots.remove(descendant);
        }
        let removed = self.slots.remove(id).map(|slot| slot.node);
        log::debug!("Despawned subtree at {:?}", id);
        removed
    }

    fn unlink(&mut self, parent: K, child: K) {
        if let Some(slot) = self.slots.get_mut(parent) {
            slot.children.retain(|&c| c != child);
        }
        if let Some(slot) = self.slots.get_mut(child) {
            slot.parent = None;
        }
    }
}

impl<K: Key + Debug, N: SceneNode> NodeTree<K, N> {
    /// World-transform pass over the subtree rooted at `id`
    ///
    /// Assumes the parent's world matrix (if any) is current. Children are
    /// visited in sequence order, parents always before their children.
    pub fn compute_world_transform(&mut self, id: K) {
        let parent_world = self
            .parent(id)
            .and_then(|p| self.get(p))
            .map(SceneNode::world_matrix);

        let mut stack: Vec<(K, Option<N::Matrix>)> = vec![(id, parent_world)];
        while let Some((current, parent_world)) = stack.pop() {
            let Some(slot) = self.slots.get_mut(current) else {
                log::warn!("Skipping stale node {:?} in world pass", current);
                continue;
            };

            slot.node.refresh_local_matrix();
            let local = slot.node.local_matrix();
            let world = match parent_world {
                Some(parent) => parent * local,
                None => local,
            };
            slot.node.set_world_matrix(world);

            for &child in slot.children.iter().rev() {
                stack.push((child, Some(world)));
            }
        }
    }

    /// Refresh the world matrix of `id` alone, climbing through its
    /// ancestors from the root down; descendants are left stale
    pub fn update_world_matrix(&mut self, id: K) {
        if !self.contains(id) {
            return;
        }
        let mut chain: Vec<K> = self.ancestors(id).collect();
        chain.reverse();
        chain.push(id);

        let mut parent_world: Option<N::Matrix> = None;
        for node_id in chain {
            if let Some(node) = self.get_mut(node_id) {
                node.refresh_local_matrix();
                let local = node.local_matrix();
                let world = match parent_world {
                    Some(parent) => parent * local,
                    None => local,
                };
                node.set_world_matrix(world);
                parent_world = Some(world);
            }
        }
    }

    /// Preorder walk from `id` that skips the subtree of every invisible node
    pub fn visit_visible(&self, id: K, mut visit: impl FnMut(K, &N)) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(slot) = self.slots.get(current) else {
                continue;
            };
            if !slot.node.is_visible() {
                continue;
            }
            visit(current, &slot.node);
            stack.extend(slot.children.iter().rev().copied());
        }
    }
}
