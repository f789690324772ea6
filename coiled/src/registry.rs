use std::collections::HashMap;

use crate::{AxisState, LayoutKey};

/// Identity of an animated subject inside a [`SharedLayout`] scope.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LayoutId<K> {
    /// A caller-supplied key. Every mount presenting the same key continues the same springs.
    Shared(K),
    /// A per-instance identity handed out by [`SharedLayout::private_id`]. Never collides.
    Private(u64),
}

#[derive(Clone, Debug)]
struct Entry {
    axes: Vec<AxisState>,
    mounts: usize,
}

/// A scoped registry of axis states keyed by layout identity.
///
/// A scope is an ordinary value: create one per logical grouping (a list, a page) and drop it
/// with that grouping. There is no process-wide default scope.
///
/// Entries track how many live mounts reference them. Private entries are removed as soon as
/// their single mount is released; shared entries survive a release so a remount under the same
/// key picks up the motion in flight, and are reclaimed by [`SharedLayout::prune`].
#[derive(Clone, Debug)]
pub struct SharedLayout<K> {
    entries: HashMap<LayoutId<K>, Entry>,
    next_private: u64,
}

impl<K: LayoutKey> Default for SharedLayout<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: LayoutKey> SharedLayout<K> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            next_private: 0,
        }
    }

    /// Allocates an identity that no other mount can share.
    pub fn private_id(&mut self) -> LayoutId<K> {
        let id = self.next_private;
        self.next_private = self.next_private.wrapping_add(1);
        LayoutId::Private(id)
    }

    /// Records a live mount of `id`.
    pub fn acquire(&mut self, id: &LayoutId<K>) {
        let entry = self.entries.entry(id.clone()).or_insert_with(|| Entry {
            axes: Vec::new(),
            mounts: 0,
        });
        entry.mounts = entry.mounts.saturating_add(1);
    }

    /// Releases a mount of `id`. Private identities are dropped immediately.
    pub fn release(&mut self, id: &LayoutId<K>) {
        let Some(entry) = self.entries.get_mut(id) else {
            return;
        };
        entry.mounts = entry.mounts.saturating_sub(1);
        if entry.mounts == 0 && matches!(id, LayoutId::Private(_)) {
            self.entries.remove(id);
        }
    }

    /// Returns the axes for `id`, creating (or growing) them to at least `axis_count`.
    ///
    /// Repeated lookups of the same identity return the same storage.
    pub fn get(
        &mut self,
        id: &LayoutId<K>,
        axis_count: usize,
        mut init: impl FnMut() -> AxisState,
    ) -> &mut Vec<AxisState> {
        let entry = self.entries.entry(id.clone()).or_insert_with(|| Entry {
            axes: Vec::with_capacity(axis_count),
            mounts: 0,
        });
        while entry.axes.len() < axis_count {
            entry.axes.push(init());
        }
        &mut entry.axes
    }

    /// Read-only view of the axes stored for `id`, if any.
    pub fn axes(&self, id: &LayoutId<K>) -> Option<&[AxisState]> {
        self.entries.get(id).map(|e| e.axes.as_slice())
    }

    /// Mutable view of the axes stored for `id`, if any. Never creates an entry.
    pub fn axes_mut(&mut self, id: &LayoutId<K>) -> Option<&mut [AxisState]> {
        self.entries.get_mut(id).map(|e| e.axes.as_mut_slice())
    }

    pub fn contains(&self, id: &LayoutId<K>) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of live mounts referencing `id`.
    pub fn mounts(&self, id: &LayoutId<K>) -> usize {
        self.entries.get(id).map_or(0, |e| e.mounts)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evicts every entry no live mount references. Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.mounts > 0);
        let removed = before - self.entries.len();
        if removed > 0 {
            cdebug!(removed, remaining = self.entries.len(), "SharedLayout::prune");
        }
        removed
    }
}
