use coiled::{AxisState, LayoutId, LayoutKey, SharedLayout, Spring, SpringConfig, SpringError};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::{AnimateError, Animated, BoxedAnimator, Element, Phase};

new_key_type! {
    /// Identifies a mounted element within a [`Scheduler`].
    pub struct MountKey;
    /// Identifies a shared-layout scope within a [`Scheduler`].
    pub struct ScopeKey;
}

/// The registration of one mounted element.
///
/// Not `Clone`: [`Scheduler::unmount`] consumes it, so an element is released exactly once and
/// never ticked afterwards.
#[must_use = "the element stays scheduled until this is passed to `Scheduler::unmount`"]
#[derive(Debug, PartialEq, Eq)]
pub struct Mount {
    key: MountKey,
}

impl Mount {
    pub fn key(&self) -> MountKey {
        self.key
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("unknown layout scope")]
    UnknownScope,
    #[error("the root layout scope cannot be removed")]
    RootScope,
    #[error("layout scope still has {mounts} mounted element(s)")]
    ScopeInUse { mounts: usize },
}

/// Returned by [`Scheduler::commit`] when at least one element failed to measure.
///
/// Every other element of the commit was still measured and retargeted.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("{failed} element(s) failed to measure, first: {first}")]
pub struct CommitError<E> {
    /// The first element that failed.
    pub key: MountKey,
    pub first: AnimateError<E>,
    pub failed: usize,
}

struct Slot<E: Element, K> {
    scope: ScopeKey,
    animated: Animated<E, K>,
}

/// Drives every mounted element from the host's commit and frame callbacks.
///
/// The host calls:
/// - [`Scheduler::commit`] after layout-affecting changes are committed (measurement phase)
/// - [`Scheduler::tick`] on each display frame while [`Scheduler::needs_frame`] is true (write
///   phase)
///
/// `commit` never writes presentation and `tick` never measures, so all reads of one commit
/// complete before any write.
///
/// Shared-layout scopes are owned here: there is always a root scope, and additional scopes can
/// be created and removed along with the UI subtree they belong to.
pub struct Scheduler<E: Element, K = u64> {
    spring: Spring,
    scopes: SlotMap<ScopeKey, SharedLayout<K>>,
    root: ScopeKey,
    mounted: SlotMap<MountKey, Slot<E, K>>,
}

impl<E: Element, K: LayoutKey> Scheduler<E, K> {
    pub fn new(spring: Spring) -> Self {
        let mut scopes = SlotMap::with_key();
        let root = scopes.insert(SharedLayout::new());
        Self {
            spring,
            scopes,
            root,
            mounted: SlotMap::with_key(),
        }
    }

    /// Validates `config` and builds a scheduler around it.
    pub fn with_config(config: SpringConfig) -> Result<Self, SpringError> {
        Ok(Self::new(Spring::new(config)?))
    }

    pub fn spring(&self) -> &Spring {
        &self.spring
    }

    pub fn root_scope(&self) -> ScopeKey {
        self.root
    }

    /// Opens a new shared-layout scope (one per list, page, ...).
    pub fn create_scope(&mut self) -> ScopeKey {
        self.scopes.insert(SharedLayout::new())
    }

    /// Drops a scope and every entry in it. Its elements must be unmounted first.
    pub fn remove_scope(&mut self, scope: ScopeKey) -> Result<(), SchedulerError> {
        if scope == self.root {
            return Err(SchedulerError::RootScope);
        }
        if !self.scopes.contains_key(scope) {
            return Err(SchedulerError::UnknownScope);
        }
        let mounts = self.mounted.values().filter(|s| s.scope == scope).count();
        if mounts > 0 {
            return Err(SchedulerError::ScopeInUse { mounts });
        }
        self.scopes.remove(scope);
        Ok(())
    }

    pub fn scope(&self, scope: ScopeKey) -> Option<&SharedLayout<K>> {
        self.scopes.get(scope)
    }

    /// Evicts shared entries that no mounted element references, in every scope.
    pub fn prune(&mut self) -> usize {
        self.scopes.values_mut().map(SharedLayout::prune).sum()
    }

    /// Mounts `element` in the root scope.
    ///
    /// With `layout_key`, the element shares its springs with every other mount of that key in
    /// the scope; without one it gets a private identity.
    pub fn mount(
        &mut self,
        element: E,
        animators: Vec<BoxedAnimator<E>>,
        layout_key: Option<K>,
    ) -> Mount {
        self.insert(self.root, element, animators, layout_key)
    }

    /// Mounts `element` in `scope`.
    pub fn mount_in(
        &mut self,
        scope: ScopeKey,
        element: E,
        animators: Vec<BoxedAnimator<E>>,
        layout_key: Option<K>,
    ) -> Result<Mount, SchedulerError> {
        if !self.scopes.contains_key(scope) {
            return Err(SchedulerError::UnknownScope);
        }
        Ok(self.insert(scope, element, animators, layout_key))
    }

    fn insert(
        &mut self,
        scope: ScopeKey,
        element: E,
        animators: Vec<BoxedAnimator<E>>,
        layout_key: Option<K>,
    ) -> Mount {
        let layout = &mut self.scopes[scope];
        let id = match layout_key {
            Some(key) => LayoutId::Shared(key),
            None => layout.private_id(),
        };
        let animated = Animated::new(element, animators, id, layout);
        let key = self.mounted.insert(Slot { scope, animated });
        adebug!(?key, mounted = self.mounted.len(), "Scheduler::mount");
        Mount { key }
    }

    /// Releases a mount and hands its element back.
    ///
    /// Returns `None` if the mount is not registered with this scheduler.
    pub fn unmount(&mut self, mount: Mount) -> Option<E> {
        let slot = self.mounted.remove(mount.key)?;
        adebug!(key = ?mount.key, mounted = self.mounted.len(), "Scheduler::unmount");
        // Scopes with mounted elements cannot be removed.
        let layout = &mut self.scopes[slot.scope];
        Some(slot.animated.unmount(layout))
    }

    /// Measurement phase: re-measures every mounted element and retargets changed axes.
    ///
    /// Returns how many elements had at least one axis retargeted. A failing element keeps its
    /// previous axes; the others are still processed and the first failure is reported.
    pub fn commit(&mut self, now_ms: f64) -> Result<usize, CommitError<E::Error>> {
        let mut retargeted = 0usize;
        let mut failure: Option<CommitError<E::Error>> = None;

        for (key, slot) in self.mounted.iter_mut() {
            let Some(layout) = self.scopes.get_mut(slot.scope) else {
                continue;
            };
            match slot.animated.retarget(layout, &self.spring, now_ms) {
                Ok(true) => retargeted += 1,
                Ok(false) => {}
                Err(err) => {
                    awarn!(?key, "Scheduler::commit: measurement failed");
                    match &mut failure {
                        Some(f) => f.failed += 1,
                        None => {
                            failure = Some(CommitError {
                                key,
                                first: err,
                                failed: 1,
                            })
                        }
                    }
                }
            }
        }

        atrace!(now_ms, retargeted, "Scheduler::commit");
        match failure {
            Some(err) => Err(err),
            None => Ok(retargeted),
        }
    }

    /// Write phase: samples every measured element and writes its frame.
    ///
    /// Returns whether another frame is needed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let mut moving = false;
        for slot in self.mounted.values_mut() {
            let Some(layout) = self.scopes.get(slot.scope) else {
                continue;
            };
            moving |= slot.animated.apply(layout, &self.spring, now_ms);
        }
        moving
    }

    /// Whether any element has a pending retarget or motion in flight.
    pub fn needs_frame(&self) -> bool {
        self.mounted
            .values()
            .any(|s| matches!(s.animated.phase(), Phase::Retargeting | Phase::Settling))
    }

    /// Lifecycle phase of a mount; [`Phase::Unmounted`] once it has been released.
    pub fn phase(&self, key: MountKey) -> Phase {
        self.mounted
            .get(key)
            .map_or(Phase::Unmounted, |s| s.animated.phase())
    }

    pub fn element(&self, key: MountKey) -> Option<&E> {
        self.mounted.get(key).map(|s| s.animated.element())
    }

    pub fn element_mut(&mut self, key: MountKey) -> Option<&mut E> {
        self.mounted.get_mut(key).map(|s| s.animated.element_mut())
    }

    /// Current axes of a mount, in animator declaration order.
    pub fn axes(&self, key: MountKey) -> Option<&[AxisState]> {
        let slot = self.mounted.get(key)?;
        let axes = self.scopes.get(slot.scope)?.axes(slot.animated.id())?;
        axes.get(..slot.animated.axis_count())
    }

    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }
}

impl<E: Element, K> core::fmt::Debug for Scheduler<E, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scheduler")
            .field("spring", &self.spring)
            .field("scopes", &self.scopes.len())
            .field("mounted", &self.mounted.len())
            .finish_non_exhaustive()
    }
}
