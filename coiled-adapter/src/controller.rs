use core::ops::Range;

use coiled::{AxisState, LayoutId, LayoutKey, SharedLayout, Spring};

use crate::{AnimateError, Animator, Element, Frame};

/// A boxed measurement strategy for elements of type `E`.
pub type BoxedAnimator<E> = Box<dyn Animator<E>>;

/// Where an animated element is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Mounted, never measured.
    Idle,
    /// A commit changed at least one target; the change has not been presented yet.
    Retargeting,
    /// At least one axis is still moving.
    Settling,
    /// Every animator reports done; no frames are written.
    Settled,
    /// Released. Terminal.
    Unmounted,
}

/// Binds measurement strategies to one mounted element.
///
/// The axes themselves live in a [`SharedLayout`] scope under this element's [`LayoutId`], so an
/// element mounted with a shared key continues the motion of an earlier mount with that key.
/// Each animator owns a contiguous slice of the element's axes, in declaration order.
pub struct Animated<E: Element, K> {
    element: E,
    id: LayoutId<K>,
    animators: Vec<BoxedAnimator<E>>,
    ranges: Vec<Range<usize>>,
    axis_count: usize,
    finished: Vec<bool>,
    phase: Phase,
    scratch: Vec<AxisState>,
}

impl<E: Element, K: LayoutKey> Animated<E, K> {
    /// Creates the instance and records a live mount of `id` in `scope`.
    pub fn new(
        element: E,
        animators: Vec<BoxedAnimator<E>>,
        id: LayoutId<K>,
        scope: &mut SharedLayout<K>,
    ) -> Self {
        let mut ranges = Vec::with_capacity(animators.len());
        let mut axis_count = 0usize;
        for animator in &animators {
            let n = animator.axis_count();
            ranges.push(axis_count..axis_count + n);
            axis_count += n;
        }
        scope.acquire(&id);
        let finished = vec![false; animators.len()];
        Self {
            element,
            id,
            animators,
            ranges,
            axis_count,
            finished,
            phase: Phase::Idle,
            scratch: Vec::with_capacity(axis_count),
        }
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut E {
        &mut self.element
    }

    pub fn id(&self) -> &LayoutId<K> {
        &self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn axis_count(&self) -> usize {
        self.axis_count
    }

    /// Measures every animator and retargets the axes whose target changed.
    ///
    /// Axes are retargeted on a scratch copy and written back only when every animator
    /// succeeded, so a failed measurement leaves the stored axes untouched.
    pub fn retarget(
        &mut self,
        scope: &mut SharedLayout<K>,
        spring: &Spring,
        now_ms: f64,
    ) -> Result<bool, AnimateError<E::Error>> {
        let axes = scope.get(&self.id, self.axis_count, || AxisState::new(spring, now_ms));
        self.scratch.clear();
        self.scratch.extend_from_slice(&axes[..self.axis_count]);

        let mut changed = false;
        for (animator, range) in self.animators.iter_mut().zip(&self.ranges) {
            let slice = &mut self.scratch[range.clone()];
            changed |= animator.retarget(&mut self.element, slice, spring, now_ms)?;
        }

        if let Some(axes) = scope.axes_mut(&self.id) {
            axes[..self.axis_count].copy_from_slice(&self.scratch);
        }

        if changed {
            self.finished.fill(false);
            self.set_phase(Phase::Retargeting);
        } else if self.phase == Phase::Idle {
            self.set_phase(Phase::Settling);
        }
        Ok(changed)
    }

    /// Samples every animator at `now_ms` and writes the frames.
    ///
    /// An animator that just finished gets one last frame at rest; after that it is skipped
    /// until its axes move again. Returns whether any animator is still moving.
    pub fn apply(&mut self, scope: &SharedLayout<K>, spring: &Spring, now_ms: f64) -> bool {
        if matches!(self.phase, Phase::Idle | Phase::Unmounted) {
            return false;
        }
        let Some(axes) = scope.axes(&self.id) else {
            return false;
        };

        let mut moving = false;
        for ((animator, range), finished) in self
            .animators
            .iter_mut()
            .zip(&self.ranges)
            .zip(self.finished.iter_mut())
        {
            let axes = &axes[range.clone()];
            if animator.is_done(now_ms, axes) {
                if !*finished {
                    animator.apply_frame(&mut self.element, &Frame::at_rest(now_ms, axes));
                    *finished = true;
                }
            } else {
                *finished = false;
                let frame = Frame::new(now_ms, axes, spring.snap_threshold());
                animator.apply_frame(&mut self.element, &frame);
                moving = true;
            }
        }

        self.set_phase(if moving {
            Phase::Settling
        } else {
            Phase::Settled
        });
        moving
    }

    /// Releases this mount from `scope` and hands the element back.
    pub fn unmount(mut self, scope: &mut SharedLayout<K>) -> E {
        scope.release(&self.id);
        self.set_phase(Phase::Unmounted);
        self.element
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            atrace!(from = ?self.phase, to = ?phase, "Animated::phase");
            self.phase = phase;
        }
    }
}

impl<E: Element, K: core::fmt::Debug> core::fmt::Debug for Animated<E, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Animated")
            .field("id", &self.id)
            .field("animators", &self.animators.len())
            .field("axis_count", &self.axis_count)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}
