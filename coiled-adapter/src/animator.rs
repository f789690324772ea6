use coiled::{AxisState, Spring};
use thiserror::Error;

use crate::Element;

/// Errors raised while retargeting one element.
///
/// The element's axes keep their previous parameters when this is returned.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum AnimateError<E> {
    #[error("measurement failed: {0}")]
    Measure(E),
    #[error("animator declared {expected} axes but measured {actual}")]
    Arity { expected: usize, actual: usize },
}

/// A sampled view of one animator's axes, handed to [`Animator::apply_frame`].
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    now_ms: f64,
    axes: &'a [AxisState],
    snap_threshold: f64,
    at_rest: bool,
}

impl<'a> Frame<'a> {
    pub fn new(now_ms: f64, axes: &'a [AxisState], snap_threshold: f64) -> Self {
        Self {
            now_ms,
            axes,
            snap_threshold,
            at_rest: false,
        }
    }

    /// The last frame written after every axis finished: all offsets read as zero.
    pub fn at_rest(now_ms: f64, axes: &'a [AxisState]) -> Self {
        Self {
            now_ms,
            axes,
            snap_threshold: 0.0,
            at_rest: true,
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn axes(&self) -> &'a [AxisState] {
        self.axes
    }

    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Offset from target for `axis`, snapped to zero under the snap threshold.
    ///
    /// Untargeted axes read as zero.
    pub fn offset(&self, axis: usize) -> f64 {
        let Some(state) = self.axes.get(axis) else {
            return 0.0;
        };
        if self.at_rest || state.target().is_none() {
            return 0.0;
        }
        let x = state.offset_at(self.now_ms);
        if x.abs() < self.snap_threshold { 0.0 } else { x }
    }

    pub fn target(&self, axis: usize) -> Option<f64> {
        self.axes.get(axis).and_then(AxisState::target)
    }

    /// Presented value (`target + offset`) for `axis`.
    pub fn value(&self, axis: usize) -> Option<f64> {
        self.target(axis).map(|t| t + self.offset(axis))
    }
}

/// A measurement strategy: turns an element's layout into target values and writes sampled
/// values back to its presentation layer.
///
/// The required methods make up the positional shape: the driver owns the axes, retargets and
/// samples them, and the animator only measures and presents. Two facets are optional:
///
/// - [`Animator::retarget`] (motion-state ownership): override when the animator must record
///   extra state alongside its targets, or decide itself how targets map onto axes.
/// - [`Animator::is_done`] (completion): override to change when the driver may stop writing
///   frames for this animator.
pub trait Animator<E: Element> {
    /// Number of scalar axes this animator drives. Must never change.
    fn axis_count(&self) -> usize;

    /// Reads the element's layout and returns one target per axis.
    ///
    /// May mutate presentation transiently (see [`crate::MeasureGuard`]) but must leave it as
    /// it found it.
    fn measure(&self, element: &mut E, axes: &[AxisState]) -> Result<Vec<f64>, E::Error>;

    /// Writes the sampled frame to the element.
    fn apply_frame(&mut self, element: &mut E, frame: &Frame<'_>);

    /// Measures and retargets `axes`. Returns whether any axis changed.
    fn retarget(
        &mut self,
        element: &mut E,
        axes: &mut [AxisState],
        spring: &Spring,
        now_ms: f64,
    ) -> Result<bool, AnimateError<E::Error>> {
        let targets = self
            .measure(element, axes)
            .map_err(AnimateError::Measure)?;
        retarget_axes(axes, &targets, spring, now_ms)
    }

    fn is_done(&self, now_ms: f64, axes: &[AxisState]) -> bool {
        axes.iter().all(|a| a.is_done(now_ms))
    }
}

/// Retargets each axis toward the matching target, leaving unchanged axes untouched.
///
/// Fails without touching any axis when the counts differ.
pub fn retarget_axes<E>(
    axes: &mut [AxisState],
    targets: &[f64],
    spring: &Spring,
    now_ms: f64,
) -> Result<bool, AnimateError<E>> {
    if targets.len() != axes.len() {
        return Err(AnimateError::Arity {
            expected: axes.len(),
            actual: targets.len(),
        });
    }
    let mut changed = false;
    for (axis, &target) in axes.iter_mut().zip(targets) {
        changed |= axis.retarget(spring, target, now_ms);
    }
    Ok(changed)
}
