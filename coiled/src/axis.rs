use crate::{Oscillator, Spring};

/// The mutable record for one animated scalar.
///
/// Wraps the current [`Oscillator`] snapshot and replaces it only when the target actually
/// changes, so re-measuring an unchanged layout never disturbs motion in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisState {
    params: Oscillator,
}

impl AxisState {
    /// A fresh axis that has never been targeted.
    pub fn new(spring: &Spring, now_ms: f64) -> Self {
        Self {
            params: Oscillator::untargeted(spring, now_ms),
        }
    }

    pub fn params(&self) -> &Oscillator {
        &self.params
    }

    pub fn target(&self) -> Option<f64> {
        self.params.target()
    }

    /// Retargets the axis if `target` differs from its current target.
    ///
    /// Any nonzero delta counts as a change. Returns whether a retarget happened.
    pub fn retarget(&mut self, spring: &Spring, target: f64, now_ms: f64) -> bool {
        if self.params.target() == Some(target) {
            return false;
        }
        let threshold = spring
            .config()
            .track_end_time
            .then(|| spring.settle_threshold());
        let next = self.params.retarget(target, now_ms, threshold);
        ctrace!(
            from = ?self.params.target(),
            to = target,
            c1 = next.c1(),
            c2 = next.c2(),
            end_time = ?next.end_time(),
            "AxisState::retarget"
        );
        self.params = next;
        true
    }

    pub fn offset_at(&self, now_ms: f64) -> f64 {
        self.params.offset_at(now_ms)
    }

    pub fn velocity_at(&self, now_ms: f64) -> f64 {
        self.params.velocity_at(now_ms)
    }

    pub fn value_at(&self, now_ms: f64) -> Option<f64> {
        self.params.value_at(now_ms)
    }

    pub fn is_done(&self, now_ms: f64) -> bool {
        self.params.is_done(now_ms)
    }
}
