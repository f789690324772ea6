use crate::Spring;

/// An immutable parameter snapshot of one damped oscillator.
///
/// The oscillator describes the *offset from target* over time:
///
/// `x(t) = e^(alpha·τ) · (c1·cos(beta·τ) + c2·sin(beta·τ))` with `τ = (t − t0) / 1000`,
///
/// so the presented value is `target + x(t)`. Times are milliseconds; the solver works in
/// seconds internally.
///
/// Transitions never edit a snapshot in place: [`Oscillator::retarget`] returns a new one.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Oscillator {
    t0: f64,
    target: Option<f64>,
    alpha: f64,
    beta: f64,
    c1: f64,
    c2: f64,
    end_time: Option<f64>,
}

impl Oscillator {
    /// An oscillator that has never been targeted. It produces no motion.
    pub fn untargeted(spring: &Spring, now_ms: f64) -> Self {
        Self {
            t0: now_ms,
            target: None,
            alpha: spring.alpha(),
            beta: spring.beta(),
            c1: 0.0,
            c2: 0.0,
            end_time: spring.config().track_end_time.then_some(now_ms),
        }
    }

    pub fn t0(&self) -> f64 {
        self.t0
    }

    pub fn target(&self) -> Option<f64> {
        self.target
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn c1(&self) -> f64 {
        self.c1
    }

    pub fn c2(&self) -> f64 {
        self.c2
    }

    pub fn end_time(&self) -> Option<f64> {
        self.end_time
    }

    /// Offset from target at `now_ms`.
    pub fn offset_at(&self, now_ms: f64) -> f64 {
        let t = (now_ms - self.t0) / 1000.0;
        let (sin, cos) = (self.beta * t).sin_cos();
        (self.alpha * t).exp() * (self.c1 * cos + self.c2 * sin)
    }

    /// Velocity at `now_ms`, in value units per second.
    pub fn velocity_at(&self, now_ms: f64) -> f64 {
        let t = (now_ms - self.t0) / 1000.0;
        let (sin, cos) = (self.beta * t).sin_cos();
        let (alpha, beta, c1, c2) = (self.alpha, self.beta, self.c1, self.c2);
        (alpha * t).exp() * (sin * (alpha * c2 - beta * c1) + cos * (alpha * c1 + beta * c2))
    }

    /// Presented value (`target + offset`) at `now_ms`, or `None` if never targeted.
    pub fn value_at(&self, now_ms: f64) -> Option<f64> {
        self.target.map(|target| target + self.offset_at(now_ms))
    }

    /// Whether the displacement is guaranteed to stay under the settle threshold after `now_ms`.
    ///
    /// Always false when the oscillator does not track an end time.
    pub fn is_done(&self, now_ms: f64) -> bool {
        self.end_time.is_some_and(|end| now_ms > end)
    }

    /// Solves for a new target, continuing from the current position and velocity.
    ///
    /// - Never targeted before: start at rest on `new_target` (`c1 = c2 = 0`).
    /// - Otherwise: `x0` is the current computed position measured from `new_target`, `v0` the
    ///   current velocity, `c1 = x0` and `c2 = (v0 − alpha·x0) / beta`. Position and velocity
    ///   are therefore continuous at `now_ms`.
    ///
    /// `settle_threshold` drives the `end_time` estimate; pass `None` to disable it.
    pub fn retarget(&self, new_target: f64, now_ms: f64, settle_threshold: Option<f64>) -> Self {
        let (x0, v0) = match self.target {
            Some(old_target) => (
                old_target + self.offset_at(now_ms) - new_target,
                self.velocity_at(now_ms),
            ),
            None => (0.0, 0.0),
        };
        let c1 = x0;
        let c2 = (v0 - self.alpha * x0) / self.beta;
        let end_time =
            settle_threshold.map(|threshold| settle_time(self.alpha, c1, c2, threshold, now_ms));

        Self {
            t0: now_ms,
            target: Some(new_target),
            alpha: self.alpha,
            beta: self.beta,
            c1,
            c2,
            end_time,
        }
    }
}

/// Time after which the envelope `|c1|·sqrt(1 + (c2/c1)²)·e^(alpha·τ)` stays below `threshold`.
///
/// `sqrt(c1² + c2²)` is the same envelope and stays defined when `c1 == 0`.
fn settle_time(alpha: f64, c1: f64, c2: f64, threshold: f64, now_ms: f64) -> f64 {
    let amplitude = c1.hypot(c2);
    if amplitude == 0.0 || amplitude <= threshold {
        return now_ms;
    }
    now_ms + 1000.0 * (threshold / amplitude).ln() / alpha
}
