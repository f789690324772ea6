use thiserror::Error;

/// Default damping coefficient.
pub const DEFAULT_DAMPING: f64 = 27.8;
/// Default mass.
pub const DEFAULT_MASS: f64 = 1.0;
/// Default stiffness.
pub const DEFAULT_STIFFNESS: f64 = 200.0;
/// Default displacement below which an oscillation counts as finished (same units as the
/// animated value, usually px).
pub const DEFAULT_SETTLE_THRESHOLD: f64 = 0.4;
/// Default residual offset that adapters snap to exactly zero when presenting.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 0.1;

/// Errors raised while building a [`Spring`].
///
/// These are configuration errors: they are reported once, at setup, and never per frame.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum SpringError {
    #[error(
        "spring is not under-damped (damping² − 4·mass·stiffness = {discriminant}), try increasing stiffness"
    )]
    NotUnderdamped { discriminant: f64 },
    #[error("spring mass must be positive, got {mass}")]
    InvalidMass { mass: f64 },
    #[error("spring constant `{name}` must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("spring constant `{name}` must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("spring constant `{name}` must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },
}

/// Physical constants and thresholds for a logical spring.
///
/// Build one with [`SpringConfig::default`] and the `with_*` methods, then validate it with
/// [`Spring::new`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringConfig {
    pub damping: f64,
    pub mass: f64,
    pub stiffness: f64,
    /// Displacement under which the oscillation is considered finished. Drives `end_time`.
    pub settle_threshold: f64,
    /// Residual offsets under this magnitude are presented as exactly zero.
    pub snap_threshold: f64,
    /// When false, oscillators carry no `end_time` and are never reported as done.
    pub track_end_time: bool,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            mass: DEFAULT_MASS,
            stiffness: DEFAULT_STIFFNESS,
            settle_threshold: DEFAULT_SETTLE_THRESHOLD,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            track_end_time: true,
        }
    }
}

impl SpringConfig {
    pub fn new(damping: f64, mass: f64, stiffness: f64) -> Self {
        Self {
            damping,
            mass,
            stiffness,
            ..Self::default()
        }
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn with_settle_threshold(mut self, settle_threshold: f64) -> Self {
        self.settle_threshold = settle_threshold;
        self
    }

    pub fn with_snap_threshold(mut self, snap_threshold: f64) -> Self {
        self.snap_threshold = snap_threshold;
        self
    }

    pub fn with_track_end_time(mut self, track_end_time: bool) -> Self {
        self.track_end_time = track_end_time;
        self
    }

    /// `damping² − 4·mass·stiffness`. Negative for an under-damped spring.
    pub fn discriminant(&self) -> f64 {
        self.damping * self.damping - 4.0 * self.mass * self.stiffness
    }
}

/// A validated, under-damped spring.
///
/// `alpha` (decay rate) and `beta` (oscillation rate) are derived once here and copied into every
/// [`crate::Oscillator`] built from this spring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    config: SpringConfig,
    alpha: f64,
    beta: f64,
}

impl Spring {
    /// Validates `config` and derives the solver coefficients.
    ///
    /// `alpha = −damping / (2·mass)` and `beta = (damping² − 4·mass·stiffness) / (2·mass)`.
    /// The closed form only covers the oscillatory branch, so `beta` must be negative.
    pub fn new(config: SpringConfig) -> Result<Self, SpringError> {
        for (name, value) in [
            ("damping", config.damping),
            ("mass", config.mass),
            ("stiffness", config.stiffness),
            ("settle_threshold", config.settle_threshold),
            ("snap_threshold", config.snap_threshold),
        ] {
            if !value.is_finite() {
                return Err(SpringError::NonFinite { name, value });
            }
        }
        if config.mass <= 0.0 {
            return Err(SpringError::InvalidMass { mass: config.mass });
        }
        // A non-positive damping never decays; a non-positive threshold is never reached.
        for (name, value) in [
            ("damping", config.damping),
            ("settle_threshold", config.settle_threshold),
        ] {
            if value <= 0.0 {
                return Err(SpringError::NotPositive { name, value });
            }
        }
        if config.snap_threshold < 0.0 {
            return Err(SpringError::Negative {
                name: "snap_threshold",
                value: config.snap_threshold,
            });
        }

        let discriminant = config.discriminant();
        let alpha = -config.damping / (2.0 * config.mass);
        let beta = discriminant / (2.0 * config.mass);
        if beta >= 0.0 {
            return Err(SpringError::NotUnderdamped { discriminant });
        }

        cdebug!(alpha, beta, "Spring::new");
        Ok(Self {
            config,
            alpha,
            beta,
        })
    }

    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn settle_threshold(&self) -> f64 {
        self.config.settle_threshold
    }

    pub fn snap_threshold(&self) -> f64 {
        self.config.snap_threshold
    }
}

impl Default for Spring {
    fn default() -> Self {
        let config = SpringConfig::default();
        let alpha = -config.damping / (2.0 * config.mass);
        let beta = config.discriminant() / (2.0 * config.mass);
        debug_assert!(beta < 0.0, "default spring must be under-damped");
        Self {
            config,
            alpha,
            beta,
        }
    }
}
