//! Closed-form spring physics for interrupt-safe layout animation.
//!
//! Each animated scalar (an x position, a width, one coordinate of a corner) is an independent
//! under-damped oscillator relaxing toward a target. When the target changes mid-flight the
//! oscillator is re-solved from its *current* position and velocity, so motion never jumps.
//!
//! This crate holds the math and the state:
//! - [`Spring`]: validated physical constants (`damping`, `mass`, `stiffness`)
//! - [`Oscillator`]: an immutable parameter snapshot with position/velocity sampling
//! - [`AxisState`]: the per-axis record that retargets only when the target really changes
//! - [`SharedLayout`]: a scoped registry letting two mounts share one animation identity
//!
//! It is UI-agnostic. Time is always passed in explicitly as milliseconds. For the element
//! contract, measurement strategies and frame scheduling, see the `coiled-adapter` crate.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod axis;
mod key;
mod oscillator;
mod registry;
mod spring;
mod types;

#[cfg(test)]
mod tests;

pub use axis::AxisState;
pub use key::LayoutKey;
pub use oscillator::Oscillator;
pub use registry::{LayoutId, SharedLayout};
pub use spring::{Spring, SpringConfig, SpringError};
pub use types::{Affine, Point, Rect};
