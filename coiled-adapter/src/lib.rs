//! Adapter layer for the `coiled` crate.
//!
//! The `coiled` crate is UI-agnostic and holds the spring math and per-axis state. This crate
//! connects it to rendered elements:
//!
//! - [`Element`]: the handle a UI layer provides (geometry reads, presentation writes)
//! - [`Animator`]: measurement strategies, plus the built-in [`Translate`], [`Position`],
//!   [`Size`] and [`Corners`]
//! - [`Animated`]: one element bound to its animators, with its lifecycle [`Phase`]
//! - [`Scheduler`]: the commit/frame loop over every mounted element, owning the shared-layout
//!   scopes
//!
//! No UI framework bindings live here. Adapters drive the scheduler by calling `commit(now_ms)`
//! after layout changes and `tick(now_ms)` on each display frame.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod animator;
mod controller;
mod corners;
mod element;
mod position;
mod scheduler;
mod size;
mod translate;


pub use animator::{AnimateError, Animator, Frame, retarget_axes};
pub use controller::{Animated, BoxedAnimator, Phase};
pub use corners::Corners;
pub use element::{DeclaredTransform, Element, MeasureGuard, Property};
pub use position::Position;
pub use scheduler::{CommitError, Mount, MountKey, Scheduler, SchedulerError, ScopeKey};
pub use size::Size;
pub use translate::Translate;

pub(crate) use element::PRESENTATION;
