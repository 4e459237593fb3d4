//! Report rotation
//!
//! [`RotationState`] holds the pure transitions; [`RotationController`] binds
//! them to a catalog. Neither blocks or owns a timer: the presentation layer
//! schedules the [`Countdown`] returned by
//! [`RotationController::after_render`] and cancels it on manual navigation.

pub mod controller;
pub mod countdown;

pub use controller::{RotationController, RotationState};
pub use countdown::Countdown;
