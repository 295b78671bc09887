//! Avatar movement system.
//!
//! This module implements third-person platformer locomotion with:
//!
//! - Camera-relative planar movement blended by friction and air control
//! - Smoothed facing that turns toward the input direction
//! - Multi-jump with coyote time, jump buffering and variable jump height
//! - Half-step gravity integration with terminal velocity
//!
//! # Design
//!
//! Movement is driven by the [`LocomotionController`], which takes an
//! [`InputSample`] and advances a [`MotionState`] through a
//! [`KinematicMover`](crate::collision::KinematicMover).
//!
//! All movement is deterministic: the same inputs always produce the same
//! outputs, so a recorded input stream replays exactly.

pub mod config;
mod controller;
mod gravity;
mod jump;
mod planar;
mod state;

pub use config::MovementTuning;
pub use controller::LocomotionController;
pub use gravity::GravityIntegrator;
pub use jump::{JumpArbiter, JumpOutcome};
pub use planar::PlanarMotionBlender;
pub use state::{InputSample, MotionState, TickReport, NEVER};
