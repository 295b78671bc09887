//! Stride Locomotion
//!
//! A deterministic avatar locomotion controller. It turns per-tick input
//! samples (move vector, sprint, jump edge, jump held) and a grounding query
//! into kinematic state: position, facing, planar and gravitational velocity.
//!
//! # Architecture
//!
//! The controller is split into two main systems:
//!
//! - **Movement**: Jump arbitration, gravity integration, planar blending and
//!   the per-tick integrator that composes them
//! - **Collision**: The collaborator contracts the integrator drives (kinematic
//!   mover, surface lookup) plus a parry3d-backed reference world
//!
//! # Tick Order
//!
//! ```text
//! grounding (previous move) ─► JumpArbiter ─► PlanarMotionBlender
//!        ▲                                          │
//!        │                                          ▼
//!  GravityIntegrator ◄── kinematic move ◄── MotionIntegrator
//! ```
//!
//! The order is fixed. Reordering the steps changes how jumps feel.
//!
//! # Design Principles
//!
//! 1. **Determinism**: Same inputs always produce same outputs
//! 2. **No hidden state**: [`MotionState`] is owned by the caller and passed in
//! 3. **Backend agnostic**: Physics only through [`KinematicMover`]
//! 4. **Policy, not errors**: Invalid tuning silently disables features

pub mod collision;
pub mod math;
pub mod movement;
pub mod snapshot;

// Re-export commonly used types
pub use collision::{
    CharacterMover, ColliderId, CollisionWorld, Contact, FrictionCombine, KinematicMover,
    MoveResult, NoSurfaces, SurfaceLookup, SurfaceMaterial, TraceResult, TraceShape,
};
pub use movement::{
    InputSample, LocomotionController, MotionState, MovementTuning, TickReport,
};
pub use snapshot::{decode_state, encode_state, SnapshotError};
