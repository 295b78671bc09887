//! Stride Sandbox
//!
//! A headless host for the locomotion controller:
//!
//! - Key-state input and jump edge detection
//! - Avatars with observer lists for movement transitions
//! - A test level with grippy and icy floors, a steep wedge and a platform
//! - RON tuning profiles
//! - A fixed-step, multi-avatar simulation with checkpoints
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Simulation                            │
//! │  ┌────────────┐    ┌──────────────────┐    ┌──────────────┐  │
//! │  │ PlayerInput│───►│ Locomotion       │───►│ AvatarEvents │  │
//! │  │ → samples  │    │ (controller +    │    │ → observers  │  │
//! │  └────────────┘    │  CharacterMover) │    └──────────────┘  │
//! │                    └──────────────────┘                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod avatar;
pub mod input;
pub mod level;
pub mod profile;
pub mod simulation;

// Re-export main types
pub use avatar::{Avatar, AvatarEvent, AvatarId, AvatarObserver, EventLog, LogObserver};
pub use input::{InputSampler, PlayerInput};
pub use level::{Level, SpawnPoint};
pub use profile::{load_profile, parse_profile, ProfileError, TuningProfile};
pub use simulation::{Checkpoint, Simulation, SimulationConfig, SimulationError};

// Re-export locomotion types for convenience
pub use stride_locomotion::{
    CollisionWorld, InputSample, LocomotionController, MotionState, MovementTuning,
    SurfaceMaterial, TickReport,
};
