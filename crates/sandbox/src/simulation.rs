//! Fixed-step sandbox simulation.
//!
//! Drives every avatar through the locomotion controller once per tick and
//! collects the resulting transition events. The simulation is deterministic,
//! so a checkpoint restored and fed the same inputs reproduces the same run.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use stride_locomotion::math::wrap_angle;
use stride_locomotion::{
    decode_state, encode_state, CharacterMover, LocomotionController, MovementTuning,
    SnapshotError, TraceShape,
};
use thiserror::Error;

use crate::avatar::{Avatar, AvatarEvent, AvatarId};
use crate::input::{InputSampler, PlayerInput};
use crate::level::Level;

/// Simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Simulation tick rate (ticks per second).
    pub tick_rate: u32,

    /// Movement tuning shared by every avatar.
    pub tuning: MovementTuning,

    /// Avatar collision shape.
    pub shape: TraceShape,

    /// Mouse sensitivity.
    pub mouse_sensitivity: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            tuning: MovementTuning::default(),
            shape: TraceShape::AVATAR,
            mouse_sensitivity: 2.0,
        }
    }
}

impl SimulationConfig {
    /// Get the time step per tick in seconds.
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}

/// Errors from checkpoint handling.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("checkpoint references unknown avatar {0}")]
    UnknownAvatar(AvatarId),
}

/// Saved state of one avatar.
#[derive(Debug, Clone)]
pub struct AvatarCheckpoint {
    pub id: AvatarId,
    pub motion: Vec<u8>,
    pub camera_yaw: f32,
    pub sampler: InputSampler,
    pub respawns: u32,
}

/// Saved simulation state, for rollback.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    pub frame: u64,
    pub avatars: Vec<AvatarCheckpoint>,
}

/// The sandbox simulation.
#[derive(Debug)]
pub struct Simulation {
    /// Current frame/tick number.
    pub frame: u64,

    /// Simulation configuration.
    pub config: SimulationConfig,

    /// Current level.
    pub level: Level,

    /// All avatars in the sandbox.
    pub avatars: Vec<Avatar>,

    controller: LocomotionController,

    next_avatar_id: AvatarId,
}

impl Simulation {
    /// Create a new simulation with the given configuration and level.
    pub fn new(config: SimulationConfig, level: Level) -> Self {
        let controller = LocomotionController::new(config.tuning.clone());

        Self {
            frame: 0,
            config,
            level,
            avatars: Vec::new(),
            controller,
            next_avatar_id: 1,
        }
    }

    /// Create a simulation with default configuration and test arena.
    pub fn test() -> Self {
        Self::new(SimulationConfig::default(), Level::test_arena())
    }

    /// The controller every avatar is ticked with.
    pub fn controller(&self) -> &LocomotionController {
        &self.controller
    }

    /// Add an avatar at the next spawn point.
    ///
    /// Returns the avatar's ID.
    pub fn add_avatar(&mut self, name: &str) -> AvatarId {
        let id = self.next_avatar_id;
        self.next_avatar_id += 1;

        let spawn = self.level.spawn_point(self.avatars.len());
        let position = spawn.map(|s| s.position).unwrap_or(Vec3::ZERO);
        let facing = spawn.map(|s| s.facing).unwrap_or(0.0);

        let mut avatar = Avatar::new(id, name, position, facing);
        self.controller.spawn_at(
            &mut avatar.motion,
            position,
            &self.level.collision,
            self.config.shape,
        );
        avatar.motion.yaw = facing;
        avatar.motion.target_yaw = facing;

        log::debug!("added avatar {id} '{name}' at {:?}", avatar.position());
        self.avatars.push(avatar);
        id
    }

    /// Remove an avatar from the simulation.
    pub fn remove_avatar(&mut self, avatar_id: AvatarId) {
        self.avatars.retain(|a| a.id != avatar_id);
    }

    /// Get an avatar by ID.
    pub fn avatar(&self, avatar_id: AvatarId) -> Option<&Avatar> {
        self.avatars.iter().find(|a| a.id == avatar_id)
    }

    /// Get a mutable reference to an avatar by ID.
    pub fn avatar_mut(&mut self, avatar_id: AvatarId) -> Option<&mut Avatar> {
        self.avatars.iter_mut().find(|a| a.id == avatar_id)
    }

    /// Move an avatar to `position`, standing it on the ground below if any.
    ///
    /// Returns `false` if the avatar doesn't exist.
    pub fn teleport(&mut self, avatar_id: AvatarId, position: Vec3) -> bool {
        let Some(avatar) = self.avatars.iter_mut().find(|a| a.id == avatar_id) else {
            return false;
        };
        let yaw = avatar.motion.yaw;
        self.controller.spawn_at(
            &mut avatar.motion,
            position,
            &self.level.collision,
            self.config.shape,
        );
        avatar.motion.yaw = yaw;
        avatar.motion.target_yaw = yaw;
        true
    }

    /// Advance the simulation by one tick.
    ///
    /// # Arguments
    ///
    /// * `inputs` - Avatar inputs indexed by avatar position in the `avatars` array
    ///
    /// Returns the transitions of every avatar, in avatar order.
    pub fn tick(&mut self, inputs: &[PlayerInput]) -> Vec<AvatarEvent> {
        let delta_time = self.config.delta_time();
        let mut events = Vec::new();

        for (i, avatar) in self.avatars.iter_mut().enumerate() {
            let input = inputs.get(i).cloned().unwrap_or_default();

            avatar.camera_yaw =
                wrap_angle(avatar.camera_yaw + input.yaw_delta(self.config.mouse_sensitivity));
            let sample = avatar.sampler.sample(&input);

            let mut mover = CharacterMover::new(&self.level.collision, self.config.shape);
            let report = self.controller.tick(
                &mut avatar.motion,
                &sample,
                avatar.camera_yaw,
                &mut mover,
                &self.level.collision,
                delta_time,
            );

            let avatar_events = AvatarEvent::from_report(avatar.id, &report);
            avatar.notify(&avatar_events);
            events.extend(avatar_events);

            if self.level.is_out_of_bounds(avatar.position()) {
                let spawn = self.level.spawn_point(i);
                let position = spawn.map(|s| s.position).unwrap_or(Vec3::ZERO);
                let facing = spawn.map(|s| s.facing).unwrap_or(0.0);

                avatar.respawn(position, facing);
                self.controller.spawn_at(
                    &mut avatar.motion,
                    position,
                    &self.level.collision,
                    self.config.shape,
                );
                avatar.motion.yaw = facing;
                avatar.motion.target_yaw = facing;
            }
        }

        self.frame += 1;
        events
    }

    /// Get the delta time for this simulation.
    pub fn delta_time(&self) -> f32 {
        self.config.delta_time()
    }

    /// Save every avatar's state.
    pub fn checkpoint(&self) -> Result<Checkpoint, SimulationError> {
        let avatars = self
            .avatars
            .iter()
            .map(|avatar| -> Result<AvatarCheckpoint, SimulationError> {
                Ok(AvatarCheckpoint {
                    id: avatar.id,
                    motion: encode_state(&avatar.motion)?,
                    camera_yaw: avatar.camera_yaw,
                    sampler: avatar.sampler,
                    respawns: avatar.respawns,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Checkpoint {
            frame: self.frame,
            avatars,
        })
    }

    /// Roll back to a checkpoint.
    ///
    /// Either every avatar is restored or, on error, nothing changes.
    pub fn restore(&mut self, checkpoint: &Checkpoint) -> Result<(), SimulationError> {
        let mut decoded = Vec::with_capacity(checkpoint.avatars.len());
        for saved in &checkpoint.avatars {
            let index = self
                .avatars
                .iter()
                .position(|a| a.id == saved.id)
                .ok_or(SimulationError::UnknownAvatar(saved.id))?;
            decoded.push((index, decode_state(&saved.motion)?, saved));
        }

        for (index, motion, saved) in decoded {
            let avatar = &mut self.avatars[index];
            avatar.motion = motion;
            avatar.camera_yaw = saved.camera_yaw;
            avatar.sampler = saved.sampler;
            avatar.respawns = saved.respawns;
        }

        log::debug!("restored checkpoint from frame {}", checkpoint.frame);
        self.frame = checkpoint.frame;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
