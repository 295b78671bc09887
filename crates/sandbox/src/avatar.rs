//! Avatar entity, transition events and observers.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use stride_locomotion::{MotionState, TickReport};

use crate::input::InputSampler;

/// Unique identifier for avatars.
pub type AvatarId = u32;

/// A movement transition reported by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvatarEvent {
    /// A jump fired; `jump_count` is the count after the jump.
    Jumped { avatar: AvatarId, jump_count: u32 },
    /// Airborne → grounded.
    Landed { avatar: AvatarId },
    /// Grounded → airborne without jumping.
    LeftGround { avatar: AvatarId },
    /// The fall timeout expired.
    FreeFall { avatar: AvatarId },
}

impl AvatarEvent {
    /// Events for one tick, in the order they happened.
    pub fn from_report(avatar: AvatarId, report: &TickReport) -> Vec<AvatarEvent> {
        let mut events = Vec::new();
        if report.just_jumped {
            events.push(AvatarEvent::Jumped {
                avatar,
                jump_count: report.jump_count,
            });
        }
        if report.entered_free_fall {
            events.push(AvatarEvent::FreeFall { avatar });
        }
        if report.just_left_ground {
            events.push(AvatarEvent::LeftGround { avatar });
        }
        if report.just_landed {
            events.push(AvatarEvent::Landed { avatar });
        }
        events
    }

    /// The avatar this event belongs to.
    pub fn avatar(&self) -> AvatarId {
        match *self {
            AvatarEvent::Jumped { avatar, .. }
            | AvatarEvent::Landed { avatar }
            | AvatarEvent::LeftGround { avatar }
            | AvatarEvent::FreeFall { avatar } => avatar,
        }
    }
}

/// Receives an avatar's movement transitions.
///
/// All methods default to doing nothing.
pub trait AvatarObserver {
    fn on_jump(&mut self, _avatar: AvatarId, _jump_count: u32) {}
    fn on_landed(&mut self, _avatar: AvatarId) {}
    fn on_left_ground(&mut self, _avatar: AvatarId) {}
    fn on_free_fall(&mut self, _avatar: AvatarId) {}
}

/// Observer that writes every transition to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl AvatarObserver for LogObserver {
    fn on_jump(&mut self, avatar: AvatarId, jump_count: u32) {
        log::info!("avatar {avatar} jumped ({jump_count})");
    }

    fn on_landed(&mut self, avatar: AvatarId) {
        log::info!("avatar {avatar} landed");
    }

    fn on_left_ground(&mut self, avatar: AvatarId) {
        log::info!("avatar {avatar} left the ground");
    }

    fn on_free_fall(&mut self, avatar: AvatarId) {
        log::info!("avatar {avatar} is free falling");
    }
}

/// Observer that records events into a shared list.
///
/// Clones share the same list, so keep one clone to read what another saw.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<AvatarEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn events(&self) -> Vec<AvatarEvent> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    fn push(&self, event: AvatarEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl AvatarObserver for EventLog {
    fn on_jump(&mut self, avatar: AvatarId, jump_count: u32) {
        self.push(AvatarEvent::Jumped { avatar, jump_count });
    }

    fn on_landed(&mut self, avatar: AvatarId) {
        self.push(AvatarEvent::Landed { avatar });
    }

    fn on_left_ground(&mut self, avatar: AvatarId) {
        self.push(AvatarEvent::LeftGround { avatar });
    }

    fn on_free_fall(&mut self, avatar: AvatarId) {
        self.push(AvatarEvent::FreeFall { avatar });
    }
}

/// An avatar in the sandbox.
pub struct Avatar {
    /// Unique avatar ID.
    pub id: AvatarId,

    /// Display name.
    pub name: String,

    /// Locomotion state.
    pub motion: MotionState,

    /// Camera yaw the move vector is relative to (radians).
    pub camera_yaw: f32,

    /// Jump edge detection.
    pub sampler: InputSampler,

    /// Times this avatar has been respawned.
    pub respawns: u32,

    observers: Vec<Box<dyn AvatarObserver>>,
}

impl fmt::Debug for Avatar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Avatar")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("motion", &self.motion)
            .field("camera_yaw", &self.camera_yaw)
            .field("respawns", &self.respawns)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Avatar {
    /// Create a new avatar at the given position, facing `facing`.
    pub fn new(id: AvatarId, name: impl Into<String>, position: Vec3, facing: f32) -> Self {
        let mut motion = MotionState::new(position);
        motion.yaw = facing;
        motion.target_yaw = facing;

        Self {
            id,
            name: name.into(),
            motion,
            camera_yaw: facing,
            sampler: InputSampler::default(),
            respawns: 0,
            observers: Vec::new(),
        }
    }

    /// Get the avatar's current position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.motion.position
    }

    /// Check if the avatar is on the ground.
    #[inline]
    pub fn grounded(&self) -> bool {
        self.motion.grounded
    }

    /// Direction the avatar faces (horizontal).
    #[inline]
    pub fn facing_direction(&self) -> Vec3 {
        stride_locomotion::math::yaw_direction(self.motion.yaw)
    }

    /// Apply an impulse (knockback, jump pads).
    pub fn add_force(&mut self, force: Vec3) {
        self.motion.add_force(force);
    }

    /// Trigger a jump from gameplay code rather than the jump button.
    pub fn request_jump(&mut self, forced: bool) {
        self.motion.request_jump(forced);
    }

    /// Put the avatar back at a spawn point.
    pub fn respawn(&mut self, position: Vec3, facing: f32) {
        self.motion.reset(position);
        self.motion.yaw = facing;
        self.motion.target_yaw = facing;
        self.camera_yaw = facing;
        self.sampler.reset();
        self.respawns += 1;
        log::debug!("avatar {} respawned at {:?}", self.id, position);
    }

    /// Register an observer for this avatar's transitions.
    pub fn add_observer(&mut self, observer: Box<dyn AvatarObserver>) {
        self.observers.push(observer);
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Fan events out to every observer.
    pub fn notify(&mut self, events: &[AvatarEvent]) {
        for event in events {
            for observer in &mut self.observers {
                match *event {
                    AvatarEvent::Jumped { avatar, jump_count } => observer.on_jump(avatar, jump_count),
                    AvatarEvent::Landed { avatar } => observer.on_landed(avatar),
                    AvatarEvent::LeftGround { avatar } => observer.on_left_ground(avatar),
                    AvatarEvent::FreeFall { avatar } => observer.on_free_fall(avatar),
                }
            }
        }
    }
}
