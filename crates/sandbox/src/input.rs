//! Player input handling.
//!
//! This module converts raw key states into the per-tick input samples the
//! locomotion controller consumes. Key states are levels; the controller needs
//! the jump edge as well, so each avatar keeps an [`InputSampler`] that
//! remembers last tick's jump key.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use stride_locomotion::InputSample;

/// Raw player input for a single tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Movement keys pressed.
    pub movement: MovementInput,

    /// Analog stick, used instead of the movement keys when present.
    pub stick: Option<Vec2>,

    /// Horizontal mouse delta this tick (pixels).
    pub mouse_delta_x: f32,

    /// Action buttons pressed.
    pub actions: ActionInput,
}

/// Movement key states.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Action button states.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ActionInput {
    pub jump: bool,
    pub sprint: bool,
}

impl PlayerInput {
    /// Move vector in `[-1, 1]²` (x = right, y = forward).
    pub fn move_vector(&self) -> Vec2 {
        if let Some(stick) = self.stick {
            return stick.clamp_length_max(1.0);
        }

        let mut axes = Vec2::ZERO;
        if self.movement.forward {
            axes.y += 1.0;
        }
        if self.movement.backward {
            axes.y -= 1.0;
        }
        if self.movement.right {
            axes.x += 1.0;
        }
        if self.movement.left {
            axes.x -= 1.0;
        }

        // Normalize diagonal movement
        axes.clamp_length_max(1.0)
    }

    /// Camera yaw change for this tick (radians).
    pub fn yaw_delta(&self, mouse_sensitivity: f32) -> f32 {
        self.mouse_delta_x * mouse_sensitivity * 0.001
    }

    /// Check if any movement input is active.
    pub fn has_movement(&self) -> bool {
        self.stick.is_some_and(|s| s != Vec2::ZERO)
            || self.movement.forward
            || self.movement.backward
            || self.movement.left
            || self.movement.right
    }

    /// Hold forward.
    pub fn forward() -> Self {
        let mut input = Self::default();
        input.movement.forward = true;
        input
    }

    /// Hold jump, optionally while moving forward.
    pub fn jump(moving: bool) -> Self {
        let mut input = if moving { Self::forward() } else { Self::default() };
        input.actions.jump = true;
        input
    }
}

/// Turns key levels into input samples with a jump edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSampler {
    jump_was_held: bool,
}

impl InputSampler {
    /// Sample this tick's input.
    pub fn sample(&mut self, input: &PlayerInput) -> InputSample {
        let jump_held = input.actions.jump;
        let jump_pressed = jump_held && !self.jump_was_held;
        self.jump_was_held = jump_held;

        InputSample {
            move_vector: input.move_vector(),
            sprint: input.actions.sprint,
            jump_pressed,
            jump_held,
        }
    }

    /// Forget the held jump key (e.g. after respawn).
    pub fn reset(&mut self) {
        self.jump_was_held = false;
    }
}
