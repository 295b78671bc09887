//! Binary snapshots of motion state.
//!
//! Used for checkpoints and rollback: a decoded snapshot ticks forward exactly
//! like the state it was taken from.

use thiserror::Error;

use crate::movement::MotionState;

/// Errors that can occur during encoding/decoding.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("snapshot has {0} trailing bytes")]
    TrailingBytes(usize),
}

/// Encode a motion state to bytes.
pub fn encode_state(state: &MotionState) -> Result<Vec<u8>, SnapshotError> {
    Ok(bincode::serde::encode_to_vec(state, bincode::config::standard())?)
}

/// Decode a motion state from bytes.
pub fn decode_state(data: &[u8]) -> Result<MotionState, SnapshotError> {
    let (state, read) = bincode::serde::decode_from_slice(data, bincode::config::standard())?;
    if read != data.len() {
        return Err(SnapshotError::TrailingBytes(data.len() - read));
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::collision::ColliderId;

    fn sample_state() -> MotionState {
        let mut state = MotionState::new(Vec3::new(1.0, 2.0, 3.0));
        state.yaw = 0.7;
        state.planar_velocity = Vec3::new(4.0, 0.0, -1.5);
        state.gravitational_velocity = -6.25;
        state.grounded = false;
        state.jump_count = 2;
        state.ground_collider = Some(ColliderId(12));
        state.jump_released_while_ascending = true;
        state
    }

    #[test]
    fn roundtrip_state() {
        let state = sample_state();

        let encoded = encode_state(&state).unwrap();
        let decoded = decode_state(&encoded).unwrap();

        assert_eq!(decoded, state);
        // Never-happened timers survive as infinity
        assert!(decoded.time_since_last_jump.is_infinite());
    }

    #[test]
    fn truncated_snapshot_fails() {
        let encoded = encode_state(&sample_state()).unwrap();

        let result = decode_state(&encoded[..encoded.len() / 2]);

        assert!(matches!(result, Err(SnapshotError::Decode(_))));
    }

    #[test]
    fn trailing_bytes_rejected() {
        let mut encoded = encode_state(&sample_state()).unwrap();
        encoded.extend_from_slice(&[0, 0, 0]);

        let result = decode_state(&encoded);

        assert!(matches!(result, Err(SnapshotError::TrailingBytes(3))));
    }
}
