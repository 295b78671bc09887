//! Stride - Headless Demo
//!
//! Runs a few scripted avatars around the test arena and logs what happens.
//!
//! ```text
//! stride [PROFILE]
//! ```
//!
//! `PROFILE` is either a path to a RON tuning profile or the name of a
//! built-in profile (`default`, `platformer`, `grounded_heavy`). Set
//! `RUST_LOG=info` (or `debug`) to see the event stream.

use std::error::Error;
use std::path::Path;

use glam::Vec2;
use stride_sandbox::{
    load_profile, Level, LogObserver, PlayerInput, Simulation, SimulationConfig, TuningProfile,
};

/// Seconds of simulated time.
const DEMO_SECONDS: u32 = 8;

fn resolve_profile(arg: Option<String>) -> Result<TuningProfile, Box<dyn Error>> {
    let Some(arg) = arg else {
        return Ok(TuningProfile::new("default", Default::default()));
    };

    if let Some(profile) = TuningProfile::builtin_named(&arg) {
        return Ok(profile);
    }
    Ok(load_profile(Path::new(&arg))?)
}

/// Scripted input for avatar `index` at `tick`.
fn scripted_input(index: usize, tick: u32, tick_rate: u32) -> PlayerInput {
    let second = tick / tick_rate;
    let phase = tick % tick_rate;

    match index {
        // Runs forward and hops every second, double jumping on odd seconds
        0 => {
            let mut input = PlayerInput::forward();
            input.actions.sprint = true;
            input.actions.jump = phase < 6 || (second % 2 == 1 && (12..18).contains(&phase));
            input
        }
        // Circles with the analog stick while the camera turns
        1 => PlayerInput {
            stick: Some(Vec2::new(0.6, 0.8)),
            mouse_delta_x: 4.0,
            ..Default::default()
        },
        // Walks back and forth, tapping jump
        _ => {
            let mut input = PlayerInput::default();
            if second % 2 == 0 {
                input.movement.forward = true;
            } else {
                input.movement.backward = true;
            }
            input.actions.jump = phase == 30;
            input
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let profile = resolve_profile(std::env::args().nth(1))?;
    log::info!("using tuning profile '{}'", profile.name);

    let config = SimulationConfig {
        tuning: profile.tuning,
        ..Default::default()
    };
    let tick_rate = config.tick_rate;
    let mut simulation = Simulation::new(config, Level::test_arena());

    for name in ["sprinter", "circler", "pacer"] {
        let id = simulation.add_avatar(name);
        if let Some(avatar) = simulation.avatar_mut(id) {
            avatar.add_observer(Box::new(LogObserver));
        }
    }

    let total_ticks = DEMO_SECONDS * tick_rate;
    let mut event_count = 0;
    let mut checkpoint = None;

    for tick in 0..total_ticks {
        let inputs: Vec<PlayerInput> = (0..simulation.avatars.len())
            .map(|index| scripted_input(index, tick, tick_rate))
            .collect();

        event_count += simulation.tick(&inputs).len();

        if tick == total_ticks / 2 {
            checkpoint = Some(simulation.checkpoint()?);
        }
    }

    for avatar in &simulation.avatars {
        log::info!(
            "{} ended at {:?} (grounded={}, speed={:.2})",
            avatar.name,
            avatar.position(),
            avatar.grounded(),
            avatar.motion.horizontal_speed()
        );
    }
    log::info!("{event_count} events over {total_ticks} ticks");

    if let Some(checkpoint) = checkpoint {
        simulation.restore(&checkpoint)?;
        log::info!("rolled back to frame {}", simulation.frame);
    }

    Ok(())
}
