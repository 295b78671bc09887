//! Movement tuning profiles stored as RON.
//!
//! ```ron
//! (
//!     name: "floaty",
//!     tuning: (
//!         jump_height: 2.5,
//!         gravity_multiplier: 0.8,
//!     ),
//! )
//! ```
//!
//! Missing tuning fields take their default values.

use std::fs;
use std::path::Path;

use ron::Options;
use serde::{Deserialize, Serialize};
use stride_locomotion::MovementTuning;
use thiserror::Error;

/// Errors that can occur while loading or saving profiles.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("serialize error: {0}")]
    Serialize(#[from] ron::Error),
}

/// A named movement tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningProfile {
    pub name: String,

    #[serde(default)]
    pub tuning: MovementTuning,
}

impl TuningProfile {
    pub fn new(name: impl Into<String>, tuning: MovementTuning) -> Self {
        Self {
            name: name.into(),
            tuning,
        }
    }

    /// The profiles that ship with the sandbox.
    pub fn builtin() -> Vec<TuningProfile> {
        vec![
            Self::new("default", MovementTuning::default()),
            Self::new("platformer", MovementTuning::platformer()),
            Self::new("grounded_heavy", MovementTuning::grounded_heavy()),
        ]
    }

    /// Look up a built-in profile by name.
    pub fn builtin_named(name: &str) -> Option<TuningProfile> {
        Self::builtin().into_iter().find(|profile| profile.name == name)
    }
}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

/// Parse a profile from RON text.
pub fn parse_profile(source: &str) -> Result<TuningProfile, ProfileError> {
    Ok(ron_options().from_str(source)?)
}

/// Load a profile from a RON file.
pub fn load_profile(path: &Path) -> Result<TuningProfile, ProfileError> {
    let contents = fs::read_to_string(path).map_err(|source| ProfileError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let profile = parse_profile(&contents)?;
    log::info!("loaded tuning profile '{}' from {}", profile.name, path.display());
    Ok(profile)
}

/// Render a profile as pretty RON.
pub fn profile_to_ron(profile: &TuningProfile) -> Result<String, ProfileError> {
    Ok(ron::ser::to_string_pretty(
        profile,
        ron::ser::PrettyConfig::default(),
    )?)
}
