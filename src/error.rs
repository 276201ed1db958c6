//! Fatal simulation errors.
//!
//! Everything here is raised while a session is being configured. The
//! per-frame step never returns an error: it only runs once the tuning,
//! sprite sheet and arena have been validated.

use std::fmt;

use crate::render::ImageId;

#[derive(Debug)]
pub enum SimError {
    /// A sprite was given no frames to cycle through.
    EmptyAnimation {
        /// Which sprite (for logging).
        sprite: &'static str,
    },

    /// A sprite frame must stay on screen for a positive amount of time.
    NonPositiveFrameDuration { sprite: &'static str, value: f32 },

    /// A tuning value is outside its valid range.
    InvalidTuning {
        /// Name of the field that was rejected.
        name: &'static str,
        value: f32,
    },

    /// Tuning JSON could not be parsed.
    TuningParse(serde_json::Error),

    /// The arena cannot hold the player sprite.
    InvalidArena { width: f32, height: f32 },

    /// An image was referenced before the host finished loading it.
    ResourceNotLoaded { image: ImageId },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::EmptyAnimation { sprite } => {
                write!(f, "sprite '{}' has an empty frame sequence", sprite)
            }
            SimError::NonPositiveFrameDuration { sprite, value } => write!(
                f,
                "sprite '{}' has non-positive frame duration {}",
                sprite, value
            ),
            SimError::InvalidTuning { name, value } => {
                write!(f, "tuning value '{}' is out of range: {}", name, value)
            }
            SimError::TuningParse(err) => write!(f, "failed to parse tuning: {}", err),
            SimError::InvalidArena { width, height } => write!(
                f,
                "arena {}x{} is too small for the player sprite",
                width, height
            ),
            SimError::ResourceNotLoaded { image } => {
                write!(f, "image {:?} referenced before it was loaded", image)
            }
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::TuningParse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::TuningParse(err)
    }
}
