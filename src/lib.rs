//! Sky Strike - a side-scrolling canvas shooter
//!
//! Core modules:
//! - `sim`: Simulation (entities, spawning, collisions, session lifecycle)
//! - `input`: Polled input capability and the keyboard/joystick models behind it
//! - `render`: Draw-list export for the host's canvas adapter
//! - `tuning`: Data-driven game balance
//! - `error`: Fatal configuration errors

pub mod error;
pub mod input;
pub mod render;
pub mod sim;
pub mod tuning;

pub use error::SimError;
pub use input::{InputMode, InputSource, TickInput};
pub use sim::Session;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Arena width in canvas pixels
    pub const ARENA_WIDTH: f32 = 512.0;
    /// Arena height cap (actual height is min(viewport, this))
    pub const ARENA_MAX_HEIGHT: f32 = 480.0;

    /// Player spawn position (y is half the arena height)
    pub const PLAYER_START_X: f32 = 50.0;

    /// Sprite sheet layout: (origin, frame size)
    pub const PLAYER_ORIGIN: (f32, f32) = (0.0, 0.0);
    pub const PLAYER_SIZE: (f32, f32) = (39.0, 39.0);
    pub const PLAYER_FPS: f32 = 16.0;

    pub const BULLET_FORWARD_ORIGIN: (f32, f32) = (0.0, 39.0);
    pub const BULLET_FORWARD_SIZE: (f32, f32) = (18.0, 8.0);
    pub const BULLET_VERTICAL_ORIGIN: (f32, f32) = (0.0, 50.0);
    pub const BULLET_VERTICAL_SIZE: (f32, f32) = (9.0, 5.0);

    pub const ENEMY_ORIGIN: (f32, f32) = (0.0, 78.0);
    pub const ENEMY_SIZE: (f32, f32) = (85.0, 50.0);
    pub const ENEMY_FPS: f32 = 6.0;

    pub const BONUS_ORIGIN: (f32, f32) = (0.0, 128.0);
    pub const BONUS_SIZE: (f32, f32) = (50.0, 50.0);
    pub const BONUS_FPS: f32 = 4.0;

    pub const EXPLOSION_ORIGIN: (f32, f32) = (0.0, 178.0);
    pub const EXPLOSION_SIZE: (f32, f32) = (39.0, 39.0);
    pub const EXPLOSION_FPS: f32 = 16.0;
    /// Explosion is a one-shot run through this many frames
    pub const EXPLOSION_FRAMES: usize = 13;

    /// Host page element ids
    pub const SCORE_ELEMENT_ID: &str = "score";
    /// Shown together once the game is over (ids as in the page markup)
    pub const GAME_OVER_ELEMENT_IDS: [&str; 2] = ["game-over", "game-over-overplay"];
    pub const PLAY_AGAIN_ELEMENT_ID: &str = "play-again";
    pub const PORTRAIT_WARNING_ELEMENT_ID: &str = "portrait-warning";
}
