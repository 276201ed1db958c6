//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - Time only advances through the `dt` handed to `tick`
//! - Seeded RNG only
//! - All mutation happens inside one synchronous step

pub mod collision;
pub mod entity;
pub mod session;
pub mod spawner;
pub mod sprite;
pub mod state;
pub mod tick;

pub use collision::{Aabb, CollisionReport, bonus_kill_count, box_collides, resolve_collisions};
pub use entity::{BulletDirection, Entity, EntityKind, clamp_to_arena};
pub use session::Session;
pub use spawner::{bonus_due, spawn_probability};
pub use sprite::Sprite;
pub use state::{Arena, Atlas, EntityStore, GameState};
pub use tick::tick;
