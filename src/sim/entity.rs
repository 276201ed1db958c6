//! Entity variants
//!
//! Every entity is a position plus the sprite it owns. What differs between
//! kinds is how they move each tick and when they leave the arena.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::sprite::Sprite;
use crate::render::DrawCommand;

/// Bullet travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletDirection {
    Forward,
    Up,
    Down,
}

/// Entity variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Bullet(BulletDirection),
    Enemy,
    Bonus,
    Explosion,
}

/// A positioned, animated game object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    /// Top-left corner in arena pixels
    pub pos: Vec2,
    pub sprite: Sprite,
}

impl Entity {
    pub fn new(kind: EntityKind, pos: Vec2, sprite: Sprite) -> Self {
        Self { kind, pos, sprite }
    }

    /// Hitbox: the current frame's footprint at the entity position
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.sprite.size)
    }

    /// Centre of the sprite
    pub fn center(&self) -> Vec2 {
        self.pos + self.sprite.size / 2.0
    }

    /// Animate and apply this kind's own motion.
    ///
    /// Bullets fly along their axis; enemies and bonuses scroll left. The
    /// player is moved by input, and explosions stay put.
    pub fn advance(&mut self, dt: f32, bullet_speed: f32, scroll_speed: f32) {
        self.sprite.update(dt);
        match self.kind {
            EntityKind::Bullet(BulletDirection::Forward) => self.pos.x += bullet_speed * dt,
            EntityKind::Bullet(BulletDirection::Up) => self.pos.y -= bullet_speed * dt,
            EntityKind::Bullet(BulletDirection::Down) => self.pos.y += bullet_speed * dt,
            EntityKind::Enemy | EntityKind::Bonus => self.pos.x -= scroll_speed * dt,
            EntityKind::Player | EntityKind::Explosion => {}
        }
    }

    /// Blit of the current animation frame at this position
    pub fn draw_command(&self) -> DrawCommand {
        DrawCommand {
            image: self.sprite.image,
            src: self.sprite.frame_rect(),
            pos: self.pos,
        }
    }

    /// Whether this entity should be culled.
    ///
    /// Bullets go once past any arena edge except the left one they can't
    /// reach; scrollers go once their right edge passes x = 0; explosions go
    /// when their animation finishes.
    pub fn is_expired(&self, arena_size: Vec2) -> bool {
        match self.kind {
            EntityKind::Bullet(_) => {
                self.pos.y < 0.0 || self.pos.y > arena_size.y || self.pos.x > arena_size.x
            }
            EntityKind::Enemy | EntityKind::Bonus => self.pos.x + self.sprite.size.x < 0.0,
            EntityKind::Explosion => self.sprite.is_done(),
            EntityKind::Player => false,
        }
    }
}

/// Keep the player's sprite fully inside the arena
pub fn clamp_to_arena(pos: Vec2, size: Vec2, arena_size: Vec2) -> Vec2 {
    let max = (arena_size - size).max(Vec2::ZERO);
    pos.clamp(Vec2::ZERO, max)
}
