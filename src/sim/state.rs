//! Game state and entity storage
//!
//! Everything a session mutates per frame lives in [`GameState`] (scalars)
//! and [`EntityStore`] (entity collections). Both are rebuilt wholesale on
//! reset.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{BulletDirection, Entity, EntityKind};
use super::sprite::Sprite;
use crate::consts::*;
use crate::error::SimError;
use crate::render::ImageId;
use crate::tuning::Tuning;

/// Playfield bounds, fixed for a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Standard arena: fixed width, height capped by the viewport
    pub fn for_viewport(viewport_height: f32) -> Self {
        Self::new(ARENA_WIDTH, viewport_height.min(ARENA_MAX_HEIGHT))
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(ARENA_WIDTH, ARENA_MAX_HEIGHT)
    }
}

fn v(pair: (f32, f32)) -> Vec2 {
    Vec2::new(pair.0, pair.1)
}

/// Template sprites for every entity kind, cloned on spawn
#[derive(Debug, Clone)]
pub struct Atlas {
    pub player: Sprite,
    pub bullet_forward: Sprite,
    pub bullet_vertical: Sprite,
    pub enemy: Sprite,
    pub bonus: Sprite,
    pub explosion: Sprite,
}

impl Atlas {
    /// Layout of the shipped sprite sheet
    pub fn new() -> Result<Self, SimError> {
        let sheet = ImageId::Sprites;
        Ok(Self {
            player: Sprite::new(
                "player",
                sheet,
                v(PLAYER_ORIGIN),
                v(PLAYER_SIZE),
                1.0 / PLAYER_FPS,
                vec![0, 1],
                false,
            )?,
            bullet_forward: Sprite::still(
                "bullet_forward",
                sheet,
                v(BULLET_FORWARD_ORIGIN),
                v(BULLET_FORWARD_SIZE),
            )?,
            bullet_vertical: Sprite::still(
                "bullet_vertical",
                sheet,
                v(BULLET_VERTICAL_ORIGIN),
                v(BULLET_VERTICAL_SIZE),
            )?,
            enemy: Sprite::new(
                "enemy",
                sheet,
                v(ENEMY_ORIGIN),
                v(ENEMY_SIZE),
                1.0 / ENEMY_FPS,
                vec![0, 1, 2, 3, 2, 1],
                false,
            )?,
            bonus: Sprite::new(
                "bonus",
                sheet,
                v(BONUS_ORIGIN),
                v(BONUS_SIZE),
                1.0 / BONUS_FPS,
                vec![0, 1],
                false,
            )?,
            explosion: Sprite::new(
                "explosion",
                sheet,
                v(EXPLOSION_ORIGIN),
                v(EXPLOSION_SIZE),
                1.0 / EXPLOSION_FPS,
                (0..EXPLOSION_FRAMES).collect(),
                true,
            )?,
        })
    }

    /// Sprite template for an entity kind
    pub fn sprite_for(&self, kind: EntityKind) -> &Sprite {
        match kind {
            EntityKind::Player => &self.player,
            EntityKind::Bullet(BulletDirection::Forward) => &self.bullet_forward,
            EntityKind::Bullet(_) => &self.bullet_vertical,
            EntityKind::Enemy => &self.enemy,
            EntityKind::Bonus => &self.bonus,
            EntityKind::Explosion => &self.explosion,
        }
    }

    /// Fresh entity with its own copy of the kind's sprite
    pub fn spawn(&self, kind: EntityKind, pos: Vec2) -> Entity {
        Entity::new(kind, pos, self.sprite_for(kind).clone())
    }
}

/// Session scalars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Seconds of simulated time
    pub game_time: f32,
    /// Always a multiple of the kill score
    pub score: u64,
    /// Score at which the last bonus spawned
    pub last_bonus_score: u64,
    /// Game-clock time of the last volley (ms)
    pub last_fire_ms: f32,
    /// Minimum gap between volleys (ms), only ever decreases
    pub bullet_cadence_ms: f32,
    pub player_speed: f32,
    pub bullet_speed: f32,
    pub enemy_speed: f32,
    pub is_over: bool,
}

impl GameState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            game_time: 0.0,
            score: 0,
            last_bonus_score: 0,
            last_fire_ms: 0.0,
            bullet_cadence_ms: tuning.initial_cadence_ms,
            player_speed: tuning.player_speed,
            bullet_speed: tuning.bullet_speed,
            enemy_speed: tuning.enemy_speed,
            is_over: false,
        }
    }

    /// Game clock in milliseconds
    pub fn now_ms(&self) -> f32 {
        self.game_time * 1000.0
    }

    pub fn add_score(&mut self, points: u64) {
        self.score += points;
    }

    /// Faster firing, never below `floor`
    pub fn reduce_cadence(&mut self, step: f32, floor: f32) {
        self.bullet_cadence_ms = (self.bullet_cadence_ms - step).max(floor);
    }
}

/// All live entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStore {
    pub player: Entity,
    pub bullets: Vec<Entity>,
    pub enemies: Vec<Entity>,
    pub bonuses: Vec<Entity>,
    pub explosions: Vec<Entity>,
}

impl EntityStore {
    /// Empty store with the player at its start position
    pub fn new(arena: &Arena, atlas: &Atlas) -> Self {
        Self {
            player: atlas.spawn(
                EntityKind::Player,
                Vec2::new(PLAYER_START_X, arena.height / 2.0),
            ),
            bullets: Vec::new(),
            enemies: Vec::new(),
            bonuses: Vec::new(),
            explosions: Vec::new(),
        }
    }

    pub fn remove_bullet(&mut self, index: usize) -> Entity {
        take(&mut self.bullets, index, "bullet")
    }

    pub fn remove_enemy(&mut self, index: usize) -> Entity {
        take(&mut self.enemies, index, "enemy")
    }

    pub fn remove_bonus(&mut self, index: usize) -> Entity {
        take(&mut self.bonuses, index, "bonus")
    }

    /// Animate every entity and move the non-player ones
    pub fn advance(&mut self, dt: f32, bullet_speed: f32, scroll_speed: f32) {
        self.player.advance(dt, bullet_speed, scroll_speed);
        for entity in self
            .bullets
            .iter_mut()
            .chain(self.enemies.iter_mut())
            .chain(self.bonuses.iter_mut())
            .chain(self.explosions.iter_mut())
        {
            entity.advance(dt, bullet_speed, scroll_speed);
        }
    }

    /// Drop entities that left the arena or finished exploding.
    /// Returns how many were removed.
    pub fn cull(&mut self, arena_size: Vec2) -> usize {
        let before = self.len();
        self.bullets.retain(|e| !e.is_expired(arena_size));
        self.enemies.retain(|e| !e.is_expired(arena_size));
        self.bonuses.retain(|e| !e.is_expired(arena_size));
        self.explosions.retain(|e| !e.is_expired(arena_size));
        before - self.len()
    }

    /// Non-player entity count
    pub fn len(&self) -> usize {
        self.bullets.len() + self.enemies.len() + self.bonuses.len() + self.explosions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Remove one entity, compacting the list. A bad index means an entity is
/// being removed twice, which is a bug in the step.
fn take(list: &mut Vec<Entity>, index: usize, what: &str) -> Entity {
    assert!(
        index < list.len(),
        "{} index {} out of range (len {}): double removal?",
        what,
        index,
        list.len()
    );
    list.remove(index)
}
