//! Collision detection and response
//!
//! All hit tests are axis-aligned box overlaps. The resolver applies the
//! consequences: destroyed enemies, score, explosions, bonus pickups and
//! game over.

use glam::Vec2;

use super::entity::EntityKind;
use super::state::{Atlas, EntityStore, GameState};
use crate::tuning::Tuning;

/// Axis-aligned box: top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// Box overlap test.
///
/// Boxes are separated when `a`'s far edge is at or before `b`'s near edge,
/// or `a`'s near edge is strictly past `b`'s far edge. The mixed `<=` / `>`
/// means two boxes sharing exactly one edge coordinate can test differently
/// depending on argument order; callers always pass the same order.
#[inline]
pub fn box_collides(a: &Aabb, b: &Aabb) -> bool {
    !(a.right() <= b.pos.x || a.pos.x > b.right() || a.bottom() <= b.pos.y || a.pos.y > b.bottom())
}

/// What the resolver did this tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Enemies destroyed by bullets
    pub enemies_shot: usize,
    /// Enemies destroyed by bonus pickups
    pub enemies_blasted: usize,
    pub bonuses_collected: usize,
    /// An enemy reached the player
    pub player_hit: bool,
}

/// Enemies a bonus pickup destroys: all but `round(count / keep_divisor)`,
/// never more than exist
pub fn bonus_kill_count(enemy_count: usize, keep_divisor: f32) -> usize {
    let keep = (enemy_count as f32 / keep_divisor).round() as usize;
    enemy_count - keep.min(enemy_count)
}

/// Resolve all collisions for one tick.
///
/// Each enemy takes at most one bullet per tick (the first overlapping one
/// in store order). Enemies that survive are then tested against the
/// player; a hit ends the game and stops resolution. Bonuses are checked
/// last, against the enemy list as it stands after bullet hits.
pub fn resolve_collisions(
    state: &mut GameState,
    store: &mut EntityStore,
    atlas: &Atlas,
    tuning: &Tuning,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    if state.is_over {
        return report;
    }

    let player_box = store.player.bounds();

    let mut i = 0;
    while i < store.enemies.len() {
        let enemy_box = store.enemies[i].bounds();

        let hit = store
            .bullets
            .iter()
            .position(|bullet| box_collides(&enemy_box, &bullet.bounds()));
        if let Some(j) = hit {
            let enemy = store.remove_enemy(i);
            store.remove_bullet(j);
            state.add_score(tuning.kill_score);
            store
                .explosions
                .push(atlas.spawn(EntityKind::Explosion, enemy.pos));
            report.enemies_shot += 1;
            continue;
        }

        if box_collides(&enemy_box, &player_box) {
            state.is_over = true;
            report.player_hit = true;
            return report;
        }
        i += 1;
    }

    let mut k = 0;
    while k < store.bonuses.len() {
        if !box_collides(&store.bonuses[k].bounds(), &player_box) {
            k += 1;
            continue;
        }

        state.reduce_cadence(tuning.cadence_step_ms, tuning.cadence_floor_ms);

        let kill = bonus_kill_count(store.enemies.len(), tuning.bonus_keep_divisor);
        for enemy in store.enemies.drain(..kill) {
            store
                .explosions
                .push(atlas.spawn(EntityKind::Explosion, enemy.pos));
        }
        state.add_score(tuning.kill_score * kill as u64);

        store.remove_bonus(k);
        report.bonuses_collected += 1;
        report.enemies_blasted += kill;
        log::debug!(
            "Bonus collected: {} enemies destroyed, cadence now {}ms",
            kill,
            state.bullet_cadence_ms
        );
    }

    report
}
