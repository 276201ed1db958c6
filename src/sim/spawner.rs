//! Enemy and bonus spawning
//!
//! Enemies appear from the right edge with a per-tick chance that rises with
//! game time: `1 - base^t`. The trial runs once per tick, so a higher frame
//! rate spawns more enemies. Bonuses may appear once each time the score
//! lands on a new multiple of the bonus interval.

use glam::Vec2;
use rand::Rng;

use super::entity::EntityKind;
use super::state::{Arena, Atlas, EntityStore, GameState};
use crate::tuning::Tuning;

/// Per-tick probability of an enemy spawn at `game_time` seconds
#[inline]
pub fn spawn_probability(game_time: f32, base: f32) -> f32 {
    1.0 - base.powf(game_time)
}

/// Whether the score has just reached a bonus threshold that has not
/// spawned a bonus yet
pub fn bonus_due(score: u64, last_bonus_score: u64, interval: u64) -> bool {
    score != 0 && score.is_multiple_of(interval) && score != last_bonus_score
}

/// What the spawner produced this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spawned {
    pub enemy: bool,
    pub bonus: bool,
}

/// Run both spawn rules once
pub fn run(
    state: &mut GameState,
    store: &mut EntityStore,
    atlas: &Atlas,
    arena: &Arena,
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> Spawned {
    let mut spawned = Spawned::default();

    let roll: f32 = rng.random();
    if roll < spawn_probability(state.game_time, tuning.spawn_base) {
        let span = (arena.height - atlas.enemy.size.y).max(0.0);
        let y = rng.random::<f32>() * span;
        store
            .enemies
            .push(atlas.spawn(EntityKind::Enemy, Vec2::new(arena.width, y)));
        spawned.enemy = true;
    }

    if bonus_due(state.score, state.last_bonus_score, tuning.bonus_score_interval)
        && rng.random::<f32>() < tuning.bonus_chance
    {
        let span = (arena.height - atlas.bonus.size.y).max(0.0);
        let y = rng.random::<f32>() * span;
        store
            .bonuses
            .push(atlas.spawn(EntityKind::Bonus, Vec2::new(arena.width, y)));
        state.last_bonus_score = state.score;
        spawned.bonus = true;
        log::debug!("Bonus spawned at score {}", state.score);
    }

    spawned
}
