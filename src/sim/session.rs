//! Session lifecycle
//!
//! A [`Session`] is the context object the host drives: it owns the game
//! state, entities, RNG and configuration, and is the only thing `tick`
//! mutates. Restarting replaces state and entities wholesale.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::state::{Arena, Atlas, EntityStore, GameState};
use super::tick::tick;
use crate::error::SimError;
use crate::input::{InputMode, TickInput};
use crate::render::{ImageId, Scene};
use crate::tuning::Tuning;

pub struct Session {
    pub state: GameState,
    pub store: EntityStore,
    pub(crate) arena: Arena,
    pub(crate) tuning: Tuning,
    pub(crate) atlas: Atlas,
    pub(crate) rng: Pcg32,
    pub(crate) input_mode: InputMode,
    pub(crate) seed: u64,
    /// Suspended (e.g. portrait orientation); steps are ignored
    pub(crate) idle: bool,
}

impl Session {
    /// Validate configuration and start a fresh session
    pub fn new(
        arena: Arena,
        tuning: Tuning,
        input_mode: InputMode,
        seed: u64,
    ) -> Result<Self, SimError> {
        tuning.validate()?;
        let atlas = Atlas::new()?;

        let player = atlas.player.size;
        if !(arena.width >= player.x && arena.height >= player.y) {
            return Err(SimError::InvalidArena {
                width: arena.width,
                height: arena.height,
            });
        }

        log::info!(
            "Session started: arena {}x{}, {:?} input, seed {}",
            arena.width,
            arena.height,
            input_mode,
            seed
        );

        Ok(Self {
            state: GameState::new(&tuning),
            store: EntityStore::new(&arena, &atlas),
            arena,
            tuning,
            atlas,
            rng: Pcg32::seed_from_u64(seed),
            input_mode,
            seed,
            idle: false,
        })
    }

    /// Run one frame. Ignored while suspended; negative or non-finite
    /// frame times count as zero.
    pub fn step(&mut self, input: &TickInput, dt: f32) {
        if self.idle {
            return;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        tick(self, input, dt);
    }

    /// Fresh state and entities; the RNG stream carries on
    pub fn reset(&mut self) {
        self.state = GameState::new(&self.tuning);
        self.store = EntityStore::new(&self.arena, &self.atlas);
        log::info!("Session reset");
    }

    /// Reset with a new RNG seed
    pub fn restart(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.reset();
    }

    /// Halt the loop until `resume`
    pub fn suspend(&mut self) {
        if !self.idle {
            self.idle = true;
            log::info!("Session suspended");
        }
    }

    /// Leave suspension. The interrupted game is discarded.
    pub fn resume(&mut self) {
        self.reset();
        self.idle = false;
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over
    }

    pub fn is_idle(&self) -> bool {
        self.idle
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw list for this frame
    pub fn scene(&self) -> Scene {
        let store = &self.store;
        let mut commands = Vec::with_capacity(store.len() + 1);

        let hide_player = self.state.is_over && self.tuning.hide_player_on_game_over;
        if !hide_player {
            commands.push(store.player.draw_command());
        }
        commands.extend(
            store
                .bullets
                .iter()
                .chain(&store.enemies)
                .chain(&store.bonuses)
                .chain(&store.explosions)
                .map(|e| e.draw_command()),
        );

        Scene {
            background: ImageId::Terrain,
            arena_size: self.arena.size(),
            commands,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("seed", &self.seed)
            .field("idle", &self.idle)
            .field("score", &self.state.score)
            .field("is_over", &self.state.is_over)
            .field("entities", &self.store.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityKind;
    use glam::Vec2;

    fn session() -> Session {
        Session::new(Arena::default(), Tuning::default(), InputMode::Digital, 42).unwrap()
    }

    fn kill_player(s: &mut Session) {
        let p = s.store.player.pos;
        let enemy = s.atlas.spawn(EntityKind::Enemy, p);
        s.store.enemies.push(enemy);
        s.step(&TickInput::default(), 1.0 / 60.0);
        assert!(s.is_over());
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let tuning = Tuning {
            enemy_speed: -1.0,
            ..Default::default()
        };
        let err = Session::new(Arena::default(), tuning, InputMode::Digital, 1).unwrap_err();
        assert!(matches!(err, SimError::InvalidTuning { name: "enemy_speed", .. }));
    }

    #[test]
    fn test_arena_too_small_rejected() {
        let err = Session::new(Arena::new(512.0, 20.0), Tuning::default(), InputMode::Digital, 1)
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidArena { .. }));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut s = session();
        s.step(&TickInput { shoot: true, ..Default::default() }, 0.5);
        kill_player(&mut s);

        s.reset();
        let (state1, store1) = (s.state.clone(), s.store.clone());
        s.reset();

        assert_eq!(s.state, state1);
        assert_eq!(s.store, store1);
        assert_eq!(s.state.score, 0);
        assert_eq!(s.state.game_time, 0.0);
        assert_eq!(s.state.bullet_cadence_ms, 180.0);
        assert!(!s.state.is_over);
        assert!(s.store.is_empty());
        assert_eq!(s.store.player.pos, Vec2::new(50.0, 240.0));
    }

    #[test]
    fn test_restart_same_seed_replays() {
        let mut a = session();
        let mut b = session();
        for _ in 0..600 {
            a.step(&TickInput::default(), 1.0 / 30.0);
        }
        a.restart(42);
        assert_eq!(a.seed(), 42);
        for _ in 0..600 {
            a.step(&TickInput::default(), 1.0 / 30.0);
            b.step(&TickInput::default(), 1.0 / 30.0);
        }
        assert_eq!(a.store, b.store);
    }

    #[test]
    fn test_suspended_session_ignores_steps() {
        let mut s = session();
        s.suspend();
        assert!(s.is_idle());
        s.step(&TickInput::default(), 1.0);
        assert_eq!(s.state.game_time, 0.0);

        s.resume();
        assert!(!s.is_idle());
        s.step(&TickInput::default(), 1.0);
        assert_eq!(s.state.game_time, 1.0);
    }

    #[test]
    fn test_resume_discards_game() {
        let mut s = session();
        s.step(&TickInput::default(), 2.0);
        s.suspend();
        s.resume();
        assert_eq!(s.state.game_time, 0.0);
    }

    #[test]
    fn test_non_finite_or_negative_dt_ignored() {
        let mut s = session();
        s.step(&TickInput::default(), -5.0);
        s.step(&TickInput::default(), f32::NAN);
        s.step(&TickInput::default(), f32::INFINITY);
        s.step(&TickInput::default(), f32::NEG_INFINITY);
        assert_eq!(s.state.game_time, 0.0);
        assert_eq!(s.store.player.pos, Vec2::new(50.0, 240.0));

        // Still able to fire afterwards
        s.step(&TickInput { shoot: true, ..Default::default() }, 0.2);
        assert_eq!(s.store.bullets.len(), 3);
    }

    #[test]
    fn test_infinite_dt_in_analog_session() {
        let mut s = Session::new(Arena::default(), Tuning::default(), InputMode::Analog, 42).unwrap();
        let idle = TickInput {
            movement: crate::input::Movement::Analog(Vec2::ZERO),
            shoot: false,
        };
        s.step(&idle, f32::INFINITY);
        assert_eq!(s.store.player.pos, Vec2::new(50.0, 240.0));
        assert!(s.state.game_time.is_finite());
    }

    #[test]
    fn test_scene_lists_every_entity() {
        let mut s = session();
        let enemy = s.atlas.spawn(EntityKind::Enemy, Vec2::new(300.0, 20.0));
        s.store.enemies.push(enemy);
        let boom = s.atlas.spawn(EntityKind::Explosion, Vec2::new(200.0, 20.0));
        s.store.explosions.push(boom);

        let scene = s.scene();
        assert_eq!(scene.background, ImageId::Terrain);
        assert_eq!(scene.arena_size, Vec2::new(512.0, 480.0));
        assert_eq!(scene.commands.len(), 3);
        assert_eq!(scene.commands[0].pos, Vec2::new(50.0, 240.0));
        assert_eq!(scene.commands[0].src.w, 39.0);
    }

    #[test]
    fn test_player_hidden_on_game_over_by_default() {
        let mut s = session();
        kill_player(&mut s);
        let scene = s.scene();
        assert_eq!(scene.commands.len(), s.store.len());
        assert!(scene.commands.iter().all(|c| c.pos != s.store.player.pos || c.src.w != 39.0));
    }

    #[test]
    fn test_player_kept_on_game_over_when_configured() {
        let tuning = Tuning {
            hide_player_on_game_over: false,
            ..Default::default()
        };
        let mut s = Session::new(Arena::default(), tuning, InputMode::Digital, 42).unwrap();
        kill_player(&mut s);
        let scene = s.scene();
        assert_eq!(scene.commands[0].pos, s.store.player.pos);
    }
}
