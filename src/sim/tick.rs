//! Simulation step
//!
//! One call per rendered frame with the measured frame time. The order of
//! the phases matters: culled entities never collide, and newly spawned
//! enemies are hit-tested in the same tick they appear.

use glam::Vec2;

use super::collision::resolve_collisions;
use super::entity::{BulletDirection, EntityKind, clamp_to_arena};
use super::session::Session;
use super::spawner;
use super::state::{Atlas, EntityStore};
use crate::input::TickInput;

/// Advance the session by `dt` seconds
pub fn tick(session: &mut Session, input: &TickInput, dt: f32) {
    let Session {
        state,
        store,
        arena,
        tuning,
        atlas,
        rng,
        input_mode,
        ..
    } = session;
    let arena_size = arena.size();

    state.game_time += dt;

    if !state.is_over {
        // Steer, then keep the whole sprite on screen. The input mode is
        // fixed per session; movement of the other kind is ignored.
        if input.movement.mode() == *input_mode {
            let delta = input.movement.displacement(state.player_speed, dt);
            let player = &mut store.player;
            player.pos = clamp_to_arena(player.pos + delta, player.sprite.size, arena_size);
        } else {
            log::warn!(
                "Ignoring {:?} movement in a {:?} session",
                input.movement.mode(),
                input_mode
            );
        }

        let now = state.now_ms();
        if input.shoot && now - state.last_fire_ms > state.bullet_cadence_ms {
            fire_volley(store, atlas);
            state.last_fire_ms = now;
        }
    }

    store.advance(dt, state.bullet_speed, state.enemy_speed);
    store.cull(arena_size);

    // Once the game is over the world only drifts and finishes animating
    if state.is_over {
        return;
    }

    let spawned = spawner::run(state, store, atlas, arena, tuning, rng);
    if spawned.enemy {
        log::debug!("Enemy spawned ({} on screen)", store.enemies.len());
    }

    let report = resolve_collisions(state, store, atlas, tuning);
    if report.player_hit {
        log::info!(
            "Game over at {:.1}s with score {}",
            state.game_time,
            state.score
        );
    }
}

/// Three bullets from the player's centre: ahead, up and down
fn fire_volley(store: &mut EntityStore, atlas: &Atlas) {
    let origin: Vec2 = store.player.center();
    for direction in [
        BulletDirection::Forward,
        BulletDirection::Up,
        BulletDirection::Down,
    ] {
        store
            .bullets
            .push(atlas.spawn(EntityKind::Bullet(direction), origin));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputMode, Movement};
    use crate::sim::state::Arena;
    use crate::tuning::Tuning;

    const DT: f32 = 1.0 / 60.0;

    fn session() -> Session {
        Session::new(Arena::default(), Tuning::default(), InputMode::Digital, 12345).unwrap()
    }

    /// Session whose spawner practically never fires
    fn quiet_session() -> Session {
        let tuning = Tuning {
            spawn_base: 0.999_999_9,
            ..Default::default()
        };
        Session::new(Arena::default(), tuning, InputMode::Digital, 12345).unwrap()
    }

    fn held(up: bool, down: bool, left: bool, right: bool) -> TickInput {
        TickInput {
            movement: Movement::Digital {
                up,
                down,
                left,
                right,
            },
            shoot: false,
        }
    }

    fn shooting() -> TickInput {
        TickInput {
            shoot: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_game_time_advances() {
        let mut s = quiet_session();
        tick(&mut s, &TickInput::default(), 0.25);
        tick(&mut s, &TickInput::default(), 0.5);
        assert_eq!(s.state.game_time, 0.75);
    }

    #[test]
    fn test_digital_movement_and_clamp() {
        let mut s = quiet_session();
        tick(&mut s, &held(false, false, false, true), 0.5);
        assert_eq!(s.store.player.pos, Vec2::new(150.0, 240.0));

        // A huge step pins the player to the corner
        tick(&mut s, &held(true, false, true, false), 100.0);
        assert_eq!(s.store.player.pos, Vec2::ZERO);

        tick(&mut s, &held(false, true, false, true), 100.0);
        assert_eq!(s.store.player.pos, Vec2::new(512.0 - 39.0, 480.0 - 39.0));
    }

    #[test]
    fn test_analog_movement() {
        let mut s = Session::new(
            Arena::default(),
            Tuning {
                spawn_base: 0.999_999_9,
                ..Default::default()
            },
            InputMode::Analog,
            1,
        )
        .unwrap();
        let input = TickInput {
            movement: Movement::Analog(Vec2::new(0.5, 0.0)),
            shoot: false,
        };
        tick(&mut s, &input, 0.1);
        // 0.5 * 200 * (2 - 0) * 0.1
        assert!((s.store.player.pos.x - 70.0).abs() < 1e-4);
        assert_eq!(s.store.player.pos.y, 240.0);
    }

    #[test]
    fn test_movement_of_other_mode_ignored() {
        let mut s = quiet_session();
        let analog = TickInput {
            movement: Movement::Analog(Vec2::new(1.0, 0.0)),
            shoot: false,
        };
        tick(&mut s, &analog, 0.1);
        assert_eq!(s.store.player.pos, Vec2::new(50.0, 240.0));

        let mut a = Session::new(
            Arena::default(),
            Tuning {
                spawn_base: 0.999_999_9,
                ..Default::default()
            },
            InputMode::Analog,
            1,
        )
        .unwrap();
        tick(&mut a, &held(false, false, false, true), 0.1);
        assert_eq!(a.store.player.pos, Vec2::new(50.0, 240.0));
    }

    #[test]
    fn test_volley_spawns_three_bullets_from_centre() {
        let mut s = quiet_session();
        tick(&mut s, &shooting(), 0.2);

        let bullets = &s.store.bullets;
        assert_eq!(bullets.len(), 3);
        let kinds: Vec<EntityKind> = bullets.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EntityKind::Bullet(BulletDirection::Forward),
                EntityKind::Bullet(BulletDirection::Up),
                EntityKind::Bullet(BulletDirection::Down),
            ]
        );
        assert_eq!(s.state.last_fire_ms, 200.0);

        // Spawned at (69.5, 259.5), then moved 500 * 0.2 along their axes
        assert_eq!(bullets[0].pos, Vec2::new(169.5, 259.5));
        assert_eq!(bullets[1].pos, Vec2::new(69.5, 159.5));
        assert_eq!(bullets[2].pos, Vec2::new(69.5, 359.5));
    }

    #[test]
    fn test_cadence_limits_fire_rate() {
        let mut s = quiet_session();
        tick(&mut s, &shooting(), 0.2);
        assert_eq!(s.store.bullets.len(), 3);

        // 100ms later: still cooling down
        tick(&mut s, &shooting(), 0.1);
        assert_eq!(s.store.bullets.len(), 3);

        // 200ms after the first volley: fires again
        tick(&mut s, &shooting(), 0.1);
        assert_eq!(s.store.bullets.len(), 6);
    }

    #[test]
    fn test_no_fire_before_cadence_elapsed_at_start() {
        let mut s = quiet_session();
        tick(&mut s, &shooting(), 0.1);
        assert!(s.store.bullets.is_empty());
    }

    #[test]
    fn test_up_bullet_culled_regardless_of_dt() {
        for dt in [1e-6, DT, 5.0] {
            let mut s = quiet_session();
            let bullet = s
                .atlas
                .spawn(EntityKind::Bullet(BulletDirection::Up), Vec2::new(100.0, -1.0));
            s.store.bullets.push(bullet);
            tick(&mut s, &TickInput::default(), dt);
            assert!(s.store.bullets.is_empty(), "bullet survived dt={}", dt);
        }
    }

    #[test]
    fn test_enemy_leaves_left_edge() {
        let mut s = quiet_session();
        let enemy = s.atlas.spawn(EntityKind::Enemy, Vec2::new(-80.0, 10.0));
        s.store.enemies.push(enemy);
        tick(&mut s, &TickInput::default(), 0.1);
        assert!(s.store.enemies.is_empty());
    }

    #[test]
    fn test_explosion_removed_when_done() {
        let mut s = quiet_session();
        let boom = s.atlas.spawn(EntityKind::Explosion, Vec2::new(300.0, 10.0));
        s.store.explosions.push(boom);
        for _ in 0..12 {
            tick(&mut s, &TickInput::default(), 0.1);
        }
        assert_eq!(s.store.explosions.len(), 1);
        tick(&mut s, &TickInput::default(), 0.1);
        assert!(s.store.explosions.is_empty());
    }

    #[test]
    fn test_bullet_hits_enemy_during_step() {
        let mut s = quiet_session();
        let enemy = s.atlas.spawn(EntityKind::Enemy, Vec2::new(300.0, 100.0));
        s.store.enemies.push(enemy);
        let bullet = s
            .atlas
            .spawn(EntityKind::Bullet(BulletDirection::Forward), Vec2::new(290.0, 110.0));
        s.store.bullets.push(bullet);

        tick(&mut s, &TickInput::default(), DT);

        assert!(s.store.enemies.is_empty());
        assert!(s.store.bullets.is_empty());
        assert_eq!(s.store.explosions.len(), 1);
        assert_eq!(s.state.score, 100);
    }

    #[test]
    fn test_game_over_freezes_player_and_score() {
        let mut s = quiet_session();
        let p = s.store.player.pos;
        let enemy = s.atlas.spawn(EntityKind::Enemy, p);
        s.store.enemies.push(enemy);

        tick(&mut s, &TickInput::default(), DT);
        assert!(s.state.is_over);

        let frozen_pos = s.store.player.pos;
        let frozen_score = s.state.score;
        let input = TickInput {
            movement: Movement::Digital {
                up: false,
                down: true,
                left: false,
                right: true,
            },
            shoot: true,
        };
        for _ in 0..120 {
            tick(&mut s, &input, DT);
        }
        assert!(s.state.is_over);
        assert_eq!(s.store.player.pos, frozen_pos);
        assert_eq!(s.state.score, frozen_score);
        assert!(s.store.bullets.is_empty());
    }

    #[test]
    fn test_nothing_spawns_after_game_over() {
        let mut s = session();
        s.state.game_time = 10_000.0;
        s.state.is_over = true;
        for _ in 0..100 {
            tick(&mut s, &TickInput::default(), DT);
        }
        assert!(s.store.enemies.is_empty());
    }

    #[test]
    fn test_long_run_keeps_invariants() {
        let mut s = session();
        let input = TickInput {
            movement: Movement::Digital {
                up: false,
                down: false,
                left: false,
                right: false,
            },
            shoot: true,
        };
        let mut last_cadence = s.state.bullet_cadence_ms;
        for frame in 0..(60 * 120) {
            // Alternate frame pacing between fast and slow
            let dt = if frame % 7 == 0 { 0.1 } else { 0.008 };
            tick(&mut s, &input, dt);
            assert_eq!(s.state.score % 100, 0);
            assert!(s.state.bullet_cadence_ms <= last_cadence);
            assert!(s.state.bullet_cadence_ms >= 10.0);
            last_cadence = s.state.bullet_cadence_ms;

            let p = s.store.player.pos;
            assert!(p.x >= 0.0 && p.x <= 512.0 - 39.0);
            assert!(p.y >= 0.0 && p.y <= 480.0 - 39.0);
            if s.state.is_over {
                break;
            }
        }
        assert!(s.state.game_time > 0.0);
    }

    #[test]
    fn test_determinism() {
        let mut a = session();
        let mut b = session();
        let inputs = [
            held(true, false, false, false),
            shooting(),
            held(false, true, false, true),
            TickInput::default(),
        ];
        for i in 0..3000 {
            let input = &inputs[i % inputs.len()];
            tick(&mut a, input, DT);
            tick(&mut b, input, DT);
        }
        assert_eq!(a.state, b.state);
        assert_eq!(a.store, b.store);
    }
}
