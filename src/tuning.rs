//! Game balance values
//!
//! None of these numbers has a derivation; they are the values the game was
//! tuned with. Hosts may override them from JSON.

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Tunable constants for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Difficulty ===
    /// Per-tick enemy spawn chance is `1 - spawn_base^game_time`
    pub spawn_base: f32,

    // === Speeds (pixels/sec) ===
    pub player_speed: f32,
    pub bullet_speed: f32,
    pub enemy_speed: f32,

    // === Fire cadence (ms) ===
    /// Minimum gap between volleys at session start
    pub initial_cadence_ms: f32,
    /// Cadence never drops below this
    pub cadence_floor_ms: f32,
    /// Cadence reduction per bonus pickup
    pub cadence_step_ms: f32,

    // === Scoring ===
    /// Score per destroyed enemy
    pub kill_score: u64,
    /// A bonus may appear each time score lands on a multiple of this
    pub bonus_score_interval: u64,
    /// Chance per tick that an eligible bonus actually spawns
    pub bonus_chance: f32,
    /// A bonus pickup leaves `round(count / divisor)` enemies alive
    pub bonus_keep_divisor: f32,

    // === Presentation ===
    /// Leave the player out of the draw list once the game is over
    pub hide_player_on_game_over: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_base: 0.993,

            player_speed: 200.0,
            bullet_speed: 500.0,
            enemy_speed: 100.0,

            initial_cadence_ms: 180.0,
            cadence_floor_ms: 10.0,
            cadence_step_ms: 5.0,

            kill_score: 100,
            bonus_score_interval: 500,
            bonus_chance: 0.025,
            bonus_keep_divisor: 3.0,

            hide_player_on_game_over: true,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (missing fields take defaults) and validate it
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    /// Reject values that would break the simulation's invariants
    pub fn validate(&self) -> Result<(), SimError> {
        let positive = [
            ("player_speed", self.player_speed),
            ("bullet_speed", self.bullet_speed),
            ("enemy_speed", self.enemy_speed),
            ("initial_cadence_ms", self.initial_cadence_ms),
            ("cadence_floor_ms", self.cadence_floor_ms),
            ("bonus_keep_divisor", self.bonus_keep_divisor),
        ];
        for (name, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(SimError::InvalidTuning { name, value });
            }
        }

        if !(self.cadence_step_ms >= 0.0) {
            return Err(SimError::InvalidTuning {
                name: "cadence_step_ms",
                value: self.cadence_step_ms,
            });
        }
        if self.initial_cadence_ms < self.cadence_floor_ms {
            return Err(SimError::InvalidTuning {
                name: "initial_cadence_ms",
                value: self.initial_cadence_ms,
            });
        }
        // Base must be in (0, 1) for the spawn curve to rise toward 1
        if !(self.spawn_base > 0.0 && self.spawn_base < 1.0) {
            return Err(SimError::InvalidTuning {
                name: "spawn_base",
                value: self.spawn_base,
            });
        }
        if !(0.0..=1.0).contains(&self.bonus_chance) {
            return Err(SimError::InvalidTuning {
                name: "bonus_chance",
                value: self.bonus_chance,
            });
        }
        if self.kill_score == 0 {
            return Err(SimError::InvalidTuning {
                name: "kill_score",
                value: 0.0,
            });
        }
        if self.bonus_score_interval == 0 {
            return Err(SimError::InvalidTuning {
                name: "bonus_score_interval",
                value: 0.0,
            });
        }
        Ok(())
    }
}
