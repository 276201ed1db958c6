//! Polled input
//!
//! The simulation never listens for events. The host feeds key and touch
//! events into one of the models below, and the step samples the resulting
//! state once per frame through [`InputSource`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Movement directions (screen space: up is -y)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// How the player is steered; fixed for the whole session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputMode {
    /// Keyboard-style on/off directions
    #[default]
    Digital,
    /// Joystick-style normalized deflection
    Analog,
}

/// Read-only view of the host's input state
pub trait InputSource {
    fn is_direction_active(&self, dir: Direction) -> bool;
    fn is_shoot_active(&self) -> bool;
    /// Normalized stick deflection, each axis in [-1, 1]
    fn deflection(&self) -> Vec2 {
        Vec2::ZERO
    }
}

/// Player steering for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Movement {
    Digital {
        up: bool,
        down: bool,
        left: bool,
        right: bool,
    },
    Analog(Vec2),
}

impl Default for Movement {
    fn default() -> Self {
        Movement::Digital {
            up: false,
            down: false,
            left: false,
            right: false,
        }
    }
}

impl Movement {
    /// Input mode this movement belongs to
    pub fn mode(&self) -> InputMode {
        match self {
            Movement::Digital { .. } => InputMode::Digital,
            Movement::Analog(_) => InputMode::Analog,
        }
    }

    /// Player displacement for this tick.
    ///
    /// Digital directions move at full speed on each axis independently, so
    /// diagonals are faster. The analog path damps each axis by the other's
    /// deflection: `dx = sx * speed * (2 - |sy|) * dt`.
    pub fn displacement(&self, speed: f32, dt: f32) -> Vec2 {
        match *self {
            Movement::Digital {
                up,
                down,
                left,
                right,
            } => {
                let step = speed * dt;
                let mut delta = Vec2::ZERO;
                if down {
                    delta.y += step;
                }
                if up {
                    delta.y -= step;
                }
                if left {
                    delta.x -= step;
                }
                if right {
                    delta.x += step;
                }
                delta
            }
            Movement::Analog(stick) => Vec2::new(
                stick.x * speed * (2.0 - stick.y.abs()) * dt,
                stick.y * speed * (2.0 - stick.x.abs()) * dt,
            ),
        }
    }
}

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub movement: Movement,
    pub shoot: bool,
}

impl TickInput {
    /// Sample an input source once, in the session's input mode
    pub fn sample(source: &impl InputSource, mode: InputMode) -> Self {
        let movement = match mode {
            InputMode::Digital => Movement::Digital {
                up: source.is_direction_active(Direction::Up),
                down: source.is_direction_active(Direction::Down),
                left: source.is_direction_active(Direction::Left),
                right: source.is_direction_active(Direction::Right),
            },
            InputMode::Analog => {
                let d = source.deflection();
                Movement::Analog(d.clamp(Vec2::splat(-1.0), Vec2::ONE))
            }
        };
        Self {
            movement,
            shoot: source.is_shoot_active(),
        }
    }
}

/// Keyboard action names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shoot,
    Move(Direction),
}

/// Map a `KeyboardEvent.key` value to an action
pub fn action_for_key(key: &str) -> Option<Action> {
    match key {
        " " => Some(Action::Shoot),
        "ArrowUp" | "w" => Some(Action::Move(Direction::Up)),
        "ArrowDown" | "s" => Some(Action::Move(Direction::Down)),
        "ArrowLeft" | "a" => Some(Action::Move(Direction::Left)),
        "ArrowRight" | "d" => Some(Action::Move(Direction::Right)),
        _ => None,
    }
}

/// Held keyboard actions
#[derive(Debug, Clone, Default)]
pub struct KeyboardInput {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    shoot: bool,
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press/release. Returns true if the key is bound.
    pub fn set_key(&mut self, key: &str, pressed: bool) -> bool {
        match action_for_key(key) {
            Some(action) => {
                self.set_action(action, pressed);
                true
            }
            None => false,
        }
    }

    pub fn set_action(&mut self, action: Action, active: bool) {
        match action {
            Action::Shoot => self.shoot = active,
            Action::Move(Direction::Up) => self.up = active,
            Action::Move(Direction::Down) => self.down = active,
            Action::Move(Direction::Left) => self.left = active,
            Action::Move(Direction::Right) => self.right = active,
        }
    }

    /// Window lost focus: key-up events will never arrive
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl InputSource for KeyboardInput {
    fn is_direction_active(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    fn is_shoot_active(&self) -> bool {
        self.shoot
    }
}

/// Virtual joystick state (the widget itself is drawn by the host)
#[derive(Debug, Clone)]
pub struct Joystick {
    /// Base centre in viewport pixels
    pub center: Vec2,
    /// Deflection at which an axis saturates
    pub radius: f32,
    offset: Vec2,
}

impl Joystick {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(1.0),
            offset: Vec2::ZERO,
        }
    }

    /// Only touches on the left half of the viewport steer
    pub fn accepts(&self, touch_x: f32, viewport_width: f32) -> bool {
        touch_x < viewport_width / 2.0
    }

    /// Touch start/move at viewport position
    pub fn touch(&mut self, pos: Vec2) {
        self.offset = pos - self.center;
    }

    /// Touch end recentres the stick
    pub fn release(&mut self) {
        self.offset = Vec2::ZERO;
    }

    pub fn deflection(&self) -> Vec2 {
        (self.offset / self.radius).clamp(Vec2::splat(-1.0), Vec2::ONE)
    }
}

/// Touch controls: joystick for steering plus a fire button.
///
/// Each finger is followed by its touch identifier, so a finger keeps the
/// role it started with wherever it moves or lifts.
#[derive(Debug, Clone)]
pub struct TouchInput {
    pub joystick: Joystick,
    shoot: bool,
    steer_id: Option<i32>,
    fire_id: Option<i32>,
}

impl TouchInput {
    pub fn new(joystick: Joystick) -> Self {
        Self {
            joystick,
            shoot: false,
            steer_id: None,
            fire_id: None,
        }
    }

    /// Driven by the on-screen fire button
    pub fn set_shoot(&mut self, active: bool) {
        self.shoot = active;
    }

    /// New finger down. Left half steers (one finger at a time), anything
    /// else presses fire.
    pub fn touch_start(&mut self, id: i32, pos: Vec2, viewport_width: f32) {
        if self.steer_id.is_none() && self.joystick.accepts(pos.x, viewport_width) {
            self.steer_id = Some(id);
            self.joystick.touch(pos);
        } else if self.steer_id != Some(id) {
            self.fire_id = Some(id);
            self.set_shoot(true);
        }
    }

    /// Finger moved. Only the steering finger affects the stick.
    pub fn touch_move(&mut self, id: i32, pos: Vec2) {
        if self.steer_id == Some(id) {
            self.joystick.touch(pos);
        }
    }

    /// Finger lifted or cancelled
    pub fn touch_end(&mut self, id: i32) {
        if self.steer_id == Some(id) {
            self.steer_id = None;
            self.joystick.release();
        }
        if self.fire_id == Some(id) {
            self.fire_id = None;
            self.set_shoot(false);
        }
    }

    /// Drop every tracked finger
    pub fn clear(&mut self) {
        self.joystick.release();
        self.steer_id = None;
        self.fire_id = None;
        self.shoot = false;
    }
}

impl InputSource for TouchInput {
    fn is_direction_active(&self, _dir: Direction) -> bool {
        false
    }

    fn is_shoot_active(&self) -> bool {
        self.shoot
    }

    fn deflection(&self) -> Vec2 {
        self.joystick.deflection()
    }
}
