//! Sprite-sheet animation
//!
//! A sprite steps through a list of frame indices on a fixed frame duration.
//! It is a plain value advanced by `update(dt)`; nothing subscribes to it.
//! One-shot sprites stop on their last frame and report `done`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::render::{FrameRect, ImageId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub image: ImageId,
    /// Top-left of frame 0 on the sheet
    pub origin: Vec2,
    /// Frame size, also the entity's hitbox
    pub size: Vec2,
    /// Frame indices to show, in order
    frames: Vec<usize>,
    frame_duration: f32,
    cursor: usize,
    elapsed: f32,
    one_shot: bool,
    done: bool,
}

impl Sprite {
    /// Build a sprite. `name` is only used in error messages.
    pub fn new(
        name: &'static str,
        image: ImageId,
        origin: Vec2,
        size: Vec2,
        frame_duration: f32,
        frames: Vec<usize>,
        one_shot: bool,
    ) -> Result<Self, SimError> {
        if frames.is_empty() {
            return Err(SimError::EmptyAnimation { sprite: name });
        }
        if !(frame_duration > 0.0) {
            return Err(SimError::NonPositiveFrameDuration {
                sprite: name,
                value: frame_duration,
            });
        }
        Ok(Self {
            image,
            origin,
            size,
            frames,
            frame_duration,
            cursor: 0,
            elapsed: 0.0,
            one_shot,
            done: false,
        })
    }

    /// Sprite with one frame forever
    pub fn still(
        name: &'static str,
        image: ImageId,
        origin: Vec2,
        size: Vec2,
    ) -> Result<Self, SimError> {
        Self::new(name, image, origin, size, 1.0, vec![0], false)
    }

    /// Advance the animation clock. Once the current frame has been shown
    /// for longer than the frame duration, move to the next frame.
    pub fn update(&mut self, dt: f32) {
        if self.done {
            return;
        }
        self.elapsed += dt;
        if self.elapsed <= self.frame_duration {
            return;
        }
        self.elapsed = 0.0;

        let last = self.frames.len() - 1;
        if self.cursor < last {
            self.cursor += 1;
        } else if self.one_shot {
            self.done = true;
        } else {
            self.cursor = 0;
        }
    }

    /// One-shot animation has played through
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Index into `frames` currently shown
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Sheet frame index currently shown
    pub fn current_frame(&self) -> usize {
        self.frames[self.cursor]
    }

    /// Source rectangle of the current frame. Frames run left to right.
    pub fn frame_rect(&self) -> FrameRect {
        FrameRect {
            x: self.origin.x + self.current_frame() as f32 * self.size.x,
            y: self.origin.y,
            w: self.size.x,
            h: self.size.y,
        }
    }
}
