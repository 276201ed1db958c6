//! Draw-list export
//!
//! The simulation paints nothing. Each frame it hands the host a [`Scene`]:
//! one background pattern plus a flat list of sprite blits. Images are
//! named by [`ImageId`] and looked up through the host's [`ResourceProvider`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Pre-loaded images the simulation refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageId {
    /// Sprite sheet holding every entity animation
    Sprites,
    /// Tiled arena background
    Terrain,
}

impl ImageId {
    pub const ALL: [ImageId; 2] = [ImageId::Sprites, ImageId::Terrain];

    /// Asset path the host loads this image from
    pub fn path(&self) -> &'static str {
        match self {
            ImageId::Sprites => "img/sprites.png",
            ImageId::Terrain => "img/terrain.png",
        }
    }
}

/// Source rectangle inside an image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// One sprite blit: copy `src` from `image` to `pos` at native size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub image: ImageId,
    pub src: FrameRect,
    pub pos: Vec2,
}

/// Everything the host needs to paint one frame
#[derive(Debug, Clone)]
pub struct Scene {
    /// Image tiled (repeat pattern) across the arena
    pub background: ImageId,
    pub arena_size: Vec2,
    pub commands: Vec<DrawCommand>,
}

/// Host-side image cache. Loading must finish before the first frame.
pub trait ResourceProvider {
    type Handle;

    fn get(&self, id: ImageId) -> Option<&Self::Handle>;
}

/// Look up an image, treating a missing one as a broken precondition
pub fn resolve<P: ResourceProvider>(provider: &P, id: ImageId) -> Result<&P::Handle, SimError> {
    provider
        .get(id)
        .ok_or(SimError::ResourceNotLoaded { image: id })
}

impl<H> ResourceProvider for std::collections::HashMap<ImageId, H> {
    type Handle = H;

    fn get(&self, id: ImageId) -> Option<&H> {
        std::collections::HashMap::get(self, &id)
    }
}
