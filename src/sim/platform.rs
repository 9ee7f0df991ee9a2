//! Scrolling platform pool
//!
//! A fixed number of platforms scroll down uniformly; any platform whose
//! top edge leaves the recycle band is replaced by a fresh one spawned
//! above the view. Survivors keep their order and replacements append at
//! the back, so the last slot is always the newest platform.

use glam::Vec2;
use rand::Rng;

use super::color::{Rgba, random_nice_color};
use super::rect::Rect;
use crate::consts::{
    PLATFORM_RECYCLE_Y, PLATFORM_SPAWN_BOTTOM, PLATFORM_SPAWN_SPAN, PLATFORM_SPAWN_TOP,
    PLATFORM_SPAWN_W, PLATFORM_SPAWN_X,
};

/// One platform slab
#[derive(Debug, Clone)]
pub struct Platform {
    pub rect: Rect,
    pub color: Rgba,
}

impl Platform {
    /// A replacement platform in the spawn band, at a random integer x offset
    fn recycled<R: Rng>(rng: &mut R) -> Self {
        let r = rng.random_range(0..PLATFORM_SPAWN_SPAN) as f32;
        Self {
            rect: Rect::new(
                PLATFORM_SPAWN_X + r,
                PLATFORM_SPAWN_BOTTOM,
                PLATFORM_SPAWN_X + PLATFORM_SPAWN_W + r,
                PLATFORM_SPAWN_TOP,
            ),
            color: random_nice_color(rng),
        }
    }
}

/// The fixed-size rotating pool of platforms
#[derive(Debug, Clone)]
pub struct PlatformField {
    slots: Vec<Platform>,
}

impl PlatformField {
    /// Build the pool from level rects, coloring each slot in order
    pub fn from_rects<R: Rng>(rects: &[Rect], rng: &mut R) -> Self {
        let slots = rects
            .iter()
            .map(|&rect| Platform {
                rect,
                color: random_nice_color(rng),
            })
            .collect();
        Self { slots }
    }

    /// Scroll the whole pool down and recycle platforms that left the view.
    /// Single pass over the slots; the pool size never changes.
    pub fn update<R: Rng>(&mut self, dt: f32, scroll_speed: f32, rng: &mut R) {
        let drop = Vec2::new(0.0, -dt * scroll_speed);
        for p in &mut self.slots {
            p.rect = p.rect.translated(drop);
        }
        let len = self.slots.len();
        self.slots.retain(|p| p.rect.max.y >= PLATFORM_RECYCLE_Y);
        for _ in self.slots.len()..len {
            self.slots.push(Platform::recycled(rng));
        }
    }

    /// The most recently spawned platform, the goal's respawn anchor
    pub fn newest(&self) -> &Platform {
        self.slots.last().expect("platform pool is never empty")
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Platform> {
        self.slots.iter()
    }

    pub fn as_slice(&self) -> &[Platform] {
        &self.slots
    }
}
