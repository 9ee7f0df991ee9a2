//! Scene composition over an abstract draw surface
//!
//! The simulation never touches a backend. [`draw_scene`] walks the state
//! and issues world-space commands against a [`Canvas`]; backends decide
//! how (and whether) to rasterize them. [`RecordingCanvas`] captures the
//! command stream for headless tests.

use glam::Vec2;

use crate::assets::SpriteSheet;
use crate::sim::anim::Facing;
use crate::sim::color::Rgba;
use crate::sim::rect::Rect;
use crate::sim::state::GameState;

/// Drawing capability consumed by the scene.
///
/// Coordinates are world units: origin at the arena center, y up.
pub trait Canvas {
    /// Fill the whole surface
    fn clear(&mut self, color: Rgba);
    /// Axis-aligned filled rectangle
    fn draw_rect(&mut self, rect: Rect, color: Rgba);
    /// Filled disc
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    /// Blit `frame` (sheet pixels, origin top-left) into the world-space
    /// `dest` rect, optionally mirrored horizontally
    fn draw_sprite(&mut self, sheet: &SpriteSheet, frame: Rect, dest: Rect, flip_x: bool);
    /// One-line HUD text; backends may ignore it
    fn status(&mut self, _line: &str) {}
    /// Push the finished frame to the output
    fn present(&mut self) -> std::io::Result<()>;
}

/// Draw one frame: platforms, then the goal halo, then the player on top
pub fn draw_scene(canvas: &mut impl Canvas, state: &GameState, sheet: &SpriteSheet) {
    canvas.clear(Rgba::BLACK);

    for platform in state.platforms.iter() {
        canvas.draw_rect(platform.rect, platform.color);
    }

    // Trail discs nest largest-first so the newest color lands on top
    let rings = state.goal.trail.len() as f32;
    for (i, color) in state.goal.trail.iter().enumerate().rev() {
        let radius = (i + 1) as f32 * state.goal.radius / rings;
        canvas.draw_circle(state.goal.pos, radius, *color);
    }

    canvas.draw_sprite(
        sheet,
        state.anim.frame(),
        state.player.rect,
        state.anim.facing() == Facing::Left,
    );
}

/// One captured draw command
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(Rgba),
    Rect(Rect, Rgba),
    Circle(Vec2, f32, Rgba),
    Sprite { frame: Rect, dest: Rect, flip_x: bool },
    Status(String),
    Present,
}

/// Canvas that records commands instead of rasterizing
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCmd>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, color: Rgba) {
        self.commands.clear();
        self.commands.push(DrawCmd::Clear(color));
    }

    fn draw_rect(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(DrawCmd::Rect(rect, color));
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCmd::Circle(center, radius, color));
    }

    fn draw_sprite(&mut self, _sheet: &SpriteSheet, frame: Rect, dest: Rect, flip_x: bool) {
        self.commands.push(DrawCmd::Sprite { frame, dest, flip_x });
    }

    fn status(&mut self, line: &str) {
        self.commands.push(DrawCmd::Status(line.to_string()));
    }

    fn present(&mut self) -> std::io::Result<()> {
        self.commands.push(DrawCmd::Present);
        Ok(())
    }
}
