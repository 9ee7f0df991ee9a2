//! Plummet - an endless-descent platformer for the terminal
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, platforms, goal, animation)
//! - `assets`: Sprite sheet and clip descriptor loading
//! - `render`: Abstract draw surface and scene composition
//! - `term`: Crossterm backend (half-block pixels, keyboard input)
//! - `app`: Frame loop driving the simulation against a backend

pub mod app;
pub mod assets;
pub mod render;
pub mod settings;
pub mod sim;
pub mod term;

pub use settings::Settings;

use crate::sim::rect::Rect;
use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use super::{Rect, Vec2};

    /// World view dimensions (world units, origin centered, +y up)
    pub const VIEW_W: f32 = 320.0;
    pub const VIEW_H: f32 = 240.0;
    /// Soft horizontal bound for the player (right edge tested on both sides)
    pub const ARENA_HALF_W: f32 = 160.0;
    /// Residual velocity at the arena edge, keeps the run animation alive
    pub const EDGE_CREEP: f32 = 1e-6;

    /// Player physics
    pub const GRAVITY: f32 = -512.0;
    pub const RUN_SPEED: f32 = 64.0;
    pub const JUMP_SPEED: f32 = 240.0;
    pub const PLAYER_SPAWN: Rect = Rect::new(-6.0, 40.0, 6.0, 54.0);

    /// World scroll: accelerates by dt per frame until the cap
    pub const SCROLL_SPEED_START: f32 = 20.0;
    pub const SCROLL_SPEED_MAX: f32 = 45.0;
    /// Wall-clock divisor while the slow-motion key is held
    pub const SLOW_MOTION_DIVISOR: f32 = 8.0;

    /// Seconds per animation tick
    pub const ANIM_FRAME_TIME: f32 = 1.0 / 10.0;
    /// Idle pattern length in ticks; ticks past the blink threshold blink
    pub const IDLE_CYCLE_TICKS: i64 = 40;
    pub const IDLE_BLINK_TICK: i64 = 38;

    /// Platforms scrolled below this top edge are recycled
    pub const PLATFORM_RECYCLE_Y: f32 = -128.0;
    /// Recycled platforms spawn in this band, just above the view
    pub const PLATFORM_SPAWN_BOTTOM: f32 = 120.0;
    pub const PLATFORM_SPAWN_TOP: f32 = 122.0;
    pub const PLATFORM_SPAWN_W: f32 = 80.0;
    /// Integer horizontal offsets 0..SPAN added to the leftmost spawn x
    pub const PLATFORM_SPAWN_X: f32 = -160.0;
    pub const PLATFORM_SPAWN_SPAN: u32 = 240;

    /// Goal marker
    pub const GOAL_RADIUS: f32 = 5.0;
    pub const GOAL_PULSE_STEP: f32 = 1.0 / 7.0;
    pub const GOAL_TRAIL_LEN: usize = 5;
    /// Goal whose top edge scrolls below this respawns
    pub const GOAL_DESPAWN_Y: f32 = -120.0;
    /// Respawn height above the newest platform's top
    pub const GOAL_SPAWN_CLEARANCE: f32 = 10.0;
    pub const GOAL_SPAWN: Vec2 = Vec2::new(5.0, 92.0);

    /// Sprite sheet frame width in pixels
    pub const FRAME_WIDTH: f32 = 12.0;
}
