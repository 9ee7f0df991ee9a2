//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time arrives as an explicit dt parameter
//! - Seeded RNG only
//! - Stable platform pool order (survivors first, newest last)
//! - No rendering, input, or clock dependencies

pub mod anim;
pub mod clock;
pub mod color;
pub mod goal;
pub mod platform;
pub mod player;
pub mod rect;
pub mod state;
pub mod tick;

pub use anim::{AnimState, Animator, ClipSet, Facing, MissingClip};
pub use clock::ScrollClock;
pub use color::{Rgba, random_nice_color};
pub use goal::Goal;
pub use platform::{Platform, PlatformField};
pub use player::Player;
pub use rect::Rect;
pub use state::{GameState, SimEvent};
pub use tick::{TickInput, tick};
