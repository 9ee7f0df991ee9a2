//! Game state and the fixed level
//!
//! One `GameState` per run. Everything the frame tick mutates lives here,
//! including the seeded RNG, so independent simulations never share state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::anim::{Animator, ClipSet, MissingClip};
use super::clock::ScrollClock;
use super::goal::Goal;
use super::platform::PlatformField;
use super::player::Player;
use super::rect::Rect;
use crate::consts::GOAL_SPAWN;

/// The hardcoded level: platform rects in pool order, last slot is newest
pub const LEVEL: [Rect; 12] = [
    Rect::new(-170.0, -120.0, -120.0, -118.0),
    Rect::new(-170.0, -100.0, -120.0, -98.0),
    Rect::new(50.0, -80.0, 140.0, -78.0),
    Rect::new(-80.0, -60.0, -30.0, -58.0),
    Rect::new(-30.0, -40.0, 60.0, -38.0),
    Rect::new(-130.0, -20.0, -40.0, -18.0),
    Rect::new(10.0, 0.0, 100.0, 2.0),
    Rect::new(-120.0, 20.0, -20.0, 22.0),
    Rect::new(-20.0, 40.0, 70.0, 42.0),
    Rect::new(-70.0, 60.0, 20.0, 62.0),
    Rect::new(-40.0, 80.0, 50.0, 82.0),
    Rect::new(70.0, 100.0, 160.0, 102.0),
];

/// Things a tick wants the outer loop to know about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// The player reached the goal; carries the score after the increment
    GoalCollected { score: u32 },
    /// The rescue key dropped the player back at the origin
    PlayerRecentered,
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed, kept for reproducibility
    pub seed: u64,
    pub clock: ScrollClock,
    pub score: u32,
    pub player: Player,
    pub platforms: PlatformField,
    pub goal: Goal,
    pub anim: Animator,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Build a run from a seed and the loaded clips
    pub fn new(seed: u64, clips: &ClipSet) -> Result<Self, MissingClip> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let platforms = PlatformField::from_rects(&LEVEL, &mut rng);
        Ok(Self {
            seed,
            clock: ScrollClock::new(),
            score: 0,
            player: Player::new(),
            platforms,
            goal: Goal::new(GOAL_SPAWN),
            anim: Animator::new(clips)?,
            rng,
        })
    }

    /// Drop the player back at the origin with zero velocity. Score,
    /// platforms, goal, and scroll speed continue unchanged.
    pub fn recenter_player(&mut self) {
        let center = self.player.rect.center();
        self.player.rect = self.player.rect.translated(-center);
        self.player.vel = Vec2::ZERO;
    }
}
