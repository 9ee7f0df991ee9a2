//! Per-frame simulation step
//!
//! `tick` advances a `GameState` by one frame: scale the wall delta, grow
//! the scroll speed, run the player physics against the pre-scroll
//! platforms, scroll the goal and the pool, then resolve the goal
//! lifecycle and pick the animation frame. Pure: the caller owns time,
//! input, and drawing.

use glam::Vec2;

use super::clock::ScrollClock;
use super::goal::Goal;
use super::state::{GameState, SimEvent};
use crate::consts::GOAL_DESPAWN_Y;

/// Control state for a single frame.
///
/// Run and slow motion are sampled key state; jump and restart are press
/// edges, true only on the frame the key went down.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Run left (held)
    pub left: bool,
    /// Run right (held)
    pub right: bool,
    /// Jump (just pressed)
    pub jump: bool,
    /// Stretch wall time by the slow-motion divisor (held)
    pub slow_motion: bool,
    /// Recenter the player (just pressed)
    pub restart: bool,
}

impl TickInput {
    /// Collapse the key state into the physics control vector
    pub fn control(&self) -> Vec2 {
        let mut ctrl = Vec2::ZERO;
        if self.left {
            ctrl.x -= 1.0;
        }
        if self.right {
            ctrl.x += 1.0;
        }
        if self.jump {
            ctrl.y = 1.0;
        }
        ctrl
    }
}

/// Advance the simulation by one frame of `raw_dt` wall seconds
pub fn tick(state: &mut GameState, input: &TickInput, raw_dt: f32) -> Vec<SimEvent> {
    let mut events = Vec::new();

    let dt = ScrollClock::scale_dt(raw_dt, input.slow_motion);
    state.clock.advance(dt);

    if input.restart {
        state.recenter_player();
        events.push(SimEvent::PlayerRecentered);
    }

    // Physics sees the platforms where they were drawn last frame; the
    // pool scrolls afterwards by the same amount as the player.
    let speed = state.clock.speed();
    state
        .player
        .update(dt, input.control(), state.platforms.as_slice(), speed);
    state.goal.update(dt, speed, &mut state.rng);
    state.platforms.update(dt, speed, &mut state.rng);

    // Goal lifecycle. A goal that has left the view respawns without
    // scoring, even if it still overlaps the player.
    if state.goal.top() < GOAL_DESPAWN_Y {
        state.goal = Goal::above(state.platforms.newest());
    } else if state.goal.bounds().intersects(&state.player.rect) {
        state.score += 1;
        events.push(SimEvent::GoalCollected {
            score: state.score,
        });
        state.goal = Goal::above(state.platforms.newest());
    }

    state.anim.update(dt, &state.player);

    events
}
