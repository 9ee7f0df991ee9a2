//! Animation clips and the frame selector
//!
//! The selector derives a discrete state from the physics body every frame:
//! airborne is Jumping, zero speed is Idle, anything else is Running. Each
//! state picks frames its own way; a state change restarts the shared time
//! counter.

use std::collections::HashMap;

use thiserror::Error;

use super::player::Player;
use super::rect::Rect;
use crate::consts::{ANIM_FRAME_TIME, IDLE_BLINK_TICK, IDLE_CYCLE_TICKS};

/// Clip names the selector resolves at construction
pub const CLIP_FRONT: &str = "Front";
pub const CLIP_FRONT_BLINK: &str = "FrontBlink";
pub const CLIP_RUN: &str = "Run";
pub const CLIP_JUMP: &str = "Jump";

/// Named animation clips, each an ordered list of sheet-space frame rects
#[derive(Debug, Clone, Default)]
pub struct ClipSet {
    clips: HashMap<String, Vec<Rect>>,
}

impl ClipSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a clip; a duplicate name overwrites the earlier entry
    pub fn insert(&mut self, name: impl Into<String>, frames: Vec<Rect>) {
        self.clips.insert(name.into(), frames);
    }

    pub fn get(&self, name: &str) -> Option<&[Rect]> {
        self.clips.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

/// A clip the selector needs is absent or has no frames
#[derive(Debug, Error)]
#[error("animation clip {0:?} is missing or empty")]
pub struct MissingClip(pub &'static str);

/// Discrete animation state, recomputed from physics every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimState {
    Idle,
    Running,
    Jumping,
}

/// Horizontal facing, held across frames with no x velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

/// Per-frame animation selector
#[derive(Debug, Clone)]
pub struct Animator {
    front: Rect,
    blink: Rect,
    run: Vec<Rect>,
    jump: Vec<Rect>,
    rate: f32,
    state: AnimState,
    counter: f32,
    facing: Facing,
    frame: Rect,
}

fn clip(clips: &ClipSet, name: &'static str) -> Result<Vec<Rect>, MissingClip> {
    match clips.get(name) {
        Some(frames) if !frames.is_empty() => Ok(frames.to_vec()),
        _ => Err(MissingClip(name)),
    }
}

impl Animator {
    /// Resolve the four required clips up front. Idle uses the first frame
    /// of `Front` and `FrontBlink` even if those clips are longer.
    pub fn new(clips: &ClipSet) -> Result<Self, MissingClip> {
        let front = clip(clips, CLIP_FRONT)?[0];
        let blink = clip(clips, CLIP_FRONT_BLINK)?[0];
        Ok(Self {
            front,
            blink,
            run: clip(clips, CLIP_RUN)?,
            jump: clip(clips, CLIP_JUMP)?,
            rate: ANIM_FRAME_TIME,
            state: AnimState::Idle,
            counter: 0.0,
            facing: Facing::Right,
            frame: front,
        })
    }

    pub fn update(&mut self, dt: f32, player: &Player) {
        self.counter += dt;

        let next = if !player.grounded {
            AnimState::Jumping
        } else if player.vel.length() == 0.0 {
            AnimState::Idle
        } else {
            AnimState::Running
        };
        if next != self.state {
            self.state = next;
            self.counter = 0.0;
        }

        match self.state {
            AnimState::Idle => {
                let t = (self.counter / self.rate) as i64 % IDLE_CYCLE_TICKS;
                if t > IDLE_BLINK_TICK {
                    self.frame = self.blink;
                } else if t == 0 {
                    self.frame = self.front;
                }
                // Ticks in between hold the last frame: a long static pose
                // broken by a blink at the end of each cycle.
            }
            AnimState::Running => {
                let t = (self.counter / self.rate) as i64;
                self.frame = self.run[(t % self.run.len() as i64) as usize];
            }
            AnimState::Jumping => {
                // Map vertical velocity onto the clip: first frame at full
                // upward speed, last frame at full falling speed
                let t = (-player.vel.y / player.jump_speed + 1.0) / 2.0;
                let i = (t * self.jump.len() as f32) as i64;
                let i = i.clamp(0, self.jump.len() as i64 - 1) as usize;
                self.frame = self.jump[i];
            }
        }

        if player.vel.x > 0.0 {
            self.facing = Facing::Right;
        } else if player.vel.x < 0.0 {
            self.facing = Facing::Left;
        }
    }

    /// Current sheet-space frame rect
    #[inline]
    pub fn frame(&self) -> Rect {
        self.frame
    }

    #[inline]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    #[inline]
    pub fn state(&self) -> AnimState {
        self.state
    }
}
