//! World scroll speed and time scaling
//!
//! One clock per simulation. Every scrolling entity reads the same speed
//! each frame; only `advance` writes it.

use crate::consts::{SCROLL_SPEED_MAX, SCROLL_SPEED_START, SLOW_MOTION_DIVISOR};

/// Shared downward scroll rate, accelerating over the course of a run
#[derive(Debug, Clone, Copy)]
pub struct ScrollClock {
    speed: f32,
}

impl Default for ScrollClock {
    fn default() -> Self {
        Self {
            speed: SCROLL_SPEED_START,
        }
    }
}

impl ScrollClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scale a measured wall-clock delta. Applied before `advance`, so slow
    /// motion also slows the speed ramp.
    #[inline]
    pub fn scale_dt(raw_dt: f32, slow_motion: bool) -> f32 {
        if slow_motion {
            raw_dt / SLOW_MOTION_DIVISOR
        } else {
            raw_dt
        }
    }

    /// Accelerate by dt while below the cap. The final increment may land
    /// marginally above the cap; growth then stops.
    pub fn advance(&mut self, dt: f32) {
        if self.speed < SCROLL_SPEED_MAX {
            self.speed += dt;
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }
}
