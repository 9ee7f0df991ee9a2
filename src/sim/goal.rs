//! Pulsing goal marker
//!
//! A single orb scrolls with the world. Its halo is an aging ring of five
//! colors: each pulse shifts every slot back one and draws a fresh color
//! into slot 0, so the newest color sits at the center when drawn.

use glam::Vec2;
use rand::Rng;

use super::color::{Rgba, random_nice_color};
use super::platform::Platform;
use super::rect::Rect;
use crate::consts::{
    GOAL_PULSE_STEP, GOAL_RADIUS, GOAL_SPAWN_CLEARANCE, GOAL_TRAIL_LEN,
};

/// The score orb with its trailing color halo
#[derive(Debug, Clone)]
pub struct Goal {
    pub pos: Vec2,
    pub radius: f32,
    /// Seconds between color pulses
    pub step: f32,
    counter: f32,
    /// Aging color history, newest in slot 0
    pub trail: [Rgba; GOAL_TRAIL_LEN],
}

impl Goal {
    /// A fresh goal: zeroed pulse counter, transparent trail
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: GOAL_RADIUS,
            step: GOAL_PULSE_STEP,
            counter: 0.0,
            trail: [Rgba::TRANSPARENT; GOAL_TRAIL_LEN],
        }
    }

    /// Fresh goal centered above a platform's top surface
    pub fn above(platform: &Platform) -> Self {
        let center_x = (platform.rect.min.x + platform.rect.max.x) / 2.0;
        Self::new(Vec2::new(
            center_x,
            platform.rect.max.y + GOAL_SPAWN_CLEARANCE,
        ))
    }

    /// Scroll with the world and advance the color pulse. A long frame may
    /// run several pulses.
    pub fn update<R: Rng>(&mut self, dt: f32, scroll_speed: f32, rng: &mut R) {
        self.counter += dt;
        self.pos.y -= dt * scroll_speed;
        while self.counter > self.step {
            self.counter -= self.step;
            for i in (0..self.trail.len() - 1).rev() {
                self.trail[i + 1] = self.trail[i];
            }
            self.trail[0] = random_nice_color(rng);
        }
    }

    /// Top edge in world space
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y + self.radius
    }

    /// Square around the orb, the capture test area
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.pos.x - self.radius,
            self.pos.y - self.radius,
            self.pos.x + self.radius,
            self.pos.y + self.radius,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_new_goal_is_dark() {
        let goal = Goal::new(Vec2::new(5.0, 92.0));
        assert_eq!(goal.radius, GOAL_RADIUS);
        assert_eq!(goal.step, GOAL_PULSE_STEP);
        assert!(goal.trail.iter().all(|c| *c == Rgba::TRANSPARENT));
    }

    #[test]
    fn test_scrolls_with_the_world() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut goal = Goal::new(Vec2::new(5.0, 92.0));
        goal.update(0.5, 40.0, &mut rng);
        assert_eq!(goal.pos.y, 92.0 - 20.0);
        assert_eq!(goal.pos.x, 5.0);
    }

    #[test]
    fn test_pulse_ages_the_trail() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut goal = Goal::new(Vec2::ZERO);

        goal.update(goal.step * 1.5, 0.0, &mut rng);
        let first = goal.trail[0];
        assert_ne!(first, Rgba::TRANSPARENT);
        assert_eq!(goal.trail[1], Rgba::TRANSPARENT);

        goal.update(goal.step, 0.0, &mut rng);
        assert_eq!(goal.trail[1], first);
        assert_ne!(goal.trail[0], first);
    }

    #[test]
    fn test_long_frame_runs_multiple_pulses() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut goal = Goal::new(Vec2::ZERO);
        goal.update(goal.step * 3.5, 0.0, &mut rng);
        // Three pulses fired, filling the three newest slots
        assert!(goal.trail[0] != Rgba::TRANSPARENT);
        assert!(goal.trail[1] != Rgba::TRANSPARENT);
        assert!(goal.trail[2] != Rgba::TRANSPARENT);
        assert_eq!(goal.trail[3], Rgba::TRANSPARENT);
    }

    #[test]
    fn test_above_centers_on_platform() {
        let platform = Platform {
            rect: Rect::new(70.0, 100.0, 160.0, 102.0),
            color: Rgba::BLACK,
        };
        let goal = Goal::above(&platform);
        assert_eq!(goal.pos, Vec2::new(115.0, 112.0));
        assert!(goal.trail.iter().all(|c| *c == Rgba::TRANSPARENT));
    }

    #[test]
    fn test_bounds_square() {
        let goal = Goal::new(Vec2::new(10.0, -4.0));
        assert_eq!(goal.bounds(), Rect::new(5.0, -9.0, 15.0, 1.0));
        assert_eq!(goal.top(), 1.0);
    }
}
