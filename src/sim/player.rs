//! Player physics body
//!
//! One update per frame: horizontal control with a soft arena edge,
//! gravity integration, a swept landing check against the platform pool,
//! the jump impulse, and finally the shared world scroll.

use glam::Vec2;

use super::platform::Platform;
use super::rect::Rect;
use crate::consts::{ARENA_HALF_W, EDGE_CREEP, GRAVITY, JUMP_SPEED, PLAYER_SPAWN, RUN_SPEED};

/// The player's physics body
#[derive(Debug, Clone)]
pub struct Player {
    pub rect: Rect,
    pub vel: Vec2,
    pub grounded: bool,
    /// Downward acceleration, world units per second squared (negative)
    pub gravity: f32,
    pub run_speed: f32,
    pub jump_speed: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            rect: PLAYER_SPAWN,
            vel: Vec2::ZERO,
            grounded: false,
            gravity: GRAVITY,
            run_speed: RUN_SPEED,
            jump_speed: JUMP_SPEED,
        }
    }
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one frame. `ctrl.x` is the held run direction, `ctrl.y > 0`
    /// a just-pressed jump. Total: every input produces a defined next state.
    pub fn update(&mut self, dt: f32, ctrl: Vec2, platforms: &[Platform], scroll_speed: f32) {
        // Horizontal control. At the arena edge the speed collapses to a
        // creep instead of zero so the animation still reads as running.
        if ctrl.x < 0.0 {
            self.vel.x = if self.rect.max.x > -ARENA_HALF_W {
                -self.run_speed
            } else {
                -EDGE_CREEP
            };
        } else if ctrl.x > 0.0 {
            self.vel.x = if self.rect.max.x < ARENA_HALF_W {
                self.run_speed
            } else {
                EDGE_CREEP
            };
        } else {
            self.vel.x = 0.0;
        }

        // Integrate gravity and move
        self.vel.y += self.gravity * dt;
        self.rect = self.rect.translated(self.vel * dt);

        // Landing check, only while falling or resting. A platform matches
        // when it overlaps horizontally and its top lies within this frame's
        // vertical sweep of the body's bottom edge.
        self.grounded = false;
        if self.vel.y <= 0.0 {
            for p in platforms {
                if self.rect.max.x <= p.rect.min.x || self.rect.min.x >= p.rect.max.x {
                    continue;
                }
                if self.rect.min.y > p.rect.max.y
                    || self.rect.min.y < p.rect.max.y + self.vel.y * dt
                {
                    continue;
                }
                // Later platforms in the pass see the zeroed velocity, so
                // only an exactly level top can match again.
                self.vel.y = 0.0;
                self.rect = self
                    .rect
                    .translated(Vec2::new(0.0, p.rect.max.y - self.rect.min.y));
                self.grounded = true;
            }
        }

        if self.grounded && ctrl.y > 0.0 {
            self.vel.y = self.jump_speed;
        }

        // The whole world drifts down past the fixed camera
        self.rect = self.rect.translated(Vec2::new(0.0, -dt * scroll_speed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::color::Rgba;

    const DT: f32 = 1.0 / 60.0;

    fn platform(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Platform {
        Platform {
            rect: Rect::new(min_x, min_y, max_x, max_y),
            color: Rgba::BLACK,
        }
    }

    /// Player resting exactly on the platform's top surface
    fn resting_on(p: &Platform) -> Player {
        let mut player = Player::new();
        let over = p.rect.center().x - player.rect.center().x;
        let drop = p.rect.max.y - player.rect.min.y;
        player.rect = player.rect.translated(Vec2::new(over, drop));
        player.grounded = true;
        player
    }

    #[test]
    fn test_horizontal_control() {
        let mut player = Player::new();
        player.update(DT, Vec2::new(1.0, 0.0), &[], 0.0);
        assert_eq!(player.vel.x, RUN_SPEED);
        player.update(DT, Vec2::new(-1.0, 0.0), &[], 0.0);
        assert_eq!(player.vel.x, -RUN_SPEED);
        player.update(DT, Vec2::ZERO, &[], 0.0);
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_edge_creep_keeps_direction() {
        let mut player = Player::new();
        player.rect = Rect::new(150.0, 0.0, 162.0, 14.0);
        player.update(DT, Vec2::new(1.0, 0.0), &[], 0.0);
        assert_eq!(player.vel.x, EDGE_CREEP);

        let mut player = Player::new();
        player.rect = Rect::new(-172.0, 0.0, -160.0, 14.0);
        player.update(DT, Vec2::new(-1.0, 0.0), &[], 0.0);
        assert_eq!(player.vel.x, -EDGE_CREEP);
    }

    #[test]
    fn test_gravity_accumulates_in_freefall() {
        let mut player = Player::new();
        let y0 = player.rect.min.y;
        player.update(DT, Vec2::ZERO, &[], 0.0);
        assert_eq!(player.vel.y, GRAVITY * DT);
        assert!(player.rect.min.y < y0);
        assert!(!player.grounded);
    }

    #[test]
    fn test_collision_snap() {
        let p = platform(-20.0, -2.0, 20.0, 0.0);
        let mut player = Player::new();
        // Bottom just above the platform top; one frame's fall crosses it
        player.rect = Rect::new(-6.0, 0.05, 6.0, 14.05);
        player.update(DT, Vec2::ZERO, &[p.clone()], 0.0);
        assert_eq!(player.rect.min.y, p.rect.max.y);
        assert_eq!(player.vel.y, 0.0);
        assert!(player.grounded);
    }

    #[test]
    fn test_no_snap_while_moving_up() {
        let p = platform(-20.0, -2.0, 20.0, 0.0);
        let mut player = Player::new();
        player.rect = Rect::new(-6.0, -0.5, 6.0, 13.5);
        player.vel.y = 100.0;
        player.update(DT, Vec2::ZERO, &[p], 0.0);
        assert!(!player.grounded);
        assert!(player.vel.y > 0.0);
    }

    #[test]
    fn test_no_snap_without_horizontal_overlap() {
        let p = platform(50.0, -2.0, 140.0, 0.0);
        let mut player = Player::new();
        player.rect = Rect::new(-6.0, 0.05, 6.0, 14.05);
        player.update(DT, Vec2::ZERO, &[p], 0.0);
        assert!(!player.grounded);
    }

    #[test]
    fn test_edge_touch_does_not_land() {
        // Body's right edge exactly at the platform's left edge
        let p = platform(6.0, -2.0, 60.0, 0.0);
        let mut player = Player::new();
        player.rect = Rect::new(-6.0, 0.05, 6.0, 14.05);
        player.update(DT, Vec2::ZERO, &[p], 0.0);
        assert!(!player.grounded);
    }

    #[test]
    fn test_resting_stays_snapped() {
        let p = platform(-20.0, -2.0, 20.0, 0.0);
        let mut player = resting_on(&p);
        for _ in 0..10 {
            player.update(DT, Vec2::ZERO, &[p.clone()], 0.0);
            assert_eq!(player.rect.min.y, p.rect.max.y);
            assert_eq!(player.vel.y, 0.0);
            assert!(player.grounded);
        }
    }

    #[test]
    fn test_level_tops_all_ground() {
        // Two platforms with the same top both match; the last write wins
        let a = platform(-20.0, -2.0, 5.0, 0.0);
        let b = platform(-5.0, -2.0, 20.0, 0.0);
        let mut player = Player::new();
        player.rect = Rect::new(-6.0, 0.05, 6.0, 14.05);
        player.update(DT, Vec2::ZERO, &[a, b], 0.0);
        assert!(player.grounded);
        assert_eq!(player.rect.min.y, 0.0);
    }

    #[test]
    fn test_jump_impulse_exact() {
        let p = platform(-20.0, -2.0, 20.0, 0.0);
        let mut player = resting_on(&p);
        player.update(DT, Vec2::new(0.0, 1.0), &[p], 0.0);
        assert_eq!(player.vel.y, JUMP_SPEED);
    }

    #[test]
    fn test_jump_requires_ground() {
        let mut player = Player::new();
        player.vel.y = -50.0;
        player.update(DT, Vec2::new(0.0, 1.0), &[], 0.0);
        // Gravity only, no impulse
        assert_eq!(player.vel.y, -50.0 + GRAVITY * DT);
        assert!(!player.grounded);
    }

    #[test]
    fn test_leaves_platform_next_frame_after_jump() {
        let p = platform(-20.0, -2.0, 20.0, 0.0);
        let mut player = resting_on(&p);
        player.update(DT, Vec2::new(0.0, 1.0), &[p.clone()], 0.0);
        assert_eq!(player.vel.y, JUMP_SPEED);
        player.update(DT, Vec2::ZERO, &[p], 0.0);
        assert!(!player.grounded);
        assert!(player.vel.y > 0.0);
    }

    #[test]
    fn test_scroll_carries_body_down() {
        let mut player = Player::new();
        player.vel = Vec2::ZERO;
        let y0 = player.rect.min.y;
        player.update(1.0, Vec2::ZERO, &[], 30.0);
        // Fell by gravity and scrolled by speed * dt
        assert_eq!(player.rect.min.y, y0 + GRAVITY * 1.0 - 30.0);
    }
}
