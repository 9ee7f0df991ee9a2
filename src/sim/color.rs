//! Float RGBA colors and the shared "nice color" generator
//!
//! Platforms and the goal trail both draw from `random_nice_color`:
//! three uniforms normalized to a unit RGB vector, so every color is
//! saturated and never black.

use rand::Rng;

/// A color with components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);
    /// Zero-alpha black, the unfilled state of the goal trail
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Quantize to 8-bit channels for backends without float color
    pub fn to_rgb8(&self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }
}

/// Random saturated color: a unit vector in RGB space, alpha 1.
///
/// The all-zero draw is rejected and retried, so the result is never black
/// and always has Euclidean norm 1 across R, G, B.
pub fn random_nice_color<R: Rng>(rng: &mut R) -> Rgba {
    loop {
        let r: f32 = rng.random();
        let g: f32 = rng.random();
        let b: f32 = rng.random();
        let len = (r * r + g * g + b * b).sqrt();
        if len > 0.0 {
            return Rgba::rgb(r / len, g / len, b / len);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_nice_color_unit_norm() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let c = random_nice_color(&mut rng);
            let norm = (c.r * c.r + c.g * c.g + c.b * c.b).sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
            assert!(c.r > 0.0 || c.g > 0.0 || c.b > 0.0);
            assert_eq!(c.a, 1.0);
        }
    }

    #[test]
    fn test_nice_color_deterministic_per_seed() {
        let mut a = Pcg32::seed_from_u64(42);
        let mut b = Pcg32::seed_from_u64(42);
        for _ in 0..10 {
            assert_eq!(random_nice_color(&mut a), random_nice_color(&mut b));
        }
    }

    #[test]
    fn test_to_rgb8_rounds_and_clamps() {
        assert_eq!(Rgba::rgb(1.0, 0.0, 0.5).to_rgb8(), [255, 0, 128]);
        assert_eq!(Rgba::rgb(2.0, -1.0, 0.0).to_rgb8(), [255, 0, 0]);
    }

    proptest! {
        #[test]
        fn prop_nice_color_never_black(seed in 0u64..10_000) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let c = random_nice_color(&mut rng);
            let norm = (c.r * c.r + c.g * c.g + c.b * c.b).sqrt();
            prop_assert!((norm - 1.0).abs() < 1e-5);
            prop_assert!(c.r + c.g + c.b > 0.0);
        }
    }
}
