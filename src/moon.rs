//! The moon: a layered radial glow with a few darker maria, drawn once.

use rand::Rng;

use crate::canvas::Canvas;
use crate::color::{clamp, Rgb};

pub const MOON_SIZE: usize = 200;

const HALO: Rgb = Rgb::new(255, 255, 200);
const CORONA: Rgb = Rgb::new(255, 255, 230);
const DISC: Rgb = Rgb::new(255, 255, 245);
const MARIA: Rgb = Rgb::new(240, 240, 220);
const DISC_RADIUS: i32 = 30;
const MARIA_COUNT: usize = 5;

/// Builds the moon image; composite it additively so it lights the sky
/// instead of covering it.
pub fn render_moon<R: Rng + ?Sized>(rng: &mut R) -> Canvas {
    let mut moon = Canvas::new(MOON_SIZE, MOON_SIZE);
    let c = (MOON_SIZE / 2) as i32;

    // wide diffuse halo
    for r in (42..=80).rev().step_by(2) {
        let falloff = 1.0 - r as f32 / 80.0;
        let alpha = clamp(30.0 * falloff * falloff);
        moon.fill_circle(c, c, r as f32, HALO.with_alpha(alpha));
    }

    // tighter corona
    for r in (31..=45).rev() {
        let alpha = clamp(100.0 * (1.0 - r as f32 / 45.0));
        moon.fill_circle(c, c, r as f32, CORONA.with_alpha(alpha));
    }

    moon.fill_circle(c, c, DISC_RADIUS as f32, DISC.opaque());

    for _ in 0..MARIA_COUNT {
        let x = c + rng.gen_range(-15..=15);
        let y = c + rng.gen_range(-15..=15);
        let r = rng.gen_range(3..=8);
        moon.fill_circle(x, y, r as f32, MARIA.opaque());
    }

    moon
}
