use rand::Rng;

use crate::canvas::Canvas;
use crate::color::{clamp, Rgb};
use crate::config::StarConfig;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub x: i32,
    pub y: i32,
    pub size: f32,
}

/// Fixed star positions; brightness is recomputed from the clock each frame.
#[derive(Clone, Debug)]
pub struct StarField {
    stars: Vec<Star>,
    color: Rgb,
    base_alpha: f32,
    twinkle_alpha: f32,
}

impl StarField {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, width: usize, height: usize, config: &StarConfig) -> Self {
        let stars = (0..config.count)
            .map(|_| Star {
                x: rng.gen_range(0..=width as i32),
                y: rng.gen_range(0..=height as i32),
                size: rng.gen_range(config.size.clone()),
            })
            .collect();
        Self {
            stars,
            color: config.color,
            base_alpha: config.base_alpha,
            twinkle_alpha: config.twinkle_alpha,
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Each star's phase is offset by its x coordinate, so neighbours twinkle
    /// out of step.
    pub fn alpha(&self, star: &Star, seconds: f32) -> u8 {
        clamp(self.base_alpha + self.twinkle_alpha * (seconds + star.x as f32).sin())
    }

    pub fn paint(&self, frame: &mut Canvas, seconds: f32) {
        for star in &self.stars {
            let color = self.color.with_alpha(self.alpha(star, seconds));
            frame.fill_circle(star.x, star.y, star.size, color);
        }
    }
}
