//! Ember particles shed by a lantern's flame.

use rand::Rng;

use crate::canvas::{BlendMode, Canvas};
use crate::color::{clamp, lerp};
use crate::config::SparkConfig;

#[derive(Clone, Debug)]
pub struct Spark {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Remaining life in `(0, 1]`; the spark is gone once this reaches zero.
    pub life: f32,
    pub decay: f32,
    pub size: f32,
}

impl Spark {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, x: f32, y: f32, scale: f32, config: &SparkConfig) -> Self {
        Self {
            x,
            y,
            vx: rng.gen_range(config.vx.clone()),
            vy: rng.gen_range(config.vy.clone()) * scale,
            life: 1.0,
            decay: rng.gen_range(config.decay.clone()),
            size: rng.gen_range(config.size.clone()) * scale,
        }
    }

    /// Advances one tick and reports whether the spark is still alive.
    pub fn update(&mut self, gravity: f32) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += gravity;
        self.life -= self.decay;
        self.is_alive()
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    pub fn draw(&self, frame: &mut Canvas, config: &SparkConfig) {
        let color = lerp(config.hot, config.cool, 1.0 - self.life).with_alpha(clamp(self.life * 255.0));
        let radius = self.size as i32;
        let side = (self.size * 2.0) as usize;
        if side == 0 {
            return;
        }
        let mut ember = Canvas::new(side, side);
        ember.fill_circle(radius, radius, radius as f32, color);
        frame.blit(&ember, self.x as i32, self.y as i32, BlendMode::Alpha);
    }
}
