//! Tuning constants for the scene, gathered in one place so tests can swap
//! them out.

use std::ops::{Range, RangeInclusive};

use crate::canvas::Rect;
use crate::color::Rgb;

pub const WIDTH: usize = 800;
pub const HEIGHT: usize = 600;
pub const CAPTION: &str = "古风意境 · 孤月流灯 (心愿版)";

#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub width: usize,
    pub height: usize,
    pub frames_per_second: u32,
    pub sky_top: Rgb,
    pub sky_bottom: Rgb,
    pub stars: StarConfig,
    /// Top-left corner of the moon image on screen.
    pub moon_origin: (i32, i32),
    pub lantern: LanternConfig,
    pub spark: SparkConfig,
    pub button: ButtonConfig,
    /// Lanterns released per click.
    pub spawn_count: RangeInclusive<usize>,
    /// Font families tried in order before falling back to the built-in face.
    pub font_families: &'static [&'static str],
}

#[derive(Clone, Debug)]
pub struct StarConfig {
    pub count: usize,
    pub size: Range<f32>,
    pub color: Rgb,
    pub base_alpha: f32,
    pub twinkle_alpha: f32,
}

#[derive(Clone, Debug)]
pub struct LanternConfig {
    /// Depth factor z; scale is `1/z`.
    pub depth: Range<f32>,
    /// Rise speed before dividing by z, in pixels per tick.
    pub rise_speed: Range<f32>,
    pub phase: Range<f32>,
    pub phase_step: f32,
    /// Peak tilt in degrees.
    pub tilt_amplitude: f32,
    pub sway: f32,
    /// Keeps spawn positions this far from the left and right edges.
    pub margin_x: i32,
    /// Spawn height below the bottom edge.
    pub spawn_below: f32,
    /// Lanterns expire once `y` drops under this.
    pub expire_above: f32,
    pub spark_chance: f64,
    /// Vertical distance from the lantern center to the spark origin, unscaled.
    pub spark_offset: f32,
    pub width: f32,
    pub height: f32,
    pub wish_size: f32,
    /// Smallest font size at which wishes are still drawn.
    pub min_wish_size: u32,
}

#[derive(Clone, Debug)]
pub struct SparkConfig {
    pub vx: Range<f32>,
    pub vy: Range<f32>,
    pub decay: Range<f32>,
    pub size: Range<f32>,
    pub gravity: f32,
    pub hot: Rgb,
    pub cool: Rgb,
}

#[derive(Clone, Debug)]
pub struct ButtonConfig {
    pub bounds: Rect,
    pub corner_radius: i32,
    pub idle: Rgb,
    pub hover: Rgb,
    pub label: &'static str,
    /// Shown when the typeface cannot draw `label`.
    pub label_gloss: &'static str,
    pub label_color: Rgb,
    pub label_size: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            frames_per_second: 60,
            sky_top: Rgb::new(5, 5, 20),
            sky_bottom: Rgb::new(15, 10, 35),
            stars: StarConfig {
                count: 120,
                size: 0.4..1.2,
                color: Rgb::new(255, 255, 240),
                base_alpha: 150.0,
                twinkle_alpha: 105.0,
            },
            moon_origin: (WIDTH as i32 - 180, 30),
            lantern: LanternConfig {
                depth: 1.2..4.5,
                rise_speed: 0.6..1.2,
                phase: 0.0..100.0,
                phase_step: 0.02,
                tilt_amplitude: 4.0,
                sway: 0.3,
                margin_x: 50,
                spawn_below: 100.0,
                expire_above: -150.0,
                spark_chance: 0.25,
                spark_offset: 50.0,
                width: 40.0,
                height: 60.0,
                wish_size: 18.0,
                min_wish_size: 5,
            },
            spark: SparkConfig {
                vx: -0.4..0.4,
                vy: -1.2..-0.4,
                decay: 0.015..0.025,
                size: 1.0..2.5,
                gravity: 0.015,
                hot: Rgb::new(255, 200, 50),
                cool: Rgb::new(150, 30, 0),
            },
            button: ButtonConfig {
                bounds: Rect::new(WIDTH as i32 / 2 - 80, HEIGHT as i32 - 70, 160, 45),
                corner_radius: 22,
                idle: Rgb::new(50, 30, 80),
                hover: Rgb::new(80, 40, 100),
                label: "放飞心愿",
                label_gloss: "MAKE A WISH",
                label_color: Rgb::new(255, 230, 150),
                label_size: 24,
            },
            spawn_count: 4..=6,
            font_families: &["SimHei", "Microsoft YaHei", "Noto Sans CJK SC", "WenQuanYi Zen Hei"],
        }
    }
}

impl SceneConfig {
    /// Seconds of logical time covered by `frames` ticks.
    pub fn seconds(&self, frames: u64) -> f32 {
        frames as f32 / self.frames_per_second.max(1) as f32
    }
}
