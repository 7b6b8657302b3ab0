//! Sky lanterns: spawn, drift and the layered draw routine.

use std::f32::consts::PI;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::canvas::{BlendMode, Canvas, Rect};
use crate::color::{clamp, Rgb, Rgba};
use crate::config::SceneConfig;
use crate::spark::Spark;
use crate::text::Typeface;

const GLOW: Rgb = Rgb::new(255, 120, 40);
const GLOW_PEAK_ALPHA: f32 = 45.0;
const GLOW_RING_STEP: usize = 4;
const EDGE_SHADE: Rgb = Rgb::new(100, 30, 10);
const INK: Rgba = Rgba::new(80, 20, 10, 160);
const TASSEL: Rgba = Rgba::new(150, 40, 20, 200);
const BEAD: Rgba = Rgba::new(200, 160, 40, 220);
const FLAME: Rgba = Rgba::new(255, 255, 200, 240);
/// Widest a wish may run, as a share of the body width.
const LABEL_SPAN: f32 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wish {
    pub text: &'static str,
    /// Used when the typeface has no glyphs for `text`.
    pub gloss: &'static str,
}

impl Wish {
    const fn new(text: &'static str, gloss: &'static str) -> Self {
        Self { text, gloss }
    }
}

pub const WISHES: [Wish; 10] = [
    Wish::new("平安", "PEACE"),
    Wish::new("喜乐", "JOY"),
    Wish::new("顺遂", "EASE"),
    Wish::new("安康", "HEALTH"),
    Wish::new("锦绣", "SPLENDOR"),
    Wish::new("如愿", "DREAMS"),
    Wish::new("团圆", "REUNION"),
    Wish::new("祈福", "BLESSING"),
    Wish::new("良辰", "GOOD DAYS"),
    Wish::new("美景", "BEAUTY"),
];

#[derive(Clone, Debug)]
pub struct Lantern {
    /// Depth factor; fixed for the lantern's lifetime.
    z: f32,
    pub x: f32,
    pub y: f32,
    /// Pixels risen per tick, already divided by `z`.
    speed: f32,
    pub phase: f32,
    /// Degrees, counter-clockwise.
    pub tilt: f32,
    sparks: Vec<Spark>,
    alive: bool,
    wish: Wish,
    label: Option<Canvas>,
}

impl Lantern {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, config: &SceneConfig, typeface: &Typeface) -> Self {
        let lc = &config.lantern;
        let z = rng.gen_range(lc.depth.clone());
        let x = rng.gen_range(lc.margin_x..=config.width as i32 - lc.margin_x) as f32;
        let speed = rng.gen_range(lc.rise_speed.clone()) / z;
        let phase = rng.gen_range(lc.phase.clone());
        let wish = *WISHES.choose(rng).unwrap_or(&WISHES[0]);

        let wish_size = (lc.wish_size / z) as u32;
        let max_width = lc.width * (1.0 / z) * LABEL_SPAN;
        let label = (wish_size > lc.min_wish_size)
            .then(|| wish_label(typeface, wish, wish_size, max_width));

        Self {
            z,
            x,
            y: config.height as f32 + lc.spawn_below,
            speed,
            phase,
            tilt: phase.sin() * lc.tilt_amplitude,
            sparks: Vec::new(),
            alive: true,
            wish,
            label,
        }
    }

    pub fn z(&self) -> f32 {
        self.z
    }

    pub fn scale(&self) -> f32 {
        1.0 / self.z
    }

    /// On-screen body width and height.
    fn size(&self, config: &SceneConfig) -> (f32, f32) {
        let scale = self.scale();
        (config.lantern.width * scale, config.lantern.height * scale)
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn wish(&self) -> Wish {
        self.wish
    }

    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    pub fn label(&self) -> Option<&Canvas> {
        self.label.as_ref()
    }

    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &SceneConfig) {
        let lc = &config.lantern;
        self.y -= self.speed;
        self.phase += lc.phase_step;
        self.tilt = self.phase.sin() * lc.tilt_amplitude;
        self.x += (self.phase * 0.5).cos() * (lc.sway / self.z);

        if rng.gen_bool(lc.spark_chance) {
            let scale = self.scale();
            let spark = Spark::new(rng, self.x, self.y + lc.spark_offset * scale, scale, &config.spark);
            self.sparks.push(spark);
        }
        let gravity = config.spark.gravity;
        self.sparks.retain_mut(|spark| spark.update(gravity));

        if self.y < lc.expire_above {
            self.alive = false;
        }
    }

    pub fn draw(&self, frame: &mut Canvas, config: &SceneConfig) {
        let (w, h) = self.size(config);
        if let Some(glow) = self.render_glow(w) {
            let radius = (glow.width() / 2) as f32;
            let left = (self.x - radius) as i32;
            let top = (self.y - radius + h / 2.0) as i32;
            frame.blit(&glow, left, top, BlendMode::Alpha);
        }
        for spark in &self.sparks {
            spark.draw(frame, &config.spark);
        }
        let body = self.render_body(config).rotated(self.tilt);
        frame.blit_centered(&body, self.x as i32, (self.y + h * 0.2) as i32, BlendMode::Alpha);
    }

    /// Radius of the bloom, which breathes with the phase.
    fn glow_radius(&self, w: f32) -> i32 {
        let breath = ((self.phase * 3.0).sin() + 1.0) * 0.1;
        (w * (2.5 + breath)) as i32
    }

    fn render_glow(&self, w: f32) -> Option<Canvas> {
        let radius = self.glow_radius(w);
        if radius <= 0 {
            return None;
        }
        let side = (radius * 2) as usize;
        let mut glow = Canvas::new(side, side);
        for ring in (1..=radius).rev().step_by(GLOW_RING_STEP) {
            let falloff = 1.0 - ring as f32 / radius as f32;
            let alpha = clamp(GLOW_PEAK_ALPHA * falloff * falloff);
            glow.fill_circle(radius, radius, ring as f32, GLOW.with_alpha(alpha));
        }
        Some(glow)
    }

    /// Unrotated paper, wish, tassels and flame. They share one buffer so
    /// the tilt turns them together.
    fn render_body(&self, config: &SceneConfig) -> Canvas {
        let (w, h) = self.size(config);
        let mut body = Canvas::new((w * 3.0) as usize, (h * 4.0) as usize);
        let (cx, cy) = (w * 1.5, h * 1.5);
        self.draw_paper(&mut body, cx, cy, w, h);
        if let Some(label) = &self.label {
            body.blit_centered(label, cx as i32, cy as i32, BlendMode::Alpha);
        }
        self.draw_tassels(&mut body, cx, cy, w, h, self.scale());
        let flame = Rect::new(
            (cx - w * 0.15) as i32,
            (cy + h * 0.25) as i32,
            (w * 0.3) as i32,
            (h * 0.15) as i32,
        );
        body.fill_ellipse(flame, FLAME);
        body
    }

    /// Rows bulge in the middle and warm up toward the flame.
    fn draw_paper(&self, body: &mut Canvas, cx: f32, cy: f32, w: f32, h: f32) {
        let breath = ((self.phase * 2.0).sin() + 1.0) * 10.0;
        let warm_r = clamp(230.0 + breath) as f32;
        let warm_g = clamp(80.0 + breath / 2.0) as f32;

        for i in 0..h as i32 {
            let ratio = i as f32 / h;
            let row_w = w * (0.8 + 0.2 * (PI * ratio).sin());
            let r = clamp(warm_r * ratio + 150.0 * (1.0 - ratio));
            let g = clamp(warm_g * ratio + 40.0 * (1.0 - ratio));
            let alpha = clamp(180.0 + 40.0 * (1.0 - ratio));

            let y = (cy - h * 0.5 + i as f32) as i32;
            let left = (cx - row_w / 2.0) as i32;
            let right = (cx + row_w / 2.0) as i32;
            body.draw_line((left, y), (right, y), Rgba::new(r, g, 30, alpha), 1);

            if i % 3 == 0 {
                for edge in [-0.45, 0.45] {
                    let x = (cx + row_w * edge) as i32;
                    body.set_pixel(x, y, EDGE_SHADE.with_alpha(alpha / 2));
                }
            }
        }
    }

    fn draw_tassels(&self, body: &mut Canvas, cx: f32, cy: f32, w: f32, h: f32, scale: f32) {
        let length = h * 0.6;
        let sway = (self.phase * 1.5).sin() * (5.0 * scale);
        let thickness = ((1.5 * scale) as i32).max(1);
        let bead = ((2.0 * scale) as i32).max(1);
        for offset in [-w * 0.2, w * 0.2] {
            let (sx, sy) = (cx + offset, cy + h * 0.5);
            let end = ((sx - sway) as i32, (sy + length) as i32);
            body.draw_line((sx as i32, sy as i32), end, TASSEL, thickness);
            body.fill_circle(end.0, end.1, bead as f32, BEAD);
        }
    }
}

/// Renders the wish, shrinking it until it fits across the paper.
fn wish_label(typeface: &Typeface, wish: Wish, size: u32, max_width: f32) -> Canvas {
    let text = typeface.pick(wish.text, wish.gloss);
    let mut size = size;
    loop {
        let label = typeface.render(text, size, INK);
        if label.width() as f32 <= max_width || size <= 1 {
            return label;
        }
        let fitted = (size as f32 * max_width / label.width() as f32) as u32;
        size = fitted.clamp(1, size - 1);
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn spawn_with(config: &SceneConfig, seed: u64) -> Lantern {
        Lantern::spawn(&mut StdRng::seed_from_u64(seed), config, &Typeface::builtin())
    }

    #[test]
    fn spawns_below_the_screen() {
        let config = SceneConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let lantern = Lantern::spawn(&mut rng, &config, &Typeface::builtin());
            assert!(lantern.is_alive());
            assert_eq!(lantern.y, 700.0);
            assert!((1.2..4.5).contains(&lantern.z));
            assert!((50.0..=750.0).contains(&lantern.x));
            assert!(lantern.speed > 0.6 / 4.5 && lantern.speed < 1.2 / 1.2);
            assert!(WISHES.contains(&lantern.wish()));
            assert!(lantern.sparks().is_empty());
        }
    }

    #[test]
    fn seeded_wishes_come_from_the_vocabulary() {
        let config = SceneConfig::default();
        let first = spawn_with(&config, 8).wish();
        assert_eq!(spawn_with(&config, 8).wish(), first);
        assert!(WISHES.contains(&first));
    }

    #[test]
    fn rises_every_tick() {
        let config = SceneConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut lantern = Lantern::spawn(&mut rng, &config, &Typeface::builtin());
        while lantern.is_alive() {
            let before = lantern.y;
            lantern.update(&mut rng, &config);
            assert!(lantern.y < before);
        }
    }

    #[test]
    fn expires_once_above_the_threshold() {
        let config = SceneConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        let mut lantern = Lantern::spawn(&mut rng, &config, &Typeface::builtin());
        lantern.y = config.lantern.expire_above + lantern.speed * 1.5;

        lantern.update(&mut rng, &config);
        assert!(lantern.y >= -150.0);
        assert!(lantern.is_alive());

        lantern.update(&mut rng, &config);
        assert!(lantern.y < -150.0);
        assert!(!lantern.is_alive());

        for _ in 0..10 {
            lantern.update(&mut rng, &config);
            assert!(!lantern.is_alive());
        }
    }

    #[test]
    fn tilt_and_sway_follow_the_phase() {
        let config = SceneConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut lantern = Lantern::spawn(&mut rng, &config, &Typeface::builtin());
        for _ in 0..50 {
            let (x, phase) = (lantern.x, lantern.phase);
            lantern.update(&mut rng, &config);
            assert!((lantern.phase - (phase + 0.02)).abs() < 1e-4);
            assert!((lantern.tilt - lantern.phase.sin() * 4.0).abs() < 1e-4);
            assert!((lantern.x - x).abs() <= 0.3 / lantern.z + 1e-5);
        }
    }

    #[test]
    fn sheds_sparks_that_die_out() {
        let config = SceneConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut lantern = Lantern::spawn(&mut rng, &config, &Typeface::builtin());
        let mut peak = 0;
        for _ in 0..400 {
            lantern.update(&mut rng, &config);
            peak = peak.max(lantern.sparks().len());
            assert!(lantern.sparks().iter().all(Spark::is_alive));
        }
        assert!(peak > 0);
        // 25% spawn rate against a lifetime of at most ~67 ticks
        assert!(lantern.sparks().len() < 40);
    }

    #[test]
    fn distant_lanterns_skip_the_wish() {
        let mut config = SceneConfig::default();
        config.lantern.depth = 4.0..4.4;
        assert!(spawn_with(&config, 5).label().is_none());

        config.lantern.depth = 1.2..1.3;
        assert!(spawn_with(&config, 5).label().is_some());
    }

    #[test]
    fn every_wish_fits_across_the_nearest_body() {
        let config = SceneConfig::default();
        let z = config.lantern.depth.start;
        let w = config.lantern.width / z;
        let size = (config.lantern.wish_size / z) as u32;
        let face = Typeface::builtin();
        for wish in WISHES {
            let label = wish_label(&face, wish, size, w * LABEL_SPAN);
            assert!(label.width() as f32 <= w * LABEL_SPAN, "{wish:?} {}", label.width());
            assert!(label.pixels().iter().any(|p| p.a > 0), "{wish:?}");
        }
        // short words keep their full size
        assert_eq!(wish_label(&face, WISHES[1], size, w * LABEL_SPAN).height(), 7);
    }

    #[test]
    fn spawned_labels_stay_on_the_paper() {
        let config = SceneConfig::default();
        let mut rng = StdRng::seed_from_u64(10);
        for _ in 0..200 {
            let lantern = Lantern::spawn(&mut rng, &config, &Typeface::builtin());
            if let Some(label) = lantern.label() {
                let (w, _) = lantern.size(&config);
                assert!(label.width() as f32 <= w * LABEL_SPAN);
            }
        }
    }

    fn near_lantern(phase: f32) -> (Lantern, SceneConfig) {
        let mut config = SceneConfig::default();
        config.lantern.depth = 1.2..1.2001;
        let mut lantern = spawn_with(&config, 9);
        lantern.phase = phase;
        lantern.tilt = 0.0;
        (lantern, config)
    }

    fn ink_at(canvas: &Canvas, y: i32) -> usize {
        (0..canvas.width() as i32)
            .filter(|&x| canvas.get(x, y).is_some_and(|p| p.a > 0))
            .count()
    }

    fn paper_row(cy: f32, h: f32, i: i32) -> i32 {
        (cy - h * 0.5 + i as f32) as i32
    }

    #[test]
    fn paper_bulges_in_the_middle() {
        let (lantern, config) = near_lantern(0.0);
        let (_, h) = lantern.size(&config);
        let body = lantern.render_body(&config);
        let cy = h * 1.5;
        let top = ink_at(&body, paper_row(cy, h, 0));
        let middle = ink_at(&body, paper_row(cy, h, h as i32 / 2));
        let bottom = ink_at(&body, paper_row(cy, h, h as i32 - 1));
        assert!(middle >= top + 4, "{top} {middle}");
        assert!(middle >= bottom + 4, "{bottom} {middle}");
    }

    #[test]
    fn paper_darkens_toward_the_top() {
        let (lantern, config) = near_lantern(0.0);
        let (w, h) = lantern.size(&config);
        let body = lantern.render_body(&config);
        let (cx, cy) = ((w * 1.5) as i32, h * 1.5);
        let top = body.get(cx, paper_row(cy, h, 0)).unwrap();
        let bottom = body.get(cx, paper_row(cy, h, h as i32 - 1)).unwrap();
        assert_eq!((top.r, top.g, top.b), (150, 40, 30));
        assert!(bottom.r > 220 && bottom.g > 70, "{bottom:?}");
        assert!(bottom.a < top.a);
    }

    #[test]
    fn glow_breathes_with_the_phase() {
        let (mut lantern, config) = near_lantern(-PI / 6.0);
        let (w, _) = lantern.size(&config);
        let exhaled = lantern.glow_radius(w);
        assert_eq!(exhaled, (w * 2.5) as i32);

        lantern.phase = PI / 6.0;
        let inhaled = lantern.glow_radius(w);
        assert!((inhaled as f32 - w * 2.7).abs() <= 1.0, "{inhaled}");
        assert!(inhaled >= exhaled + 5);
        assert_eq!(lantern.render_glow(w).map(|g| g.width()), Some(inhaled as usize * 2));

        for step in 0..100 {
            lantern.phase = step as f32 * 0.1;
            let radius = lantern.glow_radius(w);
            assert!(radius >= exhaled && radius <= inhaled + 1, "{radius}");
        }
    }

    #[test]
    fn tassels_hang_below_and_flame_burns_inside() {
        let (lantern, config) = near_lantern(0.0);
        let (_, h) = lantern.size(&config);
        let body = lantern.render_body(&config);
        let (mid, hem) = ((h * 1.5) as i32, (h * 2.0) as i32);
        let width = body.width();
        let rows_of = |color: Rgba| -> Vec<i32> {
            body.pixels()
                .iter()
                .enumerate()
                .filter(|(_, p)| **p == color)
                .map(|(i, _)| (i / width) as i32)
                .collect()
        };

        let beads = rows_of(BEAD);
        assert!(beads.len() >= 2);
        assert!(beads.iter().all(|&y| y > hem), "{beads:?}");
        let cords = rows_of(TASSEL);
        assert!(!cords.is_empty());
        assert!(cords.iter().all(|&y| y >= hem - 1));

        let flame = rows_of(FLAME);
        assert!(!flame.is_empty());
        assert!(flame.iter().all(|&y| y > mid && y < hem), "{flame:?}");
    }

    /// Mean column of the wish ink, relative to the buffer center.
    fn ink_offset(lantern: &Lantern, config: &SceneConfig, tilt: f32) -> f32 {
        let mut bare = lantern.clone();
        bare.label = None;
        let inked = lantern.render_body(config).rotated(tilt);
        let plain = bare.render_body(config).rotated(tilt);
        let width = inked.width();
        let columns: Vec<f32> = inked
            .pixels()
            .iter()
            .zip(plain.pixels())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| (i % width) as f32 + 0.5)
            .collect();
        assert!(!columns.is_empty());
        columns.iter().sum::<f32>() / columns.len() as f32 - width as f32 / 2.0
    }

    #[test]
    fn wish_turns_with_the_body() {
        let (lantern, config) = near_lantern(0.0);
        assert!(lantern.label().is_some());
        let upright = ink_offset(&lantern, &config, 0.0);
        let left = ink_offset(&lantern, &config, 4.0);
        let right = ink_offset(&lantern, &config, -4.0);
        // the wish sits above the buffer center, so a counter-clockwise tilt
        // carries it left
        assert!(left < upright - 1.0, "{left} {upright}");
        assert!(right > upright + 1.0, "{right} {upright}");
    }

    #[test]
    fn draw_lights_up_the_lantern_position() {
        let config = SceneConfig::default();
        let mut lantern = spawn_with(&config, 6);
        lantern.x = 400.0;
        lantern.y = 300.0;
        let mut frame = Canvas::filled(800, 600, Rgb::BLACK);
        lantern.draw(&mut frame, &config);
        let lit = frame.get(400, 300).unwrap();
        assert!(lit.r > 100, "{lit:?}");
        assert_eq!(frame.get(0, 0), Some(Rgb::BLACK.opaque()));
    }

    #[test]
    fn draw_clips_near_the_edges() {
        let config = SceneConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut lantern = Lantern::spawn(&mut rng, &config, &Typeface::builtin());
        for _ in 0..60 {
            lantern.update(&mut rng, &config);
        }
        lantern.x = 2.0;
        lantern.y = 598.0;
        let mut frame = Canvas::filled(800, 600, Rgb::BLACK);
        lantern.draw(&mut frame, &config);
        lantern.x = 799.0;
        lantern.y = -20.0;
        lantern.draw(&mut frame, &config);
    }
}
