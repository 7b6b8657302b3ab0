//! The whole night sky: owns every entity and drives one frame at a time.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::background::render_sky;
use crate::canvas::{BlendMode, Canvas};
use crate::config::SceneConfig;
use crate::lantern::Lantern;
use crate::moon::render_moon;
use crate::stars::StarField;
use crate::text::Typeface;
use crate::ui::Button;

/// Images and fonts prepared once at startup.
#[derive(Debug)]
pub struct Resources {
    pub sky: Canvas,
    pub moon: Canvas,
    pub typeface: Typeface,
}

impl Resources {
    pub fn new<R: Rng + ?Sized>(config: &SceneConfig, rng: &mut R, typeface: Typeface) -> Self {
        Self {
            sky: render_sky(config.width, config.height, config.sky_top, config.sky_bottom),
            moon: render_moon(rng),
            typeface,
        }
    }
}

#[derive(Debug)]
pub struct Scene {
    config: SceneConfig,
    resources: Resources,
    stars: StarField,
    /// Kept sorted far-to-near after every update.
    lanterns: Vec<Lantern>,
    button: Button,
    rng: StdRng,
    frame: u64,
}

impl Scene {
    pub fn new(config: SceneConfig, resources: Resources, mut rng: StdRng) -> Self {
        let stars = StarField::new(&mut rng, config.width, config.height, &config.stars);
        let button = Button::new(&config.button, &resources.typeface);
        Self {
            config,
            resources,
            stars,
            lanterns: Vec::new(),
            button,
            rng,
            frame: 0,
        }
    }

    /// Builds resources and scene from a single seed.
    pub fn seeded(config: SceneConfig, typeface: Typeface, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let resources = Resources::new(&config, &mut rng, typeface);
        Self::new(config, resources, rng)
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn lanterns(&self) -> &[Lantern] {
        &self.lanterns
    }

    pub fn button(&self) -> &Button {
        &self.button
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn track_cursor(&mut self, cursor: Option<(f32, f32)>) {
        self.button.track_cursor(cursor);
    }

    /// Handles a left click and returns how many lanterns were released.
    pub fn click(&mut self, x: f32, y: f32) -> usize {
        if !self.button.contains(x, y) {
            return 0;
        }
        let count = self.rng.gen_range(self.config.spawn_count.clone());
        for _ in 0..count {
            let lantern = Lantern::spawn(&mut self.rng, &self.config, &self.resources.typeface);
            self.lanterns.push(lantern);
        }
        log::debug!("released {count} lanterns, {} aloft", self.lanterns.len());
        count
    }

    pub fn update(&mut self) {
        self.frame += 1;
        for lantern in &mut self.lanterns {
            lantern.update(&mut self.rng, &self.config);
        }
        let before = self.lanterns.len();
        self.lanterns.retain(Lantern::is_alive);
        if self.lanterns.len() < before {
            log::trace!("{} lanterns drifted away", before - self.lanterns.len());
        }
        self.lanterns.sort_by(|a, b| b.z().total_cmp(&a.z()));
    }

    pub fn draw(&self, frame: &mut Canvas) {
        frame.copy_from(&self.resources.sky);
        self.stars.paint(frame, self.config.seconds(self.frame));
        let (mx, my) = self.config.moon_origin;
        frame.blit(&self.resources.moon, mx, my, BlendMode::Additive);
        for lantern in &self.lanterns {
            lantern.draw(frame, &self.config);
        }
        self.button.draw(frame);
    }
}
