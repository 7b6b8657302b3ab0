use crate::canvas::{BlendMode, Canvas, Rect};
use crate::color::Rgb;
use crate::config::ButtonConfig;
use crate::text::Typeface;

/// The "release a wish" button at the bottom of the screen.
#[derive(Clone, Debug)]
pub struct Button {
    bounds: Rect,
    corner_radius: i32,
    idle: Rgb,
    hover: Rgb,
    label: Canvas,
    hovered: bool,
}

impl Button {
    pub fn new(config: &ButtonConfig, typeface: &Typeface) -> Self {
        let text = typeface.pick(config.label, config.label_gloss);
        Self {
            bounds: config.bounds,
            corner_radius: config.corner_radius,
            idle: config.idle,
            hover: config.hover,
            label: typeface.render(text, config.label_size, config.label_color.opaque()),
            hovered: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.bounds.contains(x, y)
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// `None` means the cursor left the window.
    pub fn track_cursor(&mut self, cursor: Option<(f32, f32)>) {
        self.hovered = cursor.is_some_and(|(x, y)| self.contains(x, y));
    }

    pub fn draw(&self, frame: &mut Canvas) {
        let fill = if self.hovered { self.hover } else { self.idle };
        frame.fill_rounded_rect(self.bounds, self.corner_radius, fill.opaque());
        let (cx, cy) = self.bounds.center();
        frame.blit_centered(&self.label, cx, cy, BlendMode::Alpha);
    }
}
