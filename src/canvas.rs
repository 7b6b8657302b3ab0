//! In-memory RGBA drawing surface.
//!
//! A canvas is either *opaque* (the frame, the sky) or *transparent* (scratch
//! layers such as a lantern body or a glow halo). Shape primitives blend onto
//! opaque canvases but overwrite pixels on transparent ones, so a stack of
//! shrinking circles leaves the innermost circle's alpha in place. `blit`
//! always composites.

use crate::color::{Rgb, Rgba};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    Alpha,
    Additive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Half-open containment, matching pixel coverage.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x as f32
            && x < (self.x + self.w) as f32
            && y >= self.y as f32
            && y < (self.y + self.h) as f32
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }
}

#[derive(Clone, Debug)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
    opaque: bool,
}

impl Canvas {
    /// A fully transparent scratch layer.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width * height],
            opaque: false,
        }
    }

    /// An opaque surface filled with `color`.
    pub fn filled(width: usize, height: usize, color: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![color.opaque(); width * height],
            opaque: true,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Rgba> {
        self.index(x, y).map(|idx| self.pixels[idx])
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Overwrites this canvas with `other`, which must have the same size.
    pub fn copy_from(&mut self, other: &Canvas) {
        debug_assert_eq!(self.width, other.width);
        debug_assert_eq!(self.height, other.height);
        self.pixels.copy_from_slice(&other.pixels);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = if self.opaque {
                color.over(self.pixels[idx])
            } else {
                color
            };
        }
    }

    fn hline(&mut self, y: i32, x0: i32, x1: i32, color: Rgba) {
        if y < 0 || y as usize >= self.height {
            return;
        }
        let start = x0.max(0);
        let end = x1.min(self.width as i32 - 1);
        for x in start..=end {
            self.set_pixel(x, y, color);
        }
    }

    /// Filled disc. Radii below one pixel plot the center pixel only.
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: f32, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        if radius < 1.0 {
            self.set_pixel(cx, cy, color);
            return;
        }
        let r = radius.floor() as i32;
        let r2 = radius * radius;
        for dy in -r..=r {
            let span = (r2 - (dy * dy) as f32).max(0.0).sqrt() as i32;
            self.hline(cy + dy, cx - span, cx + span, color);
        }
    }

    /// Bresenham line; widths above one stamp a square brush at each step.
    pub fn draw_line(&mut self, start: (i32, i32), end: (i32, i32), color: Rgba, width: i32) {
        let (mut x0, mut y0) = start;
        let (x1, y1) = end;
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let lo = -(width.max(1) - 1) / 2;
        let hi = lo + width.max(1) - 1;
        loop {
            for oy in lo..=hi {
                for ox in lo..=hi {
                    self.set_pixel(x0 + ox, y0 + oy, color);
                }
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Ellipse inscribed in `bounds`.
    pub fn fill_ellipse(&mut self, bounds: Rect, color: Rgba) {
        if bounds.w <= 0 || bounds.h <= 0 {
            return;
        }
        let rx = bounds.w as f32 / 2.0;
        let ry = bounds.h as f32 / 2.0;
        let cx = bounds.x as f32 + rx;
        let cy = bounds.y as f32 + ry;
        for row in 0..bounds.h {
            let y = bounds.y + row;
            let ny = (y as f32 + 0.5 - cy) / ry;
            let k = 1.0 - ny * ny;
            if k < 0.0 {
                continue;
            }
            let half = rx * k.sqrt();
            let x0 = (cx - half).round() as i32;
            let x1 = (cx + half).round() as i32 - 1;
            if x1 >= x0 {
                self.hline(y, x0, x1, color);
            }
        }
    }

    pub fn fill_rounded_rect(&mut self, bounds: Rect, radius: i32, color: Rgba) {
        let radius = radius.clamp(0, bounds.w.min(bounds.h) / 2);
        for row in 0..bounds.h {
            let y = bounds.y + row;
            let inset = if row < radius {
                corner_inset(radius, radius - row)
            } else if row >= bounds.h - radius {
                corner_inset(radius, row - (bounds.h - radius) + 1)
            } else {
                0
            };
            self.hline(y, bounds.x + inset, bounds.x + bounds.w - 1 - inset, color);
        }
    }

    /// Composites `src` with its top-left corner at `(x, y)`.
    pub fn blit(&mut self, src: &Canvas, x: i32, y: i32, mode: BlendMode) {
        for sy in 0..src.height {
            let ty = y + sy as i32;
            if ty < 0 || ty as usize >= self.height {
                continue;
            }
            for sx in 0..src.width {
                let tx = x + sx as i32;
                let Some(idx) = self.index(tx, ty) else {
                    continue;
                };
                let s = src.pixels[sy * src.width + sx];
                if s.a == 0 {
                    continue;
                }
                let d = self.pixels[idx];
                self.pixels[idx] = match mode {
                    BlendMode::Alpha => s.over(d),
                    BlendMode::Additive => s.add_onto(d),
                };
            }
        }
    }

    /// Composites `src` so that its center lands on `(cx, cy)`.
    pub fn blit_centered(&mut self, src: &Canvas, cx: i32, cy: i32, mode: BlendMode) {
        let x = cx - (src.width / 2) as i32;
        let y = cy - (src.height / 2) as i32;
        self.blit(src, x, y, mode);
    }

    /// Returns a copy rotated counter-clockwise by `degrees`, grown to fit.
    pub fn rotated(&self, degrees: f32) -> Canvas {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let w = self.width as f32;
        let h = self.height as f32;
        let out_w = (w * cos.abs() + h * sin.abs() - 1e-3).ceil().max(1.0) as usize;
        let out_h = (w * sin.abs() + h * cos.abs() - 1e-3).ceil().max(1.0) as usize;
        let mut out = Canvas::new(out_w, out_h);
        let half_w = out_w as f32 / 2.0;
        let half_h = out_h as f32 / 2.0;
        for dy in 0..out_h {
            let py = dy as f32 + 0.5 - half_h;
            for dx in 0..out_w {
                let px = dx as f32 + 0.5 - half_w;
                let sx = (px * cos - py * sin + w / 2.0).floor() as i32;
                let sy = (px * sin + py * cos + h / 2.0).floor() as i32;
                if let Some(idx) = self.index(sx, sy) {
                    out.pixels[dy * out_w + dx] = self.pixels[idx];
                }
            }
        }
        out
    }

    /// Writes the canvas into a minifb `0RGB` buffer.
    pub fn write_0rgb(&self, out: &mut [u32]) {
        for (dst, px) in out.iter_mut().zip(&self.pixels) {
            *dst = px.rgb().to_u32();
        }
    }
}

fn corner_inset(radius: i32, dy: i32) -> i32 {
    let r = radius as f32;
    let y = dy as f32 - 0.5;
    radius - (r * r - y * y).max(0.0).sqrt().round() as i32
}
