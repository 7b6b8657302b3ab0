use crate::canvas::Canvas;
use crate::color::{lerp, Rgb};

/// Vertical sky gradient, painted once and copied into every frame.
pub fn render_sky(width: usize, height: usize, top: Rgb, bottom: Rgb) -> Canvas {
    let mut sky = Canvas::filled(width, height, top);
    for y in 0..height {
        let t = y as f32 / height.max(1) as f32;
        let row = lerp(top, bottom, t).opaque();
        for x in 0..width {
            sky.set_pixel(x as i32, y as i32, row);
        }
    }
    sky
}
