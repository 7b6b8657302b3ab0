use std::time::Duration;

use anyhow::Context;
use minifb::{Key, MouseButton, MouseMode, Window, WindowOptions};
use rand::rngs::StdRng;
use rand::SeedableRng;

use sky_lanterns::canvas::Canvas;
use sky_lanterns::color::Rgb;
use sky_lanterns::config::{SceneConfig, CAPTION};
use sky_lanterns::scene::{Resources, Scene};
use sky_lanterns::text::Typeface;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SceneConfig::default();
    let (width, height) = (config.width, config.height);
    let seed: u64 = rand::random();
    log::info!("starting sky lanterns ({width}x{height}, seed {seed})");

    let mut rng = StdRng::seed_from_u64(seed);
    let typeface = Typeface::load(config.font_families);
    let resources = Resources::new(&config, &mut rng, typeface);
    let frame_time = Duration::from_secs_f64(1.0 / config.frames_per_second.max(1) as f64);
    let mut scene = Scene::new(config, resources, rng);

    let mut window = Window::new(
        CAPTION,
        width,
        height,
        WindowOptions {
            resize: false,
            scale: minifb::Scale::X1,
            ..WindowOptions::default()
        },
    )
    .context("failed to open the window")?;
    window.limit_update_rate(Some(frame_time));

    let mut frame = Canvas::filled(width, height, Rgb::BLACK);
    let mut buffer = vec![0u32; width * height];
    let mut was_down = false;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let cursor = window.get_mouse_pos(MouseMode::Discard);
        scene.track_cursor(cursor);

        let down = window.get_mouse_down(MouseButton::Left);
        if down && !was_down {
            if let Some((x, y)) = cursor {
                scene.click(x, y);
            }
        }
        was_down = down;

        scene.update();
        scene.draw(&mut frame);
        frame.write_0rgb(&mut buffer);
        window
            .update_with_buffer(&buffer, width, height)
            .context("failed to present frame")?;
    }

    log::info!("window closed after {} frames", scene.frame_count());
    Ok(())
}
