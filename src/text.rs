//! Text rasterization.
//!
//! A [`Typeface`] is either an outline font found among the platform's font
//! directories or the built-in 8x8 bitmap face, which is always available.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use font8x8::{UnicodeFonts, BASIC_FONTS};
use fontdue::{Font, FontSettings};

use crate::canvas::Canvas;
use crate::color::Rgba;

const MAX_SCAN_DEPTH: usize = 4;

pub enum Typeface {
    Outline { family: String, font: Font },
    Builtin,
}

impl fmt::Debug for Typeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Typeface({})", self.name())
    }
}

impl Typeface {
    /// Tries each family in order and settles on the built-in face when none
    /// can be found or parsed.
    pub fn load(families: &[&str]) -> Self {
        let dirs = font_dirs();
        for family in families {
            let Some(path) = find_font_file(&dirs, font_files(family)) else {
                log::debug!("typeface {family:?} not installed");
                continue;
            };
            match load_outline(&path) {
                Ok(font) => {
                    log::info!("using typeface {family:?} from {}", path.display());
                    return Typeface::Outline {
                        family: (*family).to_owned(),
                        font,
                    };
                }
                Err(err) => log::debug!("skipping typeface {family:?}: {err:#}"),
            }
        }
        log::info!("no preferred typeface available, using built-in bitmap face");
        Typeface::Builtin
    }

    pub fn builtin() -> Self {
        Typeface::Builtin
    }

    pub fn name(&self) -> &str {
        match self {
            Typeface::Outline { family, .. } => family,
            Typeface::Builtin => "builtin-8x8",
        }
    }

    /// Whether every character of `text` has a glyph in this face.
    pub fn covers(&self, text: &str) -> bool {
        match self {
            Typeface::Outline { font, .. } => text
                .chars()
                .all(|ch| ch.is_whitespace() || font.lookup_glyph_index(ch) != 0),
            Typeface::Builtin => text.chars().all(|ch| BASIC_FONTS.get(ch).is_some()),
        }
    }

    /// Picks `preferred` when it can be drawn, otherwise `fallback`.
    pub fn pick<'a>(&self, preferred: &'a str, fallback: &'a str) -> &'a str {
        if self.covers(preferred) {
            preferred
        } else {
            fallback
        }
    }

    /// Renders `text` at `size` pixels into a tightly sized transparent canvas.
    pub fn render(&self, text: &str, size: u32, color: Rgba) -> Canvas {
        let size = size.max(1);
        match self {
            Typeface::Outline { font, .. } => render_outline(font, text, size as f32, color),
            Typeface::Builtin => render_bitmap(text, size, color),
        }
    }
}

fn load_outline(path: &Path) -> anyhow::Result<Font> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Font::from_bytes(bytes, FontSettings::default())
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("parsing {}", path.display()))
}

fn render_outline(font: &Font, text: &str, px: f32, color: Rgba) -> Canvas {
    let (ascent, descent) = font
        .horizontal_line_metrics(px)
        .map(|m| (m.ascent, m.descent))
        .unwrap_or((px * 0.8, -px * 0.2));
    let baseline = ascent.ceil() as i32;
    let height = (ascent - descent).ceil().max(1.0) as usize;

    let mut pen = 0.0f32;
    let mut glyphs = Vec::with_capacity(text.chars().count());
    for ch in text.chars() {
        let (metrics, coverage) = font.rasterize(ch, px);
        glyphs.push((pen.round() as i32, metrics, coverage));
        pen += metrics.advance_width;
    }
    let width = pen.ceil().max(1.0) as usize;

    let mut canvas = Canvas::new(width, height);
    for (origin, metrics, coverage) in glyphs {
        let left = origin + metrics.xmin;
        let top = baseline - (metrics.ymin + metrics.height as i32);
        for row in 0..metrics.height {
            for col in 0..metrics.width {
                let cov = coverage[row * metrics.width + col];
                if cov == 0 {
                    continue;
                }
                let (x, y) = (left + col as i32, top + row as i32);
                let ink = color.fade(cov);
                if canvas.get(x, y).is_some_and(|px| px.a < ink.a) {
                    canvas.set_pixel(x, y, ink);
                }
            }
        }
    }
    canvas
}

/// 8x8 glyphs carry their own padding, so a cell spans half the nominal size.
fn render_bitmap(text: &str, size: u32, color: Rgba) -> Canvas {
    let cell = (size as usize / 2).max(1);
    let count = text.chars().count().max(1);
    let mut canvas = Canvas::new(cell * count, cell);
    for (i, ch) in text.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(ch) else {
            continue;
        };
        for y in 0..cell {
            let bits = glyph[y * 8 / cell];
            for x in 0..cell {
                if bits & (1 << (x * 8 / cell)) != 0 {
                    canvas.set_pixel((i * cell + x) as i32, y as i32, color);
                }
            }
        }
    }
    canvas
}

/// File names a family is commonly installed under.
fn font_files(family: &str) -> Vec<String> {
    let known: &[&str] = match family {
        "SimHei" => &["simhei.ttf"],
        "Microsoft YaHei" => &["msyh.ttc", "msyh.ttf"],
        "Noto Sans CJK SC" => &["notosanscjksc-regular.otf", "notosanscjk-regular.ttc"],
        "WenQuanYi Zen Hei" => &["wqy-zenhei.ttc"],
        "Arial" => &["arial.ttf"],
        _ => &[],
    };
    if known.is_empty() {
        let stem: String = family
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        vec![format!("{stem}.ttf"), format!("{stem}.otf"), format!("{stem}.ttc")]
    } else {
        known.iter().map(|name| (*name).to_owned()).collect()
    }
}

fn font_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
        PathBuf::from("/System/Library/Fonts"),
        PathBuf::from("/Library/Fonts"),
    ];
    if let Some(windir) = std::env::var_os("WINDIR") {
        dirs.push(PathBuf::from(windir).join("Fonts"));
    }
    if let Some(home) = std::env::var_os("HOME") {
        let home = PathBuf::from(home);
        dirs.push(home.join(".local/share/fonts"));
        dirs.push(home.join(".fonts"));
        dirs.push(home.join("Library/Fonts"));
    }
    dirs
}

fn find_font_file(dirs: &[PathBuf], names: Vec<String>) -> Option<PathBuf> {
    if names.is_empty() {
        return None;
    }
    dirs.iter()
        .find_map(|dir| scan_dir(dir, &names, MAX_SCAN_DEPTH))
}

fn scan_dir(dir: &Path, names: &[String], depth: usize) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    let mut subdirs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
            continue;
        }
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_lowercase())
            .is_some_and(|n| names.iter().any(|want| *want == n));
        if matches {
            return Some(path);
        }
    }
    if depth == 0 {
        return None;
    }
    subdirs
        .iter()
        .find_map(|sub| scan_dir(sub, names, depth - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: Rgba = Rgba::new(80, 20, 10, 255);

    #[test]
    fn unknown_family_falls_back_to_builtin() {
        let face = Typeface::load(&["Definitely Not Installed Sans 9000"]);
        assert!(matches!(face, Typeface::Builtin));
        assert_eq!(face.name(), "builtin-8x8");
    }

    #[test]
    fn builtin_covers_latin_only() {
        let face = Typeface::builtin();
        assert!(face.covers("MAKE A WISH"));
        assert!(!face.covers("平安"));
        assert_eq!(face.pick("平安", "PEACE"), "PEACE");
    }

    #[test]
    fn builtin_render_scales_cells() {
        let face = Typeface::builtin();
        let label = face.render("HI", 32, INK);
        assert_eq!((label.width(), label.height()), (32, 16));
        assert!(label.pixels().iter().any(|p| *p == INK));
        assert!(label.pixels().iter().all(|p| p.a == 0 || *p == INK));
    }

    #[test]
    fn builtin_render_skips_missing_glyphs() {
        let face = Typeface::builtin();
        let label = face.render("安", 16, INK);
        assert!(label.pixels().iter().all(|p| p.a == 0));
    }

    #[test]
    fn outline_errors_name_the_file() {
        let missing = Path::new("/nonexistent/fonts/simhei.ttf");
        let err = load_outline(missing).err().expect("missing file loaded");
        assert!(format!("{err:#}").contains("reading /nonexistent/fonts/simhei.ttf"));

        let not_a_font = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        let err = load_outline(&not_a_font).err().expect("manifest parsed as a font");
        assert!(format!("{err:#}").starts_with("parsing "), "{err:#}");
    }

    #[test]
    fn font_files_derive_names_for_unknown_families() {
        assert_eq!(
            font_files("DejaVu Sans"),
            vec!["dejavusans.ttf", "dejavusans.otf", "dejavusans.ttc"]
        );
        assert_eq!(font_files("SimHei"), vec!["simhei.ttf"]);
    }
}
