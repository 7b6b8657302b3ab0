/// Restricts a channel value to `0..=255`, truncating toward zero.
pub fn clamp(n: f32) -> u8 {
    if n.is_nan() {
        return 0;
    }
    n.clamp(0.0, 255.0) as u8
}

/// Per-channel linear interpolation between two colors.
pub fn lerp(a: Rgb, b: Rgb, t: f32) -> Rgb {
    Rgb::new(
        clamp(a.r as f32 + (b.r as f32 - a.r as f32) * t),
        clamp(a.g as f32 + (b.g as f32 - a.g as f32) * t),
        clamp(a.b as f32 + (b.b as f32 - a.b as f32) * t),
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn with_alpha(self, a: u8) -> Rgba {
        Rgba::new(self.r, self.g, self.b, a)
    }

    pub const fn opaque(self) -> Rgba {
        self.with_alpha(255)
    }

    /// Packs into the `0RGB` layout minifb presents.
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// A color with straight (non-premultiplied) alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// Scales alpha by `opacity / 255`.
    pub fn fade(self, opacity: u8) -> Self {
        let a = (self.a as u32 * opacity as u32 + 127) / 255;
        Self { a: a as u8, ..self }
    }

    /// Porter-Duff "source over destination".
    pub fn over(self, dst: Rgba) -> Rgba {
        if self.a == 255 || dst.a == 0 {
            return self;
        }
        if self.a == 0 {
            return dst;
        }
        let sa = self.a as f32 / 255.0;
        let da = dst.a as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        let mix = |s: u8, d: u8| {
            let v = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
            clamp(v.round())
        };
        Rgba::new(
            mix(self.r, dst.r),
            mix(self.g, dst.g),
            mix(self.b, dst.b),
            clamp((out_a * 255.0).round()),
        )
    }

    /// Adds the alpha-weighted source onto the destination, saturating.
    pub fn add_onto(self, dst: Rgba) -> Rgba {
        let sa = self.a as f32 / 255.0;
        let add = |s: u8, d: u8| clamp(d as f32 + s as f32 * sa);
        Rgba::new(
            add(self.r, dst.r),
            add(self.g, dst.g),
            add(self.b, dst.b),
            dst.a.max(self.a),
        )
    }
}
