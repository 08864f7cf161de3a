use super::Rgb;
use crate::math8::unit_to_byte;

/// Hue/saturation/brightness color
///
/// Hue in degrees (0-360), saturation and brightness in percent (0-100).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsb {
    pub hue: f32,
    pub saturation: f32,
    pub brightness: f32,
}

impl Hsb {
    pub const WHITE: Self = Self::new(0.0, 0.0, 100.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(hue: f32, saturation: f32, brightness: f32) -> Self {
        Self {
            hue,
            saturation,
            brightness,
        }
    }

    /// Same hue and saturation at another brightness
    #[must_use]
    pub const fn with_brightness(self, brightness: f32) -> Self {
        Self { brightness, ..self }
    }

    pub fn is_off(&self) -> bool {
        self.brightness <= 0.0
    }
}

/// Convert HSB to RGB using the standard sextant transform
///
/// Out-of-range components are wrapped (hue) or clamped (saturation,
/// brightness) before conversion.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn hsb_to_rgb(color: Hsb) -> Rgb {
    let hue = libm::fmodf(color.hue, 360.0);
    let hue = if hue < 0.0 { hue + 360.0 } else { hue };
    let s = clamp_unit(color.saturation / 100.0);
    let v = clamp_unit(color.brightness / 100.0);

    let h = hue / 60.0;
    let sector = libm::floorf(h);
    let f = h - sector;

    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match sector as u8 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    Rgb {
        r: unit_to_byte(r),
        g: unit_to_byte(g),
        b: unit_to_byte(b),
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
