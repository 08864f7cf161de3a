use crate::math8::percent_to_byte;

/// Cold-white / warm-white channel pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WhiteMix {
    pub cold: u8,
    pub warm: u8,
}

/// Split a brightness over a cold and a warm white channel
///
/// `cold = brightness * (1 - temperature)`, `warm = brightness * temperature`,
/// both in percent. Temperature 0% is all cold, 100% all warm; the sum of both
/// channels carries the brightness.
pub fn white_mix(brightness: f32, color_temperature: f32) -> WhiteMix {
    let brightness = brightness.clamp(0.0, 100.0);
    let temperature = color_temperature.clamp(0.0, 100.0) / 100.0;

    WhiteMix {
        cold: percent_to_byte(brightness * (1.0 - temperature)),
        warm: percent_to_byte(brightness * temperature),
    }
}
