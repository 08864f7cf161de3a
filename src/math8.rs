/// Highest value of a DMX slot
pub const MAX_VALUE: u8 = 255;

/// Linear interpolation between two bytes
///
/// Evaluates `round(start + (target - start) * elapsed / total)`, rounding
/// halves up. `elapsed` past `total` yields `target`; a zero `total` snaps.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn lerp8(start: u8, target: u8, elapsed: u64, total: u64) -> u8 {
    if total == 0 || elapsed >= total {
        return target;
    }
    let total = i128::from(total);
    let elapsed = i128::from(elapsed);
    let delta = i128::from(target) - i128::from(start);

    // Numerator stays non-negative since the result lies between both ends
    let numerator = i128::from(start) * total + delta * elapsed;
    let value = (2 * numerator + total) / (2 * total);

    value.clamp(0, i128::from(MAX_VALUE)) as u8
}

/// Convert a percentage (0-100) to a raw byte, `round(percent / 100 * 255)`
///
/// Out-of-range input is clamped.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn percent_to_byte(percent: f32) -> u8 {
    if percent.is_nan() {
        return 0;
    }
    let scaled = percent.clamp(0.0, 100.0) / 100.0 * f32::from(MAX_VALUE);
    libm::roundf(scaled).clamp(0.0, 255.0) as u8
}

/// Convert a raw byte to a whole percentage, `round(byte / 255 * 100)`
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn byte_to_percent(value: u8) -> u8 {
    ((value as u32 * 200 + 255) / 510) as u8
}

/// Convert a unit fraction (0.0-1.0) to a raw byte, clamping artifacts of
/// floating point rounding
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn unit_to_byte(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    libm::roundf(value * f32::from(MAX_VALUE)).clamp(0.0, 255.0) as u8
}
