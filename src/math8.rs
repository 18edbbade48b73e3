//! 8-bit integer helpers used by the effects and the packing step.

/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// Uses integer math for efficiency on embedded systems.
#[inline]
#[allow(clippy::cast_lossless)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Saturating add, clamped to 255
#[inline]
pub const fn qadd8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Saturating subtract, clamped to 0
#[inline]
pub const fn qsub8(a: u8, b: u8) -> u8 {
    a.saturating_sub(b)
}

/// Convert a unit factor (0.0-1.0) into an 8-bit scale
///
/// Values outside the range are clamped.
#[inline]
pub fn unit_to_scale8(factor: f32) -> u8 {
    if factor <= 0.0 {
        0
    } else if factor >= 1.0 {
        255
    } else {
        (factor * 255.0 + 0.5) as u8
    }
}
