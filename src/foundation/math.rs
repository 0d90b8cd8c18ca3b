//! Scalar geometry primitives shared by shape functions and the encoder.
//!
//! Everything here is pure and allocation-free so results are reproducible bit-for-bit.

/// Cubic Hermite ease between `edge0` and `edge1`.
///
/// `edge0 > edge1` is allowed and yields a falling curve.
pub fn smooth_step(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Euclidean norm of `(dx, dy)`.
pub fn length(dx: f64, dy: f64) -> f64 {
    (dx * dx + dy * dy).sqrt()
}

/// Signed distance from `(x, y)` to an origin-centred rounded rectangle.
///
/// Negative inside, positive outside, zero on the boundary.
pub fn rounded_rect_sdf(x: f64, y: f64, half_width: f64, half_height: f64, radius: f64) -> f64 {
    let qx = x.abs() - half_width + radius;
    let qy = y.abs() - half_height + radius;
    qx.max(qy).min(0.0) + length(qx.max(0.0), qy.max(0.0)) - radius
}

/// Byte every displacement channel takes when there is nothing to displace.
pub const NEUTRAL_CHANNEL: u8 = 128;

/// Quantize a normalized offset (`offset / max_scale`) into a texture byte.
///
/// `0.0` maps to 127.5 which rounds half-to-even to [`NEUTRAL_CHANNEL`]; `±1.0` map to the
/// ends of the range and anything beyond saturates.
pub fn quantize_unit(value: f64) -> u8 {
    if value.is_nan() {
        return NEUTRAL_CHANNEL;
    }
    (value * 127.5 + 127.5).round_ties_even().clamp(0.0, 255.0) as u8
}

/// Inverse of [`quantize_unit`] scaled back to pixels.
pub fn dequantize(byte: u8, max_scale: f64) -> f64 {
    (f64::from(byte) / 255.0) * 2.0 * max_scale - max_scale
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
