use image::RgbaImage;

use crate::foundation::error::{GlassError, GlassResult};

const Q16_ONE: u32 = 1 << 16;
pub(crate) const MAX_RADIUS: u32 = 256;

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Separable Gaussian blur with standard deviation `sigma`, edge pixels clamped.
///
/// The kernel covers `ceil(3 * sigma)` pixels on each side. `sigma == 0` returns a copy.
pub(crate) fn gaussian_blur(src: &RgbaImage, sigma: f32) -> GlassResult<RgbaImage> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(GlassError::validation("blur sigma must be finite and >= 0"));
    }
    let radius = (3.0 * sigma).ceil() as u32;
    if radius == 0 {
        return Ok(src.clone());
    }
    if radius > MAX_RADIUS {
        return Err(GlassError::validation(format!(
            "blur radius {radius} exceeds {MAX_RADIUS}"
        )));
    }

    let kernel = kernel_q16(radius, sigma)?;
    let tmp = convolve(src, &kernel, Axis::Horizontal);
    Ok(convolve(&tmp, &kernel, Axis::Vertical))
}

/// Normalized Gaussian weights in Q16 fixed point; rounding drift lands on the centre tap.
fn kernel_q16(radius: u32, sigma: f32) -> GlassResult<Vec<u32>> {
    let r = radius as i32;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights: Vec<f64> = (-r..=r)
        .map(|i| (-f64::from(i * i) / denom).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 {
        return Err(GlassError::evaluation("gaussian kernel sum is zero"));
    }

    let mut q: Vec<u32> = weights
        .iter()
        .map(|w| ((w / sum) * f64::from(Q16_ONE)).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let total: i64 = q.iter().map(|&v| i64::from(v)).sum();
    let mid = q.len() / 2;
    q[mid] = (i64::from(q[mid]) + i64::from(Q16_ONE) - total).clamp(0, 65536) as u32;
    Ok(q)
}

fn convolve(src: &RgbaImage, kernel: &[u32], axis: Axis) -> RgbaImage {
    let (w, h) = src.dimensions();
    let radius = (kernel.len() / 2) as i64;
    RgbaImage::from_fn(w, h, |x, y| {
        let mut acc = [0u64; 4];
        for (ki, &kw) in kernel.iter().enumerate() {
            let d = ki as i64 - radius;
            let (sx, sy) = match axis {
                Axis::Horizontal => ((i64::from(x) + d).clamp(0, i64::from(w) - 1) as u32, y),
                Axis::Vertical => (x, (i64::from(y) + d).clamp(0, i64::from(h) - 1) as u32),
            };
            let px = src.get_pixel(sx, sy).0;
            for c in 0..4 {
                acc[c] += u64::from(kw) * u64::from(px[c]);
            }
        }
        image::Rgba(acc.map(q16_to_u8))
    })
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/host/blur.rs"]
mod tests;
