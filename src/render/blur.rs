use rayon::prelude::*;

use crate::foundation::error::{GlassError, GlassResult};

/// Gaussian blur of a premultiplied RGBA8 buffer with the given sigma.
///
/// The kernel radius is `ceil(3 * sigma)`. A sigma of zero returns the input unchanged.
/// Rows (then columns) are processed in parallel.
pub fn gaussian_blur_premul(src: &[u8], width: u32, height: u32, sigma: f32) -> GlassResult<Vec<u8>> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| GlassError::render("blur buffer size overflow"))?;
    if src.len() != expected {
        return Err(GlassError::render(format!(
            "blur expects {expected} bytes for {width}x{height}, got {}",
            src.len()
        )));
    }
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(GlassError::validation("blur sigma must be finite and >= 0"));
    }
    if sigma == 0.0 || width == 0 || height == 0 {
        return Ok(src.to_vec());
    }

    let radius = (sigma * 3.0).ceil() as usize;
    let kernel = kernel_q16(radius, sigma);
    let stride = width as usize * 4;

    let mut tmp = vec![0u8; expected];
    tmp.par_chunks_mut(stride)
        .zip(src.par_chunks(stride))
        .for_each(|(dst_row, src_row)| blur_row(src_row, dst_row, &kernel));

    // Vertical pass reads the whole intermediate buffer, one output row per task.
    let h = height as usize;
    let mut out = vec![0u8; expected];
    out.par_chunks_mut(stride).enumerate().for_each(|(y, dst_row)| {
        for x in 0..width as usize {
            let mut acc = [0u64; 4];
            for (ki, &kw) in kernel.iter().enumerate() {
                let sy = (y + ki).saturating_sub(radius).min(h - 1);
                let idx = sy * stride + x * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(tmp[idx + c]);
                }
            }
            for c in 0..4 {
                dst_row[x * 4 + c] = q16_to_u8(acc[c]);
            }
        }
    });
    Ok(out)
}

fn blur_row(src: &[u8], dst: &mut [u8], kernel: &[u32]) {
    let radius = kernel.len() / 2;
    let w = src.len() / 4;
    for x in 0..w {
        let mut acc = [0u64; 4];
        for (ki, &kw) in kernel.iter().enumerate() {
            let sx = (x + ki).saturating_sub(radius).min(w - 1);
            for c in 0..4 {
                acc[c] += u64::from(kw) * u64::from(src[sx * 4 + c]);
            }
        }
        for c in 0..4 {
            dst[x * 4 + c] = q16_to_u8(acc[c]);
        }
    }
}

/// Normalised kernel in Q16 fixed point; weights sum to exactly `1 << 16`.
fn kernel_q16(radius: usize, sigma: f32) -> Vec<u32> {
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let r = radius as i64;
    let weights: Vec<f64> = (-r..=r)
        .map(|i| (-(i as f64).powi(2) / denom).exp())
        .collect();
    let sum: f64 = weights.iter().sum();

    let mut q: Vec<u32> = weights
        .iter()
        .map(|w| ((w / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let total: i64 = q.iter().map(|v| i64::from(*v)).sum();
    let mid = q.len() / 2;
    q[mid] = (i64::from(q[mid]) + 65536 - total).clamp(0, 65536) as u32;
    q
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}
