use crate::foundation::error::{FolioError, FolioResult};

/// Upper bound on the kernel half-width, whatever sigma asks for.
pub const MAX_BLUR_RADIUS: u32 = 256;

/// Separable Gaussian blur over premultiplied RGBA8 buffers.
///
/// The kernel is fixed-point (Q16) and built once; the scratch row buffer is reused across
/// frames of the same size.
#[derive(Clone, Debug)]
pub struct GaussianBlur {
    sigma: f32,
    radius: u32,
    kernel: Vec<u32>,
    scratch: Vec<u8>,
}

impl GaussianBlur {
    /// Kernel covering three standard deviations on each side.
    pub fn new(sigma: f32) -> FolioResult<Self> {
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(FolioError::validation("blur sigma must be finite and >= 0"));
        }
        let radius = ((sigma * 3.0).ceil() as u32).min(MAX_BLUR_RADIUS);
        let kernel = gaussian_kernel_q16(radius, sigma)?;
        Ok(Self {
            sigma,
            radius,
            kernel,
            scratch: Vec::new(),
        })
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn apply_in_place(&mut self, data: &mut [u8], width: u32, height: u32) -> FolioResult<()> {
        let expected_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| FolioError::render("blur buffer size overflow"))?;
        if data.len() != expected_len {
            return Err(FolioError::render(
                "blur expects a buffer matching width*height*4",
            ));
        }
        if self.radius == 0 || expected_len == 0 {
            return Ok(());
        }

        let (w, h) = (width as usize, height as usize);
        self.scratch.resize(expected_len, 0);
        // Rows into scratch, then columns back into the frame.
        convolve_axis(data, &mut self.scratch, h, w, 1, w, &self.kernel);
        convolve_axis(&self.scratch, data, w, h, w, 1, &self.kernel);
        Ok(())
    }
}

/// Normalized Q16 taps for `-radius..=radius`; rounding drift lands on the center tap.
fn gaussian_kernel_q16(radius: u32, sigma: f32) -> FolioResult<Vec<u32>> {
    const ONE: i64 = 1 << 16;
    if radius == 0 || sigma == 0.0 {
        return Ok(vec![ONE as u32]);
    }

    let two_var = 2.0 * f64::from(sigma).powi(2);
    let r = i64::from(radius);
    let raw: Vec<f64> = (-r..=r)
        .map(|i| (-((i * i) as f64) / two_var).exp())
        .collect();
    let total: f64 = raw.iter().sum();
    if total <= 0.0 {
        return Err(FolioError::render("gaussian kernel sum is zero"));
    }

    let mut taps: Vec<i64> = raw
        .iter()
        .map(|w| ((w / total) * ONE as f64).round() as i64)
        .collect();
    let drift = ONE - taps.iter().sum::<i64>();
    taps[radius as usize] = (taps[radius as usize] + drift).clamp(0, ONE);
    Ok(taps.into_iter().map(|t| t.clamp(0, ONE) as u32).collect())
}

/// One 1-D pass along `lines` independent runs of `len` pixels.
///
/// Consecutive pixels of a run are `stride` pixels apart and runs start `line_step` pixels
/// apart. Edges clamp to the first and last pixel of the run.
fn convolve_axis(
    src: &[u8],
    dst: &mut [u8],
    lines: usize,
    len: usize,
    stride: usize,
    line_step: usize,
    kernel: &[u32],
) {
    let radius = kernel.len() / 2;
    let last = len - 1;
    for line in 0..lines {
        let base = line * line_step;
        for i in 0..len {
            let mut acc = [0u64; 4];
            for (k, &weight) in kernel.iter().enumerate() {
                let at = (base + (i + k).saturating_sub(radius).min(last) * stride) * 4;
                for (sum, &v) in acc.iter_mut().zip(&src[at..at + 4]) {
                    *sum += u64::from(weight) * u64::from(v);
                }
            }
            let out = (base + i * stride) * 4;
            for (d, sum) in dst[out..out + 4].iter_mut().zip(acc) {
                *d = ((sum + (1 << 15)) >> 16).min(255) as u8;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
