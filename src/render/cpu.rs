use std::sync::Arc;

use crate::beams::field::{Beam, BeamField, Intensity};
use crate::foundation::core::{Affine, Rgba8Premul};
use crate::foundation::error::{FolioError, FolioResult};
use crate::render::blur::GaussianBlur;
use crate::render::frame::FrameRGBA;

/// Beam gradient saturation (`hsla(h, 90%, 70%, a)`).
pub const BEAM_SATURATION: f64 = 0.9;
/// Beam gradient lightness.
pub const BEAM_LIGHTNESS: f64 = 0.7;
/// Longest gradient column rasterized per beam; longer beams are stretched.
const MAX_GRADIENT_SAMPLES: u32 = 1024;

/// Gradient stops along the beam axis as `(offset, fraction of peak opacity)`.
const BEAM_STOPS: [(f64, f64); 6] = [
    (0.0, 0.0),
    (0.1, 0.6),
    (0.4, 1.0),
    (0.6, 1.0),
    (0.9, 0.6),
    (1.0, 0.0),
];

/// Alpha of the beam gradient at `t` in `0..=1` along its length.
pub fn gradient_alpha(t: f64, peak: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    for pair in BEAM_STOPS.windows(2) {
        let (t0, a0) = pair[0];
        let (t1, a1) = pair[1];
        if t <= t1 {
            let u = if t1 > t0 { (t - t0) / (t1 - t0) } else { 1.0 };
            return peak * (a0 + (a1 - a0) * u);
        }
    }
    0.0
}

/// Options for the beam renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RendererOpts {
    pub(crate) clear_rgba: Option<[u8; 4]>,
}

impl RendererOpts {
    /// Return options with a background color painted under the beams.
    pub fn with_clear_rgba(mut self, clear: Option<[u8; 4]>) -> Self {
        self.clear_rgba = clear;
        self
    }
}

/// Rasterizes a [`BeamField`] with `vello_cpu`.
///
/// The render context and blur kernel are kept between frames and rebuilt only when the
/// surface size or blur radius changes.
pub struct BeamRenderer {
    opts: RendererOpts,
    ctx: Option<vello_cpu::RenderContext>,
    blur: Option<GaussianBlur>,
}

impl BeamRenderer {
    pub fn new(opts: RendererOpts) -> Self {
        Self {
            opts,
            ctx: None,
            blur: None,
        }
    }

    #[tracing::instrument(level = "trace", skip_all, fields(beams = field.beams().len()))]
    pub fn render(&mut self, field: &BeamField) -> FolioResult<FrameRGBA> {
        let metrics = *field.metrics();
        let width: u16 = metrics
            .backing_width
            .try_into()
            .map_err(|_| FolioError::render("surface width exceeds u16"))?;
        let height: u16 = metrics
            .backing_height
            .try_into()
            .map_err(|_| FolioError::render("surface height exceeds u16"))?;
        let intensity = field.config().intensity;

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());

        for beam in field.beams() {
            draw_beam(&mut ctx, metrics.transform, beam, intensity)?;
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);
        let mut data = pixmap.data_as_u8_slice().to_vec();
        self.ctx = Some(ctx);

        let sigma = (field.config().blur_px * metrics.dpr) as f32;
        let blur = match self.blur.take() {
            Some(blur) if blur.sigma() == sigma => blur,
            _ => GaussianBlur::new(sigma)?,
        };
        let blur = self.blur.insert(blur);
        blur.apply_in_place(&mut data, metrics.backing_width, metrics.backing_height)?;
        if let Some([r, g, b, a]) = self.opts.clear_rgba {
            composite_over(&mut data, Rgba8Premul::from_straight_rgba(r, g, b, a));
        }

        Ok(FrameRGBA {
            width: metrics.backing_width,
            height: metrics.backing_height,
            data,
            premultiplied: true,
        })
    }
}

impl Default for BeamRenderer {
    fn default() -> Self {
        Self::new(RendererOpts::default())
    }
}

impl std::fmt::Debug for BeamRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeamRenderer")
            .field("opts", &self.opts)
            .field("blur", &self.blur)
            .finish_non_exhaustive()
    }
}

fn draw_beam(
    ctx: &mut vello_cpu::RenderContext,
    surface: Affine,
    beam: &Beam,
    intensity: Intensity,
) -> FolioResult<()> {
    let peak = beam.pulsing_opacity(intensity).clamp(0.0, 1.0);
    if peak <= 0.0 || beam.width <= 0.0 || beam.length <= 0.0 {
        return Ok(());
    }

    let samples = (beam.length.ceil() as u32).clamp(1, MAX_GRADIENT_SAMPLES);
    let column = beam_column_image(beam.hue, peak, samples)?;
    let tr = surface
        * Affine::translate((beam.x, beam.y))
        * Affine::rotate(beam.angle.to_radians());

    ctx.set_transform(affine_to_cpu(tr));
    // The column is one pixel wide; padding extends it across the strip.
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::scale_non_uniform(
        1.0,
        beam.length / f64::from(samples),
    ));
    ctx.set_paint(column);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        -beam.width / 2.0,
        0.0,
        beam.width / 2.0,
        beam.length,
    ));
    Ok(())
}

fn beam_column_image(hue: f64, peak: f64, samples: u32) -> FolioResult<vello_cpu::Image> {
    let mut bytes = Vec::with_capacity(samples as usize * 4);
    for i in 0..samples {
        let t = (f64::from(i) + 0.5) / f64::from(samples);
        let c = Rgba8Premul::from_hsla(
            hue,
            BEAM_SATURATION,
            BEAM_LIGHTNESS,
            gradient_alpha(t, peak),
        );
        bytes.extend_from_slice(&c.to_array());
    }
    let pixmap = pixmap_from_premul_bytes(&bytes, 1, samples)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Source-over of premultiplied `data` onto a solid premultiplied backdrop.
///
/// An opaque backdrop yields exactly opaque pixels.
fn composite_over(data: &mut [u8], backdrop: Rgba8Premul) {
    let dst = backdrop.to_array();
    for px in data.chunks_exact_mut(4) {
        let inv = 255 - u16::from(px[3]);
        for (c, d) in px.iter_mut().zip(dst) {
            *c = c.saturating_add(((u16::from(d) * inv + 127) / 255) as u8);
        }
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> FolioResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| FolioError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| FolioError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(FolioError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
