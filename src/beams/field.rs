use std::f64::consts::TAU;

use crate::foundation::core::{Affine, Size, sanitize_dpr};
use crate::foundation::error::{FolioError, FolioResult};
use crate::foundation::rng::Rng64;

/// Floor of the beam population; the live population is 1.5x this.
pub const MINIMUM_BEAMS: usize = 20;
/// Distance past the top edge a beam must travel before it is recycled.
pub const RECYCLE_MARGIN: f64 = 100.0;
/// Number of columns recycled beams are distributed across.
pub const RECYCLE_COLUMNS: usize = 3;
/// Blur drawn into the canvas itself, in logical pixels.
pub const CANVAS_BLUR_PX: f64 = 35.0;
/// Blur applied to the whole canvas element by the page.
pub const ELEMENT_BLUR_PX: f64 = 12.0;

/// Single Gaussian equivalent to the canvas blur followed by the element blur.
pub fn stacked_blur_px() -> f64 {
    CANVAS_BLUR_PX.hypot(ELEMENT_BLUR_PX)
}

/// One animated light streak, in logical surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Beam {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub length: f64,
    /// Rotation in degrees.
    pub angle: f64,
    /// Upward travel per frame.
    pub speed: f64,
    pub opacity: f64,
    pub hue: f64,
    pub pulse: f64,
    pub pulse_speed: f64,
}

impl Beam {
    /// Opacity at the current pulse phase, scaled by `intensity`.
    pub fn pulsing_opacity(&self, intensity: Intensity) -> f64 {
        self.opacity * (0.8 + self.pulse.sin() * 0.2) * intensity.opacity_multiplier()
    }

    /// Whether the whole strip has left the top of the surface.
    pub fn has_exited_top(&self) -> bool {
        self.y + self.length < -RECYCLE_MARGIN
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Subtle,
    #[default]
    Medium,
    Strong,
}

impl Intensity {
    pub fn opacity_multiplier(self) -> f64 {
        match self {
            Self::Subtle => 0.8,
            Self::Medium => 1.2,
            Self::Strong => 1.6,
        }
    }
}

impl std::str::FromStr for Intensity {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subtle" => Ok(Self::Subtle),
            "medium" => Ok(Self::Medium),
            "strong" => Ok(Self::Strong),
            other => Err(FolioError::validation(format!(
                "unknown beam intensity '{other}' (expected subtle, medium or strong)"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BeamConfig {
    pub intensity: Intensity,
    /// Gaussian blur applied to each frame, in logical pixels.
    pub blur_px: f64,
    pub seed: u64,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            intensity: Intensity::Medium,
            blur_px: stacked_blur_px(),
            seed: 0x5EED_BEA4,
        }
    }
}

impl BeamConfig {
    pub fn validate(&self) -> FolioResult<()> {
        if !self.blur_px.is_finite() || self.blur_px < 0.0 {
            return Err(FolioError::validation(
                "beams.blur_px must be finite and >= 0",
            ));
        }
        Ok(())
    }

    pub fn population(&self) -> usize {
        MINIMUM_BEAMS.max((MINIMUM_BEAMS as f64 * 1.5).floor() as usize)
    }
}

/// Logical size, device pixel ratio and the derived backing store of a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceMetrics {
    pub logical: Size,
    pub dpr: f64,
    pub backing_width: u32,
    pub backing_height: u32,
    /// Logical-to-backing transform.
    pub transform: Affine,
}

impl SurfaceMetrics {
    pub fn new(logical: Size, dpr: f64) -> Self {
        let mut m = Self {
            logical: Size::ZERO,
            dpr: 1.0,
            backing_width: 1,
            backing_height: 1,
            transform: Affine::IDENTITY,
        };
        m.resize(logical, dpr);
        m
    }

    /// Recompute the backing store for a new container size.
    ///
    /// The transform is reset to identity before the dpr scale is applied, so it never
    /// compounds across resizes.
    pub fn resize(&mut self, logical: Size, dpr: f64) {
        let dpr = sanitize_dpr(dpr);
        let w = if logical.width.is_finite() {
            logical.width.max(0.0)
        } else {
            0.0
        };
        let h = if logical.height.is_finite() {
            logical.height.max(0.0)
        } else {
            0.0
        };
        self.logical = Size::new(w, h);
        self.dpr = dpr;
        self.backing_width = ((w * dpr).floor() as u32).max(1);
        self.backing_height = ((h * dpr).floor() as u32).max(1);
        self.transform = Affine::IDENTITY;
        self.transform = Affine::scale(dpr) * self.transform;
    }
}

/// The live beam population of one surface.
#[derive(Clone, Debug)]
pub struct BeamField {
    config: BeamConfig,
    rng: Rng64,
    metrics: SurfaceMetrics,
    beams: Vec<Beam>,
    generation: u64,
}

impl BeamField {
    pub fn new(config: BeamConfig, logical: Size, dpr: f64) -> Self {
        let mut field = Self {
            config,
            rng: Rng64::new(config.seed),
            metrics: SurfaceMetrics::new(logical, dpr),
            beams: Vec::new(),
            generation: 0,
        };
        field.regenerate();
        field
    }

    pub fn config(&self) -> &BeamConfig {
        &self.config
    }

    pub fn metrics(&self) -> &SurfaceMetrics {
        &self.metrics
    }

    pub fn beams(&self) -> &[Beam] {
        &self.beams
    }

    /// Incremented every time the population is rebuilt.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Resize the surface and replace the whole population.
    pub fn resize(&mut self, logical: Size, dpr: f64) {
        self.metrics.resize(logical, dpr);
        self.regenerate();
    }

    fn regenerate(&mut self) {
        let Size { width, height } = self.metrics.logical;
        let total = self.config.population();
        let rng = &mut self.rng;
        self.beams = (0..total).map(|_| spawn_beam(rng, width, height)).collect();
        self.generation += 1;
        tracing::debug!(
            beams = total,
            width,
            height,
            dpr = self.metrics.dpr,
            generation = self.generation,
            "beam population rebuilt"
        );
    }

    /// Advance every beam by one frame, recycling the ones that left the top edge.
    ///
    /// Returns how many beams were recycled.
    pub fn tick(&mut self) -> usize {
        let Size { width, height } = self.metrics.logical;
        let total = self.beams.len();
        let Self { beams, rng, .. } = self;

        let mut recycled = 0;
        for (index, beam) in beams.iter_mut().enumerate() {
            beam.y -= beam.speed;
            beam.pulse += beam.pulse_speed;
            if beam.has_exited_top() {
                recycle_beam(rng, beam, index, total, width, height);
                recycled += 1;
            }
        }
        recycled
    }
}

fn spawn_beam(rng: &mut Rng64, width: f64, height: f64) -> Beam {
    Beam {
        x: rng.range(-0.25 * width, 1.25 * width),
        y: rng.range(-0.25 * height, 1.25 * height),
        width: rng.range(30.0, 90.0),
        length: height * 2.5,
        angle: rng.range(-35.0, -25.0),
        speed: rng.range(0.6, 1.8),
        opacity: rng.range(0.12, 0.28),
        hue: rng.range(190.0, 260.0),
        pulse: rng.range(0.0, TAU),
        pulse_speed: rng.range(0.02, 0.05),
    }
}

fn recycle_beam(
    rng: &mut Rng64,
    beam: &mut Beam,
    index: usize,
    total: usize,
    width: f64,
    height: f64,
) {
    let column = (index % RECYCLE_COLUMNS) as f64;
    let spacing = width / RECYCLE_COLUMNS as f64;

    beam.y = height + RECYCLE_MARGIN;
    beam.x = column * spacing + spacing / 2.0 + rng.range(-spacing / 4.0, spacing / 4.0);
    beam.width = rng.range(100.0, 220.0);
    beam.speed = rng.range(0.5, 0.9);
    beam.hue = 160.0 + (index as f64 * 120.0) / total.max(1) as f64;
    beam.opacity = rng.range(0.35, 0.55);
}

#[cfg(test)]
#[path = "../../tests/unit/beams/field.rs"]
mod tests;
