//! Time-based interpolation for the cosmetic parts of the carousel: the staggered card
//! entrance, the pulsing scrim over the beam background and smooth scrolling.
//!
//! All sampling is a pure function of elapsed seconds so hosts can drive it from any clock.

use crate::motion::ease::Ease;

/// Per-card entrance stagger.
pub const ENTRANCE_STAGGER_SECS: f64 = 0.2;
/// Duration of a single card's entrance.
pub const ENTRANCE_DURATION_SECS: f64 = 0.5;
/// Initial downward offset of an entering card, in logical units.
pub const ENTRANCE_OFFSET_Y: f64 = 20.0;

/// A single eased transition from `from` to `to`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub delay_secs: f64,
    pub duration_secs: f64,
    pub ease: Ease,
}

impl Tween {
    pub fn new(from: f64, to: f64, duration_secs: f64, ease: Ease) -> Self {
        Self {
            from,
            to,
            delay_secs: 0.0,
            duration_secs,
            ease,
        }
    }

    pub fn delayed(mut self, delay_secs: f64) -> Self {
        self.delay_secs = delay_secs.max(0.0);
        self
    }

    /// Normalized progress in `0..=1` at `t_secs`.
    pub fn progress(&self, t_secs: f64) -> f64 {
        let local = t_secs - self.delay_secs;
        if local <= 0.0 {
            return 0.0;
        }
        if self.duration_secs <= 0.0 {
            return 1.0;
        }
        (local / self.duration_secs).min(1.0)
    }

    pub fn sample(&self, t_secs: f64) -> f64 {
        let u = self.ease.apply(self.progress(t_secs));
        self.from + (self.to - self.from) * u
    }

    pub fn is_finished(&self, t_secs: f64) -> bool {
        self.progress(t_secs) >= 1.0
    }

    pub fn end_secs(&self) -> f64 {
        self.delay_secs + self.duration_secs.max(0.0)
    }
}

/// Visual state of an entering card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntranceFrame {
    pub opacity: f64,
    pub offset_y: f64,
}

/// Entrance state of the card at `index`, `t_secs` after the carousel mounted.
///
/// Cards fade in and slide up one after another; the order is purely visual.
pub fn card_entrance(index: usize, t_secs: f64) -> EntranceFrame {
    let delay = ENTRANCE_STAGGER_SECS * index as f64;
    let opacity = Tween::new(0.0, 1.0, ENTRANCE_DURATION_SECS, Ease::OutQuad).delayed(delay);
    let offset = Tween::new(ENTRANCE_OFFSET_Y, 0.0, ENTRANCE_DURATION_SECS, Ease::OutQuad)
        .delayed(delay);
    EntranceFrame {
        opacity: opacity.sample(t_secs),
        offset_y: offset.sample(t_secs),
    }
}

/// Looping opacity pulse of the dark scrim drawn above the beams.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrimPulse {
    pub low: f64,
    pub high: f64,
    pub period_secs: f64,
}

impl Default for ScrimPulse {
    fn default() -> Self {
        Self {
            low: 0.2,
            high: 0.3,
            period_secs: 10.0,
        }
    }
}

impl ScrimPulse {
    /// `low -> high -> low` over one period, eased in and out on both halves.
    pub fn opacity(&self, t_secs: f64) -> f64 {
        if self.period_secs <= 0.0 {
            return self.low;
        }
        let phase = t_secs.rem_euclid(self.period_secs) / self.period_secs;
        let (from, to, u) = if phase < 0.5 {
            (self.low, self.high, phase * 2.0)
        } else {
            (self.high, self.low, (phase - 0.5) * 2.0)
        };
        from + (to - from) * Ease::InOutQuad.apply(u)
    }
}

/// An in-flight smooth scroll between two offsets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothScroll {
    tween: Tween,
    elapsed_secs: f64,
}

impl SmoothScroll {
    pub fn new(from: f64, to: f64, duration_secs: f64) -> Self {
        Self {
            tween: Tween::new(from, to, duration_secs, Ease::InOutQuad),
            elapsed_secs: 0.0,
        }
    }

    pub fn target(&self) -> f64 {
        self.tween.to
    }

    /// Advance by `dt_secs` and return the new offset.
    pub fn advance(&mut self, dt_secs: f64) -> f64 {
        self.elapsed_secs += dt_secs.max(0.0);
        self.tween.sample(self.elapsed_secs)
    }

    pub fn is_done(&self) -> bool {
        self.tween.is_finished(self.elapsed_secs)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/motion/timeline.rs"]
mod tests;
