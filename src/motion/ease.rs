/// Timing curves of the page's transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ease {
    /// Decelerating quadratic (`easeOut`): card entrances.
    OutQuad,
    /// Symmetric quadratic (`easeInOut`): scrim pulse and smooth scrolling.
    InOutQuad,
}

impl Ease {
    /// Map progress in `0..=1` to eased progress; input outside the range is clamped.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::OutQuad => t * (2.0 - t),
            Self::InOutQuad if t < 0.5 => 2.0 * t * t,
            Self::InOutQuad => {
                let r = 1.0 - t;
                1.0 - 2.0 * r * r
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/motion/ease.rs"]
mod tests;
