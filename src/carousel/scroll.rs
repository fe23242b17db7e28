use crate::motion::timeline::SmoothScroll;

/// Default duration of a smooth scroll in the headless strip.
pub const SMOOTH_SCROLL_SECS: f64 = 0.3;

/// Geometry of a horizontally scrollable container (`scrollLeft`, `scrollWidth`, `clientWidth`).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollMetrics {
    pub offset: f64,
    pub scroll_width: f64,
    pub client_width: f64,
}

impl ScrollMetrics {
    pub fn max_offset(&self) -> f64 {
        (self.scroll_width - self.client_width).max(0.0)
    }
}

/// Whether each navigation button is enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScrollExtent {
    pub can_scroll_left: bool,
    pub can_scroll_right: bool,
}

impl ScrollExtent {
    pub fn from_metrics(m: ScrollMetrics) -> Self {
        Self {
            can_scroll_left: m.offset > 0.0,
            can_scroll_right: m.offset < m.scroll_width - m.client_width,
        }
    }
}

impl Default for ScrollExtent {
    /// Before the first measurement the strip is assumed to start at its left edge.
    fn default() -> Self {
        Self {
            can_scroll_left: false,
            can_scroll_right: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// The scrollable strip hosting the cards.
pub trait ScrollContainer {
    fn metrics(&self) -> ScrollMetrics;

    fn scroll_to(&mut self, left: f64, behavior: ScrollBehavior);

    fn scroll_by(&mut self, delta: f64, behavior: ScrollBehavior) {
        let m = self.metrics();
        self.scroll_to(m.offset + delta, behavior);
    }
}

/// In-memory scroll container that animates smooth scrolls when advanced.
#[derive(Clone, Debug)]
pub struct HeadlessStrip {
    offset: f64,
    scroll_width: f64,
    client_width: f64,
    smooth: Option<SmoothScroll>,
    smooth_secs: f64,
}

impl HeadlessStrip {
    pub fn new(scroll_width: f64, client_width: f64) -> Self {
        Self {
            offset: 0.0,
            scroll_width,
            client_width,
            smooth: None,
            smooth_secs: SMOOTH_SCROLL_SECS,
        }
    }

    /// Strip holding `count` cards laid out with `layout`, inside a viewport of `client_width`.
    pub fn for_cards(count: usize, layout: crate::carousel::CardLayout, client_width: f64) -> Self {
        let content = count as f64 * (layout.card_width + layout.gap);
        Self::new(content.max(client_width), client_width)
    }

    pub fn with_smooth_secs(mut self, secs: f64) -> Self {
        self.smooth_secs = secs.max(0.0);
        self
    }

    /// Change the content or viewport width; the offset is re-clamped.
    pub fn set_extent(&mut self, scroll_width: f64, client_width: f64) {
        self.scroll_width = scroll_width;
        self.client_width = client_width;
        self.offset = self.clamp(self.offset);
    }

    pub fn is_scrolling(&self) -> bool {
        self.smooth.is_some()
    }

    /// Step an in-flight smooth scroll. Returns whether the offset moved.
    pub fn advance(&mut self, dt_secs: f64) -> bool {
        let Some(smooth) = self.smooth.as_mut() else {
            return false;
        };
        let before = self.offset;
        let next = smooth.advance(dt_secs);
        if smooth.is_done() {
            self.smooth = None;
        }
        self.offset = self.clamp(next);
        self.offset != before
    }

    fn clamp(&self, offset: f64) -> f64 {
        let max = (self.scroll_width - self.client_width).max(0.0);
        offset.clamp(0.0, max)
    }
}

impl ScrollContainer for HeadlessStrip {
    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            offset: self.offset,
            scroll_width: self.scroll_width,
            client_width: self.client_width,
        }
    }

    fn scroll_to(&mut self, left: f64, behavior: ScrollBehavior) {
        let target = self.clamp(left);
        match behavior {
            ScrollBehavior::Instant => {
                self.smooth = None;
                self.offset = target;
            }
            ScrollBehavior::Smooth if self.smooth_secs <= 0.0 => {
                self.smooth = None;
                self.offset = target;
            }
            ScrollBehavior::Smooth => {
                self.smooth = if target == self.offset {
                    None
                } else {
                    Some(SmoothScroll::new(self.offset, target, self.smooth_secs))
                };
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/carousel/scroll.rs"]
mod tests;
