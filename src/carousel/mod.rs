//! Horizontal card strip: edge-aware navigation, close-resync and the context shared with cards.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::foundation::error::{FolioError, FolioResult};
use crate::host::Host;
use crate::motion::timeline::{EntranceFrame, card_entrance};

pub mod context;
pub mod scroll;

pub use context::CarouselContext;
pub use scroll::{
    HeadlessStrip, ScrollBehavior, ScrollContainer, ScrollExtent, ScrollMetrics,
};

/// Width of one card plus the gap that follows it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CardLayout {
    pub card_width: f64,
    pub gap: f64,
}

impl CardLayout {
    pub fn pitch(&self) -> f64 {
        self.card_width + self.gap
    }
}

/// Card geometry used to compute resync offsets, switched at a viewport breakpoint.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ResyncLayout {
    /// Viewports narrower than this use `narrow`.
    pub breakpoint: f64,
    pub narrow: CardLayout,
    pub wide: CardLayout,
}

impl Default for ResyncLayout {
    fn default() -> Self {
        Self {
            breakpoint: 768.0,
            narrow: CardLayout {
                card_width: 230.0,
                gap: 4.0,
            },
            wide: CardLayout {
                card_width: 384.0,
                gap: 8.0,
            },
        }
    }
}

impl ResyncLayout {
    pub fn layout_for(&self, viewport_width: f64) -> CardLayout {
        if viewport_width < self.breakpoint {
            self.narrow
        } else {
            self.wide
        }
    }

    /// Scroll offset the strip moves to after the card at `index` closes.
    pub fn resync_offset(&self, viewport_width: f64, index: usize) -> f64 {
        self.layout_for(viewport_width).pitch() * (index as f64 + 1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Offset applied when the strip mounts.
    pub initial_scroll: f64,
    /// Distance covered by one press of a navigation button.
    pub nav_step: f64,
    pub layout: ResyncLayout,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            initial_scroll: 0.0,
            nav_step: 300.0,
            layout: ResyncLayout::default(),
        }
    }
}

impl CarouselConfig {
    pub fn validate(&self) -> FolioResult<()> {
        if !self.initial_scroll.is_finite() || self.initial_scroll < 0.0 {
            return Err(FolioError::validation(
                "carousel.initial_scroll must be finite and >= 0",
            ));
        }
        if !self.nav_step.is_finite() || self.nav_step <= 0.0 {
            return Err(FolioError::validation(
                "carousel.nav_step must be finite and > 0",
            ));
        }
        let l = &self.layout;
        if !l.breakpoint.is_finite() || l.breakpoint <= 0.0 {
            return Err(FolioError::validation(
                "carousel.layout.breakpoint must be finite and > 0",
            ));
        }
        for (name, layout) in [("narrow", l.narrow), ("wide", l.wide)] {
            if !layout.card_width.is_finite() || layout.card_width <= 0.0 {
                return Err(FolioError::validation(format!(
                    "carousel.layout.{name}.card_width must be finite and > 0"
                )));
            }
            if !layout.gap.is_finite() || layout.gap < 0.0 {
                return Err(FolioError::validation(format!(
                    "carousel.layout.{name}.gap must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

struct CarouselState {
    host: Rc<dyn Host>,
    config: CarouselConfig,
    items: usize,
    container: Option<Weak<RefCell<dyn ScrollContainer>>>,
    extent: ScrollExtent,
    context: CarouselContext,
}

impl CarouselState {
    fn container(&self) -> Option<Rc<RefCell<dyn ScrollContainer>>> {
        self.container.as_ref().and_then(Weak::upgrade)
    }
}

/// The scrollable strip of cards.
pub struct Carousel {
    state: Rc<RefCell<CarouselState>>,
}

impl Carousel {
    pub fn new(host: Rc<dyn Host>, config: CarouselConfig, items: usize) -> Self {
        let state = Rc::new(RefCell::new(CarouselState {
            host,
            config,
            items,
            container: None,
            extent: ScrollExtent::default(),
            context: CarouselContext::default(),
        }));

        let weak = Rc::downgrade(&state);
        let context = CarouselContext::new(Rc::new(move |index| {
            if let Some(state) = weak.upgrade() {
                resync_after_close(&state, index);
            }
        }));
        state.borrow_mut().context = context;
        Self { state }
    }

    /// Attach the scroll container, apply the initial offset and measure.
    pub fn mount(&self, container: &Rc<RefCell<dyn ScrollContainer>>) {
        let initial = {
            let mut s = self.state.borrow_mut();
            s.container = Some(Rc::downgrade(container));
            s.config.initial_scroll
        };
        container
            .borrow_mut()
            .scroll_to(initial, ScrollBehavior::Instant);
        self.handle_scroll();
    }

    /// Recompute the edge flags from the container. Called on every scroll event.
    pub fn handle_scroll(&self) -> ScrollExtent {
        let container = self.state.borrow().container();
        let Some(container) = container else {
            return self.extent();
        };
        let metrics = container.borrow().metrics();
        let extent = ScrollExtent::from_metrics(metrics);
        self.state.borrow_mut().extent = extent;
        extent
    }

    /// Smoothly scroll one step left. Returns `false` when already at the left edge.
    pub fn scroll_left(&self) -> bool {
        self.navigate(-1.0)
    }

    /// Smoothly scroll one step right. Returns `false` when already at the right edge.
    pub fn scroll_right(&self) -> bool {
        self.navigate(1.0)
    }

    fn navigate(&self, direction: f64) -> bool {
        let extent = self.handle_scroll();
        let enabled = if direction < 0.0 {
            extent.can_scroll_left
        } else {
            extent.can_scroll_right
        };
        if !enabled {
            return false;
        }
        let (container, step) = {
            let s = self.state.borrow();
            (s.container(), s.config.nav_step)
        };
        let Some(container) = container else {
            return false;
        };
        container
            .borrow_mut()
            .scroll_by(direction * step, ScrollBehavior::Smooth);
        true
    }

    /// Scroll back to the card at `index` after its overlay closed.
    pub fn handle_card_close(&self, index: usize) {
        resync_after_close(&self.state, index);
    }

    pub fn extent(&self) -> ScrollExtent {
        self.state.borrow().extent
    }

    pub fn can_scroll_left(&self) -> bool {
        self.extent().can_scroll_left
    }

    pub fn can_scroll_right(&self) -> bool {
        self.extent().can_scroll_right
    }

    pub fn context(&self) -> CarouselContext {
        self.state.borrow().context.clone()
    }

    pub fn current_index(&self) -> usize {
        self.state.borrow().context.current_index()
    }

    pub fn item_count(&self) -> usize {
        self.state.borrow().items
    }

    pub fn config(&self) -> CarouselConfig {
        self.state.borrow().config
    }

    /// Entrance animation state of the card at `index`, `t_secs` after mount.
    pub fn entrance(&self, index: usize, t_secs: f64) -> EntranceFrame {
        card_entrance(index, t_secs)
    }
}

impl Drop for Carousel {
    fn drop(&mut self) {
        self.state.borrow().context.disconnect();
    }
}

impl std::fmt::Debug for Carousel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.state.borrow();
        f.debug_struct("Carousel")
            .field("items", &s.items)
            .field("extent", &s.extent)
            .field("context", &s.context)
            .finish_non_exhaustive()
    }
}

fn resync_after_close(state: &Rc<RefCell<CarouselState>>, index: usize) {
    let (container, viewport, layout, context) = {
        let s = state.borrow();
        (
            s.container(),
            s.host.viewport(),
            s.config.layout,
            s.context.clone(),
        )
    };
    if let Some(container) = container {
        let target = layout.resync_offset(viewport.width, index);
        tracing::debug!(index, target, viewport_width = viewport.width, "carousel resync");
        container
            .borrow_mut()
            .scroll_to(target, ScrollBehavior::Smooth);
    }
    context.set_current_index(index);
}

#[cfg(test)]
#[path = "../../tests/unit/carousel/carousel.rs"]
mod tests;
