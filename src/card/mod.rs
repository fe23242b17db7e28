//! A project card: compact face in the strip, expandable into a detail overlay.

use std::cell::RefCell;
use std::rc::Rc;

use crate::beams::animation::{self, AnimationHandle};
use crate::beams::field::BeamConfig;
use crate::carousel::CarouselContext;
use crate::foundation::error::{FolioError, FolioResult};
use crate::host::{Canvas2d, Host, HostEvent, Key, ListenerGuard, ListenerKind, Navigation};
use crate::render::cpu::RendererOpts;

/// Immutable display record of one project.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CardData {
    /// Image reference, passed through untouched.
    pub src: String,
    pub title: String,
    pub description: String,
    /// Outbound link, opened in a new browsing context.
    pub link: String,
}

impl CardData {
    pub fn validate(&self) -> FolioResult<()> {
        if self.title.trim().is_empty() {
            return Err(FolioError::validation("card title must be non-empty"));
        }
        if self.link.trim().is_empty() {
            return Err(FolioError::validation(format!(
                "card '{}' link must be non-empty",
                self.title
            )));
        }
        Ok(())
    }
}

/// What a pointer activation landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardTarget {
    /// The compact card face in the strip.
    Face,
    /// The "View Project" link on the face.
    FaceLink,
    /// The overlay's dismiss button.
    CloseButton,
    /// The "View" link inside the overlay.
    OverlayLink,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Opened,
    Closed,
    Navigated(Navigation),
    Ignored,
}

/// Content of an open overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayView {
    pub title: String,
    pub description: String,
    pub link: String,
}

struct CardState {
    data: Rc<CardData>,
    index: usize,
    open: bool,
    lock_held: bool,
    host: Rc<dyn Host>,
    context: CarouselContext,
}

/// Overlay controller for one card.
///
/// The card owns its open flag; the carousel only learns about closes through the shared
/// context. While open, the card holds one page scroll lock.
pub struct Card {
    state: Rc<RefCell<CardState>>,
    escape: Option<ListenerGuard>,
    background: Option<AnimationHandle>,
}

impl Card {
    pub fn mount(
        host: &Rc<dyn Host>,
        data: CardData,
        index: usize,
        context: CarouselContext,
    ) -> Self {
        let state = Rc::new(RefCell::new(CardState {
            data: Rc::new(data),
            index,
            open: false,
            lock_held: false,
            host: host.clone(),
            context,
        }));

        let weak = Rc::downgrade(&state);
        let escape = ListenerGuard::register(
            host,
            ListenerKind::KeyDown,
            Rc::new(move |event: &HostEvent| {
                if !matches!(event, HostEvent::KeyDown(Key::Escape)) {
                    return;
                }
                if let Some(state) = weak.upgrade() {
                    close_card(&state);
                }
            }),
        );

        Self {
            state,
            escape: Some(escape),
            background: None,
        }
    }

    /// Start the beam background on `canvas`. Returns whether an animation is running.
    pub fn attach_background(
        &mut self,
        canvas: Rc<RefCell<dyn Canvas2d>>,
        config: BeamConfig,
        opts: RendererOpts,
    ) -> FolioResult<bool> {
        let host = self.state.borrow().host.clone();
        self.background = animation::start(&host, canvas, config, opts)?;
        Ok(self.background.is_some())
    }

    pub fn background(&self) -> Option<&AnimationHandle> {
        self.background.as_ref()
    }

    pub fn index(&self) -> usize {
        self.state.borrow().index
    }

    pub fn data(&self) -> Rc<CardData> {
        self.state.borrow().data.clone()
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().open
    }

    /// Open the overlay. Returns `false` if it was already open.
    pub fn open(&self) -> bool {
        let host = {
            let mut s = self.state.borrow_mut();
            if s.open {
                return false;
            }
            s.open = true;
            if s.lock_held {
                None
            } else {
                s.lock_held = true;
                Some(s.host.clone())
            }
        };
        if let Some(host) = host {
            host.acquire_scroll_lock();
        }
        tracing::debug!(index = self.index(), "card opened");
        true
    }

    /// Close the overlay and notify the carousel. Returns `false` if it was not open.
    pub fn close(&self) -> bool {
        close_card(&self.state)
    }

    pub fn click(&self, target: CardTarget) -> ClickOutcome {
        match target {
            CardTarget::Face => {
                if self.open() {
                    ClickOutcome::Opened
                } else {
                    ClickOutcome::Ignored
                }
            }
            CardTarget::CloseButton => {
                if self.close() {
                    ClickOutcome::Closed
                } else {
                    ClickOutcome::Ignored
                }
            }
            CardTarget::OverlayLink if !self.is_open() => ClickOutcome::Ignored,
            // Link activation never reaches the face: no toggle.
            CardTarget::FaceLink | CardTarget::OverlayLink => {
                ClickOutcome::Navigated(self.follow_link())
            }
        }
    }

    fn follow_link(&self) -> Navigation {
        let (host, url) = {
            let s = self.state.borrow();
            (s.host.clone(), s.data.link.clone())
        };
        let navigation = Navigation {
            url,
            new_context: true,
        };
        host.navigate(navigation.clone());
        navigation
    }

    /// Overlay content, `None` while closed.
    pub fn overlay(&self) -> Option<OverlayView> {
        let s = self.state.borrow();
        s.open.then(|| OverlayView {
            title: s.data.title.clone(),
            description: s.data.description.clone(),
            link: s.data.link.clone(),
        })
    }

    pub fn has_escape_listener(&self) -> bool {
        self.escape.as_ref().is_some_and(ListenerGuard::is_active)
    }
}

impl Drop for Card {
    fn drop(&mut self) {
        if let Some(guard) = self.escape.take() {
            guard.release();
        }
        let host = {
            let mut s = self.state.borrow_mut();
            s.open = false;
            std::mem::take(&mut s.lock_held).then(|| s.host.clone())
        };
        if let Some(host) = host {
            host.release_scroll_lock();
        }
    }
}

impl std::fmt::Debug for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.state.borrow();
        f.debug_struct("Card")
            .field("index", &s.index)
            .field("title", &s.data.title)
            .field("open", &s.open)
            .field("background", &self.background)
            .finish_non_exhaustive()
    }
}

fn close_card(state: &Rc<RefCell<CardState>>) -> bool {
    let (index, context, release) = {
        let mut s = state.borrow_mut();
        if !s.open {
            return false;
        }
        s.open = false;
        let release = std::mem::take(&mut s.lock_held).then(|| s.host.clone());
        (s.index, s.context.clone(), release)
    };
    if let Some(host) = release {
        host.release_scroll_lock();
    }
    tracing::debug!(index, "card closed");
    context.on_card_close(index);
    true
}

#[cfg(test)]
#[path = "../../tests/unit/card/card.rs"]
mod tests;
