//! Capabilities the embedding environment provides to the carousel.
//!
//! A browser host maps these onto `window` listeners, `requestAnimationFrame` and the document
//! body's overflow style. [`HeadlessHost`] is an in-memory implementation driven explicitly by
//! tests and the CLI.
//!
//! Everything here is single-threaded: callbacks run on the host's event loop, one at a time.

use std::rc::{Rc, Weak};

use crate::foundation::core::{Size, Viewport};
use crate::render::frame::FrameRGBA;

pub mod headless;

pub use headless::{HeadlessCanvas, HeadlessHost};

/// Opaque identifier of a registered window listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

/// Opaque identifier of a pending animation frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameRequestId(pub u64);

/// Window-level events a component can listen to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Resize,
    KeyDown,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Named(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` string.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            other => Self::Named(other.to_owned()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent {
    Resize(Viewport),
    KeyDown(Key),
}

impl HostEvent {
    pub fn kind(&self) -> ListenerKind {
        match self {
            Self::Resize(_) => ListenerKind::Resize,
            Self::KeyDown(_) => ListenerKind::KeyDown,
        }
    }
}

/// Timestamp handed to animation frame callbacks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTime {
    pub index: u64,
    pub secs: f64,
}

pub type Listener = Rc<dyn Fn(&HostEvent)>;
pub type FrameCallback = Box<dyn FnOnce(FrameTime)>;

/// A request to open an outbound link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    pub url: String,
    /// Open in a new browsing context (`target="_blank"`, no opener).
    pub new_context: bool,
}

/// Window-scoped services of the embedding environment.
pub trait Host {
    fn viewport(&self) -> Viewport;

    fn add_listener(&self, kind: ListenerKind, listener: Listener) -> ListenerId;

    /// Returns `false` when `id` was not registered (already removed).
    fn remove_listener(&self, id: ListenerId) -> bool;

    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId;

    /// Returns `false` when the request already ran or was cancelled.
    fn cancel_frame(&self, id: FrameRequestId) -> bool;

    /// Suppress page scrolling. Locks nest: the page scrolls again once every
    /// acquisition has been released.
    fn acquire_scroll_lock(&self);

    fn release_scroll_lock(&self);

    fn navigate(&self, navigation: Navigation);
}

/// A 2D drawing surface sized to its parent container.
pub trait Canvas2d {
    /// Logical size of the parent container, `None` while detached.
    fn container_size(&self) -> Option<Size>;

    /// Whether a 2D context can be obtained for this surface.
    fn is_drawable(&self) -> bool {
        true
    }

    fn present(&mut self, frame: &FrameRGBA);
}

/// Scoped registration of a window listener.
///
/// The listener is removed exactly once: on [`ListenerGuard::release`] or on drop, whichever
/// comes first.
pub struct ListenerGuard {
    host: Weak<dyn Host>,
    id: Option<ListenerId>,
    kind: ListenerKind,
}

impl ListenerGuard {
    pub fn register(host: &Rc<dyn Host>, kind: ListenerKind, listener: Listener) -> Self {
        let id = host.add_listener(kind, listener);
        tracing::debug!(?kind, id = id.0, "listener registered");
        Self {
            host: Rc::downgrade(host),
            id: Some(id),
            kind,
        }
    }

    pub fn id(&self) -> Option<ListenerId> {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    pub fn release(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        if let Some(host) = self.host.upgrade() {
            let removed = host.remove_listener(id);
            tracing::debug!(kind = ?self.kind, id = id.0, removed, "listener released");
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .finish()
    }
}
