use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::foundation::core::{Size, Viewport};
use crate::host::{
    Canvas2d, FrameCallback, FrameRequestId, FrameTime, Host, HostEvent, Listener, ListenerId,
    ListenerKind, Navigation,
};
use crate::render::frame::FrameRGBA;

/// In-memory host: events are dispatched and frames are run only when asked.
pub struct HeadlessHost {
    viewport: Cell<Viewport>,
    next_id: Cell<u64>,
    listeners: RefCell<BTreeMap<u64, (ListenerKind, Listener)>>,
    frames: RefCell<BTreeMap<u64, FrameCallback>>,
    frame_index: Cell<u64>,
    frame_interval_secs: f64,
    scroll_locks: Cell<u32>,
    stale_removals: Cell<u32>,
    navigations: RefCell<Vec<Navigation>>,
}

impl HeadlessHost {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport: Cell::new(viewport),
            next_id: Cell::new(1),
            listeners: RefCell::new(BTreeMap::new()),
            frames: RefCell::new(BTreeMap::new()),
            frame_index: Cell::new(0),
            frame_interval_secs: 1.0 / 60.0,
            scroll_locks: Cell::new(0),
            stale_removals: Cell::new(0),
            navigations: RefCell::new(Vec::new()),
        }
    }

    fn alloc_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    /// Deliver `event` to every listener of its kind.
    ///
    /// Listeners removed by an earlier listener during the same dispatch are skipped.
    pub fn dispatch(&self, event: &HostEvent) -> usize {
        let kind = event.kind();
        let ids: Vec<u64> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, (k, _))| *k == kind)
            .map(|(id, _)| *id)
            .collect();

        let mut delivered = 0;
        for id in ids {
            let listener = self.listeners.borrow().get(&id).map(|(_, l)| l.clone());
            if let Some(listener) = listener {
                listener(event);
                delivered += 1;
            }
        }
        delivered
    }

    pub fn resize(&self, viewport: Viewport) -> usize {
        self.viewport.set(viewport);
        self.dispatch(&HostEvent::Resize(viewport))
    }

    pub fn press_key(&self, key: &str) -> usize {
        self.dispatch(&HostEvent::KeyDown(crate::host::Key::from_dom(key)))
    }

    /// Run every frame callback pending at the start of this call.
    ///
    /// Callbacks requested while running are deferred to the next frame, matching
    /// `requestAnimationFrame`.
    pub fn run_frame(&self) -> usize {
        let index = self.frame_index.get();
        self.frame_index.set(index + 1);
        let time = FrameTime {
            index,
            secs: index as f64 * self.frame_interval_secs,
        };

        let ids: Vec<u64> = self.frames.borrow().keys().copied().collect();
        let mut ran = 0;
        for id in ids {
            let callback = self.frames.borrow_mut().remove(&id);
            if let Some(callback) = callback {
                callback(time);
                ran += 1;
            }
        }
        tracing::trace!(frame = index, ran, "headless frame");
        ran
    }

    pub fn run_frames(&self, n: usize) -> usize {
        (0..n).map(|_| self.run_frame()).sum()
    }

    pub fn frame_interval_secs(&self) -> f64 {
        self.frame_interval_secs
    }

    pub fn listener_count(&self, kind: ListenerKind) -> usize {
        self.listeners
            .borrow()
            .values()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locks.get() > 0
    }

    pub fn scroll_lock_depth(&self) -> u32 {
        self.scroll_locks.get()
    }

    /// Number of `remove_listener` calls for ids that were not registered.
    pub fn stale_removals(&self) -> u32 {
        self.stale_removals.get()
    }

    pub fn navigations(&self) -> Vec<Navigation> {
        self.navigations.borrow().clone()
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl Host for HeadlessHost {
    fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    fn add_listener(&self, kind: ListenerKind, listener: Listener) -> ListenerId {
        let id = self.alloc_id();
        self.listeners.borrow_mut().insert(id, (kind, listener));
        ListenerId(id)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let removed = self.listeners.borrow_mut().remove(&id.0).is_some();
        if !removed {
            self.stale_removals.set(self.stale_removals.get() + 1);
        }
        removed
    }

    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId {
        let id = self.alloc_id();
        self.frames.borrow_mut().insert(id, callback);
        FrameRequestId(id)
    }

    fn cancel_frame(&self, id: FrameRequestId) -> bool {
        self.frames.borrow_mut().remove(&id.0).is_some()
    }

    fn acquire_scroll_lock(&self) {
        self.scroll_locks.set(self.scroll_locks.get() + 1);
    }

    fn release_scroll_lock(&self) {
        let depth = self.scroll_locks.get();
        if depth == 0 {
            tracing::warn!("scroll lock released while not held");
            return;
        }
        self.scroll_locks.set(depth - 1);
    }

    fn navigate(&self, navigation: Navigation) {
        tracing::debug!(url = %navigation.url, "navigation requested");
        self.navigations.borrow_mut().push(navigation);
    }
}

/// Canvas that keeps the last presented frame in memory.
#[derive(Debug, Default)]
pub struct HeadlessCanvas {
    container: Option<Size>,
    drawable: bool,
    presented: usize,
    last: Option<FrameRGBA>,
}

impl HeadlessCanvas {
    pub fn new(container: Size) -> Self {
        Self {
            container: Some(container),
            drawable: true,
            presented: 0,
            last: None,
        }
    }

    /// A canvas with no parent container.
    pub fn detached() -> Self {
        Self {
            container: None,
            drawable: true,
            ..Self::default()
        }
    }

    /// A canvas whose 2D context cannot be obtained.
    pub fn without_context(container: Size) -> Self {
        Self {
            drawable: false,
            ..Self::new(container)
        }
    }

    pub fn set_container_size(&mut self, container: Option<Size>) {
        self.container = container;
    }

    pub fn presented(&self) -> usize {
        self.presented
    }

    pub fn last_frame(&self) -> Option<&FrameRGBA> {
        self.last.as_ref()
    }
}

impl Canvas2d for HeadlessCanvas {
    fn container_size(&self) -> Option<Size> {
        self.container
    }

    fn is_drawable(&self) -> bool {
        self.drawable
    }

    fn present(&mut self, frame: &FrameRGBA) {
        self.presented += 1;
        self.last = Some(frame.clone());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/headless.rs"]
mod tests;
