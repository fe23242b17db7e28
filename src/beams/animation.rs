//! The self-rescheduling frame loop that drives a [`BeamField`] on a host canvas.
//!
//! Ownership: the [`AnimationHandle`] owns the loop state. Frame and resize callbacks only hold
//! weak references plus a shared liveness flag, so once the handle is cancelled (or dropped)
//! nothing touches the canvas again.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::beams::field::{BeamConfig, BeamField, SurfaceMetrics};
use crate::foundation::error::FolioResult;
use crate::host::{Canvas2d, FrameRequestId, FrameTime, Host, HostEvent, ListenerGuard, ListenerKind};
use crate::render::cpu::{BeamRenderer, RendererOpts};

struct LoopState {
    field: BeamField,
    renderer: BeamRenderer,
    canvas: Rc<RefCell<dyn Canvas2d>>,
    pending: Option<FrameRequestId>,
    frames: u64,
}

/// Handle to a running beam animation. Dropping it tears the animation down.
pub struct AnimationHandle {
    host: Rc<dyn Host>,
    state: Rc<RefCell<LoopState>>,
    live: Rc<Cell<bool>>,
    resize: Option<ListenerGuard>,
}

/// Start animating beams on `canvas`.
///
/// Returns `Ok(None)` without scheduling anything when the canvas has no 2D context or no
/// parent container.
#[tracing::instrument(skip_all, fields(intensity = ?config.intensity, seed = config.seed))]
pub fn start(
    host: &Rc<dyn Host>,
    canvas: Rc<RefCell<dyn Canvas2d>>,
    config: BeamConfig,
    opts: RendererOpts,
) -> FolioResult<Option<AnimationHandle>> {
    config.validate()?;
    let container = {
        let c = canvas.borrow();
        if !c.is_drawable() {
            tracing::debug!("canvas has no 2d context; beams disabled");
            return Ok(None);
        }
        c.container_size()
    };
    let Some(container) = container else {
        tracing::debug!("canvas is detached; beams disabled");
        return Ok(None);
    };

    let field = BeamField::new(config, container, host.viewport().dpr());
    let state = Rc::new(RefCell::new(LoopState {
        field,
        renderer: BeamRenderer::new(opts),
        canvas,
        pending: None,
        frames: 0,
    }));
    let live = Rc::new(Cell::new(true));

    let resize = {
        let weak = Rc::downgrade(&state);
        let live = live.clone();
        ListenerGuard::register(
            host,
            ListenerKind::Resize,
            Rc::new(move |event: &HostEvent| {
                let HostEvent::Resize(viewport) = event else {
                    return;
                };
                if !live.get() {
                    return;
                }
                let Some(state) = weak.upgrade() else {
                    return;
                };
                let mut s = state.borrow_mut();
                let container = s.canvas.borrow().container_size();
                if let Some(size) = container {
                    s.field.resize(size, viewport.dpr());
                }
            }),
        )
    };

    schedule(host, &state, &live);
    Ok(Some(AnimationHandle {
        host: host.clone(),
        state,
        live,
        resize: Some(resize),
    }))
}

fn schedule(host: &Rc<dyn Host>, state: &Rc<RefCell<LoopState>>, live: &Rc<Cell<bool>>) {
    let weak_state = Rc::downgrade(state);
    let weak_host: Weak<dyn Host> = Rc::downgrade(host);
    let live_cb = live.clone();
    let id = host.request_frame(Box::new(move |time: FrameTime| {
        if !live_cb.get() {
            return;
        }
        let (Some(state), Some(host)) = (weak_state.upgrade(), weak_host.upgrade()) else {
            return;
        };
        state.borrow_mut().pending = None;
        step(&state, time);
        schedule(&host, &state, &live_cb);
    }));
    state.borrow_mut().pending = Some(id);
}

fn step(state: &Rc<RefCell<LoopState>>, time: FrameTime) {
    let mut guard = state.borrow_mut();
    let s = &mut *guard;
    s.field.tick();
    match s.renderer.render(&s.field) {
        Ok(frame) => s.canvas.borrow_mut().present(&frame),
        Err(err) => tracing::warn!(frame = time.index, error = %err, "beam frame skipped"),
    }
    s.frames += 1;
    tracing::trace!(frame = time.index, "beam frame");
}

impl AnimationHandle {
    pub fn is_live(&self) -> bool {
        self.live.get()
    }

    /// Frames drawn so far.
    pub fn frames(&self) -> u64 {
        self.state.borrow().frames
    }

    pub fn metrics(&self) -> SurfaceMetrics {
        *self.state.borrow().field.metrics()
    }

    pub fn beam_count(&self) -> usize {
        self.state.borrow().field.beams().len()
    }

    /// Read-only access to the live beam field.
    pub fn with_field<R>(&self, f: impl FnOnce(&BeamField) -> R) -> R {
        f(&self.state.borrow().field)
    }

    /// Stop the loop: cancel the pending frame and detach the resize listener.
    ///
    /// Idempotent; later calls (and the eventual drop) do nothing.
    pub fn cancel(&mut self) {
        if !self.live.replace(false) {
            return;
        }
        let pending = self.state.borrow_mut().pending.take();
        if let Some(id) = pending {
            self.host.cancel_frame(id);
        }
        if let Some(guard) = self.resize.take() {
            guard.release();
        }
        tracing::debug!(frames = self.frames(), "beam animation cancelled");
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for AnimationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationHandle")
            .field("live", &self.live.get())
            .field("resize", &self.resize)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/beams/animation.rs"]
mod tests;
