use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::beams::field::Intensity;
use crate::foundation::core::{Size, Viewport};
use crate::host::{HeadlessCanvas, HeadlessHost};

struct Rig {
    host: Rc<HeadlessHost>,
    dyn_host: Rc<dyn Host>,
    canvas: Rc<RefCell<HeadlessCanvas>>,
}

fn rig(container: HeadlessCanvas) -> Rig {
    let host = Rc::new(HeadlessHost::new(Viewport::new(800.0, 600.0, 1.0).unwrap()));
    let dyn_host: Rc<dyn Host> = host.clone();
    Rig {
        host,
        dyn_host,
        canvas: Rc::new(RefCell::new(container)),
    }
}

fn quick_config() -> BeamConfig {
    BeamConfig {
        intensity: Intensity::Medium,
        blur_px: 0.0,
        seed: 3,
    }
}

fn start_on(rig: &Rig) -> Option<AnimationHandle> {
    start(
        &rig.dyn_host,
        rig.canvas.clone(),
        quick_config(),
        RendererOpts::default(),
    )
    .unwrap()
}

#[test]
fn loop_draws_one_frame_per_host_frame() {
    let rig = rig(HeadlessCanvas::new(Size::new(24.0, 16.0)));
    let handle = start_on(&rig).unwrap();
    assert_eq!(rig.host.pending_frames(), 1);
    assert_eq!(rig.host.listener_count(ListenerKind::Resize), 1);

    rig.host.run_frames(5);
    assert_eq!(handle.frames(), 5);
    assert_eq!(rig.canvas.borrow().presented(), 5);
    assert_eq!(rig.host.pending_frames(), 1);
    let frame = rig.canvas.borrow().last_frame().cloned().unwrap();
    assert_eq!((frame.width, frame.height), (24, 16));
}

#[test]
fn cancel_stops_frames_and_detaches_listener_once() {
    let rig = rig(HeadlessCanvas::new(Size::new(24.0, 16.0)));
    let mut handle = start_on(&rig).unwrap();
    rig.host.run_frames(2);

    handle.cancel();
    assert!(!handle.is_live());
    assert_eq!(rig.host.pending_frames(), 0);
    assert_eq!(rig.host.listener_count(ListenerKind::Resize), 0);

    handle.cancel();
    drop(handle);
    assert_eq!(rig.host.stale_removals(), 0);

    rig.host.run_frames(3);
    rig.host.resize(Viewport::new(100.0, 100.0, 2.0).unwrap());
    assert_eq!(rig.canvas.borrow().presented(), 2);
}

#[test]
fn dropping_the_handle_is_teardown() {
    let rig = rig(HeadlessCanvas::new(Size::new(24.0, 16.0)));
    {
        let _handle = start_on(&rig).unwrap();
        rig.host.run_frame();
    }
    assert_eq!(rig.host.pending_frames(), 0);
    assert_eq!(rig.host.listener_count(ListenerKind::Resize), 0);
    assert_eq!(rig.host.run_frames(2), 0);
    assert_eq!(rig.canvas.borrow().presented(), 1);
}

#[test]
fn resize_rebuilds_population_at_new_density() {
    let rig = rig(HeadlessCanvas::new(Size::new(24.0, 16.0)));
    let handle = start_on(&rig).unwrap();
    let first_generation = handle.with_field(|f| f.generation());

    rig.canvas
        .borrow_mut()
        .set_container_size(Some(Size::new(40.0, 20.0)));
    rig.host.resize(Viewport::new(800.0, 600.0, 2.0).unwrap());

    let m = handle.metrics();
    assert_eq!((m.backing_width, m.backing_height), (80, 40));
    assert_eq!(handle.beam_count(), 30);
    assert_eq!(handle.with_field(|f| f.generation()), first_generation + 1);

    rig.host.run_frame();
    let frame = rig.canvas.borrow().last_frame().cloned().unwrap();
    assert_eq!((frame.width, frame.height), (80, 40));
}

#[test]
fn resize_without_container_is_ignored() {
    let rig = rig(HeadlessCanvas::new(Size::new(24.0, 16.0)));
    let handle = start_on(&rig).unwrap();
    rig.canvas.borrow_mut().set_container_size(None);
    rig.host.resize(Viewport::new(10.0, 10.0, 3.0).unwrap());
    assert_eq!(handle.metrics().backing_width, 24);
    assert_eq!(handle.with_field(|f| f.generation()), 1);
}

#[test]
fn setup_aborts_silently_without_context_or_container() {
    let rig = rig(HeadlessCanvas::without_context(Size::new(10.0, 10.0)));
    assert!(start_on(&rig).is_none());
    assert_eq!(rig.host.pending_frames(), 0);
    assert_eq!(rig.host.listener_count(ListenerKind::Resize), 0);

    let rig = rig_detached();
    assert!(start_on(&rig).is_none());
    assert_eq!(rig.host.pending_frames(), 0);
}

fn rig_detached() -> Rig {
    rig(HeadlessCanvas::detached())
}

#[test]
fn independent_instances_do_not_interfere() {
    let rig = rig(HeadlessCanvas::new(Size::new(12.0, 12.0)));
    let other_canvas = Rc::new(RefCell::new(HeadlessCanvas::new(Size::new(12.0, 12.0))));
    let a = start_on(&rig).unwrap();
    let mut b = start(
        &rig.dyn_host,
        other_canvas.clone(),
        quick_config(),
        RendererOpts::default(),
    )
    .unwrap()
    .unwrap();

    rig.host.run_frames(2);
    b.cancel();
    rig.host.run_frames(2);

    assert_eq!(a.frames(), 4);
    assert_eq!(b.frames(), 2);
    assert_eq!(other_canvas.borrow().presented(), 2);
    assert_eq!(rig.host.listener_count(ListenerKind::Resize), 1);
}

#[test]
fn invalid_config_is_an_error() {
    let rig = rig(HeadlessCanvas::new(Size::new(12.0, 12.0)));
    let err = start(
        &rig.dyn_host,
        rig.canvas.clone(),
        BeamConfig {
            blur_px: f64::NAN,
            ..quick_config()
        },
        RendererOpts::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("blur_px"));
}
