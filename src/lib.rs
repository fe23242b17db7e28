//! Folio is the interactive core of a portfolio landing page.
//!
//! A page is a header plus a horizontally scrolling carousel of project cards. Each card expands
//! into a detail overlay and carries an animated light-beam background rendered on the CPU.
//! Everything a browser would provide is reached through host traits:
//!
//! - [`Host`] for listeners, animation frames, the page scroll lock and navigation
//! - [`Canvas2d`] for beam surfaces
//! - [`ScrollContainer`] for the card strip
//!
//! [`HeadlessHost`], [`HeadlessCanvas`] and [`HeadlessStrip`] implement them in memory.
#![forbid(unsafe_code)]

mod foundation;

/// Procedural light-beam field and its frame loop.
pub mod beams;
/// Project cards and their detail overlays.
pub mod card;
/// The scrollable card strip.
pub mod carousel;
pub mod config;
/// Host capabilities and the headless implementations.
pub mod host;
/// Easing and cosmetic timelines.
pub mod motion;
pub mod page;
/// CPU rasterization of beam frames.
pub mod render;

pub use crate::foundation::core::{Affine, Rgba8Premul, Size, Viewport};
pub use crate::foundation::error::{FolioError, FolioResult};
pub use crate::foundation::rng::Rng64;

pub use crate::beams::animation::{AnimationHandle, start as start_beams};
pub use crate::beams::field::{Beam, BeamConfig, BeamField, Intensity, SurfaceMetrics};
pub use crate::card::{Card, CardData, CardTarget, ClickOutcome, OverlayView};
pub use crate::carousel::{
    CardLayout, Carousel, CarouselConfig, CarouselContext, HeadlessStrip, ResyncLayout,
    ScrollBehavior, ScrollContainer, ScrollExtent, ScrollMetrics,
};
pub use crate::config::{FolioConfig, Header};
pub use crate::host::{
    Canvas2d, FrameTime, HeadlessCanvas, HeadlessHost, Host, HostEvent, Key, ListenerGuard,
    ListenerKind, Navigation,
};
pub use crate::motion::ease::Ease;
pub use crate::page::Page;
pub use crate::render::cpu::{BeamRenderer, RendererOpts};
pub use crate::render::frame::FrameRGBA;
