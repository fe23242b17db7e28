//! The landing page: header, carousel and one card per configured project.

use std::cell::RefCell;
use std::rc::Rc;

use crate::card::{Card, CardData};
use crate::carousel::{Carousel, ScrollContainer, ScrollExtent};
use crate::config::{FolioConfig, Header};
use crate::foundation::error::FolioResult;
use crate::host::{Canvas2d, Host};
use crate::motion::timeline::{EntranceFrame, ScrimPulse};
use crate::render::cpu::RendererOpts;

/// A mounted page.
///
/// Cards are declared before the carousel so they tear down first: their escape listeners and
/// backgrounds go away while the shared context is still connected.
pub struct Page {
    header: Header,
    cards: Vec<Card>,
    carousel: Carousel,
    scrim: ScrimPulse,
}

impl Page {
    /// Validate `config` and mount every component.
    ///
    /// `canvas_for` supplies the background surface of each card face; returning `None` leaves
    /// that card without beams.
    #[tracing::instrument(skip_all, fields(cards = config.cards.len()))]
    pub fn mount<F>(
        host: &Rc<dyn Host>,
        config: &FolioConfig,
        strip: &Rc<RefCell<dyn ScrollContainer>>,
        opts: RendererOpts,
        mut canvas_for: F,
    ) -> FolioResult<Self>
    where
        F: FnMut(usize, &CardData) -> Option<Rc<RefCell<dyn Canvas2d>>>,
    {
        config.validate()?;

        let carousel = Carousel::new(host.clone(), config.carousel, config.cards.len());
        carousel.mount(strip);

        let mut cards = Vec::with_capacity(config.cards.len());
        for (index, data) in config.cards.iter().enumerate() {
            let mut card = Card::mount(host, data.clone(), index, carousel.context());
            if let Some(canvas) = canvas_for(index, data) {
                let mut beams = config.beams;
                beams.seed = beams.seed.wrapping_add(index as u64);
                card.attach_background(canvas, beams, opts)?;
            }
            cards.push(card);
        }

        tracing::debug!(
            backgrounds = cards.iter().filter(|c| c.background().is_some()).count(),
            "page mounted"
        );
        Ok(Self {
            header: config.header.clone(),
            cards,
            carousel,
            scrim: ScrimPulse::default(),
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    /// Index of the card whose overlay is showing, if any.
    pub fn open_card(&self) -> Option<usize> {
        self.cards.iter().position(Card::is_open)
    }

    /// Forward a native scroll event of the strip.
    pub fn handle_scroll(&self) -> ScrollExtent {
        self.carousel.handle_scroll()
    }

    pub fn entrance(&self, index: usize, t_secs: f64) -> EntranceFrame {
        self.carousel.entrance(index, t_secs)
    }

    /// Opacity of the scrim over the card backgrounds at `t_secs`.
    pub fn scrim_opacity(&self, t_secs: f64) -> f64 {
        self.scrim.opacity(t_secs)
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("header", &self.header)
            .field("cards", &self.cards)
            .field("carousel", &self.carousel)
            .finish()
    }
}
