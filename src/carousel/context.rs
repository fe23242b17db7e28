use std::cell::{Cell, RefCell};
use std::rc::Rc;

type CloseCallback = Rc<dyn Fn(usize)>;

struct Shared {
    current_index: Cell<usize>,
    on_card_close: RefCell<Option<CloseCallback>>,
}

/// State a carousel shares with its cards: the current index and the close-callback.
///
/// Cards only read it; the owning carousel is the only writer. A default context belongs to no
/// carousel: closing a card under it notifies nobody.
#[derive(Clone)]
pub struct CarouselContext {
    shared: Rc<Shared>,
}

impl CarouselContext {
    pub(crate) fn new(on_card_close: CloseCallback) -> Self {
        Self {
            shared: Rc::new(Shared {
                current_index: Cell::new(0),
                on_card_close: RefCell::new(Some(on_card_close)),
            }),
        }
    }

    pub fn current_index(&self) -> usize {
        self.shared.current_index.get()
    }

    pub(crate) fn set_current_index(&self, index: usize) {
        self.shared.current_index.set(index);
    }

    /// Tell the carousel the card at `index` closed.
    pub fn on_card_close(&self, index: usize) {
        let callback = self.shared.on_card_close.borrow().clone();
        if let Some(callback) = callback {
            callback(index);
        }
    }

    /// Drop the callback so closing cards after teardown is a no-op.
    pub(crate) fn disconnect(&self) {
        self.shared.on_card_close.borrow_mut().take();
    }

    pub fn is_connected(&self) -> bool {
        self.shared.on_card_close.borrow().is_some()
    }
}

impl Default for CarouselContext {
    fn default() -> Self {
        Self {
            shared: Rc::new(Shared {
                current_index: Cell::new(0),
                on_card_close: RefCell::new(None),
            }),
        }
    }
}

impl std::fmt::Debug for CarouselContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarouselContext")
            .field("current_index", &self.current_index())
            .field("connected", &self.is_connected())
            .finish()
    }
}
