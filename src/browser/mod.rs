//! Browser host boundary.
//!
//! Everything the navigation core needs from the page it runs in:
//! location and history, scrolling, element measurement, timers and the
//! two event channels (location changed, scrolled). Methods take `&self`
//! like the DOM APIs they stand for, so one host can be shared through
//! `Rc<dyn Browser>` by the controller, the navigation manager and the
//! closures they register.

mod history;
mod memory;

pub use history::History;
pub use memory::{MemoryBrowser, ScrollCommand};

use crate::location::Location;
use crate::subscription::Subscription;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Measured vertical extent of an element, in document coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Extent {
    pub top: f64,
    pub height: f64,
}

impl Extent {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.bottom()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

pub trait Browser {
    /// The authoritative current location.
    fn location(&self) -> Location;

    /// Add a history entry. Does not fire location-changed.
    fn push_state(&self, href: &str);

    /// Overwrite the current history entry. Does not fire location-changed.
    fn replace_state(&self, href: &str);

    /// Rebroadcast the back/forward event to every location listener.
    fn notify_location_changed(&self);

    fn on_location_changed(&self, listener: Box<dyn FnMut()>) -> Subscription;

    fn scroll_y(&self) -> f64;

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior);

    fn on_scroll(&self, listener: Box<dyn FnMut()>) -> Subscription;

    fn element_extent(&self, id: &str) -> Option<Extent>;

    /// Run `task` once after `delay`, unless the returned handle is
    /// cancelled or dropped first.
    fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>) -> DeferredTask;

    /// Scroll so the element's top edge is at the viewport top. Returns
    /// false when no element has this id.
    fn scroll_into_view(&self, id: &str, behavior: ScrollBehavior) -> bool {
        match self.element_extent(id) {
            Some(extent) => {
                self.scroll_to(extent.top, behavior);
                true
            }
            None => false,
        }
    }
}

/// Handle to a task scheduled with [`Browser::defer`].
///
/// The task is tied to the handle's owner: dropping the handle cancels it.
#[must_use = "dropping a DeferredTask cancels it"]
#[derive(Debug)]
pub struct DeferredTask {
    cancelled: Rc<Cell<bool>>,
    detached: bool,
}

impl DeferredTask {
    /// Wrap the cancellation flag a host checks before running the task.
    pub fn new(cancelled: Rc<Cell<bool>>) -> Self {
        Self {
            cancelled,
            detached: false,
        }
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// Let the task run even after the handle is gone.
    pub fn detach(mut self) {
        self.detached = true;
    }
}

impl Drop for DeferredTask {
    fn drop(&mut self) {
        if !self.detached {
            self.cancel();
        }
    }
}
