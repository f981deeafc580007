// In-memory browser host with a virtual clock
use super::{Browser, DeferredTask, Extent, History, ScrollBehavior};
use crate::location::Location;
use crate::subscription::{Listeners, Subscription};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// A programmatic scroll request, recorded in issue order.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollCommand {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

struct Timer {
    seq: u64,
    due: Duration,
    cancelled: Rc<Cell<bool>>,
    task: Box<dyn FnOnce()>,
}

/// Browser host that keeps history, layout and timers in memory.
///
/// Events are dispatched synchronously. Timers only fire from
/// [`MemoryBrowser::advance`].
pub struct MemoryBrowser {
    history: RefCell<History>,
    scroll_y: Cell<f64>,
    layout: RefCell<Vec<(String, Extent)>>,
    location_changed: Listeners<()>,
    scrolled: Listeners<()>,
    clock: Cell<Duration>,
    timers: RefCell<Vec<Timer>>,
    next_timer: Cell<u64>,
    scroll_log: RefCell<Vec<ScrollCommand>>,
}

impl MemoryBrowser {
    pub fn new(start_href: &str) -> Self {
        Self {
            history: RefCell::new(History::new(Location::parse(start_href).href())),
            scroll_y: Cell::new(0.0),
            layout: RefCell::new(Vec::new()),
            location_changed: Listeners::new(),
            scrolled: Listeners::new(),
            clock: Cell::new(Duration::ZERO),
            timers: RefCell::new(Vec::new()),
            next_timer: Cell::new(0),
            scroll_log: RefCell::new(Vec::new()),
        }
    }

    /// Replace the measured element layout.
    pub fn set_layout(&self, layout: Vec<(String, Extent)>) {
        *self.layout.borrow_mut() = layout;
    }

    pub fn set_element(&self, id: &str, extent: Extent) {
        let mut layout = self.layout.borrow_mut();
        match layout.iter_mut().find(|(element, _)| element == id) {
            Some(entry) => entry.1 = extent,
            None => layout.push((id.to_string(), extent)),
        }
    }

    /// Browser back button. Returns false at the first entry.
    pub fn back(&self) -> bool {
        let moved = self.history.borrow_mut().back().is_some();
        if moved {
            self.location_changed.emit(());
        }
        moved
    }

    /// Browser forward button. Returns false at the last entry.
    pub fn forward(&self) -> bool {
        let moved = self.history.borrow_mut().forward().is_some();
        if moved {
            self.location_changed.emit(());
        }
        moved
    }

    /// The user scrolled the page.
    pub fn user_scroll(&self, top: f64) {
        self.scroll_y.set(top.max(0.0));
        self.scrolled.emit(());
    }

    pub fn history_len(&self) -> usize {
        self.history.borrow().len()
    }

    pub fn history_index(&self) -> usize {
        self.history.borrow().index()
    }

    pub fn now(&self) -> Duration {
        self.clock.get()
    }

    /// Move the clock forward, running every timer that falls due in order.
    pub fn advance(&self, by: Duration) {
        let target = self.clock.get() + by;

        while let Some(timer) = self.take_due(target) {
            if timer.due > self.clock.get() {
                self.clock.set(timer.due);
            }
            if !timer.cancelled.get() {
                (timer.task)();
            }
        }

        self.clock.set(target);
    }

    /// Timers scheduled and not yet run or cancelled.
    pub fn pending_timers(&self) -> usize {
        self.timers
            .borrow()
            .iter()
            .filter(|timer| !timer.cancelled.get())
            .count()
    }

    pub fn scroll_log(&self) -> Vec<ScrollCommand> {
        self.scroll_log.borrow().clone()
    }

    pub fn last_scroll(&self) -> Option<ScrollCommand> {
        self.scroll_log.borrow().last().cloned()
    }

    pub fn location_listener_count(&self) -> usize {
        self.location_changed.len()
    }

    pub fn scroll_listener_count(&self) -> usize {
        self.scrolled.len()
    }

    fn take_due(&self, limit: Duration) -> Option<Timer> {
        let mut timers = self.timers.borrow_mut();
        let idx = timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= limit)
            .min_by_key(|(_, timer)| (timer.due, timer.seq))
            .map(|(idx, _)| idx)?;
        Some(timers.remove(idx))
    }
}

impl Browser for MemoryBrowser {
    fn location(&self) -> Location {
        Location::parse(self.history.borrow().current())
    }

    fn push_state(&self, href: &str) {
        let next = self.location().join(href);
        tracing::trace!(href = %next, "history push");
        self.history.borrow_mut().push(next.href());
    }

    fn replace_state(&self, href: &str) {
        let next = self.location().join(href);
        tracing::trace!(href = %next, "history replace");
        self.history.borrow_mut().replace(next.href());
    }

    fn notify_location_changed(&self) {
        self.location_changed.emit(());
    }

    fn on_location_changed(&self, mut listener: Box<dyn FnMut()>) -> Subscription {
        self.location_changed.subscribe(move |_| listener())
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
        let top = top.max(0.0);
        self.scroll_log
            .borrow_mut()
            .push(ScrollCommand { top, behavior });
        self.scroll_y.set(top);
        self.scrolled.emit(());
    }

    fn on_scroll(&self, mut listener: Box<dyn FnMut()>) -> Subscription {
        self.scrolled.subscribe(move |_| listener())
    }

    fn element_extent(&self, id: &str) -> Option<Extent> {
        self.layout
            .borrow()
            .iter()
            .find(|(element, _)| element == id)
            .map(|(_, extent)| *extent)
    }

    fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>) -> DeferredTask {
        let cancelled = Rc::new(Cell::new(false));
        let seq = self.next_timer.get();
        self.next_timer.set(seq + 1);

        self.timers.borrow_mut().push(Timer {
            seq,
            due: self.clock.get() + delay,
            cancelled: cancelled.clone(),
            task,
        });

        DeferredTask::new(cancelled)
    }
}
