//! Navigation manager: section and treatment-category highlighting for the
//! home layout.
//!
//! The manager is an explicitly constructed coordinator. The application
//! root creates one and hands clones of the handle to every view that
//! needs it; all clones share the same state and subscriber list.
//!
//! It is independent of page-variant routing. It reads the browser
//! location to learn whether the home layout is showing, and it only
//! touches history for hash entries and the category side channel.

use crate::browser::{Browser, DeferredTask, ScrollBehavior};
use crate::config::Config;
use crate::location::Location;
use crate::registry::CategoryRegistry;
use crate::route::{PageType, PageVariant, RouteTable};
use crate::state::{NavigationState, TREATMENTS_SECTION};
use crate::subscription::{Listeners, Subscription};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;
use tracing::{debug, warn};

/// Tunables for section tracking and hash scrolling.
#[derive(Clone, Debug, PartialEq)]
pub struct NavigationSettings {
    /// Fixed header height added to the scroll offset before matching.
    pub header_offset: f64,
    /// Wait before scrolling to a category named by the URL hash.
    pub hash_scroll_delay: Duration,
    /// Query parameter used for the category side channel.
    pub category_param: String,
    /// Home page sections in document order. The first section whose
    /// extent contains the adjusted offset wins.
    pub sections: Vec<String>,
}

impl From<&Config> for NavigationSettings {
    fn from(config: &Config) -> Self {
        Self {
            header_offset: config.scroll.header_offset,
            hash_scroll_delay: Duration::from_millis(config.scroll.hash_scroll_delay_ms),
            category_param: config.routing.category_param.clone(),
            sections: config.sections.order.clone(),
        }
    }
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

struct Inner {
    browser: Rc<dyn Browser>,
    routes: RouteTable,
    registry: CategoryRegistry,
    settings: NavigationSettings,
    state: RefCell<NavigationState>,
    listeners: Listeners<NavigationState>,
    live_scroll_listeners: Cell<usize>,
    /// Location the highlight was last derived from.
    synced: RefCell<Location>,
    /// Scroll to a category named by the hash, waiting for layout.
    hash_scroll: RefCell<Option<DeferredTask>>,
}

#[derive(Clone)]
pub struct NavigationManager {
    inner: Rc<Inner>,
}

/// What a foreground view holds while it is mounted.
///
/// Disposing or dropping it removes the scroll listener and cancels a hash
/// scroll that has not fired yet. Views must release it before the next
/// view initializes.
#[must_use = "dropping the guard tears down the scroll listener"]
pub struct ForegroundGuard {
    scroll: Subscription,
    navigation: Weak<Inner>,
}

impl ForegroundGuard {
    fn inert() -> Self {
        Self {
            scroll: Subscription::inert(),
            navigation: Weak::new(),
        }
    }

    pub fn is_listening(&self) -> bool {
        self.scroll.is_active()
    }

    pub fn has_pending_hash_scroll(&self) -> bool {
        self.navigation.upgrade().is_some_and(|inner| {
            inner
                .hash_scroll
                .borrow()
                .as_ref()
                .is_some_and(|task| !task.is_cancelled())
        })
    }

    pub fn dispose(self) {}
}

impl NavigationManager {
    pub fn new(
        browser: Rc<dyn Browser>,
        routes: RouteTable,
        registry: CategoryRegistry,
        settings: NavigationSettings,
    ) -> Self {
        let location = browser.location();
        let page_type = routes.resolve_location(&location).page_type();
        Self {
            inner: Rc::new(Inner {
                browser,
                routes,
                registry,
                settings,
                state: RefCell::new(NavigationState::new(page_type)),
                listeners: Listeners::new(),
                live_scroll_listeners: Cell::new(0),
                synced: RefCell::new(location),
                hash_scroll: RefCell::new(None),
            }),
        }
    }

    pub fn state(&self) -> NavigationState {
        self.inner.state.borrow().clone()
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.inner.registry
    }

    pub fn settings(&self) -> &NavigationSettings {
        &self.inner.settings
    }

    /// Scroll listeners installed by `initialize` and not yet torn down.
    pub fn scroll_listener_count(&self) -> usize {
        self.inner.live_scroll_listeners.get()
    }

    /// Deliver every state update, in registration order.
    ///
    /// Delivery is synchronous with the call that changed the state. An
    /// update caused from inside a listener is delivered once the current
    /// delivery has reached every listener, so listeners never see states
    /// out of order.
    pub fn subscribe(&self, listener: impl FnMut(&NavigationState) + 'static) -> Subscription {
        self.inner.listeners.subscribe(listener)
    }

    /// Classify the current page and, on the home layout, apply the URL
    /// hash and start tracking the scroll position.
    pub fn initialize(&self) -> ForegroundGuard {
        let location = self.inner.browser.location();
        let page_type = self.inner.routes.resolve_location(&location).page_type();
        *self.inner.synced.borrow_mut() = location.clone();
        self.update(|state| state.set_page_type(page_type));

        if page_type != PageType::Home {
            debug!(page = %page_type, "not on home, no section tracking");
            return ForegroundGuard::inert();
        }

        // Listen first so a direct hash scroll updates the section
        let scroll = self.install_scroll_listener();
        let hash_scroll = location
            .hash_fragment()
            .and_then(|hash| self.apply_hash(hash));
        self.set_hash_scroll(hash_scroll);

        ForegroundGuard {
            scroll,
            navigation: Rc::downgrade(&self.inner),
        }
    }

    /// Re-derive the highlight after a history transition that kept the
    /// home layout mounted, e.g. back from one `#hash` entry to another.
    ///
    /// Does nothing off the home layout, before the home view has
    /// initialized, or when the location is the one last applied.
    pub fn sync_from_location(&self) {
        let location = self.inner.browser.location();
        if *self.inner.synced.borrow() == location {
            return;
        }
        if self.inner.routes.resolve_location(&location).page_type() != PageType::Home
            || self.inner.live_scroll_listeners.get() == 0
        {
            return;
        }

        debug!(%location, "re-deriving highlight from location");
        *self.inner.synced.borrow_mut() = location.clone();
        match location.hash_fragment() {
            Some(hash) => {
                let task = self.apply_hash(hash);
                self.set_hash_scroll(task);
            }
            None => {
                self.set_hash_scroll(None);
                self.handle_scroll();
            }
        }
    }

    /// Highlight a treatment category and bring the treatments section
    /// into view. Unknown ids are ignored.
    pub fn navigate_to_treatment_category(&self, category_id: &str) {
        let Some(category) = self.inner.registry.find_by_id(category_id) else {
            debug!(category = category_id, "unknown treatment category, ignoring");
            return;
        };

        // Highlight first, whatever the scroll or redirect ends up doing
        self.update(|state| {
            state.highlight_category(category.id);
            true
        });

        let browser = &self.inner.browser;
        let location = browser.location();
        if self.inner.routes.resolve_location(&location).page_type() == PageType::Home {
            let href = location
                .with_query_param(&self.inner.settings.category_param, category.id)
                .href();
            browser.replace_state(&href);
            self.mark_synced();
            self.set_hash_scroll(None);
            browser.scroll_into_view(TREATMENTS_SECTION, ScrollBehavior::Smooth);
        } else {
            let href = format!(
                "{}#{}",
                self.inner.routes.path_for(&PageVariant::Home),
                category.hash
            );
            debug!(%href, "leaving page for treatment category");
            browser.push_state(&href);
            browser.notify_location_changed();
        }
    }

    /// Soft navigation on the home layout: push a hash entry and scroll
    /// the section into view.
    pub fn navigate_to_section(&self, section: &str) {
        let href = format!(
            "{}#{}",
            self.inner.routes.path_for(&PageVariant::Home),
            section
        );
        self.inner.browser.push_state(&href);
        self.mark_synced();
        self.set_hash_scroll(None);
        self.update(|state| state.set_active_section(section));

        if !self
            .inner
            .browser
            .scroll_into_view(section, ScrollBehavior::Smooth)
        {
            debug!(section, "no element for section");
        }
    }

    /// The first configured section whose extent contains `offset` plus
    /// the header height.
    pub fn section_at(&self, offset: f64) -> Option<&str> {
        section_at(&self.inner, offset)
    }

    fn mark_synced(&self) {
        *self.inner.synced.borrow_mut() = self.inner.browser.location();
    }

    /// Replace the pending hash scroll; the previous one is cancelled.
    fn set_hash_scroll(&self, task: Option<DeferredTask>) {
        let previous = self.inner.hash_scroll.replace(task);
        drop(previous);
    }

    fn apply_hash(&self, hash: &str) -> Option<DeferredTask> {
        if let Some(category) = self.inner.registry.find_by_hash(hash) {
            debug!(category = category.id, "hash names a treatment category");
            self.update(|state| {
                state.highlight_category(category.id);
                true
            });

            let browser = Rc::downgrade(&self.inner.browser);
            let task = self.inner.browser.defer(
                self.inner.settings.hash_scroll_delay,
                Box::new(move || {
                    if let Some(browser) = browser.upgrade() {
                        browser.scroll_into_view(TREATMENTS_SECTION, ScrollBehavior::Smooth);
                    }
                }),
            );
            return Some(task);
        }

        if !self
            .inner
            .browser
            .scroll_into_view(hash, ScrollBehavior::Smooth)
        {
            debug!(hash, "hash matches no category or element");
        }
        None
    }

    fn install_scroll_listener(&self) -> Subscription {
        let live = self.inner.live_scroll_listeners.get();
        if live > 0 {
            warn!(live, "scroll listener installed while another is still live");
        }
        self.inner.live_scroll_listeners.set(live + 1);

        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        let listener = self.inner.browser.on_scroll(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                NavigationManager { inner }.handle_scroll();
            }
        }));

        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            drop(listener);
            if let Some(inner) = weak.upgrade() {
                let live = inner.live_scroll_listeners.get();
                inner.live_scroll_listeners.set(live.saturating_sub(1));
                let pending = inner.hash_scroll.borrow_mut().take();
                drop(pending);
            }
        })
    }

    fn handle_scroll(&self) {
        let offset = self.inner.browser.scroll_y();
        let Some(section) = section_at(&self.inner, offset).map(str::to_string) else {
            return;
        };
        self.update(|state| state.set_active_section(&section));
    }

    /// Apply `change` and, when it reports a change, deliver the new state.
    fn update(&self, change: impl FnOnce(&mut NavigationState) -> bool) {
        let snapshot = {
            let mut state = self.inner.state.borrow_mut();
            if !change(&mut state) {
                return;
            }
            state.clone()
        };
        self.inner.listeners.emit(snapshot);
    }
}

fn section_at(inner: &Inner, offset: f64) -> Option<&str> {
    let adjusted = offset + inner.settings.header_offset;
    inner
        .settings
        .sections
        .iter()
        .find(|section| {
            inner
                .browser
                .element_extent(section)
                .is_some_and(|extent| extent.contains(adjusted))
        })
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{Extent, MemoryBrowser};

    fn home_layout(browser: &MemoryBrowser) {
        browser.set_layout(vec![
            ("home".into(), Extent::new(0.0, 600.0)),
            ("about".into(), Extent::new(600.0, 500.0)),
            ("treatments".into(), Extent::new(1100.0, 900.0)),
            ("team".into(), Extent::new(2000.0, 400.0)),
            ("testimonials".into(), Extent::new(2400.0, 400.0)),
            ("faq".into(), Extent::new(2800.0, 600.0)),
            ("contact".into(), Extent::new(3400.0, 500.0)),
        ]);
    }

    fn manager_at(href: &str) -> (Rc<MemoryBrowser>, NavigationManager) {
        let browser = Rc::new(MemoryBrowser::new(href));
        home_layout(&browser);
        let manager = NavigationManager::new(
            browser.clone(),
            RouteTable::default(),
            CategoryRegistry::builtin(),
            NavigationSettings::default(),
        );
        (browser, manager)
    }

    #[test]
    fn test_hash_resolves_category() {
        let (browser, manager) = manager_at("/#dental-treatments");
        let guard = manager.initialize();

        let state = manager.state();
        assert_eq!(state.active_treatment_category(), Some("dental"));
        assert_eq!(state.active_section(), "treatments");
        assert!(guard.has_pending_hash_scroll());

        // The scroll waits for layout to settle
        assert!(browser.scroll_log().is_empty());
        browser.advance(Duration::from_millis(100));
        assert_eq!(browser.last_scroll().map(|s| s.top), Some(1100.0));
        assert_eq!(manager.state().active_treatment_category(), Some("dental"));
    }

    #[test]
    fn test_hash_without_category_scrolls_to_element() {
        let (browser, manager) = manager_at("/#faq");
        let _guard = manager.initialize();

        assert_eq!(browser.last_scroll().map(|s| s.top), Some(2800.0));
        assert_eq!(manager.state().active_section(), "faq");
        assert_eq!(manager.state().active_treatment_category(), None);
    }

    #[test]
    fn test_scroll_maps_to_faq() {
        let (browser, manager) = manager_at("/");
        let _guard = manager.initialize();

        let updates = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let updates = updates.clone();
            manager.subscribe(move |state| updates.borrow_mut().push(state.clone()))
        };

        browser.user_scroll(2900.0);
        assert_eq!(manager.state().active_section(), "faq");
        assert_eq!(updates.borrow().len(), 1);

        // Same section again is not an update
        browser.user_scroll(2950.0);
        assert_eq!(updates.borrow().len(), 1);
    }

    #[test]
    fn test_header_offset_shifts_detection() {
        let (_browser, manager) = manager_at("/");
        // 550 + 80 lands inside "about"
        assert_eq!(manager.section_at(550.0), Some("about"));
        assert_eq!(manager.section_at(10_000.0), None);
    }

    #[test]
    fn test_unknown_category_is_a_no_op() {
        let (browser, manager) = manager_at("/");
        let before = manager.state();
        let notified = Rc::new(Cell::new(false));
        let _sub = {
            let notified = notified.clone();
            manager.subscribe(move |_| notified.set(true))
        };

        manager.navigate_to_treatment_category("whitening");

        assert_eq!(manager.state(), before);
        assert!(!notified.get());
        assert_eq!(browser.history_len(), 1);
    }

    #[test]
    fn test_category_on_home_uses_replace() {
        let (browser, manager) = manager_at("/");
        let _guard = manager.initialize();

        manager.navigate_to_treatment_category("implants");

        assert_eq!(browser.history_len(), 1);
        assert_eq!(browser.location().query_param("category"), Some("implants"));
        assert_eq!(manager.state().active_section(), "treatments");
        assert_eq!(manager.state().active_treatment_category(), Some("implants"));
        assert_eq!(browser.last_scroll().map(|s| s.top), Some(1100.0));
    }

    #[test]
    fn test_category_off_home_pushes_hash_and_rebroadcasts() {
        let (browser, manager) = manager_at("/blog");
        let fired = Rc::new(Cell::new(0));
        let _sub = {
            let fired = fired.clone();
            browser.on_location_changed(Box::new(move || fired.set(fired.get() + 1)))
        };

        manager.navigate_to_treatment_category("dental");

        assert_eq!(browser.location().href(), "/#dental-treatments");
        assert_eq!(browser.history_len(), 2);
        assert_eq!(fired.get(), 1);
        assert_eq!(manager.state().active_treatment_category(), Some("dental"));
    }

    #[test]
    fn test_guard_removes_scroll_listener() {
        let (browser, manager) = manager_at("/");
        let guard = manager.initialize();
        assert!(guard.is_listening());
        assert_eq!(browser.scroll_listener_count(), 1);
        assert_eq!(manager.scroll_listener_count(), 1);

        guard.dispose();
        assert_eq!(browser.scroll_listener_count(), 0);
        assert_eq!(manager.scroll_listener_count(), 0);

        browser.user_scroll(2900.0);
        assert_eq!(manager.state().active_section(), "home");
    }

    #[test]
    fn test_initialize_off_home_is_inert() {
        let (browser, manager) = manager_at("/about");
        let guard = manager.initialize();
        assert!(!guard.is_listening());
        assert_eq!(browser.scroll_listener_count(), 0);
        assert_eq!(manager.state().current_page_type(), PageType::About);
    }

    #[test]
    fn test_panicking_subscriber_does_not_block_later_ones() {
        let (_browser, manager) = manager_at("/");
        let received = Rc::new(RefCell::new(None));

        let _bad = manager.subscribe(|_| panic!("subscriber failure"));
        let _good = {
            let received = received.clone();
            manager.subscribe(move |state| {
                *received.borrow_mut() = state.active_treatment_category().map(String::from)
            })
        };

        manager.navigate_to_treatment_category("aesthetic");
        assert_eq!(received.borrow().as_deref(), Some("aesthetic"));
    }

    #[test]
    fn test_section_soft_navigation_pushes_hash() {
        let (browser, manager) = manager_at("/");
        let _guard = manager.initialize();

        manager.navigate_to_section("contact");

        assert_eq!(browser.location().href(), "/#contact");
        assert_eq!(browser.history_len(), 2);
        assert_eq!(manager.state().active_section(), "contact");
    }

    #[test]
    fn test_sync_rederives_hash_after_back() {
        let (browser, manager) = manager_at("/#dental-treatments");
        let _guard = manager.initialize();

        manager.navigate_to_section("faq");
        assert_eq!(manager.state().active_section(), "faq");
        assert_eq!(manager.state().active_treatment_category(), None);
        // The category scroll from the load must not pull the view back
        assert_eq!(browser.pending_timers(), 0);

        assert!(browser.back());
        manager.sync_from_location();
        assert_eq!(manager.state().active_section(), "treatments");
        assert_eq!(manager.state().active_treatment_category(), Some("dental"));

        assert!(browser.forward());
        manager.sync_from_location();
        assert_eq!(manager.state().active_section(), "faq");
        assert_eq!(manager.state().active_treatment_category(), None);
    }

    #[test]
    fn test_sync_is_a_no_op_for_the_applied_location() {
        let (_browser, manager) = manager_at("/#faq");
        let _guard = manager.initialize();
        let notified = Rc::new(Cell::new(0));
        let _sub = {
            let notified = notified.clone();
            manager.subscribe(move |_| notified.set(notified.get() + 1))
        };

        manager.sync_from_location();
        assert_eq!(notified.get(), 0);
    }

    #[test]
    fn test_disposing_guard_cancels_hash_scroll() {
        let (browser, manager) = manager_at("/#implant-treatments");
        let guard = manager.initialize();
        assert!(guard.has_pending_hash_scroll());

        guard.dispose();
        assert_eq!(browser.pending_timers(), 0);
        browser.advance(Duration::from_millis(200));
        assert!(browser.scroll_log().is_empty());
    }
}
