//! Page controller: owns the active page variant.
//!
//! Every real navigation pushes a history entry and then resynchronizes
//! from the browser location, so a programmatic transition and a
//! back/forward transition end up on the same code path. The controller
//! listens to location-changed for as long as it is alive.

use crate::auth::SessionProvider;
use crate::browser::{Browser, DeferredTask, ScrollBehavior};
use crate::manager::NavigationManager;
use crate::message::ChildIntent;
use crate::route::{PageVariant, RouteTable};
use crate::subscription::{Listeners, Subscription};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tracing::{debug, warn};

pub struct PageController {
    browser: Rc<dyn Browser>,
    session: Rc<dyn SessionProvider>,
    navigation: NavigationManager,
    routes: RouteTable,
    scroll_top_delay: Duration,
    current: RefCell<PageVariant>,
    listeners: Listeners<PageVariant>,
    /// Scroll-to-top for the variant that was applied last. Replacing it
    /// cancels the previous one.
    pending_scroll: RefCell<Option<DeferredTask>>,
    location_changed: RefCell<Option<Subscription>>,
}

impl PageController {
    /// Create the controller, bind it to location-changed and apply the
    /// current location.
    pub fn mount(
        browser: Rc<dyn Browser>,
        session: Rc<dyn SessionProvider>,
        navigation: NavigationManager,
        routes: RouteTable,
        scroll_top_delay: Duration,
    ) -> Rc<Self> {
        let controller = Rc::new(Self {
            browser,
            session,
            navigation,
            routes,
            scroll_top_delay,
            current: RefCell::new(PageVariant::Home),
            listeners: Listeners::new(),
            pending_scroll: RefCell::new(None),
            location_changed: RefCell::new(None),
        });

        let weak: Weak<Self> = Rc::downgrade(&controller);
        let subscription = controller.browser.on_location_changed(Box::new(move || {
            if let Some(controller) = weak.upgrade() {
                controller.sync_from_location();
            }
        }));
        *controller.location_changed.borrow_mut() = Some(subscription);

        controller.sync_from_location();
        controller
    }

    pub fn current(&self) -> PageVariant {
        self.current.borrow().clone()
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn navigation(&self) -> &NavigationManager {
        &self.navigation
    }

    /// Notified with the new variant whenever it changes. A navigation
    /// started from inside a listener is delivered after the current one.
    pub fn subscribe(&self, listener: impl FnMut(&PageVariant) + 'static) -> Subscription {
        self.listeners.subscribe(listener)
    }

    /// Re-read the location and apply what it resolves to. Protected
    /// variants without a session are redirected to the login page.
    ///
    /// When the variant is unchanged the view stays mounted, so the
    /// navigation manager re-derives its highlight from the new hash.
    pub fn sync_from_location(&self) {
        let location = self.browser.location();
        let variant = self.routes.resolve_location(&location);

        if variant.requires_session() && !self.session.has_session() {
            warn!(page = %variant, location = %location, "no session, redirecting to login");
            let login = self.routes.path_for(&PageVariant::AdminLogin);
            self.browser.push_state(&login);
            self.browser.notify_location_changed();
            return;
        }

        self.apply(variant);
        self.navigation.sync_from_location();
    }

    pub fn navigate(&self, variant: PageVariant) {
        let href = self.routes.path_for(&variant);
        debug!(%href, "navigate");
        self.browser.push_state(&href);
        self.sync_from_location();

        if variant.scrolls_to_top() {
            self.browser.scroll_to(0.0, ScrollBehavior::Instant);
        }
    }

    pub fn navigate_home(&self) {
        self.navigate(PageVariant::Home);
    }

    pub fn navigate_to_blog(&self) {
        self.navigate(PageVariant::Blog);
    }

    pub fn navigate_to_blog_post(&self, slug: &str) {
        self.navigate(PageVariant::BlogPost {
            slug: slug.to_string(),
        });
    }

    pub fn navigate_to_treatment(&self, treatment_id: &str) {
        self.navigate(PageVariant::TreatmentDetails {
            treatment_id: treatment_id.to_string(),
        });
    }

    pub fn navigate_to_about(&self) {
        self.navigate(PageVariant::About);
    }

    pub fn navigate_to_admin_login(&self) {
        self.navigate(PageVariant::AdminLogin);
    }

    pub fn navigate_to_admin(&self) {
        self.navigate(PageVariant::Admin);
    }

    /// `None` opens the editor for a new post.
    pub fn navigate_to_admin_edit(&self, post_id: Option<&str>) {
        self.navigate(PageVariant::AdminEdit {
            post_id: post_id.map(String::from),
        });
    }

    pub fn navigate_to_admin_contacts(&self) {
        self.navigate(PageVariant::AdminContacts);
    }

    /// Soft navigation to a home section. Off the home page this goes
    /// through location-changed so the home view mounts and resolves the
    /// hash itself.
    pub fn navigate_to_section(&self, section: &str) {
        let on_home = *self.current.borrow() == PageVariant::Home;
        if on_home {
            self.navigation.navigate_to_section(section);
            return;
        }

        let href = format!("{}#{}", self.routes.path_for(&PageVariant::Home), section);
        debug!(%href, "leaving page for home section");
        self.browser.push_state(&href);
        self.browser.notify_location_changed();
    }

    pub fn handle_intent(&self, intent: ChildIntent) {
        if intent == ChildIntent::LoggedOut {
            self.session.sign_out();
        }

        let href = self.routes.path_for(&intent.target());
        debug!(?intent, %href, "child intent");
        self.browser.push_state(&href);
        self.browser.notify_location_changed();
    }

    fn apply(&self, variant: PageVariant) {
        if *self.current.borrow() == variant {
            return;
        }
        debug!(from = %self.current.borrow(), to = %variant, "page changed");

        let scroll = variant.scrolls_to_top().then(|| {
            let browser = Rc::downgrade(&self.browser);
            self.browser.defer(
                self.scroll_top_delay,
                Box::new(move || {
                    if let Some(browser) = browser.upgrade() {
                        browser.scroll_to(0.0, ScrollBehavior::Instant);
                    }
                }),
            )
        });
        let previous = self.pending_scroll.replace(scroll);
        drop(previous);

        *self.current.borrow_mut() = variant.clone();
        self.listeners.emit(variant);
    }
}
