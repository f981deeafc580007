//! Application root.
//!
//! Wires the browser, the session, the navigation manager and the page
//! controller together, and plays the part of the view layer: every time
//! the page variant changes the previous foreground view is torn down and
//! the new one is mounted, which re-runs `NavigationManager::initialize`.

use crate::auth::SessionProvider;
use crate::browser::Browser;
use crate::config::Config;
use crate::controller::PageController;
use crate::manager::{ForegroundGuard, NavigationManager, NavigationSettings};
use crate::registry::CategoryRegistry;
use crate::route::{PageVariant, RouteTable};
use crate::state::NavigationState;
use crate::subscription::Subscription;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

type ForegroundSlot = Rc<RefCell<Option<ForegroundGuard>>>;

pub struct App {
    config: Config,
    browser: Rc<dyn Browser>,
    session: Rc<dyn SessionProvider>,
    navigation: NavigationManager,
    controller: Rc<PageController>,
    foreground: ForegroundSlot,
    _remount: Subscription,
}

impl App {
    pub fn new(config: Config, browser: Rc<dyn Browser>, session: Rc<dyn SessionProvider>) -> Self {
        let routes = RouteTable::new(&config.routing.base_path);
        let navigation = NavigationManager::new(
            browser.clone(),
            routes.clone(),
            CategoryRegistry::builtin(),
            NavigationSettings::from(&config),
        );
        let controller = PageController::mount(
            browser.clone(),
            session.clone(),
            navigation.clone(),
            routes,
            Duration::from_millis(config.scroll.scroll_top_delay_ms),
        );

        let foreground: ForegroundSlot = Rc::new(RefCell::new(None));
        mount_view(&navigation, &foreground);

        let remount = {
            let navigation = navigation.clone();
            let foreground = foreground.clone();
            controller.subscribe(move |variant| {
                tracing::debug!(page = %variant, "mounting view");
                mount_view(&navigation, &foreground);
            })
        };

        Self {
            config,
            browser,
            session,
            navigation,
            controller,
            foreground,
            _remount: remount,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn browser(&self) -> &Rc<dyn Browser> {
        &self.browser
    }

    pub fn session(&self) -> &Rc<dyn SessionProvider> {
        &self.session
    }

    pub fn navigation(&self) -> &NavigationManager {
        &self.navigation
    }

    pub fn controller(&self) -> &Rc<PageController> {
        &self.controller
    }

    pub fn page(&self) -> PageVariant {
        self.controller.current()
    }

    pub fn navigation_state(&self) -> NavigationState {
        self.navigation.state()
    }

    /// Whether the mounted view is tracking scroll position.
    pub fn is_tracking_sections(&self) -> bool {
        self.foreground
            .borrow()
            .as_ref()
            .is_some_and(ForegroundGuard::is_listening)
    }
}

/// Release the previous view's guard, then initialize for the new one.
fn mount_view(navigation: &NavigationManager, foreground: &ForegroundSlot) {
    let previous = foreground.borrow_mut().take();
    drop(previous);

    let guard = navigation.initialize();
    *foreground.borrow_mut() = Some(guard);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemorySession;
    use crate::browser::{Extent, MemoryBrowser};

    fn app_at(href: &str) -> (Rc<MemoryBrowser>, App) {
        let browser = Rc::new(MemoryBrowser::new(href));
        browser.set_layout(vec![
            ("home".into(), Extent::new(0.0, 800.0)),
            ("treatments".into(), Extent::new(800.0, 800.0)),
            ("faq".into(), Extent::new(1600.0, 800.0)),
        ]);
        let app = App::new(
            Config::default(),
            browser.clone(),
            Rc::new(MemorySession::new(false)),
        );
        (browser, app)
    }

    #[test]
    fn test_only_one_scroll_listener_across_remounts() {
        let (browser, app) = app_at("/");
        assert!(app.is_tracking_sections());
        assert_eq!(browser.scroll_listener_count(), 1);

        app.controller().navigate_to_blog();
        assert!(!app.is_tracking_sections());
        assert_eq!(browser.scroll_listener_count(), 0);

        app.controller().navigate_home();
        assert!(app.is_tracking_sections());
        assert_eq!(browser.scroll_listener_count(), 1);
        assert_eq!(app.navigation().scroll_listener_count(), 1);
    }

    #[test]
    fn test_category_from_other_page_lands_on_treatments() {
        let (browser, app) = app_at("/about");
        app.navigation().navigate_to_treatment_category("dental");

        assert_eq!(app.page(), PageVariant::Home);
        assert_eq!(app.navigation_state().active_treatment_category(), Some("dental"));

        browser.advance(Duration::from_millis(100));
        assert_eq!(browser.last_scroll().map(|s| s.top), Some(800.0));
    }

    #[test]
    fn test_page_type_follows_remounts() {
        let (_browser, app) = app_at("/");
        app.controller().navigate_to_treatment("implants");
        assert_eq!(
            app.navigation_state().current_page_type(),
            crate::route::PageType::TreatmentDetails
        );
    }
}
