//! Client-side navigation for the clinic site: path resolution, page
//! switching with history, and section highlighting on the home layout.

pub mod app;
pub mod auth;
pub mod browser;
pub mod config;
pub mod controller;
pub mod error;
pub mod location;
pub mod logging;
pub mod manager;
pub mod message;
pub mod registry;
pub mod route;
pub mod state;
pub mod store;
pub mod subscription;

pub use app::App;
pub use controller::PageController;
pub use location::Location;
pub use manager::{ForegroundGuard, NavigationManager, NavigationSettings};
pub use route::{PageType, PageVariant, RouteTable};
