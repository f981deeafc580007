pub mod navigation;

pub use navigation::{NavigationState, HOME_SECTION, TREATMENTS_SECTION};
