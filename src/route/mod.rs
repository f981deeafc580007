// Path resolution - location path to page variant
mod resolver;
mod variant;

pub use resolver::{normalize_base, Route, RoutePath, RouteTable};
pub use variant::{PageType, PageVariant};
