// Route table - ordered (predicate, constructor) rows, first match wins

use super::variant::PageVariant;
use crate::location::Location;
use percent_encoding::percent_decode_str;

/// A path with the base prefix, query, hash and trailing slashes removed.
#[derive(Debug)]
pub struct RoutePath<'a> {
    pub path: &'a str,
    pub segments: Vec<&'a str>,
}

impl<'a> RoutePath<'a> {
    fn new(path: &'a str) -> Self {
        let segments = path.split('/').filter(|s| !s.is_empty()).collect();
        Self { path, segments }
    }

    fn segment(&self, idx: usize) -> Option<&'a str> {
        self.segments.get(idx).copied()
    }
}

/// One row of the route table.
#[derive(Debug)]
pub struct Route {
    pub name: &'static str,
    pub matches: fn(&RoutePath) -> bool,
    pub build: fn(&RoutePath) -> PageVariant,
}

/// Matching priority, most specific first. Anything that falls through
/// resolves to `Home`.
static ROUTES: [Route; 9] = [
    Route {
        name: "admin-login",
        matches: is_admin_login,
        build: build_admin_login,
    },
    Route {
        name: "admin-contacts",
        matches: is_admin_contacts,
        build: build_admin_contacts,
    },
    Route {
        name: "admin-new-post",
        matches: is_admin_new_post,
        build: build_admin_new_post,
    },
    Route {
        name: "admin-edit-post",
        matches: is_admin_edit_post,
        build: build_admin_edit_post,
    },
    Route {
        name: "admin",
        matches: is_admin,
        build: build_admin,
    },
    Route {
        name: "treatment-details",
        matches: is_treatment_details,
        build: build_treatment_details,
    },
    Route {
        name: "about",
        matches: is_about,
        build: build_about,
    },
    Route {
        name: "blog-post",
        matches: is_blog_post,
        build: build_blog_post,
    },
    Route {
        name: "blog",
        matches: is_blog,
        build: build_blog,
    },
];

const ADMIN_POSTS_PREFIX: &str = "/admin/posts/";

fn build_admin_login(_: &RoutePath) -> PageVariant {
    PageVariant::AdminLogin
}

fn build_admin_contacts(_: &RoutePath) -> PageVariant {
    PageVariant::AdminContacts
}

fn build_admin_new_post(_: &RoutePath) -> PageVariant {
    PageVariant::AdminEdit { post_id: None }
}

fn build_admin(_: &RoutePath) -> PageVariant {
    PageVariant::Admin
}

fn build_about(_: &RoutePath) -> PageVariant {
    PageVariant::About
}

fn build_blog(_: &RoutePath) -> PageVariant {
    PageVariant::Blog
}

fn is_admin_login(p: &RoutePath) -> bool {
    p.path == "/admin/login"
}

fn is_admin_contacts(p: &RoutePath) -> bool {
    p.path.starts_with("/admin/contacts")
}

fn is_admin_new_post(p: &RoutePath) -> bool {
    p.path == "/admin/posts/new"
}

fn is_admin_edit_post(p: &RoutePath) -> bool {
    p.path
        .strip_prefix(ADMIN_POSTS_PREFIX)
        .is_some_and(|rest| !rest.is_empty())
}

fn build_admin_edit_post(p: &RoutePath) -> PageVariant {
    let post_id = p.path.strip_prefix(ADMIN_POSTS_PREFIX).unwrap_or_default();
    PageVariant::AdminEdit {
        post_id: Some(decode(post_id)),
    }
}

fn is_admin(p: &RoutePath) -> bool {
    p.path.starts_with("/admin")
}

fn is_treatment_details(p: &RoutePath) -> bool {
    p.segment(0) == Some("treatments") && p.segment(1).is_some()
}

fn build_treatment_details(p: &RoutePath) -> PageVariant {
    PageVariant::TreatmentDetails {
        treatment_id: decode(p.segment(1).unwrap_or_default()),
    }
}

fn is_about(p: &RoutePath) -> bool {
    p.path.contains("/about")
}

fn is_blog_post(p: &RoutePath) -> bool {
    p.segment(0) == Some("blog") && p.segment(1).is_some()
}

fn build_blog_post(p: &RoutePath) -> PageVariant {
    PageVariant::BlogPost {
        slug: decode(p.segment(1).unwrap_or_default()),
    }
}

fn decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

fn is_blog(p: &RoutePath) -> bool {
    p.path.contains("/blog")
}

/// Path resolver bound to a base prefix.
#[derive(Clone, Debug)]
pub struct RouteTable {
    base: String,
}

impl RouteTable {
    pub fn new(base: &str) -> Self {
        Self {
            base: normalize_base(base),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn routes(&self) -> &'static [Route] {
        &ROUTES
    }

    pub fn route_names(&self) -> Vec<&'static str> {
        ROUTES.iter().map(|route| route.name).collect()
    }

    pub fn resolve(&self, path: &str) -> PageVariant {
        self.matched_route(path)
            .map(|(_, variant)| variant)
            .unwrap_or(PageVariant::Home)
    }

    pub fn resolve_location(&self, location: &Location) -> PageVariant {
        self.resolve(&location.path)
    }

    /// The first matching row and the variant it builds, or `None` when
    /// the path falls through to `Home`.
    pub fn matched_route(&self, path: &str) -> Option<(&'static Route, PageVariant)> {
        let route_path = RoutePath::new(self.route_path(path));
        ROUTES
            .iter()
            .find(|route| (route.matches)(&route_path))
            .map(|route| (route, (route.build)(&route_path)))
    }

    pub fn path_for(&self, variant: &PageVariant) -> String {
        variant.path(&self.base)
    }

    fn route_path<'a>(&self, path: &'a str) -> &'a str {
        let path = path.split(['?', '#']).next().unwrap_or_default();

        let path = if self.base.is_empty() {
            path
        } else if path == self.base {
            ""
        } else {
            match path.strip_prefix(&self.base) {
                Some(rest) if rest.starts_with('/') => rest,
                _ => path,
            }
        };

        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            "/"
        } else {
            trimmed
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new("")
    }
}

/// `""` for the site root, otherwise `/prefix` without a trailing slash.
pub fn normalize_base(base: &str) -> String {
    let trimmed = base.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
