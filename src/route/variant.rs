// Page variants - the closed set of top-level views
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bytes escaped when a slug or id becomes one path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn segment(value: &str) -> impl fmt::Display + '_ {
    utf8_percent_encode(value, SEGMENT)
}

/// Which top-level view is rendered. Parameters live inside the variant,
/// so switching away drops them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "page", rename_all = "kebab-case")]
pub enum PageVariant {
    Home,
    Blog,
    BlogPost { slug: String },
    TreatmentDetails { treatment_id: String },
    About,
    AdminLogin,
    Admin,
    /// `post_id: None` is the "new post" editor.
    AdminEdit { post_id: Option<String> },
    AdminContacts,
}

/// Coarse page classification used for highlight state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageType {
    Home,
    Blog,
    BlogPost,
    TreatmentDetails,
    About,
    Admin,
}

impl PageVariant {
    pub fn page_type(&self) -> PageType {
        match self {
            PageVariant::Home => PageType::Home,
            PageVariant::Blog => PageType::Blog,
            PageVariant::BlogPost { .. } => PageType::BlogPost,
            PageVariant::TreatmentDetails { .. } => PageType::TreatmentDetails,
            PageVariant::About => PageType::About,
            PageVariant::AdminLogin
            | PageVariant::Admin
            | PageVariant::AdminEdit { .. }
            | PageVariant::AdminContacts => PageType::Admin,
        }
    }

    /// Protected admin views. The login page itself is public.
    pub fn requires_session(&self) -> bool {
        matches!(
            self,
            PageVariant::Admin | PageVariant::AdminEdit { .. } | PageVariant::AdminContacts
        )
    }

    /// Content pages open at the top once their view has mounted.
    pub fn scrolls_to_top(&self) -> bool {
        matches!(
            self,
            PageVariant::TreatmentDetails { .. }
                | PageVariant::About
                | PageVariant::BlogPost { .. }
                | PageVariant::Blog
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            PageVariant::Home => "home",
            PageVariant::Blog => "blog",
            PageVariant::BlogPost { .. } => "blog-post",
            PageVariant::TreatmentDetails { .. } => "treatment-details",
            PageVariant::About => "about",
            PageVariant::AdminLogin => "admin-login",
            PageVariant::Admin => "admin",
            PageVariant::AdminEdit { .. } => "admin-edit",
            PageVariant::AdminContacts => "admin-contacts",
        }
    }

    /// Canonical path under an already normalized base prefix. Parameters
    /// are percent-encoded so each stays a single segment.
    pub fn path(&self, base: &str) -> String {
        match self {
            PageVariant::Home => format!("{}/", base),
            PageVariant::Blog => format!("{}/blog", base),
            PageVariant::BlogPost { slug } => format!("{}/blog/{}", base, segment(slug)),
            PageVariant::TreatmentDetails { treatment_id } => {
                format!("{}/treatments/{}", base, segment(treatment_id))
            }
            PageVariant::About => format!("{}/about", base),
            PageVariant::AdminLogin => format!("{}/admin/login", base),
            PageVariant::Admin => format!("{}/admin", base),
            PageVariant::AdminEdit { post_id: None } => format!("{}/admin/posts/new", base),
            PageVariant::AdminEdit {
                post_id: Some(post_id),
            } => format!("{}/admin/posts/{}", base, segment(post_id)),
            PageVariant::AdminContacts => format!("{}/admin/contacts", base),
        }
    }
}

impl fmt::Display for PageVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageVariant::BlogPost { slug } => write!(f, "blog-post({})", slug),
            PageVariant::TreatmentDetails { treatment_id } => {
                write!(f, "treatment-details({})", treatment_id)
            }
            PageVariant::AdminEdit { post_id: Some(id) } => write!(f, "admin-edit({})", id),
            PageVariant::AdminEdit { post_id: None } => f.write_str("admin-edit(new)"),
            other => f.write_str(other.label()),
        }
    }
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Home => "home",
            PageType::Blog => "blog",
            PageType::BlogPost => "blog-post",
            PageType::TreatmentDetails => "treatment-details",
            PageType::About => "about",
            PageType::Admin => "admin",
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
