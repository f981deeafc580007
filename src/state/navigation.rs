// Navigation state - page type and in-page highlight
use crate::route::PageType;
use serde::Serialize;

pub const HOME_SECTION: &str = "home";
pub const TREATMENTS_SECTION: &str = "treatments";

/// Highlight state shared by the header, the section menu and the
/// treatments view.
///
/// `active_treatment_category` is only ever set while the active section
/// is [`TREATMENTS_SECTION`]; the mutators below keep that true.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    current_page_type: PageType,
    active_section: String,
    active_treatment_category: Option<String>,
}

impl NavigationState {
    pub fn new(page_type: PageType) -> Self {
        Self {
            current_page_type: page_type,
            active_section: HOME_SECTION.to_string(),
            active_treatment_category: None,
        }
    }

    pub fn current_page_type(&self) -> PageType {
        self.current_page_type
    }

    pub fn active_section(&self) -> &str {
        &self.active_section
    }

    pub fn active_treatment_category(&self) -> Option<&str> {
        self.active_treatment_category.as_deref()
    }

    pub fn is_home(&self) -> bool {
        self.current_page_type == PageType::Home
    }

    pub fn set_page_type(&mut self, page_type: PageType) -> bool {
        if self.current_page_type == page_type {
            return false;
        }
        self.current_page_type = page_type;
        true
    }

    /// Returns true when anything changed. Leaving the treatments section
    /// clears the category.
    pub fn set_active_section(&mut self, section: &str) -> bool {
        if self.active_section == section {
            return false;
        }
        self.active_section = section.to_string();
        if section != TREATMENTS_SECTION {
            self.active_treatment_category = None;
        }
        true
    }

    pub fn highlight_category(&mut self, category_id: &str) {
        self.active_section = TREATMENTS_SECTION.to_string();
        self.active_treatment_category = Some(category_id.to_string());
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new(PageType::Home)
    }
}
