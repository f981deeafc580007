// Treatment category registry - fixed at build time
use serde::Serialize;

/// One treatment category shown in the home page's treatments section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TreatmentCategory {
    pub id: &'static str,
    pub label: &'static str,
    /// Anchor used in `#hash` links, without the `#`.
    pub hash: &'static str,
}

pub const TREATMENT_CATEGORIES: &[TreatmentCategory] = &[
    TreatmentCategory {
        id: "dental",
        label: "Dental Treatments",
        hash: "dental-treatments",
    },
    TreatmentCategory {
        id: "aesthetic",
        label: "Aesthetic Treatments",
        hash: "aesthetic-treatments",
    },
    TreatmentCategory {
        id: "orthodontic",
        label: "Orthodontics",
        hash: "orthodontic-treatments",
    },
    TreatmentCategory {
        id: "implants",
        label: "Dental Implants",
        hash: "implant-treatments",
    },
    TreatmentCategory {
        id: "preventive",
        label: "Preventive Care",
        hash: "preventive-treatments",
    },
];

const _: () = assert!(TREATMENT_CATEGORIES.len() <= 10);

/// Ordered, immutable category list. Lookups are linear scans.
#[derive(Clone, Copy, Debug)]
pub struct CategoryRegistry {
    categories: &'static [TreatmentCategory],
}

impl CategoryRegistry {
    pub const fn new(categories: &'static [TreatmentCategory]) -> Self {
        Self { categories }
    }

    pub const fn builtin() -> Self {
        Self::new(TREATMENT_CATEGORIES)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&'static TreatmentCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Accepts the hash with or without its leading `#`.
    pub fn find_by_hash(&self, hash: &str) -> Option<&'static TreatmentCategory> {
        let hash = hash.strip_prefix('#').unwrap_or(hash);
        self.categories.iter().find(|c| c.hash == hash)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static TreatmentCategory> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
