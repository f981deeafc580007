use clinic_nav::{PageVariant, RouteTable};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9][a-z0-9-]{0,24}",
        // Spaces, separators, URLs, percent signs, non-ASCII
        "\\PC{1,24}",
        "[a-z]{1,6}(://|/|\\?|#|%|%2F| )[a-z.]{0,10} ?",
    ]
}

fn canonical_variant() -> impl Strategy<Value = PageVariant> {
    prop_oneof![
        Just(PageVariant::Home),
        Just(PageVariant::Blog),
        Just(PageVariant::About),
        Just(PageVariant::AdminLogin),
        Just(PageVariant::Admin),
        Just(PageVariant::AdminContacts),
        Just(PageVariant::AdminEdit { post_id: None }),
        // "/blog/about-..." resolves to About, which outranks blog posts
        segment()
            .prop_filter("about prefix", |s| !s.starts_with("about"))
            .prop_map(|slug| PageVariant::BlogPost { slug }),
        segment().prop_map(|treatment_id| PageVariant::TreatmentDetails { treatment_id }),
        segment()
            .prop_filter("reserved id", |s| s != "new")
            .prop_map(|id| PageVariant::AdminEdit { post_id: Some(id) }),
    ]
}

proptest! {
    #[test]
    fn resolve_never_panics(path in "\\PC*") {
        let _ = RouteTable::default().resolve(&path);
        let _ = RouteTable::new("/clinic").resolve(&path);
    }

    #[test]
    fn canonical_paths_resolve_back(variant in canonical_variant()) {
        let table = RouteTable::default();
        prop_assert_eq!(table.resolve(&table.path_for(&variant)), variant);
    }

    #[test]
    fn canonical_paths_resolve_back_under_base(
        variant in canonical_variant(),
        base in "[a-z]{1,8}",
    ) {
        let table = RouteTable::new(&base);
        let path = table.path_for(&variant);
        let prefix = format!("/{}", base);
        prop_assert!(path.starts_with(&prefix));
        prop_assert_eq!(table.resolve(&path), variant);
    }

    #[test]
    fn unknown_first_segments_resolve_home(word in "[c-z]{3,10}", rest in "[c-z/]{0,12}") {
        // Without 'a' or 'b' no route keyword can appear
        let path = format!("/{}/{}", word, rest);
        prop_assert_eq!(RouteTable::default().resolve(&path), PageVariant::Home);
    }

    #[test]
    fn blog_post_location_round_trips(slug in segment()) {
        prop_assume!(!slug.starts_with("about"));
        let table = RouteTable::default();
        let location = clinic_nav::Location::parse(&table.path_for(&PageVariant::BlogPost {
            slug: slug.clone(),
        }));
        prop_assert_eq!(table.resolve_location(&location), PageVariant::BlogPost { slug });
    }
}
