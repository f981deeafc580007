// In-memory content store, optionally seeded from JSON
use super::{ContentStore, Post, PostFilter};
use crate::error::StoreError;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Seed {
    posts: Vec<Post>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: Vec<Post>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `{"posts": [...]}`.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let seed: Seed = serde_json::from_str(json)?;

        let mut store = Self::new();
        for post in seed.posts {
            store.save_post(post)?;
        }
        tracing::debug!(posts = store.posts.len(), "content store seeded");
        Ok(store)
    }
}

impl ContentStore for MemoryStore {
    fn list_posts(&self, filter: &PostFilter) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|post| filter.matches(post))
            .cloned()
            .collect();
        // Newest first; drafts by last edit
        posts.sort_by_key(|post| std::cmp::Reverse(post.published_at.unwrap_or(post.updated_at)));
        posts
    }

    fn post_by_slug(&self, slug: &str) -> Result<Post, StoreError> {
        self.posts
            .iter()
            .find(|post| post.slug == slug)
            .cloned()
            .ok_or_else(|| StoreError::PostNotFound(slug.to_string()))
    }

    fn save_post(&mut self, post: Post) -> Result<(), StoreError> {
        if self
            .posts
            .iter()
            .any(|other| other.slug == post.slug && other.id != post.id)
        {
            return Err(StoreError::SlugTaken(post.slug));
        }

        match self.posts.iter_mut().find(|other| other.id == post.id) {
            Some(existing) => *existing = post,
            None => self.posts.push(post),
        }
        Ok(())
    }

    fn delete_post(&mut self, id: Uuid) -> Result<(), StoreError> {
        let before = self.posts.len();
        self.posts.retain(|post| post.id != id);
        if self.posts.len() == before {
            return Err(StoreError::PostNotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DateRange, PostStatus};
    use chrono::{TimeZone, Utc};

    const SEED: &str = r#"{
        "posts": [
            {"slug": "first-visit", "title": "Your first visit", "status": "published",
             "published_at": "2024-01-10T09:00:00Z"},
            {"slug": "whitening-myths", "title": "Whitening myths", "status": "published",
             "published_at": "2024-03-02T09:00:00Z"},
            {"slug": "implant-care", "title": "Implant care", "status": "draft"}
        ]
    }"#;

    fn seeded() -> MemoryStore {
        MemoryStore::from_json(SEED).expect("seed parses")
    }

    #[test]
    fn test_published_posts_newest_first() {
        let store = seeded();
        let filter = PostFilter {
            status: Some(PostStatus::Published),
            published: None,
        };
        let slugs: Vec<String> = store
            .list_posts(&filter)
            .into_iter()
            .map(|post| post.slug)
            .collect();
        assert_eq!(slugs, vec!["whitening-myths", "first-visit"]);
    }

    #[test]
    fn test_filter_by_publication_range() {
        let store = seeded();
        let filter = PostFilter {
            status: None,
            published: Some(DateRange {
                from: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
                to: Some(Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap()),
            }),
        };
        let posts = store.list_posts(&filter);
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "first-visit");
    }

    #[test]
    fn test_save_rejects_taken_slug_but_allows_update() {
        let mut store = seeded();
        let mut draft = store.post_by_slug("implant-care").expect("draft exists");

        let mut clash = draft.clone();
        clash.id = Uuid::new_v4();
        clash.slug = "first-visit".into();
        assert!(matches!(
            store.save_post(clash),
            Err(StoreError::SlugTaken(slug)) if slug == "first-visit"
        ));

        draft.status = PostStatus::Published;
        store.save_post(draft).expect("update in place");
        assert_eq!(
            store.post_by_slug("implant-care").map(|post| post.status).ok(),
            Some(PostStatus::Published)
        );
    }

    #[test]
    fn test_delete_missing_post_is_not_found() {
        let mut store = seeded();
        assert!(matches!(
            store.delete_post(Uuid::new_v4()),
            Err(StoreError::PostNotFound(_))
        ));
    }

    #[test]
    fn test_bad_seed_is_an_error() {
        assert!(matches!(
            MemoryStore::from_json("{\"posts\": 3}"),
            Err(StoreError::Seed(_))
        ));
    }
}
