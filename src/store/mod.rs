//! Content storage boundary.
//!
//! Navigation only needs to know that posts exist and can be listed by
//! status and publication date. The admin views talk to a
//! [`ContentStore`]; [`MemoryStore`] is the in-process fake used by the
//! binary and the tests.

mod memory;

pub use memory::MemoryStore;

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub status: PostStatus,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Inclusive time range. Open ends are unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| at >= from) && self.to.map_or(true, |to| at <= to)
    }
}

#[derive(Clone, Debug, Default)]
pub struct PostFilter {
    pub status: Option<PostStatus>,
    /// Only posts whose publication time falls in the range. Posts that were
    /// never published never match.
    pub published: Option<DateRange>,
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        if self.status.is_some_and(|status| post.status != status) {
            return false;
        }
        match self.published {
            Some(range) => post.published_at.is_some_and(|at| range.contains(at)),
            None => true,
        }
    }
}

pub trait ContentStore {
    /// Matching posts, newest first.
    fn list_posts(&self, filter: &PostFilter) -> Vec<Post>;

    fn post_by_slug(&self, slug: &str) -> Result<Post, StoreError>;

    /// Insert or replace by id. Slugs are unique across posts.
    fn save_post(&mut self, post: Post) -> Result<(), StoreError>;

    fn delete_post(&mut self, id: Uuid) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post(status: PostStatus, published_at: Option<DateTime<Utc>>) -> Post {
        Post {
            id: Uuid::new_v4(),
            slug: "p".into(),
            title: "P".into(),
            status,
            published_at,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        let range = DateRange {
            from: Some(from),
            to: Some(to),
        };
        assert!(range.contains(from));
        assert!(range.contains(to));
        assert!(!range.contains(to + chrono::Duration::seconds(1)));
        assert!(DateRange::default().contains(from));
    }

    #[test]
    fn test_filter_by_range_skips_unpublished() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let filter = PostFilter {
            status: None,
            published: Some(DateRange {
                from: Some(at),
                to: None,
            }),
        };
        assert!(filter.matches(&post(PostStatus::Published, Some(at))));
        assert!(!filter.matches(&post(PostStatus::Draft, None)));
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("draft".parse::<PostStatus>(), Ok(PostStatus::Draft));
        assert!("archived".parse::<PostStatus>().is_err());
    }
}
