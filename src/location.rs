// Browser location - path, query string and hash fragment
use serde::Serialize;
use std::fmt;

/// The address the browser currently shows.
///
/// `search` and `hash` are stored without their leading `?` / `#`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Location {
    pub path: String,
    pub search: String,
    pub hash: String,
}

impl Location {
    /// Parse an href. Scheme and host are dropped when present.
    pub fn parse(href: &str) -> Self {
        let href = strip_origin(href);

        let (rest, hash) = match href.split_once('#') {
            Some((rest, hash)) => (rest, hash),
            None => (href, ""),
        };
        let (path, search) = match rest.split_once('?') {
            Some((path, search)) => (path, search),
            None => (rest, ""),
        };

        let path = if path.is_empty() {
            "/".to_string()
        } else if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        Self {
            path,
            search: search.to_string(),
            hash: hash.to_string(),
        }
    }

    /// Resolve `href` against this location the way a browser resolves a
    /// relative URL passed to the history API.
    pub fn join(&self, href: &str) -> Self {
        if let Some(hash) = href.strip_prefix('#') {
            Self {
                path: self.path.clone(),
                search: self.search.clone(),
                hash: hash.to_string(),
            }
        } else if href.starts_with('?') {
            let mut joined = Self::parse(&format!("{}{}", self.path, href));
            joined.path = self.path.clone();
            joined
        } else {
            Self::parse(href)
        }
    }

    pub fn href(&self) -> String {
        let mut href = self.path.clone();
        if !self.search.is_empty() {
            href.push('?');
            href.push_str(&self.search);
        }
        if !self.hash.is_empty() {
            href.push('#');
            href.push_str(&self.hash);
        }
        href
    }

    pub fn hash_fragment(&self) -> Option<&str> {
        if self.hash.is_empty() {
            None
        } else {
            Some(&self.hash)
        }
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.search
            .split('&')
            .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    /// Copy of this location whose query string is exactly `name=value`.
    pub fn with_query_param(&self, name: &str, value: &str) -> Self {
        Self {
            path: self.path.clone(),
            search: format!("{}={}", name, value),
            hash: self.hash.clone(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}

impl From<&str> for Location {
    fn from(href: &str) -> Self {
        Self::parse(href)
    }
}

fn strip_origin(href: &str) -> &str {
    // Only a leading `scheme://host` counts; "://" later on belongs to a
    // query value or fragment.
    let Some(idx) = href.find("://") else {
        return href;
    };
    let scheme = &href[..idx];
    let is_scheme = !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !is_scheme {
        return href;
    }

    let rest = &href[idx + 3..];
    match rest.find(['/', '?', '#']) {
        Some(idx) => &rest[idx..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_href() {
        let loc = Location::parse("https://clinic.example/blog/my-post?category=dental#top");
        assert_eq!(loc.path, "/blog/my-post");
        assert_eq!(loc.search, "category=dental");
        assert_eq!(loc.hash, "top");
        assert_eq!(loc.href(), "/blog/my-post?category=dental#top");
    }

    #[test]
    fn test_parse_empty_is_root() {
        assert_eq!(Location::parse("").path, "/");
        assert_eq!(Location::parse("#faq").path, "/");
        assert_eq!(Location::parse("#faq").hash_fragment(), Some("faq"));
    }

    #[test]
    fn test_join_hash_keeps_path_and_query() {
        let loc = Location::parse("/clinic/?category=dental");
        let joined = loc.join("#faq");
        assert_eq!(joined.href(), "/clinic/?category=dental#faq");
    }

    #[test]
    fn test_query_param_side_channel() {
        let loc = Location::parse("/#treatments").with_query_param("category", "implants");
        assert_eq!(loc.href(), "/?category=implants#treatments");
        assert_eq!(loc.query_param("category"), Some("implants"));
        assert_eq!(loc.query_param("missing"), None);
    }

    #[test]
    fn test_url_in_query_is_not_an_origin() {
        let loc = Location::parse("/blog?ref=https://example.com/x");
        assert_eq!(loc.path, "/blog");
        assert_eq!(loc.query_param("ref"), Some("https://example.com/x"));

        let loc = Location::parse("/#see-https://x.org");
        assert_eq!(loc.path, "/");
        assert_eq!(loc.hash, "see-https://x.org");
    }

    #[test]
    fn test_href_is_kept_verbatim() {
        assert_eq!(Location::parse("/blog/post%20").path, "/blog/post%20");
        assert_eq!(Location::parse("/blog/post ").path, "/blog/post ");
    }
}
