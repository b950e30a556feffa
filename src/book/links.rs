//! URL to page mapping shared by tree assembly, link rewriting and credits.

use std::collections::HashMap;

use super::tree::Uid;

/// Absolute source URL to the uid of its page in the book.
///
/// Entries are written once, when a placeholder is created for the URL, and
/// only read afterwards. The map also answers the reverse question (which
/// pages are placeholders, and for which URL), which stays valid after
/// resolution has replaced the placeholder titles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkContext {
    by_url: HashMap<String, Uid>,
    by_uid: HashMap<Uid, String>,
}

impl LinkContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `url` as the page `uid`. An existing entry is never
    /// overwritten; returns whether the entry was added.
    pub fn insert(&mut self, url: impl Into<String>, uid: Uid) -> bool {
        let url = url.into();
        if self.by_url.contains_key(&url) {
            return false;
        }
        self.by_uid.insert(uid, url.clone());
        self.by_url.insert(url, uid);
        true
    }

    /// Uid of the page for `url`.
    pub fn get(&self, url: &str) -> Option<Uid> {
        self.by_url.get(url).copied()
    }

    pub fn contains_url(&self, url: &str) -> bool {
        self.by_url.contains_key(url)
    }

    /// Source URL of a placeholder page.
    pub fn url_of(&self, uid: Uid) -> Option<&str> {
        self.by_uid.get(&uid).map(String::as_str)
    }

    /// Whether `uid` was created as a URL placeholder.
    pub fn is_placeholder(&self, uid: Uid) -> bool {
        self.by_uid.contains_key(&uid)
    }

    pub fn len(&self) -> usize {
        self.by_url.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_url.is_empty()
    }

    /// All `(url, uid)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Uid)> + '_ {
        self.by_url.iter().map(|(url, &uid)| (url.as_str(), uid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_write_once() {
        let mut links = LinkContext::new();
        assert!(links.insert("https://site/a", Uid(1)));
        assert!(!links.insert("https://site/a", Uid(2)));

        assert_eq!(links.get("https://site/a"), Some(Uid(1)));
        assert_eq!(links.url_of(Uid(1)), Some("https://site/a"));
        assert!(!links.is_placeholder(Uid(2)));
        assert_eq!(links.len(), 1);
    }
}
