//! Keyword tags: case-, space- and underscore-insensitive set semantics.

use crate::text::normalize;
use serde::Serialize;

/// A normalized set of tags. The first spelling of a tag wins; iteration is
/// in normalized order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Tags(Vec<String>);

impl Tags {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut result = Tags::default();
        result.extend(tags);
        result
    }

    pub fn extend<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            self.add(tag.into());
        }
    }

    fn add(&mut self, tag: String) {
        let tag = tag.trim().to_string();
        // Robot treats a lone NONE as "no tags".
        if tag.is_empty() || tag.eq_ignore_ascii_case("NONE") {
            return;
        }
        let key = normalize(&tag);
        if let Err(pos) = self.0.binary_search_by(|t| normalize(t).cmp(&key)) {
            self.0.insert(pos, tag);
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        let key = normalize(tag);
        self.0.iter().any(|t| normalize(t) == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Tags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Tags::new(iter)
    }
}

impl PartialEq for Tags {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|t| other.contains(t))
    }
}

impl Eq for Tags {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedups_ignoring_case_space_and_underscore() {
        let tags = Tags::new(["Smoke", "smoke", "s moke", "S_MOKE"]);
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["Smoke"]);
    }

    #[test]
    fn iterates_in_normalized_order() {
        let tags = Tags::new(["beta", "Alpha", "gamma"]);
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn drops_empty_and_none() {
        let tags = Tags::new(["", "  ", "NONE", "real"]);
        assert_eq!(tags.len(), 1);
        assert!(tags.contains("REAL"));
    }

    #[test]
    fn equality_is_order_insensitive() {
        assert_eq!(Tags::new(["a", "b"]), Tags::new(["B", "a"]));
        assert_ne!(Tags::new(["a"]), Tags::new(["a", "b"]));
    }
}
