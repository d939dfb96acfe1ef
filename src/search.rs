//! Free-text filtering of listing items.

use serde::{Deserialize, Serialize};

/// A search string together with its case-folded form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SearchQuery {
    raw: String,
    folded: String,
}

impl SearchQuery {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let folded = raw.to_lowercase();
        Self { raw, folded }
    }

    /// The query exactly as typed.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Case-insensitive substring test.
    pub fn matches_text(&self, text: &str) -> bool {
        self.folded.is_empty() || text.to_lowercase().contains(&self.folded)
    }

    /// Verbatim substring test against the decimal form of an identifier.
    pub fn matches_id(&self, id: impl ToString) -> bool {
        self.raw.is_empty() || id.to_string().contains(&self.raw)
    }
}

impl From<String> for SearchQuery {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SearchQuery {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<SearchQuery> for String {
    fn from(value: SearchQuery) -> Self {
        value.raw
    }
}

/// Items that can be matched against a [`SearchQuery`].
pub trait Searchable {
    fn matches(&self, query: &SearchQuery) -> bool;
}

/// Keeps the items matching `query`, preserving their order.
pub fn filter<'a, T: Searchable>(items: &'a [T], query: &SearchQuery) -> Vec<&'a T> {
    items.iter().filter(|item| item.matches(query)).collect()
}
