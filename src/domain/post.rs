use serde::{Deserialize, Serialize};

use crate::search::{SearchQuery, Searchable};

/// A post as served by the posts API.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub body: String,
}

impl Searchable for Post {
    /// Title is matched case-insensitively, the id verbatim.
    fn matches(&self, query: &SearchQuery) -> bool {
        query.matches_text(&self.title) || query.matches_id(self.id)
    }
}
