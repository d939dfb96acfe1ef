use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::User;
use crate::search::{SearchQuery, Searchable};

/// A team member as listed by the users API.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Upper-cased first letters of the name, `"U"` for anonymous members.
    pub fn initials(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name
                .split_whitespace()
                .filter_map(|part| part.chars().next())
                .flat_map(char::to_uppercase)
                .collect(),
            _ => "U".to_string(),
        }
    }
}

impl Searchable for Member {
    fn matches(&self, query: &SearchQuery) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| query.matches_text(name))
            || query.matches_text(&self.email)
    }
}

impl From<&User> for Member {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.as_ref().map(|name| name.as_str().to_string()),
            email: user.email.as_str().to_string(),
            role: user.role.clone(),
            created_at: user.created_at.and_utc(),
            updated_at: user.updated_at.and_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: Option<&str>, email: &str) -> Member {
        Member {
            id: "1".to_string(),
            name: name.map(str::to_string),
            email: email.to_string(),
            role: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn matches_name_or_email() {
        let ann = member(Some("Ann Smith"), "ann@example.com");
        assert!(ann.matches(&"SMITH".into()));
        assert!(ann.matches(&"example".into()));
        assert!(!ann.matches(&"bob".into()));
    }

    #[test]
    fn nameless_member_matches_by_email_only() {
        let anon = member(None, "ghost@example.com");
        assert!(anon.matches(&"ghost".into()));
        assert!(anon.matches(&"".into()));
        assert!(!anon.matches(&"casper".into()));
    }

    #[test]
    fn initials_from_name() {
        assert_eq!(member(Some("ann lee smith"), "a@b.c").initials(), "ALS");
        assert_eq!(member(None, "a@b.c").initials(), "U");
        assert_eq!(member(Some("  "), "a@b.c").initials(), "U");
    }

    #[test]
    fn deserializes_api_payload() {
        let json = r#"{
            "id": "ck1", "name": null, "email": "x@y.z", "role": "admin",
            "createdAt": "2024-03-01T10:00:00Z", "updatedAt": "2024-03-02T10:00:00Z"
        }"#;
        let member: Member = serde_json::from_str(json).expect("valid member");
        assert_eq!(member.role.as_deref(), Some("admin"));
        assert!(member.name.is_none());
    }
}
