use serde::{Deserialize, Deserializer};
use validator::Validate;

/// Longest accepted search query. The query is kept in the cookie session.
pub const MAX_QUERY_LENGTH: usize = 200;

#[derive(Debug, Default, Deserialize, Validate)]
/// Search box submission.
pub struct SearchForm {
    #[serde(default)]
    #[validate(length(max = 200))]
    pub q: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Next,
    Previous,
}

#[derive(Debug, Default, Deserialize)]
/// Query string of a listing page: a page click or a previous/next step.
///
/// Unparsable values are dropped like any other out-of-range request.
pub struct NavigationQuery {
    #[serde(default, deserialize_with = "lenient_page")]
    pub page: Option<usize>,
    #[serde(default, deserialize_with = "lenient_step")]
    pub step: Option<Step>,
}

fn lenient_page<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.trim().parse().ok()))
}

fn lenient_step<'de, D>(deserializer: D) -> Result<Option<Step>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw.as_deref() {
        Some("next") => Some(Step::Next),
        Some("previous") => Some(Step::Previous),
        _ => None,
    })
}
