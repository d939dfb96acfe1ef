use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Default, Deserialize, Validate)]
/// Credentials posted by the login form or the JSON login endpoint.
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: String,
}
