//! Services behind the JSON API.

use crate::domain::member::Member;
use crate::repository::UserReader;
use crate::services::auth::{bearer_token, verify_token};
use crate::services::{ServiceError, ServiceResult};

/// Lists all accounts as team members for a caller holding a valid token.
pub fn list_members<R>(
    repo: &R,
    secret: &str,
    authorization: Option<&str>,
) -> ServiceResult<Vec<Member>>
where
    R: UserReader + ?Sized,
{
    let token = authorization
        .and_then(bearer_token)
        .ok_or(ServiceError::Unauthorized)?;
    verify_token(secret, token)?;

    let users = repo.list_users().map_err(|err| {
        log::error!("Failed to list users: {err}");
        err
    })?;

    Ok(users.iter().map(Member::from).collect())
}
