//! Credential check and access token handling.

use chrono::Utc;
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation as TokenValidation, decode, encode,
};
use validator::Validate;

use crate::domain::types::UserEmail;
use crate::domain::user::User;
use crate::dto::auth::{Claims, LoginResponse};
use crate::forms::auth::LoginForm;
use crate::repository::UserReader;
use crate::services::{ServiceError, ServiceResult};

pub const CREDENTIALS_REQUIRED: &str = "Email and password are required";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Checks the credentials and issues an access token for the account.
pub fn login<R>(
    repo: &R,
    secret: &str,
    ttl_secs: i64,
    form: &LoginForm,
) -> ServiceResult<LoginResponse>
where
    R: UserReader + ?Sized,
{
    if form.validate().is_err() {
        return Err(ServiceError::Validation(CREDENTIALS_REQUIRED.to_string()));
    }

    // An address that cannot be an account is the same as an unknown one.
    let Ok(email) = UserEmail::new(form.email.as_str()) else {
        return Err(ServiceError::Unauthorized);
    };

    let user = repo.get_user_by_email(&email).map_err(|err| {
        log::error!("Error logging in: {err}");
        err
    })?;

    let Some(user) = user else {
        log::info!("Login attempt for unknown account {email}");
        return Err(ServiceError::Unauthorized);
    };

    let valid = bcrypt::verify(&form.password, &user.password_hash).map_err(|err| {
        log::error!("Error logging in: {err}");
        ServiceError::Internal(err.to_string())
    })?;

    if !valid {
        log::info!("Wrong password for {email}");
        return Err(ServiceError::Unauthorized);
    }

    let token = issue_token(secret, &user, ttl_secs)?;

    Ok(LoginResponse {
        token,
        email: user.email.into_inner(),
    })
}

/// Signs an HS256 token for `user` valid for `ttl_secs`.
pub fn issue_token(secret: &str, user: &User, ttl_secs: i64) -> ServiceResult<String> {
    let iat = Utc::now().timestamp();
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.as_str().to_string(),
        iat,
        exp: iat + ttl_secs,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|err| {
        log::error!("Failed to sign token: {err}");
        ServiceError::Internal(err.to_string())
    })
}

/// Verifies signature and expiry.
pub fn verify_token(secret: &str, token: &str) -> ServiceResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &TokenValidation::default(),
    )
    .map(|data| data.claims)
    .map_err(|err| {
        log::warn!("Rejected access token: {err}");
        ServiceError::Unauthorized
    })
}

/// Extracts the token from an `Authorization: Bearer ...` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

pub fn hash_password(password: &str) -> ServiceResult<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|err| ServiceError::Internal(err.to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;

    use chrono::NaiveDateTime;

    use super::*;
    use crate::domain::types::UserId;
    use crate::domain::user::NewUser;
    use crate::repository::UserWriter;
    use crate::repository::errors::{RepositoryError, RepositoryResult};

    pub(crate) const SECRET: &str = "test-secret";

    #[derive(Default)]
    pub(crate) struct InMemoryUsers {
        pub(crate) users: RefCell<Vec<User>>,
        pub(crate) broken: bool,
    }

    impl UserReader for InMemoryUsers {
        fn get_user_by_email(&self, email: &UserEmail) -> RepositoryResult<Option<User>> {
            if self.broken {
                return Err(RepositoryError::ConnectionError("down".into()));
            }
            Ok(self
                .users
                .borrow()
                .iter()
                .find(|user| &user.email == email)
                .cloned())
        }

        fn list_users(&self) -> RepositoryResult<Vec<User>> {
            if self.broken {
                return Err(RepositoryError::ConnectionError("down".into()));
            }
            Ok(self.users.borrow().clone())
        }
    }

    impl UserWriter for InMemoryUsers {
        fn create_or_update_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
            let mut users = self.users.borrow_mut();
            let id = i32::try_from(users.len()).unwrap_or(i32::MAX) + 1;
            let user = User {
                id: UserId::new(id)?,
                email: new_user.email.clone(),
                name: new_user.name.clone(),
                role: new_user.role.clone(),
                password_hash: new_user.password_hash.clone(),
                created_at: NaiveDateTime::default(),
                updated_at: NaiveDateTime::default(),
            };
            users.push(user.clone());
            Ok(user)
        }
    }

    /// Repository holding `ann@example.com` with password `secret`.
    pub(crate) fn repo_with_ann() -> InMemoryUsers {
        let repo = InMemoryUsers::default();
        let hash = bcrypt::hash("secret", 4).expect("hash");
        repo.create_or_update_user(&NewUser::new(
            UserEmail::new("ann@example.com").expect("valid email"),
            None,
            None,
            hash,
        ))
        .expect("stored");
        repo
    }

    fn form(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn missing_credentials_are_a_validation_error() {
        let repo = repo_with_ann();

        let result = login(&repo, SECRET, 3600, &form("", "secret"));
        assert!(matches!(result, Err(ServiceError::Validation(msg)) if msg == CREDENTIALS_REQUIRED));

        let result = login(&repo, SECRET, 3600, &form("ann@example.com", ""));
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn wrong_password_or_unknown_user_is_unauthorized() {
        let repo = repo_with_ann();

        assert!(matches!(
            login(&repo, SECRET, 3600, &form("ann@example.com", "nope")),
            Err(ServiceError::Unauthorized)
        ));
        assert!(matches!(
            login(&repo, SECRET, 3600, &form("bob@example.com", "secret")),
            Err(ServiceError::Unauthorized)
        ));
        assert!(matches!(
            login(&repo, SECRET, 3600, &form("not an email", "secret")),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn repository_failure_is_not_unauthorized() {
        let repo = InMemoryUsers {
            broken: true,
            ..InMemoryUsers::default()
        };

        let result = login(&repo, SECRET, 3600, &form("ann@example.com", "secret"));
        assert!(matches!(result, Err(ServiceError::Repository(_))));
    }

    #[test]
    fn successful_login_issues_verifiable_token() {
        let repo = repo_with_ann();

        let response =
            login(&repo, SECRET, 3600, &form(" Ann@Example.com ", "secret")).expect("login");
        assert_eq!(response.email, "ann@example.com");

        let claims = verify_token(SECRET, &response.token).expect("valid token");
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.email, "ann@example.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn tokens_are_rejected_with_wrong_secret_or_expired() {
        let repo = repo_with_ann();
        let user = repo.users.borrow()[0].clone();

        let token = issue_token(SECRET, &user, 3600).expect("token");
        assert!(matches!(
            verify_token("other-secret", &token),
            Err(ServiceError::Unauthorized)
        ));

        let expired = issue_token(SECRET, &user, -7200).expect("token");
        assert!(matches!(
            verify_token(SECRET, &expired),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn bearer_header_parsing() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer   xyz "), Some("xyz"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc"), None);
    }
}
