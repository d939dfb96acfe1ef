use crate::db::{DbConnection, DbPool};
use crate::domain::types::UserEmail;
use crate::domain::user::{NewUser, User};
use crate::repository::errors::RepositoryResult;

pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod user;

/// Diesel-backed repository shared by all handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

pub trait UserReader {
    fn get_user_by_email(&self, email: &UserEmail) -> RepositoryResult<Option<User>>;
    fn list_users(&self) -> RepositoryResult<Vec<User>>;
}

pub trait UserWriter {
    /// Inserts the user or replaces the account with the same email.
    fn create_or_update_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
}
