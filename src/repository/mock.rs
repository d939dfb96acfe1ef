//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::types::UserEmail;
use crate::domain::user::{NewUser, User};
use crate::repository::errors::RepositoryResult;
use crate::repository::{UserReader, UserWriter};

mock! {
    pub Repository {}

    impl UserReader for Repository {
        fn get_user_by_email(&self, email: &UserEmail) -> RepositoryResult<Option<User>>;
        fn list_users(&self) -> RepositoryResult<Vec<User>>;
    }

    impl UserWriter for Repository {
        fn create_or_update_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    }
}
