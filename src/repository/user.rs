//! Repository implementation for login accounts.

use diesel::prelude::*;

use crate::domain::types::UserEmail;
use crate::domain::user::{NewUser, User};
use crate::models::user::{NewUser as DbNewUser, User as DbUser};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, UserReader, UserWriter};

impl UserReader for DieselRepository {
    fn get_user_by_email(&self, email: &UserEmail) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_user = users::table
            .filter(users::email.eq(email.as_str()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        db_user
            .map(|user| User::try_from(user).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_users(&self) -> RepositoryResult<Vec<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        users::table
            .order(users::created_at.desc())
            .then_order_by(users::id.desc())
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(|user| User::try_from(user).map_err(RepositoryError::from))
            .collect()
    }
}

impl UserWriter for DieselRepository {
    fn create_or_update_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_new_user: DbNewUser = new_user.into();

        let db_user = diesel::insert_into(users::table)
            .values(&db_new_user)
            .on_conflict(users::email)
            .do_update()
            .set((
                &db_new_user,
                users::updated_at.eq(diesel::dsl::now),
            ))
            .get_result::<DbUser>(&mut conn)?;

        Ok(User::try_from(db_user)?)
    }
}
