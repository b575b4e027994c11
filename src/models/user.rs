// User database model
// The base columns come from the service's original schema; the verification
// and push-token columns are added by the embedded migration. Verification
// state and the stored verification token are independently settable: clearing
// the token does not flip the flag, and vice versa.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::{Deserialize, Serialize};

use crate::schema::users;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub hashed_password: String,
    pub full_name: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub is_email_verified: bool,
    pub email_verification_token: Option<String>,
    pub fcm_token: Option<String>,
    pub apns_token: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub hashed_password: &'a str,
    pub full_name: Option<&'a str>,
    pub role: &'a str,
}

#[derive(thiserror::Error, Debug)]
pub enum UserError {
    #[error("Database error: {0}")]
    Database(diesel::result::Error),

    #[error("User not found")]
    NotFound,

    #[error("Email already registered")]
    DuplicateEmail,
}

impl From<diesel::result::Error> for UserError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::NotFound => UserError::NotFound,
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => UserError::DuplicateEmail,
            other => UserError::Database(other),
        }
    }
}

impl User {
    pub fn create(conn: &mut SqliteConnection, new_user: NewUser<'_>) -> Result<Self, UserError> {
        diesel::insert_into(users::table)
            .values(&new_user)
            .get_result::<User>(conn)
            .map_err(Into::into)
    }

    pub fn find(conn: &mut SqliteConnection, user_id: i32) -> Result<Self, UserError> {
        users::table
            .find(user_id)
            .first::<User>(conn)
            .map_err(Into::into)
    }

    pub fn find_by_email(conn: &mut SqliteConnection, email_val: &str) -> Result<Self, UserError> {
        use crate::schema::users::dsl::*;

        users
            .filter(email.eq(email_val))
            .first::<User>(conn)
            .map_err(Into::into)
    }

    /// Stash the emailed verification token until the user confirms
    pub fn set_verification_token(
        conn: &mut SqliteConnection,
        user_id: i32,
        token: &str,
    ) -> Result<bool, UserError> {
        use crate::schema::users::dsl::*;

        let updated = diesel::update(users.find(user_id))
            .set(email_verification_token.eq(Some(token)))
            .execute(conn)
            .map_err(UserError::Database)?;

        Ok(updated > 0)
    }

    /// Flip the verified flag and clear the consumed token
    pub fn mark_email_verified(
        conn: &mut SqliteConnection,
        user_id: i32,
    ) -> Result<bool, UserError> {
        use crate::schema::users::dsl::*;

        let updated = diesel::update(users.find(user_id))
            .set((
                is_email_verified.eq(true),
                email_verification_token.eq(None::<String>),
            ))
            .execute(conn)
            .map_err(UserError::Database)?;

        Ok(updated > 0)
    }

    /// Register/replace the push-notification device tokens. A `None` clears
    /// the stored token for that platform.
    pub fn set_push_tokens(
        conn: &mut SqliteConnection,
        user_id: i32,
        fcm: Option<&str>,
        apns: Option<&str>,
    ) -> Result<bool, UserError> {
        use crate::schema::users::dsl::*;

        let updated = diesel::update(users.find(user_id))
            .set((fcm_token.eq(fcm), apns_token.eq(apns)))
            .execute(conn)
            .map_err(UserError::Database)?;

        Ok(updated > 0)
    }

    /// Delete a user. Refresh tokens, comments and saved filters go with it
    /// through the cascade rules this migration installs. What happens to the
    /// user's `pedidos` rows is the base schema's decision: their
    /// `usuario_id` FK predates this crate, and unless it carries ON DELETE
    /// SET NULL (or similar) the delete fails with an FK violation while the
    /// user still owns orders.
    pub fn delete(conn: &mut SqliteConnection, user_id: i32) -> Result<bool, UserError> {
        let deleted = diesel::delete(users::table.find(user_id))
            .execute(conn)
            .map_err(UserError::Database)?;

        Ok(deleted > 0)
    }
}
