// Refresh token database model
// Tokens are revoked in place (is_revoked flag), never deleted on logout, so
// reuse of a rotated token is still observable. Rows disappear only through
// the user-delete cascade or periodic retention cleanup.

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::{Deserialize, Serialize};

use crate::schema::refresh_tokens;

/// Refresh token row
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable)]
#[diesel(table_name = refresh_tokens)]
pub struct RefreshToken {
    pub id: i32,
    pub user_id: i32,
    pub token: String,
    pub expires_at: NaiveDateTime,
    pub is_revoked: bool,
    pub created_at: NaiveDateTime,
}

/// New refresh token for insertion
#[derive(Debug, Insertable)]
#[diesel(table_name = refresh_tokens)]
pub struct NewRefreshToken<'a> {
    pub user_id: i32,
    pub token: &'a str,
    pub expires_at: NaiveDateTime,
}

/// Errors for refresh token operations
#[derive(thiserror::Error, Debug)]
pub enum RefreshTokenError {
    #[error("Database error: {0}")]
    Database(diesel::result::Error),

    #[error("Token not found")]
    NotFound,

    #[error("Token expired")]
    Expired,

    #[error("Token revoked")]
    Revoked,

    #[error("Token value already in use")]
    Duplicate,
}

impl From<diesel::result::Error> for RefreshTokenError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::NotFound => RefreshTokenError::NotFound,
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => RefreshTokenError::Duplicate,
            other => RefreshTokenError::Database(other),
        }
    }
}

impl RefreshToken {
    /// Store a new refresh token on login or rotation
    pub fn store(
        conn: &mut SqliteConnection,
        user_id: i32,
        token: &str,
        expires_at: NaiveDateTime,
    ) -> Result<Self, RefreshTokenError> {
        let new_token = NewRefreshToken {
            user_id,
            token,
            expires_at,
        };

        diesel::insert_into(refresh_tokens::table)
            .values(&new_token)
            .get_result::<RefreshToken>(conn)
            .map_err(Into::into)
    }

    /// Look up a token by value. Revoked and expired rows are still returned;
    /// use `validate` when the caller needs a usable token.
    pub fn find_by_token(
        conn: &mut SqliteConnection,
        token_value: &str,
    ) -> Result<Self, RefreshTokenError> {
        use crate::schema::refresh_tokens::dsl::*;

        refresh_tokens
            .filter(token.eq(token_value))
            .first::<RefreshToken>(conn)
            .map_err(Into::into)
    }

    /// Look up a token and reject it unless it is currently usable
    pub fn validate(
        conn: &mut SqliteConnection,
        token_value: &str,
    ) -> Result<Self, RefreshTokenError> {
        let found = Self::find_by_token(conn, token_value)?;

        if found.is_revoked {
            return Err(RefreshTokenError::Revoked);
        }
        if found.is_expired() {
            return Err(RefreshTokenError::Expired);
        }

        Ok(found)
    }

    /// Revoke a token by value (logout / rotation). Returns whether a live
    /// token was actually revoked.
    pub fn revoke(
        conn: &mut SqliteConnection,
        token_value: &str,
    ) -> Result<bool, RefreshTokenError> {
        use crate::schema::refresh_tokens::dsl::*;

        let updated = diesel::update(
            refresh_tokens
                .filter(token.eq(token_value))
                .filter(is_revoked.eq(false)),
        )
        .set(is_revoked.eq(true))
        .execute(conn)
        .map_err(RefreshTokenError::Database)?;

        Ok(updated > 0)
    }

    /// Revoke every live token for a user (logout-everywhere, password reset)
    pub fn revoke_all_for_user(
        conn: &mut SqliteConnection,
        user_id_val: i32,
    ) -> Result<usize, RefreshTokenError> {
        use crate::schema::refresh_tokens::dsl::*;

        diesel::update(
            refresh_tokens
                .filter(user_id.eq(user_id_val))
                .filter(is_revoked.eq(false)),
        )
        .set(is_revoked.eq(true))
        .execute(conn)
        .map_err(RefreshTokenError::Database)
    }

    /// Delete expired and revoked rows. Retention job, run periodically.
    pub fn cleanup_expired(conn: &mut SqliteConnection) -> Result<usize, RefreshTokenError> {
        use crate::schema::refresh_tokens::dsl::*;

        let now = Utc::now().naive_utc();

        diesel::delete(
            refresh_tokens
                .filter(expires_at.le(now))
                .or_filter(is_revoked.eq(true)),
        )
        .execute(conn)
        .map_err(RefreshTokenError::Database)
    }

    /// Number of live tokens for a user
    pub fn count_active_for_user(
        conn: &mut SqliteConnection,
        user_id_val: i32,
    ) -> Result<i64, RefreshTokenError> {
        use crate::schema::refresh_tokens::dsl::*;

        let now = Utc::now().naive_utc();

        refresh_tokens
            .filter(user_id.eq(user_id_val))
            .filter(is_revoked.eq(false))
            .filter(expires_at.gt(now))
            .count()
            .get_result::<i64>(conn)
            .map_err(RefreshTokenError::Database)
    }

    /// A token may be used only while not revoked and not expired
    pub fn is_active(&self) -> bool {
        !self.is_revoked && !self.is_expired()
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now().naive_utc()
    }
}
