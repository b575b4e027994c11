// Saved search filter model (filtros_guardados)
// The filter criteria are stored as an opaque JSON document; the schema does
// not interpret them. Defaultness is exclusive per user, but only by
// convention: this layer clears the previous default when a new one is saved,
// the schema itself enforces nothing.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::{Deserialize, Serialize};

use crate::schema::filtros_guardados;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable)]
#[diesel(table_name = filtros_guardados)]
pub struct SavedFilter {
    pub id: i32,
    pub usuario_id: i32,
    pub nombre: String,
    pub filtros_json: String,
    pub is_default: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = filtros_guardados)]
struct NewSavedFilter<'a> {
    usuario_id: i32,
    nombre: &'a str,
    filtros_json: &'a str,
    is_default: bool,
}

#[derive(thiserror::Error, Debug)]
pub enum SavedFilterError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Filter not found")]
    NotFound,

    #[error("Invalid filter criteria: {0}")]
    InvalidCriteria(#[from] serde_json::Error),
}

impl SavedFilter {
    /// Persist a named filter for a user. Saving a new default clears any
    /// previous default first, atomically.
    pub fn save(
        conn: &mut SqliteConnection,
        owner_id: i32,
        name: &str,
        criteria: &serde_json::Value,
        make_default: bool,
    ) -> Result<Self, SavedFilterError> {
        let serialized = serde_json::to_string(criteria)?;

        conn.transaction(|conn| {
            if make_default {
                Self::clear_default(conn, owner_id)?;
            }

            let new_filter = NewSavedFilter {
                usuario_id: owner_id,
                nombre: name,
                filtros_json: &serialized,
                is_default: make_default,
            };

            diesel::insert_into(filtros_guardados::table)
                .values(&new_filter)
                .get_result::<SavedFilter>(conn)
        })
        .map_err(SavedFilterError::Database)
    }

    /// A user's filters, default first, newest after that
    pub fn list_for_user(
        conn: &mut SqliteConnection,
        owner_id: i32,
    ) -> Result<Vec<Self>, SavedFilterError> {
        use crate::schema::filtros_guardados::dsl::*;

        filtros_guardados
            .filter(usuario_id.eq(owner_id))
            .order((is_default.desc(), created_at.desc()))
            .load::<SavedFilter>(conn)
            .map_err(SavedFilterError::Database)
    }

    /// Promote an existing filter to the user's default
    pub fn set_default(
        conn: &mut SqliteConnection,
        owner_id: i32,
        filter_id: i32,
    ) -> Result<(), SavedFilterError> {
        conn.transaction(|conn| {
            use crate::schema::filtros_guardados::dsl::*;

            Self::clear_default(conn, owner_id)?;

            let updated = diesel::update(
                filtros_guardados
                    .find(filter_id)
                    .filter(usuario_id.eq(owner_id)),
            )
            .set(is_default.eq(true))
            .execute(conn)?;

            if updated == 0 {
                return Err(diesel::result::Error::NotFound);
            }
            Ok(())
        })
        .map_err(|e| match e {
            diesel::result::Error::NotFound => SavedFilterError::NotFound,
            other => SavedFilterError::Database(other),
        })
    }

    /// Delete a filter, scoped to its owner
    pub fn delete(
        conn: &mut SqliteConnection,
        owner_id: i32,
        filter_id: i32,
    ) -> Result<(), SavedFilterError> {
        use crate::schema::filtros_guardados::dsl::*;

        let deleted = diesel::delete(
            filtros_guardados
                .find(filter_id)
                .filter(usuario_id.eq(owner_id)),
        )
        .execute(conn)
        .map_err(SavedFilterError::Database)?;

        if deleted == 0 {
            return Err(SavedFilterError::NotFound);
        }
        Ok(())
    }

    /// Deserialize the stored criteria
    pub fn criteria(&self) -> Result<serde_json::Value, SavedFilterError> {
        serde_json::from_str(&self.filtros_json).map_err(Into::into)
    }

    fn clear_default(conn: &mut SqliteConnection, owner_id: i32) -> QueryResult<usize> {
        use crate::schema::filtros_guardados::dsl::*;

        diesel::update(
            filtros_guardados
                .filter(usuario_id.eq(owner_id))
                .filter(is_default.eq(true)),
        )
        .set(is_default.eq(false))
        .execute(conn)
    }
}
