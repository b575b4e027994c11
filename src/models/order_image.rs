// Order image model (imagenes_pedidos)
// Rows hold the storage URL and upload metadata for images attached to an
// order. An image cannot outlive its order: pedido_id cascades on delete.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::{Deserialize, Serialize};

use crate::models::pedido::Pedido;
use crate::schema::imagenes_pedidos;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable)]
#[diesel(table_name = imagenes_pedidos)]
pub struct OrderImage {
    pub id: i32,
    pub pedido_id: i32,
    pub url: String,
    pub filename: String,
    pub size_bytes: Option<i32>,
    pub mime_type: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = imagenes_pedidos)]
pub struct NewOrderImage<'a> {
    pub pedido_id: i32,
    pub url: &'a str,
    pub filename: &'a str,
    pub size_bytes: Option<i32>,
    pub mime_type: Option<&'a str>,
}

#[derive(thiserror::Error, Debug)]
pub enum OrderImageError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Order {0} not found")]
    OrderNotFound(i32),

    #[error("Image not found")]
    NotFound,
}

impl OrderImage {
    /// Attach an image to an order. The order must exist; the handlers answer
    /// 404 on `OrderNotFound` rather than surfacing an FK violation.
    pub fn attach(
        conn: &mut SqliteConnection,
        new_image: NewOrderImage<'_>,
    ) -> Result<Self, OrderImageError> {
        if !Pedido::exists(conn, new_image.pedido_id)? {
            return Err(OrderImageError::OrderNotFound(new_image.pedido_id));
        }

        diesel::insert_into(imagenes_pedidos::table)
            .values(&new_image)
            .get_result::<OrderImage>(conn)
            .map_err(OrderImageError::Database)
    }

    pub fn list_for_order(
        conn: &mut SqliteConnection,
        pedido_id_val: i32,
    ) -> Result<Vec<Self>, OrderImageError> {
        use crate::schema::imagenes_pedidos::dsl::*;

        imagenes_pedidos
            .filter(pedido_id.eq(pedido_id_val))
            .order((created_at.desc(), id.desc()))
            .load::<OrderImage>(conn)
            .map_err(OrderImageError::Database)
    }

    pub fn delete(conn: &mut SqliteConnection, image_id: i32) -> Result<(), OrderImageError> {
        let deleted = diesel::delete(imagenes_pedidos::table.find(image_id))
            .execute(conn)
            .map_err(OrderImageError::Database)?;

        if deleted == 0 {
            return Err(OrderImageError::NotFound);
        }
        Ok(())
    }
}
