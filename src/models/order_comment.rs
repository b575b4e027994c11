// Order comment model (comentarios_pedidos)
// A comment references both the order and its author; deleting either one
// cascades the comment away.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::{Deserialize, Serialize};

use crate::models::pedido::Pedido;
use crate::schema::comentarios_pedidos;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable)]
#[diesel(table_name = comentarios_pedidos)]
pub struct OrderComment {
    pub id: i32,
    pub pedido_id: i32,
    pub user_id: i32,
    pub comentario: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = comentarios_pedidos)]
pub struct NewOrderComment<'a> {
    pub pedido_id: i32,
    pub user_id: i32,
    pub comentario: &'a str,
}

#[derive(thiserror::Error, Debug)]
pub enum OrderCommentError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Order {0} not found")]
    OrderNotFound(i32),
}

impl OrderComment {
    pub fn add(
        conn: &mut SqliteConnection,
        new_comment: NewOrderComment<'_>,
    ) -> Result<Self, OrderCommentError> {
        if !Pedido::exists(conn, new_comment.pedido_id)? {
            return Err(OrderCommentError::OrderNotFound(new_comment.pedido_id));
        }

        diesel::insert_into(comentarios_pedidos::table)
            .values(&new_comment)
            .get_result::<OrderComment>(conn)
            .map_err(OrderCommentError::Database)
    }

    /// Comments for an order, oldest first (conversation order)
    pub fn list_for_order(
        conn: &mut SqliteConnection,
        pedido_id_val: i32,
    ) -> Result<Vec<Self>, OrderCommentError> {
        use crate::schema::comentarios_pedidos::dsl::*;

        comentarios_pedidos
            .filter(pedido_id.eq(pedido_id_val))
            .order((created_at.asc(), id.asc()))
            .load::<OrderComment>(conn)
            .map_err(OrderCommentError::Database)
    }
}
