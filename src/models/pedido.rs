// Pedido (order) model
// The pedidos table pre-exists this crate; only the columns the image and
// comment operations need are mapped. Order lifecycle itself lives in the
// API service.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::{Deserialize, Serialize};

use crate::schema::pedidos;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable)]
#[diesel(table_name = pedidos)]
pub struct Pedido {
    pub id: i32,
    pub usuario_id: Option<i32>,
    pub resumen_items: String,
    pub estado: String,
    pub fecha_creacion: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = pedidos)]
pub struct NewPedido<'a> {
    pub usuario_id: Option<i32>,
    pub resumen_items: &'a str,
    pub estado: &'a str,
}

impl Pedido {
    pub fn create(
        conn: &mut SqliteConnection,
        new_pedido: NewPedido<'_>,
    ) -> QueryResult<Self> {
        diesel::insert_into(pedidos::table)
            .values(&new_pedido)
            .get_result::<Pedido>(conn)
    }

    pub fn exists(conn: &mut SqliteConnection, pedido_id: i32) -> QueryResult<bool> {
        use diesel::dsl::count_star;

        let count: i64 = pedidos::table
            .filter(pedidos::id.eq(pedido_id))
            .select(count_star())
            .get_result(conn)?;

        Ok(count > 0)
    }

    /// Delete an order; its images and comments cascade away with it.
    pub fn delete(conn: &mut SqliteConnection, pedido_id: i32) -> QueryResult<bool> {
        let deleted = diesel::delete(pedidos::table.find(pedido_id)).execute(conn)?;
        Ok(deleted > 0)
    }
}
