#![allow(dead_code)]

// Shared fixtures for the integration tests.
//
// Each test opens its own in-memory database, creates the base schema the
// API service ships with (the `users` and `pedidos` parents), and runs the
// embedded migration on top of it.

use diesel::{sql_query, RunQueryDsl, SqliteConnection};

use pedidos_migrations::db::establish_connection;
use pedidos_migrations::migrations::runner;
use pedidos_migrations::models::{NewPedido, NewUser, Pedido, User};

/// Base schema as it exists before this crate's migration runs. Order
/// ownership is nullable: deleting a user orphans their orders (SET NULL)
/// rather than blocking the delete or dragging the orders along.
pub const BASE_USERS_DDL: &str = "CREATE TABLE users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    hashed_password TEXT NOT NULL,
    full_name TEXT,
    role TEXT NOT NULL DEFAULT 'user',
    is_active BOOLEAN NOT NULL DEFAULT 1,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

pub const BASE_PEDIDOS_DDL: &str = "CREATE TABLE pedidos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    usuario_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
    resumen_items TEXT NOT NULL,
    estado TEXT NOT NULL DEFAULT 'pendiente_confirmacion',
    fecha_creacion TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

/// Fresh in-memory database with only the pre-existing parent tables.
pub fn base_connection() -> SqliteConnection {
    let mut conn = establish_connection("sqlite://:memory:").expect("in-memory db");
    sql_query(BASE_USERS_DDL).execute(&mut conn).unwrap();
    sql_query(BASE_PEDIDOS_DDL).execute(&mut conn).unwrap();
    conn
}

/// Fresh database with the migration already applied.
pub fn migrated_connection() -> SqliteConnection {
    let mut conn = base_connection();
    runner::run(&mut conn).expect("migration should apply cleanly");
    conn
}

pub fn insert_user(conn: &mut SqliteConnection, email: &str) -> User {
    User::create(
        conn,
        NewUser {
            email,
            hashed_password: "$2b$12$fixture-hash",
            full_name: Some("Test User"),
            role: "user",
        },
    )
    .expect("user insert")
}

pub fn insert_pedido(conn: &mut SqliteConnection, usuario_id: Option<i32>) -> Pedido {
    Pedido::create(
        conn,
        NewPedido {
            usuario_id,
            resumen_items: "2x empanadas, 1x milanesa",
            estado: "confirmado",
        },
    )
    .expect("pedido insert")
}
