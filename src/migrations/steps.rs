// Declarative schema plan for the extended auth / pedidos tables.
//
// The migration is a single ordered batch of guarded steps: column additions
// on `users`, then the four new tables, then their lookup indexes. Each step
// carries the object it creates so the runner can probe for it before
// executing, making the whole batch safely re-runnable.

/// Ledger version recorded in `schema_migrations` once the batch completes.
pub const SCHEMA_VERSION: &str = "20250115_auth_push_and_order_extensions";

/// Parent tables that must exist before this migration runs. They are created
/// by the API service's base schema, not by this crate.
pub const REQUIRED_TABLES: &[&str] = &["users", "pedidos"];

/// One guarded schema change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStep {
    /// ALTER TABLE ... ADD COLUMN, skipped when the column already exists.
    AddColumn {
        table: &'static str,
        column: &'static str,
        ddl: &'static str,
    },
    /// CREATE TABLE IF NOT EXISTS with all constraints inline.
    CreateTable {
        name: &'static str,
        ddl: &'static str,
    },
    /// CREATE [UNIQUE] INDEX IF NOT EXISTS.
    CreateIndex {
        name: &'static str,
        table: &'static str,
        ddl: &'static str,
    },
}

impl SchemaStep {
    pub fn ddl(&self) -> &'static str {
        match self {
            SchemaStep::AddColumn { ddl, .. }
            | SchemaStep::CreateTable { ddl, .. }
            | SchemaStep::CreateIndex { ddl, .. } => ddl,
        }
    }

    /// Human-readable label used in reports and log lines.
    pub fn describe(&self) -> String {
        match self {
            SchemaStep::AddColumn { table, column, .. } => {
                format!("column {}.{}", table, column)
            }
            SchemaStep::CreateTable { name, .. } => format!("table {}", name),
            SchemaStep::CreateIndex { name, table, .. } => {
                format!("index {} on {}", name, table)
            }
        }
    }
}

/// The full target schema, in execution order.
pub const TARGET_SCHEMA: &[SchemaStep] = &[
    // -- users: email verification + push notification device tokens --
    SchemaStep::AddColumn {
        table: "users",
        column: "is_email_verified",
        ddl: "ALTER TABLE users ADD COLUMN is_email_verified BOOLEAN NOT NULL DEFAULT 0",
    },
    SchemaStep::AddColumn {
        table: "users",
        column: "email_verification_token",
        ddl: "ALTER TABLE users ADD COLUMN email_verification_token TEXT",
    },
    SchemaStep::AddColumn {
        table: "users",
        column: "fcm_token",
        ddl: "ALTER TABLE users ADD COLUMN fcm_token TEXT",
    },
    SchemaStep::AddColumn {
        table: "users",
        column: "apns_token",
        ddl: "ALTER TABLE users ADD COLUMN apns_token TEXT",
    },
    // -- new tables --
    SchemaStep::CreateTable {
        name: "refresh_tokens",
        ddl: "CREATE TABLE IF NOT EXISTS refresh_tokens (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            token TEXT NOT NULL,
            expires_at TIMESTAMP NOT NULL,
            is_revoked BOOLEAN NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    },
    SchemaStep::CreateTable {
        name: "imagenes_pedidos",
        ddl: "CREATE TABLE IF NOT EXISTS imagenes_pedidos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            pedido_id INTEGER NOT NULL REFERENCES pedidos(id) ON DELETE CASCADE,
            url TEXT NOT NULL,
            filename TEXT NOT NULL,
            size_bytes INTEGER,
            mime_type TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    },
    SchemaStep::CreateTable {
        name: "comentarios_pedidos",
        ddl: "CREATE TABLE IF NOT EXISTS comentarios_pedidos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            pedido_id INTEGER NOT NULL REFERENCES pedidos(id) ON DELETE CASCADE,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            comentario TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    },
    SchemaStep::CreateTable {
        name: "filtros_guardados",
        ddl: "CREATE TABLE IF NOT EXISTS filtros_guardados (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            usuario_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            nombre TEXT NOT NULL,
            filtros_json TEXT NOT NULL,
            is_default BOOLEAN NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    },
    // -- lookup indexes --
    // Token uniqueness is enforced here rather than as a column constraint so
    // the index is visible in sqlite_master and guardable like the rest.
    SchemaStep::CreateIndex {
        name: "ix_refresh_tokens_token",
        table: "refresh_tokens",
        ddl: "CREATE UNIQUE INDEX IF NOT EXISTS ix_refresh_tokens_token \
              ON refresh_tokens(token)",
    },
    SchemaStep::CreateIndex {
        name: "ix_refresh_tokens_user_id",
        table: "refresh_tokens",
        ddl: "CREATE INDEX IF NOT EXISTS ix_refresh_tokens_user_id \
              ON refresh_tokens(user_id)",
    },
    SchemaStep::CreateIndex {
        name: "ix_imagenes_pedidos_pedido_id",
        table: "imagenes_pedidos",
        ddl: "CREATE INDEX IF NOT EXISTS ix_imagenes_pedidos_pedido_id \
              ON imagenes_pedidos(pedido_id)",
    },
    SchemaStep::CreateIndex {
        name: "ix_comentarios_pedidos_pedido_id",
        table: "comentarios_pedidos",
        ddl: "CREATE INDEX IF NOT EXISTS ix_comentarios_pedidos_pedido_id \
              ON comentarios_pedidos(pedido_id)",
    },
    SchemaStep::CreateIndex {
        name: "ix_comentarios_pedidos_user_id",
        table: "comentarios_pedidos",
        ddl: "CREATE INDEX IF NOT EXISTS ix_comentarios_pedidos_user_id \
              ON comentarios_pedidos(user_id)",
    },
    SchemaStep::CreateIndex {
        name: "ix_filtros_guardados_usuario_id",
        table: "filtros_guardados",
        ddl: "CREATE INDEX IF NOT EXISTS ix_filtros_guardados_usuario_id \
              ON filtros_guardados(usuario_id)",
    },
];
