// Guarded execution of the schema plan against a SQLite connection.
//
// Every step is independently idempotent: the runner probes sqlite_master /
// pragma_table_info for the object a step creates and skips it when present.
// The whole batch runs inside an immediate (write-locking) transaction with a
// `schema_migrations` ledger row recorded at the end, so two concurrent runs
// serialize and the loser sees the version as already applied.

use diesel::sql_types::Text;
use diesel::sqlite::SqliteConnection;
use diesel::{sql_query, RunQueryDsl};
use std::fmt;
use thiserror::Error;
use tracing::debug;

use super::steps::{SchemaStep, REQUIRED_TABLES, SCHEMA_VERSION, TARGET_SCHEMA};

#[derive(Error, Debug)]
pub enum MigrationError {
    /// Constraint violations and type mismatches surface verbatim here.
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    /// A foreign-key target the new tables reference does not exist. Fatal:
    /// the operator must repair the base schema before retrying.
    #[error(
        "Required table `{0}` does not exist; the base schema must be in place \
         before this migration can run"
    )]
    MissingDependency(String),
}

/// What a run changed, for the completion log line.
#[derive(Debug, Default, Clone)]
pub struct MigrationReport {
    pub version: String,
    pub columns_added: Vec<String>,
    pub tables_created: Vec<String>,
    pub indexes_created: Vec<String>,
    pub skipped: Vec<String>,
    /// The ledger already held this version; nothing was touched.
    pub already_applied: bool,
}

impl MigrationReport {
    pub fn total_changes(&self) -> usize {
        self.columns_added.len() + self.tables_created.len() + self.indexes_created.len()
    }

    pub fn is_noop(&self) -> bool {
        self.total_changes() == 0
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.already_applied {
            return write!(f, "schema version {} already applied", self.version);
        }
        if self.is_noop() {
            return write!(
                f,
                "schema already at version {} ({} steps skipped)",
                self.version,
                self.skipped.len()
            );
        }
        write!(
            f,
            "applied schema version {}: {} columns added [{}], {} tables created [{}], \
             {} indexes created [{}], {} steps skipped",
            self.version,
            self.columns_added.len(),
            self.columns_added.join(", "),
            self.tables_created.len(),
            self.tables_created.join(", "),
            self.indexes_created.len(),
            self.indexes_created.join(", "),
            self.skipped.len()
        )
    }
}

/// Pending/applied breakdown for health checks and the status subcommand.
#[derive(Debug)]
pub struct MigrationStatus {
    pub version: &'static str,
    pub version_applied: bool,
    pub pending_steps: Vec<String>,
}

impl MigrationStatus {
    pub fn is_up_to_date(&self) -> bool {
        self.version_applied && self.pending_steps.is_empty()
    }
}

/// Apply the full schema plan. Idempotent and safely re-runnable.
pub fn run(conn: &mut SqliteConnection) -> Result<MigrationReport, MigrationError> {
    ensure_ledger(conn)?;

    conn.immediate_transaction(|conn| {
        let mut report = MigrationReport {
            version: SCHEMA_VERSION.to_string(),
            ..Default::default()
        };

        if version_applied(conn, SCHEMA_VERSION)? {
            report.already_applied = true;
            return Ok(report);
        }

        for table in REQUIRED_TABLES {
            if !table_exists(conn, table)? {
                return Err(MigrationError::MissingDependency(table.to_string()));
            }
        }

        for step in TARGET_SCHEMA {
            if step_present(conn, step)? {
                debug!("Skipping {}, already present", step.describe());
                report.skipped.push(step.describe());
                continue;
            }

            sql_query(step.ddl()).execute(conn)?;
            debug!("Applied {}", step.describe());

            match step {
                SchemaStep::AddColumn { table, column, .. } => {
                    report.columns_added.push(format!("{}.{}", table, column));
                }
                SchemaStep::CreateTable { name, .. } => {
                    report.tables_created.push(name.to_string());
                }
                SchemaStep::CreateIndex { name, .. } => {
                    report.indexes_created.push(name.to_string());
                }
            }
        }

        record_version(conn, SCHEMA_VERSION)?;
        Ok(report)
    })
}

/// Report which plan steps are still missing, without changing anything.
pub fn status(conn: &mut SqliteConnection) -> Result<MigrationStatus, MigrationError> {
    ensure_ledger(conn)?;

    let mut pending = Vec::new();
    for step in TARGET_SCHEMA {
        if !step_present(conn, step)? {
            pending.push(step.describe());
        }
    }

    Ok(MigrationStatus {
        version: SCHEMA_VERSION,
        version_applied: version_applied(conn, SCHEMA_VERSION)?,
        pending_steps: pending,
    })
}

#[derive(diesel::QueryableByName)]
struct CountRow {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    count: i64,
}

fn table_exists(conn: &mut SqliteConnection, name: &str) -> Result<bool, MigrationError> {
    let row = sql_query(
        "SELECT COUNT(*) AS count FROM sqlite_master WHERE type = 'table' AND name = ?",
    )
    .bind::<Text, _>(name)
    .get_result::<CountRow>(conn)?;
    Ok(row.count > 0)
}

fn index_exists(conn: &mut SqliteConnection, name: &str) -> Result<bool, MigrationError> {
    let row = sql_query(
        "SELECT COUNT(*) AS count FROM sqlite_master WHERE type = 'index' AND name = ?",
    )
    .bind::<Text, _>(name)
    .get_result::<CountRow>(conn)?;
    Ok(row.count > 0)
}

fn column_exists(
    conn: &mut SqliteConnection,
    table: &str,
    column: &str,
) -> Result<bool, MigrationError> {
    let row = sql_query("SELECT COUNT(*) AS count FROM pragma_table_info(?) WHERE name = ?")
        .bind::<Text, _>(table)
        .bind::<Text, _>(column)
        .get_result::<CountRow>(conn)?;
    Ok(row.count > 0)
}

fn step_present(conn: &mut SqliteConnection, step: &SchemaStep) -> Result<bool, MigrationError> {
    match step {
        SchemaStep::AddColumn { table, column, .. } => column_exists(conn, table, column),
        SchemaStep::CreateTable { name, .. } => table_exists(conn, name),
        SchemaStep::CreateIndex { name, .. } => index_exists(conn, name),
    }
}

fn ensure_ledger(conn: &mut SqliteConnection) -> Result<(), MigrationError> {
    sql_query(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version TEXT PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(conn)?;
    Ok(())
}

fn version_applied(conn: &mut SqliteConnection, version: &str) -> Result<bool, MigrationError> {
    let row = sql_query("SELECT COUNT(*) AS count FROM schema_migrations WHERE version = ?")
        .bind::<Text, _>(version)
        .get_result::<CountRow>(conn)?;
    Ok(row.count > 0)
}

fn record_version(conn: &mut SqliteConnection, version: &str) -> Result<(), MigrationError> {
    sql_query("INSERT INTO schema_migrations (version) VALUES (?)")
        .bind::<Text, _>(version)
        .execute(conn)?;
    Ok(())
}
