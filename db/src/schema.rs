//! Schema registry for the task store.
//!
//! Migrations are applied in order by [`create_all`] and reverted in reverse
//! order by [`drop_all`]. [`TABLES`] lists every table the migrations own so
//! that [`clear_all`] can empty the store without touching its schema.

use crate::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

pub struct Migration {
    pub name: &'static str,
    pub up: &'static str,
    pub down: &'static str,
}

pub const MIGRATIONS: &[Migration] = &[Migration {
    name: "0001_tasks",
    up: include_str!("../migrations/0001_tasks/up.sql"),
    down: include_str!("../migrations/0001_tasks/down.sql"),
}];

/// Parents before children.
pub const TABLES: &[&str] = &["task"];

pub async fn connect_sqlite(
    url: &str,
    max_connections: u32,
) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(url);
    options.max_connections(max_connections.max(1));

    let conn = Database::connect(options).await?;
    Ok(conn)
}

pub async fn create_all<C: ConnectionTrait>(db: &C) -> Result<()> {
    for migration in MIGRATIONS {
        tracing::debug!(migration = migration.name, "applying migration");
        db.execute_unprepared(migration.up).await?;
    }
    Ok(())
}

pub async fn drop_all<C: ConnectionTrait>(db: &C) -> Result<()> {
    for migration in MIGRATIONS.iter().rev() {
        tracing::debug!(migration = migration.name, "reverting migration");
        db.execute_unprepared(migration.down).await?;
    }
    Ok(())
}

/// Deletes every row from every registered table, children first. Returns the
/// number of rows removed.
pub async fn clear_all<C: ConnectionTrait>(db: &C) -> Result<u64> {
    let mut removed = 0;
    for table in TABLES.iter().rev() {
        let result = db
            .execute_unprepared(&format!("DELETE FROM {table}"))
            .await?;
        removed += result.rows_affected();
    }
    Ok(removed)
}
