use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. Migrations record themselves there.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Run `sql` once; the version is remembered in the `log` table.
fn apply_once(conn: &Connection, version: &str, sql: &str, message: &str) -> Result<bool> {
    if is_applied(conn, version)? {
        return Ok(false);
    }

    conn.execute_batch(sql)?;

    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;

    log::info!("Migration applied: {version}");
    Ok(true)
}

/// Migrations in the order they must run.
const MIGRATIONS: &[(&str, &str, &str)] = &[
    (
        "20250301_0001_local_storage",
        r#"
        CREATE TABLE IF NOT EXISTS local_storage (
            key   TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        );
        "#,
        "Created local_storage table",
    ),
    (
        "20250412_0002_local_storage_updated_at",
        r#"
        ALTER TABLE local_storage ADD COLUMN updated_at TEXT NOT NULL DEFAULT '';
        "#,
        "Added updated_at to local_storage",
    ),
];

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db() and whenever a local store is opened.
pub fn run_pending_migrations(conn: &Connection) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for (version, sql, message) in MIGRATIONS {
        if apply_once(conn, version, sql, message)? {
            applied += 1;
        }
    }
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_run_once() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(run_pending_migrations(&conn).unwrap(), MIGRATIONS.len());
        assert_eq!(run_pending_migrations(&conn).unwrap(), 0);

        let recorded: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(recorded as usize, MIGRATIONS.len());
    }
}
