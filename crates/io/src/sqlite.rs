// SQLite row store

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use scoped_settings_engine::{RowStore, StoreError};

use crate::SCHEMA_VERSION;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS settings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    scope TEXT NOT NULL,     -- "global", a type name, or "Type#id"
    name TEXT NOT NULL,
    value TEXT NOT NULL,     -- encoded value, "null" for an explicit null
    UNIQUE (scope, name)
);

CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Setting rows in a single SQLite table.
///
/// The connection sits behind a mutex so the store can be shared between
/// threads; every call is one statement and completes before returning.
pub struct SqliteRowStore {
    conn: Mutex<Connection>,
}

impl SqliteRowStore {
    /// Open (or create) the database at `path`
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path).map_err(backend)?;
        info!(path = %path.display(), "opened settings database");
        Self::init(conn)
    }

    /// Transient database that disappears with the store
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory().map_err(backend)?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA).map_err(backend)?;
        conn.execute(
            "INSERT OR IGNORE INTO meta (key, value) VALUES ('schema_version', ?1)",
            params![SCHEMA_VERSION.to_string()],
        )
        .map_err(backend)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Schema version recorded when the database was created
    pub fn schema_version(&self) -> Result<u32, StoreError> {
        let conn = self.conn.lock();
        let raw: String = conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .map_err(backend)?;
        raw.parse()
            .map_err(|_| StoreError::Backend(format!("invalid schema version: {raw}")))
    }
}

impl RowStore for SqliteRowStore {
    fn fetch(&self, scope: &str, name: &str) -> Result<Option<String>, StoreError> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT value FROM settings WHERE scope = ?1 AND name = ?2",
            params![scope, name],
            |row| row.get(0),
        )
        .optional()
        .map_err(backend)
    }

    fn upsert(&self, scope: &str, name: &str, payload: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO settings (scope, name, value) VALUES (?1, ?2, ?3)
             ON CONFLICT (scope, name) DO UPDATE SET value = excluded.value",
            params![scope, name, payload],
        )
        .map_err(backend)?;
        Ok(())
    }

    fn remove(&self, scope: &str, name: &str) -> Result<bool, StoreError> {
        let conn = self.conn.lock();
        let removed = conn
            .execute(
                "DELETE FROM settings WHERE scope = ?1 AND name = ?2",
                params![scope, name],
            )
            .map_err(backend)?;
        Ok(removed > 0)
    }

    fn list(&self, scope: &str, prefix: &str) -> Result<Vec<(String, String)>, StoreError> {
        let conn = self.conn.lock();
        // substr keeps the match literal and case-sensitive, unlike LIKE
        let mut stmt = conn
            .prepare(
                "SELECT name, value FROM settings
                 WHERE scope = ?1 AND substr(name, 1, length(?2)) = ?2
                 ORDER BY name",
            )
            .map_err(backend)?;
        let rows = stmt
            .query_map(params![scope, prefix], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(backend)?;
        let listed = rows.collect::<Result<Vec<_>, _>>().map_err(backend)?;
        Ok(listed)
    }

    fn remove_scope(&self, scope: &str) -> Result<usize, StoreError> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM settings WHERE scope = ?1", params![scope])
            .map_err(backend)
    }

    fn scope_has_rows(&self, scope: &str, name: Option<&str>) -> Result<bool, StoreError> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT EXISTS (
                 SELECT 1 FROM settings WHERE scope = ?1 AND (?2 IS NULL OR name = ?2)
             )",
            params![scope, name],
            |row| row.get(0),
        )
        .map_err(backend)
    }

    fn row_count(&self) -> Result<usize, StoreError> {
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))
            .map_err(backend)?;
        Ok(count as usize)
    }
}

fn backend(e: rusqlite::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}
