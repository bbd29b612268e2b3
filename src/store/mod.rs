use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Result};
use rusqlite::{params, Connection, OptionalExtension, ToSql};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A typed record persisted in one of the declared collections.
pub trait Record: Serialize + DeserializeOwned {
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
}

pub struct CollectionSpec {
    pub name: &'static str,
    /// Record fields with a secondary index, addressable via `get_all_by`.
    pub indexes: &'static [&'static str],
}

pub const COLLECTIONS: &[CollectionSpec] = &[
    CollectionSpec {
        name: "chats",
        indexes: &["folderId"],
    },
    CollectionSpec {
        name: "memories",
        indexes: &["folderId"],
    },
    CollectionSpec {
        name: "action_items",
        indexes: &["completed"],
    },
    CollectionSpec {
        name: "folders",
        indexes: &["type"],
    },
];

fn collection_spec(name: &str) -> Option<&'static CollectionSpec> {
    COLLECTIONS.iter().find(|spec| spec.name == name)
}

fn db_path(app_dir: &Path) -> PathBuf {
    app_dir.join("omi_manager.sqlite3")
}

fn index_ident(collection: &str, field: &str) -> String {
    let field: String = field
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("idx_{collection}_{field}")
}

fn sqlite_table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn migrate(conn: &Connection) -> Result<()> {
    let user_version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if user_version < 1 {
        // v1: one table per collection, the record as JSON text keyed by id,
        // with expression indexes over the declared secondary fields.
        for spec in COLLECTIONS {
            conn.execute_batch(&format!(
                r#"
CREATE TABLE IF NOT EXISTS "{}" (
  id TEXT PRIMARY KEY,
  record TEXT NOT NULL
);
"#,
                spec.name
            ))?;
            for field in spec.indexes {
                conn.execute_batch(&format!(
                    r#"CREATE INDEX IF NOT EXISTS "{}" ON "{}"(json_extract(record, '$.{}'));"#,
                    index_ident(spec.name, field),
                    spec.name,
                    field
                ))?;
            }
        }
        conn.execute_batch("PRAGMA user_version = 1;")?;
    }

    // Later versions only add collections or indexes, never drop existing data.

    Ok(())
}

/// Durable local store. Opened once at startup and passed by reference to
/// the sync and query layers.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(app_dir: &Path) -> Result<Self> {
        fs::create_dir_all(app_dir)?;
        let conn = Connection::open(db_path(app_dir))?;
        conn.busy_timeout(Duration::from_millis(5_000))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        migrate(&conn)?;
        Ok(Self { conn })
    }

    pub fn get<R: Record>(&self, id: &str) -> Result<Option<R>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                &format!(r#"SELECT record FROM "{}" WHERE id = ?1"#, R::COLLECTION),
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let record = serde_json::from_str(&raw)
            .map_err(|e| anyhow!("corrupt {} record {id}: {e}", R::COLLECTION))?;
        Ok(Some(record))
    }

    /// Full scan; row order is unspecified, callers sort explicitly.
    pub fn get_all<R: Record>(&self) -> Result<Vec<R>> {
        let mut stmt = self
            .conn
            .prepare(&format!(r#"SELECT record FROM "{}""#, R::COLLECTION))?;
        let mut rows = stmt.query([])?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let raw: String = row.get(0)?;
            out.push(
                serde_json::from_str(&raw)
                    .map_err(|e| anyhow!("corrupt {} record: {e}", R::COLLECTION))?,
            );
        }
        Ok(out)
    }

    /// Index-scoped scan over one of the collection's declared indexes.
    pub fn get_all_by<R: Record>(&self, index: &str, value: &dyn ToSql) -> Result<Vec<R>> {
        let declared = collection_spec(R::COLLECTION)
            .map(|spec| spec.indexes.contains(&index))
            .unwrap_or(false);
        if !declared {
            return Err(anyhow!("no index '{index}' on collection {}", R::COLLECTION));
        }

        let mut stmt = self.conn.prepare(&format!(
            r#"SELECT record FROM "{}" WHERE json_extract(record, '$.{index}') = ?1"#,
            R::COLLECTION
        ))?;
        let mut rows = stmt.query(params![value])?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let raw: String = row.get(0)?;
            out.push(
                serde_json::from_str(&raw)
                    .map_err(|e| anyhow!("corrupt {} record: {e}", R::COLLECTION))?,
            );
        }
        Ok(out)
    }

    /// Insert-or-replace keyed by the record id. Writing to a collection
    /// whose table is missing is a logged no-op, not a fault.
    pub fn put<R: Record>(&self, record: &R) -> Result<()> {
        if !sqlite_table_exists(&self.conn, R::COLLECTION)? {
            log::error!("collection {} does not exist; dropping write", R::COLLECTION);
            return Ok(());
        }

        let raw = serde_json::to_string(record)?;
        self.conn.execute(
            &format!(
                r#"
INSERT INTO "{}" (id, record)
VALUES (?1, ?2)
ON CONFLICT(id) DO UPDATE SET record = excluded.record
"#,
                R::COLLECTION
            ),
            params![record.id(), raw],
        )?;
        Ok(())
    }

    pub fn delete<R: Record>(&self, id: &str) -> Result<()> {
        self.conn.execute(
            &format!(r#"DELETE FROM "{}" WHERE id = ?1"#, R::COLLECTION),
            params![id],
        )?;
        Ok(())
    }

    /// Best-effort: each record is independently durable; a failure leaves
    /// earlier writes in place.
    pub fn bulk_put<R: Record>(&self, records: &[R]) -> Result<()> {
        if !sqlite_table_exists(&self.conn, R::COLLECTION)? {
            log::error!("collection {} does not exist; dropping writes", R::COLLECTION);
            return Ok(());
        }
        for record in records {
            self.put(record)?;
        }
        Ok(())
    }

    pub fn bulk_delete<R: Record>(&self, ids: &[String]) -> Result<()> {
        for id in ids {
            self.delete::<R>(id)?;
        }
        Ok(())
    }

    pub fn clear<R: Record>(&self) -> Result<()> {
        self.conn
            .execute(&format!(r#"DELETE FROM "{}""#, R::COLLECTION), [])?;
        Ok(())
    }
}
