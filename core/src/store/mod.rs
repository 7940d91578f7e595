//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! Stages call store methods — they never execute SQL directly.

use crate::clock::fmt_ts;
use crate::error::GenResult;
use chrono::NaiveDateTime;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection};

mod churn;
mod commerce;
mod customer;
mod reference;
mod subscription;
mod support;

/// Every table the generator owns. Used to validate dynamic table-name
/// queries (counts, dumps) so no caller-supplied string reaches SQL.
pub const TABLES: [&str; 16] = [
    "generation_runs",
    "customers",
    "subscriptions",
    "orders",
    "order_items",
    "payments",
    "churn_events",
    "support_tickets",
    "products",
    "locations",
    "app_installs",
    "discounts",
    "order_discounts",
    "marketing_spend",
    "web_traffic",
    "benchmarks",
];

pub struct DatasetStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl DatasetStore {
    pub fn open(path: &str) -> GenResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> GenResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases this returns a fresh, isolated database.
    pub fn reopen(&self) -> GenResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply the sink schema. Idempotent.
    pub fn migrate(&self) -> GenResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_schema.sql"))?;
        Ok(())
    }

    // ── Run metadata ───────────────────────────────────────────

    pub fn insert_run(
        &self,
        run_id: &str,
        seed: u64,
        version: &str,
        anchored_at: NaiveDateTime,
    ) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO generation_runs (run_id, seed, version, anchored_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![run_id, seed as i64, version, fmt_ts(anchored_at)],
        )?;
        Ok(())
    }

    // ── Generic helpers ────────────────────────────────────────

    /// Row count of a known table. Panics on an unknown table name —
    /// that is a programming error, not an input error.
    pub fn row_count(&self, table: &str) -> GenResult<i64> {
        assert!(TABLES.contains(&table), "unknown table: {table}");
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .map_err(Into::into)
    }

    /// Serialize an entire table row-by-row in insertion order.
    /// Used by the determinism test to compare two runs byte for byte.
    pub fn dump_table(&self, table: &str) -> GenResult<Vec<String>> {
        assert!(TABLES.contains(&table), "unknown table: {table}");
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT * FROM {table} ORDER BY rowid"))?;
        let column_count = stmt.column_count();
        let rows = stmt
            .query_map([], |row| {
                let mut parts = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    parts.push(match row.get_ref(i)? {
                        ValueRef::Null => "NULL".to_string(),
                        ValueRef::Integer(n) => n.to_string(),
                        ValueRef::Real(f) => format!("{f:?}"),
                        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
                        ValueRef::Blob(b) => format!("<blob:{}>", b.len()),
                    });
                }
                Ok(parts.join("|"))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
