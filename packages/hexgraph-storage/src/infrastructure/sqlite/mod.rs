//! SQLite Ordered Store
//!
//! File-based persistent storage using SQLite.
//!
//! Members are stored as BLOBs: SQLite compares BLOBs with `memcmp`, which is
//! exactly the byte order of the range scan, and the sentinel byte in range
//! bounds never has to pass through a TEXT value.
use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::ops::Bound;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::config::{StoreConfig, DEFAULT_POOL_SIZE};
use crate::domain::codec::lex_range;
use crate::domain::{LexBound, OrderedStore, StoreConnection};
use crate::{HexError, Result};

/// SQLite-based OrderedStore implementation
#[derive(Clone)]
pub struct SqliteOrderedStore {
    conn: Arc<Mutex<Connection>>,
    pool: Arc<Semaphore>,
}

impl SqliteOrderedStore {
    /// Open (or create) a store at the given path
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::from_connection(conn, DEFAULT_POOL_SIZE)
    }

    /// Create an in-memory SQLite store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, DEFAULT_POOL_SIZE)
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let path = config
            .path
            .as_deref()
            .ok_or_else(|| HexError::config("Field 'store.path' is required for the sqlite backend"))?;
        let conn = Connection::open(path)?;
        Self::from_connection(conn, config.pool_size)
    }

    fn from_connection(conn: Connection, pool_size: usize) -> Result<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            pool: Arc::new(Semaphore::new(pool_size.max(1))),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS lex_members (
                region TEXT NOT NULL,
                member BLOB NOT NULL,
                score REAL NOT NULL,
                PRIMARY KEY (region, member)
            ) WITHOUT ROWID",
            [],
        )?;
        Ok(())
    }

    pub fn available_connections(&self) -> usize {
        self.pool.available_permits()
    }
}

#[async_trait]
impl OrderedStore for SqliteOrderedStore {
    type Connection = SqliteConnection;

    async fn connect(&self) -> Result<SqliteConnection> {
        let permit = self.pool.clone().acquire_owned().await.map_err(|e| {
            HexError::store_unavailable("sqlite store connection pool closed").with_source(e)
        })?;
        Ok(SqliteConnection {
            conn: self.conn.clone(),
            _permit: permit,
        })
    }
}

pub struct SqliteConnection {
    conn: Arc<Mutex<Connection>>,
    _permit: OwnedSemaphorePermit,
}

fn push_bound(sql: &mut String, values: &mut Vec<Value>, op: &str, bytes: &[u8]) {
    sql.push_str(" AND member ");
    sql.push_str(op);
    sql.push_str(" ?");
    values.push(Value::Blob(bytes.to_vec()));
}

#[async_trait]
impl StoreConnection for SqliteConnection {
    async fn add_batch(&self, region: &str, entries: &[(f64, &str)]) -> Result<usize> {
        let conn = self.conn.lock();
        let tx = conn.unchecked_transaction()?;

        let mut added = 0;
        for (score, member) in entries {
            added += tx.execute(
                "INSERT OR IGNORE INTO lex_members (region, member, score) VALUES (?1, ?2, ?3)",
                params![region, member.as_bytes(), score],
            )?;
        }

        tx.commit()?;
        Ok(added)
    }

    async fn range_by_lex(
        &self,
        region: &str,
        min: &LexBound,
        max: &LexBound,
    ) -> Result<Vec<String>> {
        let Some((lower, upper)) = lex_range(min, max) else {
            return Ok(Vec::new());
        };

        let mut sql = String::from("SELECT member FROM lex_members WHERE region = ?");
        let mut values = vec![Value::Text(region.to_string())];
        match lower {
            Bound::Included(v) => push_bound(&mut sql, &mut values, ">=", v),
            Bound::Excluded(v) => push_bound(&mut sql, &mut values, ">", v),
            Bound::Unbounded => {}
        }
        match upper {
            Bound::Included(v) => push_bound(&mut sql, &mut values, "<=", v),
            Bound::Excluded(v) => push_bound(&mut sql, &mut values, "<", v),
            Bound::Unbounded => {}
        }
        sql.push_str(" ORDER BY member");

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let members = stmt
            .query_map(params_from_iter(values.iter()), |row| row.get::<_, Vec<u8>>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        members
            .into_iter()
            .map(|member| {
                String::from_utf8(member).map_err(|e| {
                    HexError::corrupt_key(String::from_utf8_lossy(e.as_bytes()).into_owned())
                        .with_source(e)
                })
            })
            .collect()
    }

    async fn score(&self, region: &str, member: &str) -> Result<Option<f64>> {
        let conn = self.conn.lock();
        let score = conn
            .query_row(
                "SELECT score FROM lex_members WHERE region = ?1 AND member = ?2",
                params![region, member.as_bytes()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(score)
    }

    async fn cardinality(&self, region: &str) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM lex_members WHERE region = ?1",
            params![region],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
