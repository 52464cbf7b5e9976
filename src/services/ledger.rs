//! SQLite persistence for users, rewards and referrals.
//!
//! Timestamps are stored as UTC epoch milliseconds; calendar-day windows
//! are computed by the callers (in IST) and passed down as ranges, so the
//! store never deals with time zones.

use crate::types::{Referral, Reward, User};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Relational store for the rewards ledger.
pub struct LedgerStore {
    conn: Mutex<Connection>,
}

impl LedgerStore {
    /// Open (or create) the ledger database at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        info!("Ledger store initialized");
        Ok(store)
    }

    /// Create an in-memory ledger (for testing).
    pub fn new_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        debug!("In-memory ledger store initialized");
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS rewards (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                stock_symbol TEXT NOT NULL,
                quantity REAL NOT NULL,
                rewarded_at INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS referrals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                referrer_id INTEGER NOT NULL,
                friend_name TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_rewards_user ON rewards(user_id)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_rewards_rewarded_at ON rewards(rewarded_at)",
            [],
        )?;

        Ok(())
    }

    // ========== Writes ==========

    /// Insert a user; the store assigns the id.
    pub fn insert_user(&self, name: &str, created_at: DateTime<Utc>) -> Result<User, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO users (name, created_at) VALUES (?1, ?2)",
            params![name, created_at.timestamp_millis()],
        )?;
        Ok(User {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            created_at,
        })
    }

    /// Insert a reward row; returns the assigned id.
    pub fn insert_reward(
        &self,
        user_id: i64,
        stock_symbol: &str,
        quantity: f64,
        rewarded_at: DateTime<Utc>,
    ) -> Result<i64, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO rewards (user_id, stock_symbol, quantity, rewarded_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![user_id, stock_symbol, quantity, rewarded_at.timestamp_millis()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Insert a referral row; the store assigns the id.
    pub fn insert_referral(
        &self,
        referrer_id: i64,
        friend_name: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Referral, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO referrals (referrer_id, friend_name, created_at)
             VALUES (?1, ?2, ?3)",
            params![referrer_id, friend_name, created_at.timestamp_millis()],
        )?;
        Ok(Referral {
            id: conn.last_insert_rowid(),
            referrer_id,
            friend_name: friend_name.to_string(),
            created_at,
        })
    }

    // ========== Reads ==========

    /// Distinct symbols appearing in any reward row.
    pub fn distinct_symbols(&self) -> Result<Vec<String>, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT DISTINCT stock_symbol FROM rewards")?;
        let symbols = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(symbols)
    }

    /// A user's rewards with `start_ms <= rewarded_at < end_ms`, most recent first.
    pub fn rewards_between(
        &self,
        user_id: i64,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<Reward>, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, stock_symbol, quantity, rewarded_at
             FROM rewards
             WHERE user_id = ?1 AND rewarded_at >= ?2 AND rewarded_at < ?3
             ORDER BY rewarded_at DESC",
        )?;
        let rewards = stmt
            .query_map(params![user_id, start_ms, end_ms], row_to_reward)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rewards)
    }

    /// A user's rewards with `rewarded_at < end_ms`, oldest first.
    pub fn rewards_before(&self, user_id: i64, end_ms: i64) -> Result<Vec<Reward>, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, stock_symbol, quantity, rewarded_at
             FROM rewards
             WHERE user_id = ?1 AND rewarded_at < ?2
             ORDER BY rewarded_at ASC",
        )?;
        let rewards = stmt
            .query_map(params![user_id, end_ms], row_to_reward)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rewards)
    }

    /// Per-symbol quantity sums for a user within `[start_ms, end_ms)`.
    pub fn symbol_totals_between(
        &self,
        user_id: i64,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<(String, f64)>, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT stock_symbol, SUM(quantity)
             FROM rewards
             WHERE user_id = ?1 AND rewarded_at >= ?2 AND rewarded_at < ?3
             GROUP BY stock_symbol",
        )?;
        let totals = stmt
            .query_map(params![user_id, start_ms, end_ms], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(totals)
    }

    /// All-time per-symbol quantity sums for a user.
    pub fn symbol_totals_all(&self, user_id: i64) -> Result<Vec<(String, f64)>, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT stock_symbol, SUM(quantity)
             FROM rewards
             WHERE user_id = ?1
             GROUP BY stock_symbol",
        )?;
        let totals = stmt
            .query_map(params![user_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(totals)
    }
}

fn row_to_reward(row: &rusqlite::Row<'_>) -> Result<Reward, rusqlite::Error> {
    let rewarded_at_ms: i64 = row.get(4)?;
    Ok(Reward {
        id: row.get(0)?,
        user_id: row.get(1)?,
        stock_symbol: row.get(2)?,
        quantity: row.get(3)?,
        rewarded_at: DateTime::<Utc>::from_timestamp_millis(rewarded_at_ms).unwrap_or_default(),
    })
}
