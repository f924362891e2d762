//! SQLite-backed daily record store.

use std::path::Path;

use chrono::NaiveDate;
use parking_lot::Mutex;
use rusqlite::{params, Connection, ErrorCode};

const DB_SCHEMA_VERSION: i64 = 1;

/// Durable store errors.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("record for {0} already exists")]
    Duplicate(NaiveDate),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// One persisted per-day record. At most one row per calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub fresh_count: u64,
    pub rotten_count: u64,
}

/// Connection wrapper for the daily records table.
///
/// All statements are single-row; the connection sits behind its own mutex
/// and is never touched while the counter lock is held.
pub struct RecordStore {
    conn: Mutex<Connection>,
}

impl RecordStore {
    /// Opens (or creates) the database at `path` and applies the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens an in-memory database, used by tests and the test config.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Inserts or updates the record for `date` with the given totals.
    ///
    /// Within a day totals only ever grow, so the update is conditional on
    /// both counts being at least the stored values. A snapshot taken before
    /// a concurrent write landed (or before the day was closed out) arrives
    /// with smaller totals and leaves the row untouched.
    pub fn upsert_day(&self, date: NaiveDate, fresh: u64, rotten: u64) -> Result<(), DbError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO daily_records (date, fresh_count, rotten_count)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(date) DO UPDATE SET
                 fresh_count = excluded.fresh_count,
                 rotten_count = excluded.rotten_count
             WHERE excluded.fresh_count >= daily_records.fresh_count
               AND excluded.rotten_count >= daily_records.rotten_count",
            params![date, fresh as i64, rotten as i64],
        )?;
        Ok(())
    }

    /// Inserts a new record for `date`. A row for that date must not exist
    /// yet; a collision is reported as [`DbError::Duplicate`].
    pub fn insert_day(&self, date: NaiveDate, fresh: u64, rotten: u64) -> Result<(), DbError> {
        let conn = self.conn.lock();
        let result = conn.execute(
            "INSERT INTO daily_records (date, fresh_count, rotten_count)
             VALUES (?1, ?2, ?3)",
            params![date, fresh as i64, rotten as i64],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Err(DbError::Duplicate(date))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Returns the record for `date`, if one exists.
    pub fn get_day(&self, date: NaiveDate) -> Result<Option<DailyRecord>, DbError> {
        use rusqlite::OptionalExtension;

        let conn = self.conn.lock();
        let record = conn
            .query_row(
                "SELECT id, date, fresh_count, rotten_count
                 FROM daily_records WHERE date = ?1",
                params![date],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    /// Returns all records with `date` in `[start, end]` inclusive, date
    /// ascending. Dates are stored as `YYYY-MM-DD` text, so the lexical
    /// range scan is also the chronological one.
    pub fn history(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DailyRecord>, DbError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, date, fresh_count, rotten_count
             FROM daily_records
             WHERE date BETWEEN ?1 AND ?2
             ORDER BY date ASC",
        )?;

        let records = stmt
            .query_map(params![start, end], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<DailyRecord> {
    Ok(DailyRecord {
        id: row.get(0)?,
        date: row.get(1)?,
        fresh_count: row.get::<_, i64>(2)? as u64,
        rotten_count: row.get::<_, i64>(3)? as u64,
    })
}

fn initialize_schema(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;",
    )?;

    let mut version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version < 1 {
        apply_migration_1(conn)?;
        version = 1;
        conn.pragma_update(None, "user_version", version)?;
    }

    if version > DB_SCHEMA_VERSION {
        // Future schema; keep it, rows stay forward-readable.
        conn.pragma_update(None, "user_version", version)?;
    }

    Ok(())
}

fn apply_migration_1(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS daily_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL UNIQUE,
            fresh_count INTEGER NOT NULL DEFAULT 0,
            rotten_count INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_daily_records_date ON daily_records(date);
        ",
    )
}
