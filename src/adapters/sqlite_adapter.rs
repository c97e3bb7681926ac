//! SQLite bar store.
//!
//! Dates are stored as `YYYY-MM-DD` text so lexical order is date order.

use crate::domain::error::TradestatError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{DataPort, DataRange};
use chrono::NaiveDate;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn db_err(e: r2d2::Error) -> TradestatError {
    TradestatError::Database {
        reason: e.to_string(),
    }
}

fn query_err(e: rusqlite::Error) -> TradestatError {
    TradestatError::DatabaseQuery {
        reason: e.to_string(),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, TradestatError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| TradestatError::Database {
        reason: format!("bad stored date '{}': {}", s, e),
    })
}

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteAdapter {
    /// Open the database named by `[data] sqlite_path`, creating the schema
    /// if it does not exist yet.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TradestatError> {
        let db_path = config.require_string("data", "sqlite_path")?;
        let pool_size = config.get_int("data", "pool_size", 4).max(1) as u32;
        Self::open(&db_path, pool_size)
    }

    pub fn open(db_path: &str, pool_size: u32) -> Result<Self, TradestatError> {
        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(db_err)?;

        let adapter = Self { pool };
        adapter.initialize_schema()?;
        tracing::debug!(path = db_path, pool_size, "opened sqlite store");
        Ok(adapter)
    }

    pub fn in_memory() -> Result<Self, TradestatError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager).map_err(db_err)?;
        let adapter = Self { pool };
        adapter.initialize_schema()?;
        Ok(adapter)
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, TradestatError> {
        self.pool.get().map_err(db_err)
    }

    pub fn initialize_schema(&self) -> Result<(), TradestatError> {
        self.conn()?
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS ohlcv (
                    code TEXT NOT NULL,
                    exchange TEXT NOT NULL,
                    date TEXT NOT NULL,
                    open REAL NOT NULL,
                    high REAL NOT NULL,
                    low REAL NOT NULL,
                    close REAL NOT NULL,
                    volume INTEGER NOT NULL,
                    PRIMARY KEY (code, exchange, date)
                );
                CREATE INDEX IF NOT EXISTS idx_ohlcv_exchange ON ohlcv(exchange);",
            )
            .map_err(query_err)
    }

    /// Upsert `bars` in one transaction. Returns the number of rows written.
    pub fn insert_bars(&self, bars: &[OhlcvBar]) -> Result<usize, TradestatError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_err)?;
        let mut written = 0;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT OR REPLACE INTO ohlcv (code, exchange, date, open, high, low, close, volume)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                )
                .map_err(query_err)?;
            for bar in bars {
                written += stmt
                    .execute(params![
                        bar.code,
                        bar.exchange,
                        bar.date.format(DATE_FORMAT).to_string(),
                        bar.open,
                        bar.high,
                        bar.low,
                        bar.close,
                        bar.volume
                    ])
                    .map_err(query_err)?;
            }
        }
        tx.commit().map_err(query_err)?;
        Ok(written)
    }
}

impl DataPort for SqliteAdapter {
    fn fetch_ohlcv(
        &self,
        code: &str,
        exchange: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, TradestatError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT date, open, high, low, close, volume
                 FROM ohlcv
                 WHERE code = ?1 AND exchange = ?2 AND date >= ?3 AND date <= ?4
                 ORDER BY date ASC",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map(
                params![
                    code,
                    exchange,
                    start_date.format(DATE_FORMAT).to_string(),
                    end_date.format(DATE_FORMAT).to_string()
                ],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, f64>(1)?,
                        row.get::<_, f64>(2)?,
                        row.get::<_, f64>(3)?,
                        row.get::<_, f64>(4)?,
                        row.get::<_, i64>(5)?,
                    ))
                },
            )
            .map_err(query_err)?;

        let mut bars = Vec::new();
        for row in rows {
            let (date, open, high, low, close, volume) = row.map_err(query_err)?;
            bars.push(OhlcvBar {
                code: code.to_string(),
                exchange: exchange.to_string(),
                date: parse_date(&date)?,
                open,
                high,
                low,
                close,
                volume,
            });
        }
        Ok(bars)
    }

    fn list_symbols(&self, exchange: &str) -> Result<Vec<String>, TradestatError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT DISTINCT code FROM ohlcv WHERE exchange = ?1 ORDER BY code")
            .map_err(query_err)?;
        let rows = stmt
            .query_map(params![exchange], |row| row.get::<_, String>(0))
            .map_err(query_err)?;

        rows.map(|r| r.map_err(query_err)).collect()
    }

    fn get_data_range(
        &self,
        code: &str,
        exchange: &str,
    ) -> Result<Option<DataRange>, TradestatError> {
        let (min, max, count): (Option<String>, Option<String>, i64) = self
            .conn()?
            .query_row(
                "SELECT MIN(date), MAX(date), COUNT(*) FROM ohlcv WHERE code = ?1 AND exchange = ?2",
                params![code, exchange],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .map_err(query_err)?;

        match (min, max) {
            (Some(min), Some(max)) if count > 0 => Ok(Some(DataRange {
                first: parse_date(&min)?,
                last: parse_date(&max)?,
                bars: count as usize,
            })),
            _ => Ok(None),
        }
    }
}
