//! SQLite ledger driver, using the [`rusqlite`](https://crates.io/crates/rusqlite) crate.
//!
//! This is the reference implementation of the [Driver] contract. The ledger
//! is a single table (default name `schema_migration`) with the applied
//! script's name as primary key and an `executed_at` timestamp defaulting to
//! the time of insertion.
//!
//! ## Transaction safety
//!
//! Each apply is one SQLite transaction: the whole script executes as a
//! statement batch, the ledger row is inserted, and the transaction commits.
//! If either step fails the transaction is rolled back, so a failed script
//! leaves no trace in the ledger - it is indistinguishable from one that was
//! never attempted.
//!
//! SQLite DDL is transactional, so this holds for schema changes too. The
//! driver executes script content verbatim and never inspects it; statements
//! that SQLite itself will not run inside a transaction (such as `VACUUM`,
//! or `PRAGMA`s that demand no active transaction) will fail the apply and
//! are the script author's responsibility to avoid.

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, Transaction};

use crate::core::{Driver, Migration};
use crate::error::Error;

pub(crate) const DEFAULT_LEDGER_TABLE_NAME: &str = "schema_migration";

/// A migration recorded in the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedRecord {
    pub name: String,
    /// When the migration was applied (UTC, second resolution).
    pub executed_at: DateTime<Utc>,
}

/// [Driver] implementation for a SQLite database.
///
/// Borrows the connection mutably for the duration of a run; the caller
/// keeps ownership and can inspect the database afterwards.
///
/// # Example
///
/// ```
/// use rusqlite::Connection;
/// use sqlstep::sqlite::SqliteDriver;
/// use sqlstep::{Driver, Migration};
///
/// let mut conn = Connection::open_in_memory().unwrap();
/// let mut driver = SqliteDriver::new(&mut conn);
/// driver.ensure_ledger().unwrap();
/// driver
///     .apply(&Migration {
///         name: "0001_init.sql".to_string(),
///         script: "CREATE TABLE users (id INTEGER PRIMARY KEY);".to_string(),
///     })
///     .unwrap();
/// assert_eq!(driver.applied().unwrap(), vec!["0001_init.sql"]);
/// ```
#[derive(Debug)]
pub struct SqliteDriver<'conn> {
    conn: &'conn mut Connection,
    ledger_table_name: String,
}

impl<'conn> SqliteDriver<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self {
            conn,
            ledger_table_name: DEFAULT_LEDGER_TABLE_NAME.to_string(),
        }
    }

    /// Set a custom name for the ledger table.
    /// Defaults to "schema_migration".
    pub fn with_ledger_table_name(mut self, name: impl Into<String>) -> Self {
        self.ledger_table_name = name.into();
        self
    }

    pub fn ledger_table_name(&self) -> &str {
        &self.ledger_table_name
    }

    /// Every ledger record with its parsed execution timestamp, oldest first.
    ///
    /// Same ordering as [applied](Driver::applied); intended for audit and
    /// status display, not for deciding what runs.
    pub fn history(&self) -> Result<Vec<AppliedRecord>, Error> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT name, executed_at FROM {} ORDER BY executed_at ASC, rowid ASC",
            self.ledger_table_name
        ))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(name, executed_at)| {
                // CURRENT_TIMESTAMP stores UTC as "YYYY-MM-DD HH:MM:SS"
                let executed_at = NaiveDateTime::parse_from_str(&executed_at, "%Y-%m-%d %H:%M:%S")
                    .map_err(|e| {
                        Error::Generic(format!(
                            "failed to parse executed_at '{}': {}",
                            executed_at, e
                        ))
                    })?
                    .and_utc();
                Ok(AppliedRecord { name, executed_at })
            })
            .collect()
    }
}

impl Driver for SqliteDriver<'_> {
    fn ensure_ledger(&mut self) -> Result<(), Error> {
        self.conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    name TEXT NOT NULL PRIMARY KEY,
                    executed_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                )",
                self.ledger_table_name
            ),
            [],
        )?;
        Ok(())
    }

    fn applied(&mut self) -> Result<Vec<String>, Error> {
        // rowid breaks ties between applies within the same second
        let mut stmt = self.conn.prepare(&format!(
            "SELECT name FROM {} ORDER BY executed_at ASC, rowid ASC",
            self.ledger_table_name
        ))?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    fn apply(&mut self, migration: &Migration) -> Result<(), Error> {
        let tx = self.conn.transaction()?;

        if let Err(exec_err) = tx.execute_batch(&migration.script) {
            return Err(rollback_or_combine(tx, exec_err.into()));
        }

        if let Err(insert_err) = tx.execute(
            &format!(
                "INSERT INTO {} (name) VALUES (?1)",
                self.ledger_table_name
            ),
            params![migration.name],
        ) {
            return Err(rollback_or_combine(tx, insert_err.into()));
        }

        tx.commit()?;
        Ok(())
    }
}

/// Roll the transaction back and hand the original error through; if the
/// rollback itself fails, surface both errors.
fn rollback_or_combine(tx: Transaction<'_>, cause: Error) -> Error {
    match tx.rollback() {
        Ok(()) => cause,
        Err(rollback_err) => Error::rollback_failed(cause, rollback_err.into()),
    }
}
