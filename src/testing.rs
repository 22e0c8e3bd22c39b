//! Testing utilities for migration development and verification.
//!
//! This module provides a small harness for writing tests against a real
//! (in-memory) SQLite database, plus a [RecordingReporter] for asserting on
//! reported progress.

use std::cell::RefCell;

use rusqlite::Connection;

use crate::core::Driver;
use crate::reporter::{FieldValue, Reporter};
use crate::source::Source;
use crate::sqlite::SqliteDriver;
use crate::{Error, Migrator};

/// A test harness that runs a [Migrator] against an in-memory SQLite
/// database and provides assertion helpers.
///
/// # Example
///
/// ```
/// use sqlstep::testing::MigrationTestHarness;
/// use sqlstep::{MemorySource, Migrator};
///
/// let source = MemorySource::new(vec![(
///     "0001_init.sql".to_string(),
///     "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);".to_string(),
/// )]);
/// let mut harness = MigrationTestHarness::new(Migrator::new(source));
///
/// harness.run().unwrap();
///
/// harness.assert_table_exists("users").unwrap();
/// harness.execute("INSERT INTO users (name) VALUES ('alice')").unwrap();
/// let name: String = harness.query_one("SELECT name FROM users WHERE id = 1").unwrap();
/// assert_eq!(name, "alice");
/// assert_eq!(harness.applied().unwrap(), vec!["0001_init.sql"]);
/// ```
pub struct MigrationTestHarness<S: Source> {
    conn: Connection,
    migrator: Migrator<S>,
}

impl<S: Source> MigrationTestHarness<S> {
    /// Create a harness backed by a fresh in-memory SQLite database.
    ///
    /// Use the same migrator construction as the production code path, so
    /// tests exercise the real script sequence.
    pub fn new(migrator: Migrator<S>) -> Self {
        let conn = Connection::open_in_memory().expect("failed to create in-memory test database");
        Self { conn, migrator }
    }

    /// Create a harness with a custom connection, e.g. a file-backed
    /// database seeded with production-like data.
    pub fn with_connection(conn: Connection, migrator: Migrator<S>) -> Self {
        Self { conn, migrator }
    }

    /// Apply every pending migration, discarding progress reports.
    pub fn run(&mut self) -> Result<(), Error> {
        let mut driver = SqliteDriver::new(&mut self.conn);
        self.migrator.run(&mut driver, &crate::NullReporter)
    }

    /// Apply every pending migration, sending progress to `reporter`.
    pub fn run_with_reporter(&mut self, reporter: &impl Reporter) -> Result<(), Error> {
        let mut driver = SqliteDriver::new(&mut self.conn);
        self.migrator.run(&mut driver, reporter)
    }

    /// Names recorded in the ledger, oldest first.
    /// Errors if no run has created the ledger yet.
    pub fn applied(&mut self) -> Result<Vec<String>, Error> {
        let mut driver = SqliteDriver::new(&mut self.conn);
        driver.applied()
    }

    /// Execute a single SQL statement, returning the number of rows changed.
    pub fn execute(&self, sql: &str) -> Result<usize, Error> {
        Ok(self.conn.execute(sql, [])?)
    }

    /// Run a query expected to produce exactly one row with one column.
    pub fn query_one<T: rusqlite::types::FromSql>(&self, sql: &str) -> Result<T, Error> {
        Ok(self.conn.query_row(sql, [], |row| row.get(0))?)
    }

    /// Assert that a table exists in the database.
    pub fn assert_table_exists(&self, table: &str) -> Result<(), Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
        let exists = stmt.query([table])?.next()?.is_some();
        if exists {
            Ok(())
        } else {
            Err(Error::Generic(format!(
                "expected table '{}' to exist",
                table
            )))
        }
    }

    /// Direct access to the underlying connection for bespoke assertions.
    pub fn connection(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

/// A [Reporter] that captures every message for later assertions.
///
/// Fields are rendered into the line as ` key=value` pairs.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    lines: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every reported line, in order.
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str, fields: &[(&str, FieldValue<'_>)]) {
        let mut line = message.to_string();
        for (key, value) in fields {
            line.push_str(&format!(" {}={}", key, value));
        }
        self.lines.borrow_mut().push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySource;

    fn migrator() -> Migrator<MemorySource> {
        Migrator::new(MemorySource::new(vec![
            (
                "0001_init.sql".to_string(),
                "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);".to_string(),
            ),
            (
                "0002_add_email.sql".to_string(),
                "ALTER TABLE users ADD COLUMN email TEXT;".to_string(),
            ),
        ]))
    }

    #[test]
    fn harness_runs_migrations_and_exposes_state() {
        let mut harness = MigrationTestHarness::new(migrator());
        harness.run().unwrap();

        harness.assert_table_exists("users").unwrap();
        assert_eq!(
            harness.applied().unwrap(),
            vec!["0001_init.sql", "0002_add_email.sql"]
        );

        harness
            .execute("INSERT INTO users (name, email) VALUES ('alice', 'alice@example.com')")
            .unwrap();
        let email: String = harness
            .query_one("SELECT email FROM users WHERE name = 'alice'")
            .unwrap();
        assert_eq!(email, "alice@example.com");
    }

    #[test]
    fn assert_table_exists_fails_for_missing_table() {
        let mut harness = MigrationTestHarness::new(migrator());
        harness.run().unwrap();
        assert!(harness.assert_table_exists("ghosts").is_err());
    }

    #[test]
    fn recording_reporter_captures_lines_in_order() {
        let mut harness = MigrationTestHarness::new(migrator());
        let reporter = RecordingReporter::new();
        harness.run_with_reporter(&reporter).unwrap();

        let lines = reporter.lines();
        assert_eq!(lines.first().unwrap(), "Starting migration run");
        assert_eq!(lines.last().unwrap(), "Completed migration run");
        assert!(lines.contains(&"Migrations to apply count=2".to_string()));
    }
}
