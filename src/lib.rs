#![cfg_attr(docsrs, feature(doc_cfg))]
//! `sqlstep` is a lightweight library for applying file-based SQL schema
//! migrations exactly once each.
//!
//! Core concepts:
//! - Migrations are plain `.sql` files. The file name (including extension)
//!   is the migration's identity and determines execution order via ordinary
//!   lexicographic sort - name files with a sortable prefix like
//!   `0001_init.sql`, `0002_add_col.sql`.
//! - Applied names are tracked in a ledger table, so re-running is always
//!   safe: anything already in the ledger is skipped.
//! - Executing a script and recording it in the ledger happen in one
//!   transaction. A failed migration leaves no ledger record and no partial
//!   schema change - it is indistinguishable from one never attempted.
//!
//! # Design
//!
//! Three seams keep the runner small and the storage engine swappable:
//!
//! - [Source] supplies scripts ([DirectorySource] for a directory of `.sql`
//!   files, [MemorySource] / [embedded_source!] for scripts carried in the
//!   binary).
//! - [Driver] is the storage contract: ensure the ledger exists, list
//!   applied names, apply one migration atomically. The crate ships a SQLite
//!   implementation ([sqlite::SqliteDriver], `sqlite` feature); another
//!   engine implements the same three operations without touching the
//!   runner.
//! - [Reporter] receives progress. It is passed explicitly into
//!   [Migrator::run] instead of going through a process-global logger; use
//!   [NullReporter] to discard, or `TracingReporter` (`tracing` feature) to
//!   forward to `tracing`.
//!
//! There are no down-migrations and no cross-process locking: the runner
//! assumes it is the only writer for the duration of a run.
//!
//! # Example
//!
//! ```
//! use rusqlite::Connection;
//! use sqlstep::sqlite::SqliteDriver;
//! use sqlstep::{MemorySource, Migrator, NullReporter};
//!
//! // scripts usually come from a directory (DirectorySource) or are
//! // embedded with embedded_source!; pairs work fine for a quick start
//! let source = MemorySource::new(vec![
//!     (
//!         "0001_init.sql".to_string(),
//!         "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);".to_string(),
//!     ),
//!     (
//!         "0002_add_email.sql".to_string(),
//!         "ALTER TABLE users ADD COLUMN email TEXT;".to_string(),
//!     ),
//! ]);
//! let migrator = Migrator::new(source);
//!
//! let mut conn = Connection::open_in_memory().unwrap();
//! let mut driver = SqliteDriver::new(&mut conn);
//! migrator.run(&mut driver, &NullReporter).unwrap();
//!
//! // a second run finds everything in the ledger and applies nothing
//! let mut driver = SqliteDriver::new(&mut conn);
//! migrator.run(&mut driver, &NullReporter).unwrap();
//!
//! let columns: Vec<String> = conn
//!     .prepare("PRAGMA table_info(users)")
//!     .unwrap()
//!     .query_map([], |row| row.get(1))
//!     .unwrap()
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(columns, vec!["id", "name", "email"]);
//! ```
//!
//! # Testing utilities
//!
//! The `testing` feature provides a harness for exercising your migration
//! sequence against an in-memory database; see the `testing` module.

mod core;
pub use core::{Driver, Migration, Migrator};

mod error;
pub use error::Error;

mod reporter;
#[cfg(feature = "tracing")]
#[cfg_attr(docsrs, doc(cfg(feature = "tracing")))]
pub use reporter::TracingReporter;
pub use reporter::{FieldValue, NullReporter, Reporter};

mod source;
pub use source::{DirectorySource, MemorySource, Source};

#[macro_use]
mod macros;

#[cfg(feature = "sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "sqlite")))]
pub mod sqlite;

#[cfg(feature = "testing")]
#[cfg_attr(docsrs, doc(cfg(feature = "testing")))]
pub mod testing;
