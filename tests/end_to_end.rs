//! Full-pipeline tests: real `.sql` files on disk through to a real SQLite
//! database.

use std::path::PathBuf;

use rusqlite::Connection;
use sqlstep::sqlite::SqliteDriver;
use sqlstep::{embedded_source, DirectorySource, Driver, Migrator, NullReporter};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

#[test]
fn directory_source_applies_fixture_scripts_in_name_order() {
    let migrator = Migrator::new(DirectorySource::new(fixtures_dir()));
    let mut conn = Connection::open_in_memory().unwrap();

    let mut driver = SqliteDriver::new(&mut conn);
    migrator.run(&mut driver, &NullReporter).unwrap();

    // 0002 sorts before 0010 despite the numeric gap
    assert_eq!(
        driver.applied().unwrap(),
        vec!["0001_init.sql", "0002_add_email.sql", "0010_seed.sql"]
    );

    let email: String = conn
        .query_row("SELECT email FROM users WHERE name = 'ada'", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(email, "ada@example.com");
}

#[test]
fn rerunning_against_the_same_database_applies_nothing() {
    let migrator = Migrator::new(DirectorySource::new(fixtures_dir()));
    let mut conn = Connection::open_in_memory().unwrap();

    let mut driver = SqliteDriver::new(&mut conn);
    migrator.run(&mut driver, &NullReporter).unwrap();
    migrator.run(&mut driver, &NullReporter).unwrap();

    // the seed script ran exactly once
    let users: i64 = conn
        .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
        .unwrap();
    assert_eq!(users, 1);
}

#[test]
fn embedded_source_matches_the_directory_contents() {
    let source = embedded_source! {
        "0001_init.sql" => "fixtures/0001_init.sql",
        "0002_add_email.sql" => "fixtures/0002_add_email.sql",
        "0010_seed.sql" => "fixtures/0010_seed.sql",
    };
    let migrator = Migrator::new(source);
    let mut conn = Connection::open_in_memory().unwrap();

    let mut driver = SqliteDriver::new(&mut conn);
    migrator.run(&mut driver, &NullReporter).unwrap();

    assert_eq!(
        driver.applied().unwrap(),
        vec!["0001_init.sql", "0002_add_email.sql", "0010_seed.sql"]
    );
}
