use std::collections::HashSet;

use crate::error::Error;
use crate::reporter::{FieldValue, Reporter};
use crate::source::Source;

/// A named, immutable unit of schema change expressed as an executable SQL
/// script.
///
/// The `name` is the script's file name including its extension and is the
/// sole identity used by the ledger; the `script` text is passed to the
/// driver verbatim. Instances exist only while a pending migration is being
/// applied - nothing of the script persists afterwards except its name in
/// the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub name: String,
    pub script: String,
}

/// Storage adapter implementing the ledger-and-apply contract for one
/// database engine.
///
/// The contract is exactly three operations; a new engine implements them
/// without touching the runner. The critical guarantee sits in [apply](Driver::apply):
/// executing the script and recording its name must be one atomic unit of
/// work. A failed apply must be observably identical to one that was never
/// attempted.
pub trait Driver {
    /// Create the ledger's persistent structure if it does not exist.
    /// Safe to call on every run.
    fn ensure_ledger(&mut self) -> Result<(), Error>;

    /// Every previously applied migration name, ordered by original
    /// application time ascending.
    fn applied(&mut self) -> Result<Vec<String>, Error>;

    /// Execute the migration's script and insert its ledger record as a
    /// single atomic unit - either both persist or neither does.
    fn apply(&mut self, migration: &Migration) -> Result<(), Error>;
}

/// The entrypoint for running a set of SQL migration scripts.
///
/// Construct with a [Source] supplying the scripts, then call [run](Migrator::run)
/// with a [Driver] for the target database and a [Reporter](crate::Reporter)
/// for progress. Scripts apply in lexicographic byte order of their names, so
/// name files with a sortable prefix (`0001_init.sql`, `0002_add_col.sql`).
#[derive(Debug)]
pub struct Migrator<S: Source> {
    source: S,
}

impl<S: Source> Migrator<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Apply every pending migration, in order, stopping at the first error.
    ///
    /// Repeated runs against the same source and ledger apply each script
    /// exactly once: anything recorded in the ledger is skipped, and a
    /// failed script leaves no ledger record, so a later run picks it up
    /// again. Migrations applied before a failure stay committed - there is
    /// no run-level rollback.
    pub fn run(&self, driver: &mut impl Driver, reporter: &impl Reporter) -> Result<(), Error> {
        reporter.info("Starting migration run", &[]);
        driver.ensure_ledger()?;
        let applied = driver.applied()?;
        let pending = self.load_pending(&applied, reporter)?;
        if pending.is_empty() {
            reporter.info("Completed migration run - nothing to do", &[]);
            return Ok(());
        }
        for migration in &pending {
            reporter.info(
                "Applying migration",
                &[("name", FieldValue::Str(&migration.name))],
            );
            driver.apply(migration)?;
        }
        reporter.info("Completed migration run", &[]);
        Ok(())
    }

    /// Sort available names, drop the already-applied ones, and read script
    /// content for the survivors only.
    fn load_pending(
        &self,
        applied: &[String],
        reporter: &impl Reporter,
    ) -> Result<Vec<Migration>, Error> {
        let applied: HashSet<&str> = applied.iter().map(String::as_str).collect();

        let mut names = self.source.list()?;
        names.sort_unstable();
        reporter.info(
            "Found migrations",
            &[("count", FieldValue::Count(names.len()))],
        );

        let mut pending = Vec::new();
        for name in names {
            if applied.contains(name.as_str()) {
                continue;
            }
            let script = self.source.read(&name)?;
            pending.push(Migration { name, script });
        }
        reporter.info(
            "Migrations to apply",
            &[("count", FieldValue::Count(pending.len()))],
        );
        Ok(pending)
    }
}
