//! Convenience macros for building migration sources.

/// Build a [MemorySource](crate::MemorySource) from scripts embedded at
/// compile time with `include_str!`.
///
/// Each entry is a `"name" => "path"` pair: the name is the migration's
/// identity (base filename including the `.sql` extension, exactly what a
/// [DirectorySource](crate::DirectorySource) would produce), and the path is
/// resolved relative to the invoking file, as `include_str!` does.
///
/// Embedding removes the runtime dependency on a migrations directory, so a
/// deployed binary carries its own scripts.
///
/// # Example
///
/// ```ignore
/// use sqlstep::{embedded_source, Migrator};
///
/// let source = embedded_source! {
///     "0001_init.sql" => "../migrations/0001_init.sql",
///     "0002_add_email.sql" => "../migrations/0002_add_email.sql",
/// };
/// let migrator = Migrator::new(source);
/// ```
#[macro_export]
macro_rules! embedded_source {
    ($($name:literal => $path:literal),* $(,)?) => {
        $crate::MemorySource::new(vec![
            $(($name.to_string(), include_str!($path).to_string())),*
        ])
    };
}
