//! Progress reporting for migration runs.
//!
//! The runner reports status through a [Reporter] passed into
//! [Migrator::run](crate::Migrator::run) rather than through a process-global
//! logger, so embedding applications decide where progress goes.

use std::fmt;

/// Value of a structured field attached to a report message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Str(&'a str),
    Count(usize),
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(value) => write!(f, "{}", value),
            FieldValue::Count(value) => write!(f, "{}", value),
        }
    }
}

/// Passive sink for migration progress.
///
/// Implementations must not influence control flow: methods take `&self`,
/// return nothing, and are called before/after the step they describe.
pub trait Reporter {
    /// Receive a status message with zero or more named fields.
    fn info(&self, message: &str, fields: &[(&str, FieldValue<'_>)]);
}

/// A [Reporter] that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn info(&self, _message: &str, _fields: &[(&str, FieldValue<'_>)]) {}
}

/// A [Reporter] that forwards messages to the `tracing` ecosystem at INFO level.
///
/// Field names are only known at runtime, so fields are rendered into a
/// single `fields` attribute rather than individual tracing fields.
#[cfg(feature = "tracing")]
#[cfg_attr(docsrs, doc(cfg(feature = "tracing")))]
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

#[cfg(feature = "tracing")]
impl Reporter for TracingReporter {
    fn info(&self, message: &str, fields: &[(&str, FieldValue<'_>)]) {
        if fields.is_empty() {
            tracing::info!("{}", message);
        } else {
            let rendered = fields
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect::<Vec<_>>()
                .join(" ");
            tracing::info!(fields = %rendered, "{}", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_values_render_plainly() {
        assert_eq!(FieldValue::Str("0001_init.sql").to_string(), "0001_init.sql");
        assert_eq!(FieldValue::Count(3).to_string(), "3");
    }
}
