use std::path::PathBuf;

/// Error type for the sqlstep crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[cfg(feature = "sqlite")]
    #[error("{0}")]
    Rusqlite(rusqlite::Error),
    #[error("failed to read migration script {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A migration failed and the subsequent rollback failed too.
    /// Both causes are preserved; neither is ever dropped.
    #[error("{cause} (rollback also failed: {rollback})")]
    RollbackFailed {
        #[source]
        cause: Box<Error>,
        rollback: Box<Error>,
    },
    #[error("{0}")]
    Generic(String),
}

impl Error {
    pub(crate) fn rollback_failed(cause: Error, rollback: Error) -> Self {
        Self::RollbackFailed {
            cause: Box::new(cause),
            rollback: Box::new(rollback),
        }
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        Self::Rusqlite(value)
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Self::Generic(value)
    }
}

// Manual PartialEq implementation because std::io::Error doesn't implement PartialEq
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            #[cfg(feature = "sqlite")]
            (Self::Rusqlite(a), Self::Rusqlite(b)) => a == b,
            (
                Self::Io {
                    path: a_path,
                    source: a_source,
                },
                Self::Io {
                    path: b_path,
                    source: b_source,
                },
            ) => a_path == b_path && a_source.kind() == b_source.kind(),
            (
                Self::RollbackFailed {
                    cause: a_cause,
                    rollback: a_rollback,
                },
                Self::RollbackFailed {
                    cause: b_cause,
                    rollback: b_rollback,
                },
            ) => a_cause == b_cause && a_rollback == b_rollback,
            (Self::Generic(a), Self::Generic(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollback_failed_display_includes_both_causes() {
        let error = Error::rollback_failed(
            Error::Generic("near \"bleep\": syntax error".to_string()),
            Error::Generic("cannot rollback - no transaction is active".to_string()),
        );
        let rendered = error.to_string();
        assert!(rendered.contains("near \"bleep\": syntax error"));
        assert!(rendered.contains("cannot rollback - no transaction is active"));
    }

    #[test]
    fn rollback_failed_exposes_original_cause_as_source() {
        let error = Error::rollback_failed(
            Error::Generic("execution failed".to_string()),
            Error::Generic("rollback failed".to_string()),
        );
        let source = std::error::Error::source(&error).expect("source");
        assert_eq!(source.to_string(), "execution failed");
    }

    #[test]
    fn io_error_display_includes_path() {
        let error = Error::Io {
            path: PathBuf::from("migrations/0001_init.sql"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(error.to_string().contains("migrations/0001_init.sql"));
    }
}
