//! Process-level error type for `comment api`.

use std::time::Duration;

use thiserror::Error;

use crate::config::ConfigError;
use crate::db::DbError;
use crate::lifecycle::GracefulError;
use crate::net::ListenerError;
use crate::rpc::ServeError;

/// Every failure that ends the process with a non-zero status.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to parse config: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to listen RPC address: {0}")]
    Bind(#[from] ListenerError),

    #[error("database error: {0}")]
    Database(#[from] DbError),

    #[error("failed to run RPC server: {0}")]
    Run(#[source] ServeError),

    /// The orderly stop did not finish within the configured deadline.
    #[error("shutdown timed out after {0:?}")]
    ShutdownTimeout(Duration),

    /// Several independent failures, first one first.
    #[error("{}", join_messages(.0))]
    Multiple(Vec<AppError>),
}

fn join_messages(errors: &[AppError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<GracefulError<ServeError>> for AppError {
    fn from(e: GracefulError<ServeError>) -> Self {
        match e {
            GracefulError::Run(e) => AppError::Run(e),
            GracefulError::DeadlineExceeded { timeout } => AppError::ShutdownTimeout(timeout),
            GracefulError::Panicked(msg) => AppError::Run(ServeError::Task(msg)),
        }
    }
}

impl AppError {
    /// Whether a shutdown timeout is among the failures.
    pub fn is_shutdown_timeout(&self) -> bool {
        match self {
            AppError::ShutdownTimeout(_) => true,
            AppError::Multiple(errors) => errors.iter().any(AppError::is_shutdown_timeout),
            _ => false,
        }
    }

    /// Merge a primary outcome with a later cleanup outcome, keeping both errors.
    pub fn combine(primary: Result<(), AppError>, cleanup: Result<(), AppError>) -> Result<(), AppError> {
        match primary {
            Ok(()) => cleanup,
            Err(e) => Err(e.with_cleanup(cleanup)),
        }
    }

    /// Attach a cleanup failure, if any, to this error.
    pub fn with_cleanup(self, cleanup: Result<(), AppError>) -> AppError {
        match cleanup {
            Ok(()) => self,
            Err(second) => {
                let mut errors = match self {
                    AppError::Multiple(errors) => errors,
                    other => vec![other],
                };
                errors.push(second);
                AppError::Multiple(errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_distinguishable_from_run_error() {
        let timeout: AppError = GracefulError::<ServeError>::DeadlineExceeded {
            timeout: Duration::from_secs(5),
        }
        .into();
        assert!(timeout.is_shutdown_timeout());

        let run: AppError = GracefulError::Run(ServeError::Task("boom".into())).into();
        assert!(!run.is_shutdown_timeout());
        assert!(matches!(run, AppError::Run(_)));
    }

    #[test]
    fn combine_keeps_every_error() {
        let close = || Err(AppError::Database(DbError::CloseTimeout(Duration::from_secs(1))));

        let merged = AppError::combine(Err(AppError::ShutdownTimeout(Duration::from_secs(5))), close())
            .unwrap_err();
        match &merged {
            AppError::Multiple(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected aggregate, got {}", other),
        }
        assert!(merged.is_shutdown_timeout());
        assert!(merged.to_string().contains("shutdown timed out"));
        assert!(merged.to_string().contains("did not close"));

        assert!(matches!(AppError::combine(Ok(()), close()), Err(AppError::Database(_))));
        assert!(AppError::combine(Ok(()), Ok(())).is_ok());
    }
}
