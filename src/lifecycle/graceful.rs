//! Graceful run coordination.
//!
//! Turns a long-running, cancellable unit of work into a run that terminates
//! in bounded time once shutdown is requested.
//!
//! ```text
//! Idle ──spawn──▶ Running ──shutdown──▶ Stopping ──run returns──▶ Stopped (run result)
//!                    │                      └──deadline elapses──▶ Stopped (DeadlineExceeded)
//!                    └──run returns early──────────────────────────▶ Stopped (run result)
//! ```
//!
//! The deadline clock starts when shutdown is observed, never earlier.
//! Cancellation is cooperative: on timeout the run task is abandoned, not
//! aborted, and keeps running until it notices its token.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

use crate::config::GracefulConfig;
use crate::lifecycle::Shutdown;

/// Terminal failure of a graceful run.
#[derive(Debug, Error)]
pub enum GracefulError<E> {
    /// The run function itself reported an error.
    #[error("run failed: {0}")]
    Run(#[source] E),

    /// The orderly stop did not finish in time.
    #[error("graceful shutdown did not finish within {timeout:?}")]
    DeadlineExceeded { timeout: Duration },

    /// The run task panicked.
    #[error("run task panicked: {0}")]
    Panicked(String),
}

impl<E> GracefulError<E> {
    /// Whether this is a shutdown timeout rather than a run failure.
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, GracefulError::DeadlineExceeded { .. })
    }
}

/// Drives exactly one graceful run.
///
/// `run` consumes the runner, so one instance can never serve two runs.
pub struct GracefulRunner {
    config: GracefulConfig,
    shutdown: Shutdown,
}

impl GracefulRunner {
    /// Create a runner that stops when `shutdown` fires.
    pub fn new(config: GracefulConfig, shutdown: Shutdown) -> Self {
        Self { config, shutdown }
    }

    /// Run `run` on a background task until it finishes or shutdown completes.
    ///
    /// `run` receives a token that is cancelled once shutdown is requested;
    /// it is expected to stop in an orderly way and return. If it returns on
    /// its own first, its result is returned without waiting for shutdown.
    pub async fn run<F, Fut, E>(self, run: F) -> Result<(), GracefulError<E>>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Send + 'static,
    {
        let stop = CancellationToken::new();
        let mut task = tokio::spawn(run(stop.clone()));

        tokio::select! {
            biased;
            joined = &mut task => {
                tracing::debug!("Run finished before shutdown was requested");
                return settle(joined);
            }
            _ = self.shutdown.wait() => {}
        }

        let deadline = self.config.deadline();
        tracing::info!(timeout = ?deadline, "Stopping gracefully");
        stop.cancel();

        let joined = match deadline {
            None => task.await,
            Some(timeout) => match tokio::time::timeout(timeout, &mut task).await {
                Ok(joined) => joined,
                Err(_) => {
                    tracing::error!(timeout = ?timeout, "Shutdown timed out");
                    return Err(GracefulError::DeadlineExceeded { timeout });
                }
            },
        };

        tracing::info!("Stopped gracefully");
        settle(joined)
    }
}

/// Run `run` until it finishes or `shutdown` fires and it stops within `config`'s deadline.
pub async fn graceful_run<F, Fut, E>(
    run: F,
    config: &GracefulConfig,
    shutdown: Shutdown,
) -> Result<(), GracefulError<E>>
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Send + 'static,
{
    GracefulRunner::new(*config, shutdown).run(run).await
}

fn settle<E>(joined: Result<Result<(), E>, JoinError>) -> Result<(), GracefulError<E>> {
    match joined {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(GracefulError::Run(e)),
        Err(e) => Err(GracefulError::Panicked(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ZeroTimeout;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::time::{sleep, Instant};

    #[derive(Debug, PartialEq, Eq)]
    enum TestError {
        Bind,
        Drain,
    }

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self)
        }
    }

    impl std::error::Error for TestError {}

    fn five_units() -> GracefulConfig {
        GracefulConfig::with_timeout(Duration::from_secs(5))
    }

    fn assert_near(elapsed: Duration, expected: Duration) {
        let slack = Duration::from_millis(50);
        assert!(
            elapsed >= expected && elapsed <= expected + slack,
            "elapsed {:?}, expected about {:?}",
            elapsed,
            expected
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_early_success_skips_deadline() {
        let start = Instant::now();
        let result = graceful_run(
            |_stop| async { Ok::<(), TestError>(()) },
            &five_units(),
            Shutdown::new(),
        )
        .await;

        assert!(result.is_ok());
        assert_near(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_early_failure_returns_exact_error() {
        let start = Instant::now();
        let result = graceful_run(
            |_stop| async { Err(TestError::Bind) },
            &five_units(),
            Shutdown::new(),
        )
        .await;

        match result {
            Err(GracefulError::Run(e)) => assert_eq!(e, TestError::Bind),
            other => panic!("expected run error, got {:?}", other),
        }
        assert_near(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_honored_cancellation_returns_early() {
        let shutdown = Shutdown::new();
        shutdown.trigger();

        let start = Instant::now();
        let result = graceful_run(
            |stop| async move {
                stop.cancelled().await;
                sleep(Duration::from_secs(1)).await;
                Ok::<(), TestError>(())
            },
            &five_units(),
            shutdown,
        )
        .await;

        assert!(result.is_ok());
        assert_near(start.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ignored_cancellation_times_out() {
        let shutdown = Shutdown::new();
        shutdown.trigger();

        let start = Instant::now();
        let result = graceful_run(
            |_stop| async {
                sleep(Duration::from_secs(3600)).await;
                Ok::<(), TestError>(())
            },
            &five_units(),
            shutdown,
        )
        .await;

        let err = result.unwrap_err();
        assert!(err.is_deadline_exceeded());
        assert!(matches!(
            err,
            GracefulError::DeadlineExceeded { timeout } if timeout == Duration::from_secs(5)
        ));
        assert_near(start.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_starts_at_shutdown() {
        let shutdown = Shutdown::new();
        let trigger = shutdown.clone();
        tokio::spawn(async move {
            sleep(Duration::from_secs(10)).await;
            trigger.trigger();
        });

        let start = Instant::now();
        let result = graceful_run(
            |_stop| std::future::pending::<Result<(), TestError>>(),
            &five_units(),
            shutdown,
        )
        .await;

        assert!(result.unwrap_err().is_deadline_exceeded());
        assert_near(start.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_during_stop_is_run_error() {
        let shutdown = Shutdown::new();
        shutdown.trigger();

        let result = graceful_run(
            |stop| async move {
                stop.cancelled().await;
                Err(TestError::Drain)
            },
            &five_units(),
            shutdown,
        )
        .await;

        match result {
            Err(GracefulError::Run(e)) => assert_eq!(e, TestError::Drain),
            other => panic!("expected run error, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_shutdown_stops_once() {
        let shutdown = Shutdown::new();
        let stops = Arc::new(AtomicUsize::new(0));

        let trigger = shutdown.clone();
        tokio::spawn(async move {
            sleep(Duration::from_secs(1)).await;
            assert!(trigger.trigger());
            sleep(Duration::from_millis(500)).await;
            assert!(!trigger.trigger());
        });

        let observed = stops.clone();
        let result = graceful_run(
            move |stop| async move {
                stop.cancelled().await;
                observed.fetch_add(1, Ordering::SeqCst);
                sleep(Duration::from_secs(2)).await;
                Ok::<(), TestError>(())
            },
            &five_units(),
            shutdown,
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_timeout_waits_forever_by_default() {
        let shutdown = Shutdown::new();
        shutdown.trigger();

        let config = GracefulConfig {
            timeout_ms: 0,
            on_zero_timeout: ZeroTimeout::Wait,
        };

        let start = Instant::now();
        let result = graceful_run(
            |stop| async move {
                stop.cancelled().await;
                sleep(Duration::from_secs(600)).await;
                Ok::<(), TestError>(())
            },
            &config,
            shutdown,
        )
        .await;

        assert!(result.is_ok());
        assert_near(start.elapsed(), Duration::from_secs(600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_timeout_fail_fast() {
        let shutdown = Shutdown::new();
        shutdown.trigger();

        let config = GracefulConfig {
            timeout_ms: 0,
            on_zero_timeout: ZeroTimeout::FailFast,
        };

        let start = Instant::now();
        let result = graceful_run(
            |stop| async move {
                stop.cancelled().await;
                sleep(Duration::from_secs(1)).await;
                Ok::<(), TestError>(())
            },
            &config,
            shutdown,
        )
        .await;

        assert!(result.unwrap_err().is_deadline_exceeded());
        assert_near(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_run_is_not_aborted() {
        let shutdown = Shutdown::new();
        shutdown.trigger();

        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();
        let result = graceful_run(
            move |_stop| async move {
                sleep(Duration::from_secs(8)).await;
                flag.store(true, Ordering::SeqCst);
                Ok::<(), TestError>(())
            },
            &five_units(),
            shutdown,
        )
        .await;

        assert!(result.unwrap_err().is_deadline_exceeded());
        assert!(!finished.load(Ordering::SeqCst));

        sleep(Duration::from_secs(4)).await;
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_panicking_run_is_reported() {
        let result = graceful_run(
            |_stop| async {
                if true {
                    panic!("boom");
                }
                Ok::<(), TestError>(())
            },
            &five_units(),
            Shutdown::new(),
        )
        .await;

        assert!(matches!(result, Err(GracefulError::Panicked(_))));
    }
}
