//! Bounded retry for transient database errors.
//!
//! This is the single seam where store errors are classified as
//! transient or permanent. Layers above call [`with_retry`] and never
//! inspect driver error codes themselves.

use std::future::Future;
use std::io::ErrorKind;
use std::time::Duration;

/// Total attempts per operation (1 initial + 2 retries).
const MAX_ATTEMPTS: u32 = 3;

/// Backoff before the first retry; doubles on each subsequent one.
const INITIAL_BACKOFF: Duration = Duration::from_millis(50);

/// Whether an error is a transient connectivity failure worth retrying.
///
/// Only connection-level I/O failures and pool acquire timeouts qualify.
/// Row-not-found, constraint violations, and every other database error
/// are permanent and must propagate immediately.
pub fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(io) => matches!(
            io.kind(),
            ErrorKind::ConnectionRefused
                | ErrorKind::ConnectionReset
                | ErrorKind::ConnectionAborted
                | ErrorKind::BrokenPipe
                | ErrorKind::TimedOut
        ),
        sqlx::Error::PoolTimedOut => true,
        _ => false,
    }
}

/// Run a database operation with bounded retry on transient errors.
///
/// `operation` names the call site for log lines. The closure is invoked
/// at most [`MAX_ATTEMPTS`] times with exponential backoff in between;
/// the final error is returned unchanged.
pub async fn with_retry<T, F, Fut>(operation: &str, mut run: F) -> Result<T, sqlx::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let mut backoff = INITIAL_BACKOFF;
    let mut attempt = 1;

    loop {
        match run().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < MAX_ATTEMPTS && is_transient(&err) => {
                tracing::warn!(
                    operation,
                    attempt,
                    error = %err,
                    "Transient database error, retrying"
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn transient_error() -> sqlx::Error {
        sqlx::Error::Io(std::io::Error::new(
            ErrorKind::ConnectionRefused,
            "connection refused",
        ))
    }

    #[test]
    fn classification_splits_transient_from_permanent() {
        assert!(is_transient(&transient_error()));
        assert!(is_transient(&sqlx::Error::PoolTimedOut));
        assert!(!is_transient(&sqlx::Error::RowNotFound));
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = with_retry("test.flaky", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(transient_error())
                } else {
                    Ok(7_i64)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry("test.not_found", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(sqlx::Error::RowNotFound) }
        })
        .await;

        assert!(matches!(result, Err(sqlx::Error::RowNotFound)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry("test.always_down", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(transient_error()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
