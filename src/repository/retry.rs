//! Bounded retry for Store operations.
//!
//! Generalises the teacher's `with_retry` closure wrapper (which retried on
//! SQLite lock errors with a doubling backoff) into an explicit utility with
//! a fixed attempt count and schedule, parameterised by a label used only in
//! logs, per spec's retry discipline for Store calls.

use std::future::Future;
use std::time::Duration;

use super::pool::DbError;

const BACKOFF: [Duration; 3] = [
    Duration::from_secs(1),
    Duration::from_secs(3),
    Duration::from_secs(7),
];

/// Run `operation` up to `BACKOFF.len() + 1` times, sleeping the schedule
/// between attempts. `label` identifies the operation in log lines only.
pub async fn with_retry<T, F, Fut>(label: &str, mut operation: F) -> Result<T, DbError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbError>>,
{
    let mut last_err = None;

    for (attempt, delay) in std::iter::once(None)
        .chain(BACKOFF.iter().map(|d| Some(*d)))
        .enumerate()
    {
        if let Some(delay) = delay {
            let prior = last_err.as_ref().map(|e: &DbError| e.to_string()).unwrap_or_default();
            tracing::warn!("{label}: attempt {attempt} failed ({prior}), retrying in {delay:?}");
            tokio::time::sleep(delay).await;
        }

        match operation().await {
            Ok(v) => return Ok(v),
            Err(e) => last_err = Some(e),
        }
    }

    Err(last_err.expect("loop always runs at least once"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = with_retry("test_op", || async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(DbError::QueryBuilderError("transient".into()))
            } else {
                Ok(42)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausts_after_four_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), DbError> = with_retry("test_op", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(DbError::QueryBuilderError("always fails".into()))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }
}
