//! Duplicate-submission guard
//!
//! A form holds one [`SubmitGuard`]. Each submit calls [`SubmitGuard::try_begin`]
//! before sending; the returned token clears the flag when dropped, whether
//! the request succeeded or failed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Default)]
pub struct SubmitGuard {
    busy: Arc<AtomicBool>,
}

/// Held while a submission is in flight
#[derive(Debug)]
#[must_use = "the guard is released as soon as the token is dropped"]
pub struct SubmitToken {
    busy: Arc<AtomicBool>,
}

impl SubmitGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the guard, or fail with [`ClientError::Busy`]
    pub fn try_begin(&self) -> ClientResult<SubmitToken> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ClientError::Busy)?;
        Ok(SubmitToken {
            busy: self.busy.clone(),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Run `submit` while holding the guard
    pub async fn run<T, F>(&self, submit: F) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        let _token = self.try_begin()?;
        submit.await
    }
}

impl Drop for SubmitToken {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_submit_is_busy() {
        let guard = SubmitGuard::new();
        let token = guard.try_begin().unwrap();
        assert!(guard.is_busy());
        assert!(matches!(guard.try_begin(), Err(ClientError::Busy)));

        drop(token);
        assert!(!guard.is_busy());
        assert!(guard.try_begin().is_ok());
    }

    #[tokio::test]
    async fn test_released_after_failure() {
        let guard = SubmitGuard::new();
        let result: ClientResult<()> = guard
            .run(async { Err(ClientError::InvalidResponse("boom".into())) })
            .await;
        assert!(result.is_err());
        assert!(!guard.is_busy());
    }

    #[tokio::test]
    async fn test_concurrent_submit_rejected() {
        let guard = SubmitGuard::new();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let held = guard.clone();
        let first = tokio::spawn(async move {
            held.run(async {
                let _ = rx.await;
                Ok(1)
            })
            .await
        });

        // wait until the first submit holds the guard
        while !guard.is_busy() {
            tokio::task::yield_now().await;
        }
        let second = guard.run(async { Ok(2) }).await;
        assert!(matches!(second, Err(ClientError::Busy)));

        let _ = tx.send(());
        assert_eq!(first.await.unwrap().unwrap(), 1);
        assert!(!guard.is_busy());
    }
}
