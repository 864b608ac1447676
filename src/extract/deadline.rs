//! Deadline- and cancellation-bounded extraction.
//!
//! Extraction is the only stage allowed to block, so it runs on the blocking
//! pool and races a timeout and a caller-owned cancellation signal. Either
//! one fails the whole request; nothing partial is returned.

use super::{ExtractionError, RawInput, SignalExtractor};
use crate::error::{AnalysisError, Result};
use crate::signal::ContentSignal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Caller side of a cancellation signal.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Observer side of a cancellation signal. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Create a linked handle/token pair.
    pub fn new() -> (CancelHandle, CancelToken) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, CancelToken { rx })
    }

    /// A token that is never cancelled.
    pub fn never() -> CancelToken {
        let (_, token) = Self::new();
        token
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled. Never resolves if the handle is dropped first.
    pub async fn cancelled(&mut self) {
        if self.rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Run `extractor` on `input`, failing with a timeout or cancellation error
/// if it does not finish in time.
pub async fn extract_with_deadline(
    extractor: Arc<dyn SignalExtractor>,
    input: RawInput,
    timeout: Duration,
    mut cancel: CancelToken,
) -> Result<ContentSignal> {
    if cancel.is_cancelled() {
        return Err(AnalysisError::Cancelled);
    }

    let task = tokio::task::spawn_blocking(move || extractor.extract(&input));

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            warn!("Extraction cancelled by caller");
            Err(AnalysisError::Cancelled)
        }
        joined = tokio::time::timeout(timeout, task) => match joined {
            Err(_) => {
                warn!(timeout_ms = timeout.as_millis() as u64, "Extraction timed out");
                Err(ExtractionError::Timeout(timeout).into())
            }
            Ok(Err(join_error)) if join_error.is_cancelled() => Err(AnalysisError::Cancelled),
            Ok(Err(join_error)) => {
                warn!(error = %join_error, "Extractor panicked");
                Err(ExtractionError::DecodeFailure(format!("extractor panicked: {}", join_error)).into())
            }
            Ok(Ok(extracted)) => {
                debug!(ok = extracted.is_ok(), "Extraction finished");
                Ok(extracted?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::good_timing;

    struct SleepyExtractor {
        delay: Duration,
    }

    impl SignalExtractor for SleepyExtractor {
        fn extract(&self, _input: &RawInput) -> std::result::Result<ContentSignal, ExtractionError> {
            std::thread::sleep(self.delay);
            Ok(ContentSignal::new(good_timing()))
        }
    }

    struct FailingExtractor;

    impl SignalExtractor for FailingExtractor {
        fn extract(&self, _input: &RawInput) -> std::result::Result<ContentSignal, ExtractionError> {
            Err(ExtractionError::DecodeFailure("corrupt".to_string()))
        }
    }

    fn input() -> RawInput {
        RawInput::Image(super::super::ImageBytes::new("image/png", vec![]))
    }

    fn sleepy(ms: u64) -> Arc<dyn SignalExtractor> {
        Arc::new(SleepyExtractor {
            delay: Duration::from_millis(ms),
        })
    }

    #[tokio::test]
    async fn test_completes_within_deadline() {
        let signal = extract_with_deadline(sleepy(0), input(), Duration::from_secs(5), CancelToken::never())
            .await
            .unwrap();
        assert_eq!(signal.timing, good_timing());
    }

    #[tokio::test]
    async fn test_timeout() {
        let err = extract_with_deadline(sleepy(300), input(), Duration::from_millis(20), CancelToken::never())
            .await
            .unwrap_err();
        match err {
            AnalysisError::Extraction(e) => assert_eq!(e.reason(), "timeout"),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancel_during_extraction() {
        let (handle, token) = CancelToken::new();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            handle.cancel();
        });

        let err = extract_with_deadline(sleepy(300), input(), Duration::from_secs(5), token)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Cancelled));
    }

    #[tokio::test]
    async fn test_already_cancelled() {
        let (handle, token) = CancelToken::new();
        handle.cancel();
        assert!(token.is_cancelled());

        let err = extract_with_deadline(sleepy(0), input(), Duration::from_secs(5), token)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Cancelled));
    }

    #[tokio::test]
    async fn test_dropped_handle_does_not_cancel() {
        let (handle, token) = CancelToken::new();
        drop(handle);

        let result = extract_with_deadline(sleepy(5), input(), Duration::from_secs(5), token).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_extractor_error_propagates() {
        let err = extract_with_deadline(
            Arc::new(FailingExtractor),
            input(),
            Duration::from_secs(5),
            CancelToken::never(),
        )
        .await
        .unwrap_err();
        match err {
            AnalysisError::Extraction(e) => assert_eq!(e.reason(), "decode-failure"),
            other => panic!("expected extraction error, got {:?}", other),
        }
    }
}
