//! Turning errors into user-facing notices.
//!
//! Every error is logged. `Sound` and `Settings` errors stop there; the rest
//! become an [`ErrorNotice`]. A failed storage write carries the identical
//! write as its retry. If the retry fails too, the final notice has no retry.

use serde::Serialize;

use super::storage::PendingWrite;
use crate::core::{ErrorKind, MemoError};

/// Shown when a retry has failed.
pub const RETRY_FAILED_MESSAGE: &str = "Unable to recover. Please restart the app.";

/// A user-visible error message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorNotice {
    pub kind: ErrorKind,
    pub message: String,
    /// The write to repeat if the user asks to retry.
    #[serde(skip)]
    pub retry: Option<PendingWrite>,
}

impl ErrorNotice {
    #[must_use]
    pub fn can_retry(&self) -> bool {
        self.retry.is_some()
    }
}

/// Logs errors and decides which ones the user sees.
#[derive(Clone, Copy, Debug, Default)]
pub struct ErrorReporter;

impl ErrorReporter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Log `error`; returns the notice to show, if any.
    pub fn report(&self, error: &MemoError) -> Option<ErrorNotice> {
        self.notice(error, None)
    }

    /// Report a failed write, offering it as a retry.
    pub fn report_write(&self, error: &MemoError, write: PendingWrite) -> Option<ErrorNotice> {
        self.notice(error, Some(write))
    }

    /// Report the outcome of a retry. A second failure gives up.
    pub fn report_retry_failure(&self, error: &MemoError) -> ErrorNotice {
        tracing::error!(kind = %error.kind(), %error, "retry failed");
        ErrorNotice {
            kind: error.kind(),
            message: RETRY_FAILED_MESSAGE.to_string(),
            retry: None,
        }
    }

    fn notice(&self, error: &MemoError, retry: Option<PendingWrite>) -> Option<ErrorNotice> {
        let kind = error.kind();
        if kind.is_silent() {
            tracing::warn!(%kind, %error, "handled silently");
            return None;
        }
        tracing::error!(%kind, %error, retryable = retry.is_some(), "reporting error");
        Some(ErrorNotice {
            kind,
            message: error.user_message().to_string(),
            retry,
        })
    }
}
