//! Best-effort side-effect calls
//!
//! A primary write returns its `ApiResult` to the caller, which must surface a
//! failure. A [`BestEffort`] call is awaited to completion but its outcome is
//! only logged: `run` returns `()`, so nothing downstream can branch on it.

use super::error::ApiResult;
use std::future::Future;

/// A follow-up call whose failure must never affect the primary outcome
#[must_use = "a best-effort call does nothing until `run` is awaited"]
pub struct BestEffort<F> {
    label: &'static str,
    call: F,
}

impl<F, T> BestEffort<F>
where
    F: Future<Output = ApiResult<T>>,
{
    /// Wrap a call under a label used in log lines
    pub fn new(label: &'static str, call: F) -> Self {
        Self { label, call }
    }

    /// Await the call and log its outcome
    pub async fn run(self) {
        match self.call.await {
            Ok(_) => tracing::info!("{} sent", self.label),
            Err(e) => tracing::warn!("Failed to send {}: {}", self.label, e),
        }
    }
}
