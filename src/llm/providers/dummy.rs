//! Dummy provider — echoes input back prefixed with `[echo]`, or fails with a
//! fixed error. Used to exercise the fallback chain without network access.
//!
//! Clones share one call counter, so a test can hand a clone to the chain and
//! still read how many times it was called.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::llm::ProviderError;

#[derive(Debug, Clone)]
pub struct DummyProvider {
    failure: Option<ProviderError>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl DummyProvider {
    pub fn echo() -> Self {
        Self { failure: None, delay: Duration::ZERO, calls: Arc::default() }
    }

    /// A provider whose every call fails with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self { failure: Some(error), ..Self::echo() }
    }

    /// Wait `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of `complete` calls made so far, across all clones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(1)
    }

    pub async fn complete(&self, content: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(format!("[echo] {content}")),
        }
    }
}
