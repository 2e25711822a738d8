//! Rest tips shown during breaks.
//!
//! A tip source always produces a string. Network, auth and quota failures
//! are absorbed here and replaced with one of the local fallback tips.

mod gemini;

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rand::seq::SliceRandom;

pub use gemini::{GeminiTipSource, TipError, TIP_PROMPT};

/// Tips used when the text-generation service cannot be reached.
pub const FALLBACK_TIPS: [&str; 5] = [
    "Look at an object at least 20 feet away for 20 seconds.",
    "Blink rapidly for a few seconds to moisten your eyes.",
    "Roll your eyes slowly in a circle to stretch the muscles.",
    "Close your eyes tightly for 5 seconds, then open wide.",
    "Take a deep breath and look out the nearest window.",
];

/// Returns a randomly chosen fallback tip.
#[must_use]
pub fn random_fallback() -> &'static str {
    FALLBACK_TIPS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(FALLBACK_TIPS[0])
}

/// Produces a short health or motivation tip.
pub trait TipSource: Send + Sync + 'static {
    /// Fetches a tip. Never fails.
    fn fetch_tip(&self) -> impl Future<Output = String> + Send;
}

/// Mock tip source for testing.
#[derive(Debug)]
pub struct MockTipSource {
    tip: String,
    delay: Duration,
    calls: AtomicUsize,
}

impl MockTipSource {
    /// Creates a mock that answers immediately with `tip`.
    #[must_use]
    pub fn new(tip: impl Into<String>) -> Self {
        Self {
            tip: tip.into(),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Makes every fetch wait `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TipSource for MockTipSource {
    async fn fetch_tip(&self) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.tip.clone()
    }
}
