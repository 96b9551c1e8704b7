//! Randomized pause between accounts.

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;

/// Something that can wait.
#[async_trait]
pub trait Pause: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Real wall-clock sleep.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPause;

#[async_trait]
impl Pause for TokioPause {
    async fn pause(&self, duration: Duration) {
        tracing::info!(secs = duration.as_secs(), "Waiting before next account");
        tokio::time::sleep(duration).await;
    }
}

/// Uniform whole seconds in `[min_secs, max_secs]`.
pub fn random_delay(min_secs: u64, max_secs: u64) -> Duration {
    let (low, high) = if min_secs <= max_secs {
        (min_secs, max_secs)
    } else {
        (max_secs, min_secs)
    };
    Duration::from_secs(rand::thread_rng().gen_range(low..=high))
}
