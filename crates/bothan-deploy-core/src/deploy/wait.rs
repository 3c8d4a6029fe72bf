//! Pause between status polls.

use std::time::Duration;

use async_trait::async_trait;

/// Strategy the orchestrator uses to wait between polls
#[async_trait]
pub trait Wait: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Real timer backed by `tokio::time::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioWait;

#[async_trait]
impl Wait for TokioWait {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Returns immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWait;

#[async_trait]
impl Wait for NoWait {
    async fn wait(&self, _duration: Duration) {}
}
