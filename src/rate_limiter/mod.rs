use std::time::Duration;
use tokio::time::sleep;

/// Spaces out requests to stay under the API's request quota
pub struct RateLimiter {
    delay: Duration,
    request_count: usize,
}

impl RateLimiter {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            request_count: 0,
        }
    }

    /// Returns immediately for the first request, then sleeps `delay` before each one
    pub async fn wait(&mut self) {
        if self.should_wait() {
            self.apply_delay().await;
        }
        self.increment();
    }

    pub fn request_count(&self) -> usize {
        self.request_count
    }

    fn should_wait(&self) -> bool {
        self.request_count > 0 && !self.delay.is_zero()
    }

    async fn apply_delay(&self) {
        sleep(self.delay).await;
    }

    fn increment(&mut self) {
        self.request_count += 1;
    }
}
