use std::time::Duration;

/// Simulated round-trip delays for each kind of request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub list: Duration,
    pub get: Duration,
    pub mutate: Duration,
    pub batch: Duration,
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            list: Duration::from_millis(500),
            get: Duration::from_millis(200),
            mutate: Duration::from_millis(300),
            batch: Duration::from_millis(500),
        }
    }
}

impl Latency {
    pub fn none() -> Self {
        Self {
            list: Duration::ZERO,
            get: Duration::ZERO,
            mutate: Duration::ZERO,
            batch: Duration::ZERO,
        }
    }
}

pub(crate) async fn pause(d: Duration) {
    if !d.is_zero() {
        tokio::time::sleep(d).await;
    }
}
