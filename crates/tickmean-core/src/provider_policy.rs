use std::time::Duration;

use crate::ProviderId;

/// Request budget and transport settings for one provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderPolicy {
    pub provider_id: ProviderId,
    pub quota_window: Duration,
    pub quota_limit: u32,
    pub timeout_ms: u64,
}

impl ProviderPolicy {
    /// Alpha Vantage free tier: five calls per minute.
    pub fn alphavantage_default() -> Self {
        Self {
            provider_id: ProviderId::Alphavantage,
            quota_window: Duration::from_secs(60),
            quota_limit: 5,
            timeout_ms: crate::http_client::DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_quota(mut self, quota_window: Duration, quota_limit: u32) -> Self {
        self.quota_window = quota_window;
        self.quota_limit = quota_limit;
        self
    }
}
