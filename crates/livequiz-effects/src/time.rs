//! Time effect handlers - production only
//!
//! Stateless implementation of `PhysicalTimeEffects` delegating to the system
//! clock and tokio's timer. Controllable clocks belong in `livequiz-testkit`.

use async_trait::async_trait;
use livequiz_core::effects::{PhysicalTimeEffects, TimeError};
use livequiz_core::PhysicalTime;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Real time handler for production use
#[derive(Debug, Clone, Default)]
pub struct RealTimeHandler;

impl RealTimeHandler {
    /// Create a new real time handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PhysicalTimeEffects for RealTimeHandler {
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError> {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| TimeError::ClockUnavailable {
                reason: e.to_string(),
            })?;
        let ts_ms = u64::try_from(elapsed.as_millis()).map_err(|e| TimeError::OperationFailed {
            reason: e.to_string(),
        })?;
        Ok(PhysicalTime::from_millis(ts_ms))
    }

    async fn sleep_ms(&self, ms: u64) -> Result<(), TimeError> {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn physical_time_is_after_2020() {
        let now = RealTimeHandler::new().physical_time().await.unwrap();
        assert!(now.ts_ms > 1_577_836_800_000);
    }
}
