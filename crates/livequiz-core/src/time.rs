//! Physical time as observed through `PhysicalTimeEffects`

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Wall-clock reading in milliseconds since the Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PhysicalTime {
    /// Milliseconds since the Unix epoch
    pub ts_ms: u64,
    /// Clock uncertainty in milliseconds, if the source reports one
    pub uncertainty: Option<u64>,
}

impl PhysicalTime {
    /// Exact reading at `ts_ms`
    pub fn from_millis(ts_ms: u64) -> Self {
        Self {
            ts_ms,
            uncertainty: None,
        }
    }

    /// Convert to a UTC datetime; `None` if out of chrono's range
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let millis = i64::try_from(self.ts_ms).ok()?;
        Utc.timestamp_millis_opt(millis).single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_utc_datetime() {
        let time = PhysicalTime::from_millis(1_640_995_200_000);
        let datetime = time.to_datetime().unwrap();
        assert_eq!(datetime.to_rfc3339(), "2022-01-01T00:00:00+00:00");
    }
}
