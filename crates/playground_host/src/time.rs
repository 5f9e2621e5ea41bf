//! Time helpers shared across host contracts and adapters.

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

/// Returns the current unix timestamp in milliseconds.
pub fn unix_time_ms_now() -> i64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().max(0.0) as i64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }
}

/// Returns the current UTC time truncated to millisecond precision.
///
/// Millisecond precision matches what persisted ISO-8601 timestamps can carry.
pub fn current_timestamp() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(unix_time_ms_now()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_timestamp_has_no_sub_millisecond_component() {
        let now = current_timestamp();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
        assert!(now.timestamp_millis() > 0);
    }
}
