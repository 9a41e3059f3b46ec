//! Time helpers
//!
//! Every stored timestamp is Unix epoch millis as `i64`. Conversions to
//! anything human-facing happen client-side.

use chrono::Utc;

/// Current time in Unix epoch millis
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
