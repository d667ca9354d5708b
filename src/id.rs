//! ID generation utilities for Tasklet
//!
//! Provides identifiers for tasks and folders and the current timestamp.

use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

/// Current time truncated to millisecond precision.
///
/// Persisted timestamps carry milliseconds, so truncating here keeps a record
/// equal to itself after a save/load cycle.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Generate a unique record ID
///
/// Format: hyphenated UUID v4
/// Example: `3f1c2a9e-7b4d-4e0a-9a55-0c6f1d2e8b71`
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use std::collections::HashSet;

    #[test]
    fn test_now_has_millisecond_precision() {
        let ts = now();
        assert_eq!(ts.nanosecond() % 1_000_000, 0);
    }

    #[test]
    fn test_generate_id_format() {
        let id = generate_id();
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 5);
        assert_eq!(id.len(), 36);
        assert!(id.chars().all(|c| c == '-' || c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_id_uniqueness() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
