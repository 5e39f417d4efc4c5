//! Timeout configuration for API requests.

use std::time::Duration;

/// Timeout configuration applied to every request a client sends.
///
/// Requests are not retried; a request that exceeds its budget fails with
/// [`FetchError::Timeout`](crate::FetchError::Timeout).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Connection timeout.
    pub connect: Duration,
    /// Total operation timeout.
    pub total: Duration,
}

impl FetchPolicy {
    /// Create a new policy.
    pub fn new(connect: Duration, total: Duration) -> Self {
        Self { connect, total }
    }

    /// Create from a single total timeout.
    pub fn from_total(total: Duration) -> Self {
        Self {
            connect: Duration::from_millis(total.as_millis() as u64 / 4),
            total,
        }
    }

    /// Create from a total timeout in milliseconds.
    pub fn from_millis(total_ms: u64) -> Self {
        Self::from_total(Duration::from_millis(total_ms))
    }
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(2),
            total: Duration::from_secs(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_total_splits_connect_budget() {
        let policy = FetchPolicy::from_millis(2000);
        assert_eq!(policy.total, Duration::from_millis(2000));
        assert_eq!(policy.connect, Duration::from_millis(500));
    }
}
