//! Stats logger handle
//!
//! Counters and timings for the upload views. The default implementation forwards to
//! `tracing`; deployments with a metrics backend provide their own.

use std::time::Duration;

pub trait StatsLogger: Send + Sync {
    fn incr(&self, key: &str);

    fn timing(&self, key: &str, elapsed: Duration);
}

/// Emits every stat as a `tracing` debug event
#[derive(Debug, Default, Clone)]
pub struct TracingStatsLogger {
    prefix: String,
}

impl TracingStatsLogger {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn key(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.prefix, key)
        }
    }
}

impl StatsLogger for TracingStatsLogger {
    fn incr(&self, key: &str) {
        tracing::debug!(stat = %self.key(key), "incr");
    }

    fn timing(&self, key: &str, elapsed: Duration) {
        tracing::debug!(
            stat = %self.key(key),
            elapsed_ms = elapsed.as_millis() as u64,
            "timing"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_keys() {
        assert_eq!(TracingStatsLogger::new("igce").key("upload"), "igce.upload");
        assert_eq!(TracingStatsLogger::default().key("upload"), "upload");
    }
}
