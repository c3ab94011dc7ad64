//! Broadcaster configuration and runtime statistics.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for broadcaster behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcasterConfig {
    /// Interval between heartbeat frames sent to every subscriber.
    /// `None` sends a heartbeat only when a subscriber connects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heartbeat_interval_secs: Option<u64>,
    /// Remove a subscriber after its first failed write.
    /// Off by default: failed subscribers are kept until the process exits.
    pub evict_failed_subscribers: bool,
}

impl Default for BroadcasterConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: None,
            evict_failed_subscribers: false,
        }
    }
}

impl BroadcasterConfig {
    /// Send a heartbeat to every subscriber at the given interval.
    pub fn with_heartbeat_interval(mut self, secs: u64) -> Self {
        self.heartbeat_interval_secs = Some(secs);
        self
    }

    /// Enable or disable eviction of subscribers whose writes fail.
    pub fn with_eviction(mut self, evict: bool) -> Self {
        self.evict_failed_subscribers = evict;
        self
    }

    /// Heartbeat interval, ignoring a zero setting.
    pub fn heartbeat_interval(&self) -> Option<Duration> {
        self.heartbeat_interval_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Counters describing the broadcaster's current state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcasterStats {
    /// Notifications waiting for the next drain.
    pub queued: u64,
    /// Currently registered subscribers.
    pub subscribers: u64,
    /// Notifications accepted since start.
    pub enqueued: u64,
    /// Notifications popped by a drain since start.
    pub drained: u64,
    /// Notifications drained while nobody was subscribed.
    pub drained_without_subscribers: u64,
    /// Successful notification writes across all subscribers.
    pub frames_delivered: u64,
    /// Failed writes, heartbeats included.
    pub delivery_failures: u64,
    /// Subscribers removed by the eviction policy.
    pub evicted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_never_prune() {
        let config = BroadcasterConfig::default();
        assert!(!config.evict_failed_subscribers);
        assert_eq!(config.heartbeat_interval(), None);
    }

    #[test]
    fn zero_interval_disables_heartbeat() {
        let config = BroadcasterConfig::default().with_heartbeat_interval(0);
        assert_eq!(config.heartbeat_interval(), None);

        let config = BroadcasterConfig::default().with_heartbeat_interval(15);
        assert_eq!(config.heartbeat_interval(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn partial_config_deserializes_with_defaults() -> Result<(), serde_json::Error> {
        let config: BroadcasterConfig =
            serde_json::from_str(r#"{"evict_failed_subscribers":true}"#)?;
        assert!(config.evict_failed_subscribers);
        assert_eq!(config.heartbeat_interval_secs, None);
        Ok(())
    }
}
