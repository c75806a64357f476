//! Full pipeline configuration

use crate::monitor::MonitorConfig;
use crate::producer::ProducerConfig;
use crate::sender::SenderConfig;

/// Everything needed to build one topology
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub producer: ProducerConfig,
    pub monitor: MonitorConfig,
    pub senders: Vec<SenderConfig>,
    /// Base seed; each component derives its own stream from it
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            producer: ProducerConfig::default(),
            monitor: MonitorConfig::default(),
            senders: default_senders(),
            seed: None,
        }
    }
}

/// One fast lossy sender and two slower reliable ones
pub fn default_senders() -> Vec<SenderConfig> {
    vec![
        SenderConfig {
            failure_rate: 0.25,
            mean_wait_secs: 1.0,
        },
        SenderConfig {
            failure_rate: 0.0,
            mean_wait_secs: 3.0,
        },
        SenderConfig {
            failure_rate: 0.0,
            mean_wait_secs: 6.0,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_topology() {
        let config = PipelineConfig::default();

        assert_eq!(config.producer.msg_count, 1000);
        assert_eq!(config.producer.queue_capacity(), 1000);
        assert_eq!(config.monitor.update_period_secs, 5.0);
        assert_eq!(config.senders.len(), 3);
        assert_eq!(config.senders[0].failure_rate, 0.25);
        assert_eq!(config.senders[2].mean_wait_secs, 6.0);
        assert!(config.seed.is_none());
    }
}
