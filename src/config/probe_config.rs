use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use serde::Deserialize;

/// Settings for one smoke test run.
/// Every field has a default, so a file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Host name placed in the probe URL.
    pub host: String,

    /// Port the app listens on and the probe targets.
    /// `0` lets the OS choose; the probe then follows the bound port.
    pub port: u16,

    /// Interface the app binds to.
    pub bind_address: IpAddr,

    /// Pause between the app becoming ready and the request being sent.
    pub warmup_ms: u64,

    /// Pause between the result and closing the app.
    pub shutdown_delay_ms: u64,

    /// Upper bound for the request. Unbounded when absent.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3000,
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            warmup_ms: 500,
            shutdown_delay_ms: 1000,
            request_timeout_secs: None,
        }
    }
}

impl ProbeConfig {
    pub fn warmup(&self) -> Duration {
        Duration::from_millis(self.warmup_ms)
    }

    pub fn shutdown_delay(&self) -> Duration {
        Duration::from_millis(self.shutdown_delay_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProbeConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 3000);
        assert_eq!(config.bind_address, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.warmup(), Duration::from_millis(500));
        assert_eq!(config.shutdown_delay(), Duration::from_millis(1000));
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_probe_config_deserialization() {
        let yaml = r#"
                    host: 127.0.0.1
                    port: 8080
                    warmup_ms: 0
                    request_timeout_secs: 5
                    "#;

        let config: ProbeConfig = serde_yaml::from_str(yaml).expect("Invalid YAML");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.warmup(), Duration::ZERO);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        // untouched fields keep their defaults
        assert_eq!(config.shutdown_delay_ms, 1000);
        assert_eq!(config.bind_address, IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn test_rejects_out_of_range_port() {
        let result: Result<ProbeConfig, _> = serde_yaml::from_str("port: 70000");
        assert!(result.is_err());
    }
}
