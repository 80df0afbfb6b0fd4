// crates/sirsi-daemon/src/config.rs
//
// Runtime configuration for the Sirsi admin daemon.
// Loaded from a TOML file or populated with sensible defaults, then
// overridden by the `PORT` environment variable and the `--port` flag.

use serde::Deserialize;
use std::fs;

use sirsi_rpc::RpcConfig;

/// Runtime configuration for the daemon.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DaemonConfig {
    /// Host address for the RPC server.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port for the RPC server.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path of the persisted settings document.
    #[serde(default = "default_settings_path")]
    pub settings_path: String,

    /// Deadline for calls that send no `connect-timeout-ms` header.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// How often queued notifications are delivered.
    #[serde(default = "default_dispatch_interval_ms")]
    pub dispatch_interval_ms: u64,

    /// Maximum notifications delivered per dispatch round.
    #[serde(default = "default_dispatch_batch")]
    pub dispatch_batch: usize,

    /// Audit entries shown in the overview's activity feed.
    #[serde(default = "default_activity_feed_len")]
    pub activity_feed_len: usize,

    /// Log level: "trace", "debug", "info", "warn", "error".
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_settings_path() -> String {
    "settings.json".to_string()
}

fn default_request_timeout_ms() -> u64 {
    5_000
}

fn default_dispatch_interval_ms() -> u64 {
    1_000
}

fn default_dispatch_batch() -> usize {
    100
}

fn default_activity_feed_len() -> usize {
    sirsi_facade::DEFAULT_ACTIVITY_FEED_LEN
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            settings_path: default_settings_path(),
            request_timeout_ms: default_request_timeout_ms(),
            dispatch_interval_ms: default_dispatch_interval_ms(),
            dispatch_batch: default_dispatch_batch(),
            activity_feed_len: default_activity_feed_len(),
            log_level: default_log_level(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: DaemonConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// Apply the `PORT` environment value, if any. An unparseable value is
    /// an error rather than a silent fallback.
    pub fn with_port_env(mut self, value: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.port = raw
                .parse()
                .map_err(|e| format!("Invalid PORT value {:?}: {}", raw, e))?;
        }
        Ok(self)
    }

    pub fn rpc_config(&self) -> RpcConfig {
        RpcConfig {
            host: self.host.clone(),
            port: self.port,
            request_timeout_ms: self.request_timeout_ms,
        }
    }
}
