use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::document::DEFAULT_BATCH_SIZE;
use crate::task::{WaitOptions, DEFAULT_WAIT_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Server address; `http://` is assumed when no scheme is given
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default)]
    pub api_key: Option<String>,

    /// Socket-level timeout applied by the HTTP transport
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Extra identifiers appended to the client agent header
    #[serde(default)]
    pub client_agents: Vec<String>,

    // Default bounds for task waits
    #[serde(default)]
    pub wait: WaitConfig,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WaitConfig {
    #[serde(default = "default_wait_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_wait_interval_ms")]
    pub interval_ms: u64,
}

fn default_host() -> String {
    "http://localhost:7700".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_wait_timeout_ms() -> u64 {
    DEFAULT_WAIT_TIMEOUT_MS
}

fn default_wait_interval_ms() -> u64 {
    DEFAULT_WAIT_INTERVAL_MS
}

impl WaitConfig {
    pub fn options(&self) -> WaitOptions {
        WaitOptions::from_millis(self.timeout_ms, self.interval_ms)
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_wait_timeout_ms(),
            interval_ms: default_wait_interval_ms(),
        }
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_client_agent(mut self, agent: impl Into<String>) -> Self {
        self.client_agents.push(agent.into());
        self
    }

    pub fn with_wait(mut self, options: WaitOptions) -> Self {
        self.wait = WaitConfig {
            timeout_ms: options.timeout.as_millis() as u64,
            interval_ms: options.interval.as_millis() as u64,
        };
        self
    }

    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ClientConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            api_key: None,
            request_timeout_ms: default_request_timeout_ms(),
            client_agents: Vec::new(),
            wait: WaitConfig::default(),
            batch_size: default_batch_size(),
        }
    }
}
