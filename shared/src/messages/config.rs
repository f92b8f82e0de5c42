//! Configuration types
//!
//! Values are read from a `.env` file (if present) and the process
//! environment; the binary then applies command line overrides.
//!
//! Environment variables:
//! - `POLLSERVER_BIND`: listen address (default `0.0.0.0:8080`)
//! - `POLLSERVER_PORT`: overrides only the port of the listen address
//! - `POLLSERVER_CHANNEL_CAPACITY`: response notification queue size (default 256)
//! - `POLLSERVER_SIMULATE_INTERVAL_MS`: enables simulated answers at this interval

use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::{SharedError, SharedResult};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Poll server configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PollServerConfig {
    pub bind_address: SocketAddr,
    /// Bound of the device → session notification queue
    pub response_channel_capacity: usize,
    pub simulator: SimulatorConfig,
}

/// Software device simulator configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SimulatorConfig {
    /// Answer for a random student this often while a question is open
    pub auto_respond_interval_ms: Option<u64>,
    /// Make `connect` fail, for exercising startup failure paths
    pub fail_connect: bool,
}

impl SimulatorConfig {
    pub fn auto_respond_interval(&self) -> Option<Duration> {
        self.auto_respond_interval_ms.map(Duration::from_millis)
    }
}

impl Default for PollServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
            response_channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            simulator: SimulatorConfig::default(),
        }
    }
}

impl PollServerConfig {
    /// Load configuration from `.env` and the environment
    pub fn from_env() -> SharedResult<Self> {
        // Silently ignored when no .env file exists
        let _ = dotenv::dotenv();

        let mut config = Self::default();

        if let Some(bind) = env_value::<SocketAddr>("POLLSERVER_BIND")? {
            config.bind_address = bind;
        }
        if let Some(port) = env_value::<u16>("POLLSERVER_PORT")? {
            config.bind_address.set_port(port);
        }
        if let Some(capacity) = env_value::<usize>("POLLSERVER_CHANNEL_CAPACITY")? {
            config.response_channel_capacity = capacity;
        }
        if let Some(interval) = env_value::<u64>("POLLSERVER_SIMULATE_INTERVAL_MS")? {
            config.simulator.auto_respond_interval_ms = Some(interval);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SharedResult<()> {
        if self.response_channel_capacity == 0 {
            return Err(SharedError::InvalidConfig {
                field: "response_channel_capacity".to_string(),
                value: "0".to_string(),
            });
        }
        if self.simulator.auto_respond_interval_ms == Some(0) {
            return Err(SharedError::InvalidConfig {
                field: "auto_respond_interval_ms".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn env_value<T: FromStr>(key: &str) -> SharedResult<Option<T>> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| SharedError::InvalidConfig { field: key.to_string(), value: raw }),
        Err(_) => Ok(None),
    }
}
