use serde::Deserialize;
use std::net::SocketAddr;
use std::ops::RangeInclusive;

use crate::error::ConfigError;

/// Prefix of every environment variable the launcher reads.
pub const ENV_PREFIX: &str = "LAUNCHER_";

/// Launcher service configuration.
///
/// Every field has a default so the service starts with no environment at
/// all; the server binary loads overrides from `LAUNCHER_*` variables.
#[derive(Debug, Clone, Deserialize)]
pub struct LauncherConfig {
    /// Listen address (default: 127.0.0.1:5000)
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Path to the instance executable (default: ./vlmc)
    #[serde(default = "default_executable")]
    pub executable: String,

    /// Project file handed to every instance as its first argument
    #[serde(default = "default_config_path")]
    pub config_path: String,

    /// Scheme and host prefixed to the port in `socketAddress`
    #[serde(default = "default_socket_host")]
    pub socket_host: String,

    /// Lowest port an instance may be assigned (inclusive)
    #[serde(default = "default_port_min")]
    pub port_min: u16,

    /// Highest port an instance may be assigned (inclusive)
    #[serde(default = "default_port_max")]
    pub port_max: u16,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

fn default_executable() -> String {
    "./vlmc".to_string()
}

fn default_config_path() -> String {
    "da.vlmc".to_string()
}

fn default_socket_host() -> String {
    "ws://127.0.0.1".to_string()
}

fn default_port_min() -> u16 {
    6000
}

fn default_port_max() -> u16 {
    7000
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            executable: default_executable(),
            config_path: default_config_path(),
            socket_host: default_socket_host(),
            port_min: default_port_min(),
            port_max: default_port_max(),
        }
    }
}

impl LauncherConfig {
    /// Load from `LAUNCHER_*` variables of the process environment.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed(ENV_PREFIX).from_env()
    }

    /// Load from `LAUNCHER_*` entries of `vars`; other keys are ignored.
    pub fn from_env_iter<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX).from_iter(vars)
    }

    /// Reject configurations that cannot produce a usable instance.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.executable.trim().is_empty() {
            return Err(ConfigError::EmptyExecutable);
        }
        if self.port_min == 0 {
            return Err(ConfigError::ZeroPort);
        }
        if self.port_min > self.port_max {
            return Err(ConfigError::EmptyPortRange {
                min: self.port_min,
                max: self.port_max,
            });
        }
        Ok(())
    }

    /// The closed range instance ports are drawn from.
    #[must_use]
    pub fn port_range(&self) -> RangeInclusive<u16> {
        self.port_min..=self.port_max
    }

    /// Address handed back to the caller for an instance on `port`.
    #[must_use]
    pub fn socket_address(&self, port: u16) -> String {
        format!("{}:{port}", self.socket_host)
    }
}
