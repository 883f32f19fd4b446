use serde::{Deserialize, Serialize};

use crate::config::LauncherConfig;

/// Body returned by `POST /api/instance`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstanceCreated {
    /// Shared secret the caller presents to the instance
    pub auth_token: String,
    /// Where the instance is expected to accept connections
    pub socket_address: String,
}

/// What the launcher knows about whoever asked for an instance.
///
/// Both values are passed through verbatim; missing values are empty
/// strings, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    pub remote_addr: String,
    pub origin: String,
}

/// Everything needed to start one instance process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchParams {
    pub executable: String,
    pub config_path: String,
    pub port: u16,
    pub token: String,
    pub caller: Caller,
}

impl LaunchParams {
    #[must_use]
    pub fn new(config: &LauncherConfig, port: u16, token: String, caller: Caller) -> Self {
        Self {
            executable: config.executable.clone(),
            config_path: config.config_path.clone(),
            port,
            token,
            caller,
        }
    }

    /// Positional arguments for the executable:
    /// `[config_path, port, token, remote_addr, origin]`.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        vec![
            self.config_path.clone(),
            self.port.to_string(),
            self.token.clone(),
            self.caller.remote_addr.clone(),
            self.caller.origin.clone(),
        ]
    }
}
