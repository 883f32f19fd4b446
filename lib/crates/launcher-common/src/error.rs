use thiserror::Error;

/// Reasons a [`LauncherConfig`](crate::LauncherConfig) is rejected at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid port range: port_min ({min}) is greater than port_max ({max})")]
    EmptyPortRange { min: u16, max: u16 },

    #[error("invalid port range: port 0 cannot be handed to an instance")]
    ZeroPort,

    #[error("executable path must not be empty")]
    EmptyExecutable,
}
