pub mod config;
pub mod error;
pub mod secret;
pub mod types;

pub use config::{ENV_PREFIX, LauncherConfig};
pub use error::ConfigError;
pub use secret::{TOKEN_BYTES, generate_token, pick_port};
pub use types::*;
