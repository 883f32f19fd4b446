//! Shared application state handed to every handler.

use launcher_common::LauncherConfig;

use crate::launcher::InstanceLauncher;

/// Configuration plus the launcher used to start instances.
pub struct AppState {
    pub config: LauncherConfig,
    pub launcher: Box<dyn InstanceLauncher>,
}

impl AppState {
    pub fn new(config: LauncherConfig, launcher: impl InstanceLauncher + 'static) -> Self {
        Self {
            config,
            launcher: Box::new(launcher),
        }
    }
}
