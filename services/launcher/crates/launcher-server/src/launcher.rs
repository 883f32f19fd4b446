//! Starting instance processes.
//!
//! `InstanceLauncher` is the seam between the HTTP handler and the OS so
//! tests can record launches instead of spawning `vlmc`. `ProcessLauncher`
//! is the production implementation built on `tokio::process`.

use std::process::Stdio;

use launcher_common::LaunchParams;
use thiserror::Error;
use tokio::process::{Child, Command};

/// Errors raised while starting an instance.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to spawn {executable}")]
    Spawn {
        executable: String,
        #[source]
        source: std::io::Error,
    },
}

/// Starts one instance process per call without waiting on it.
pub trait InstanceLauncher: Send + Sync {
    /// Spawn the executable described by `params`.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn launch(&self, params: &LaunchParams) -> Result<InstanceHandle, LaunchError>;
}

/// A started instance.
///
/// Owns the child handle when there is one so callers may track or await
/// the instance. Dropping or detaching it leaves the process running.
#[derive(Debug)]
pub struct InstanceHandle {
    child: Option<Child>,
}

impl InstanceHandle {
    #[must_use]
    pub fn from_child(child: Child) -> Self {
        Self { child: Some(child) }
    }

    /// A handle with no backing OS process.
    #[cfg(test)]
    #[must_use]
    pub fn untracked() -> Self {
        Self { child: None }
    }

    /// OS pid of the instance, `None` once it has been reaped or when
    /// there is no backing process.
    #[must_use]
    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().and_then(Child::id)
    }

    /// Give up the handle; the process keeps running unsupervised.
    pub fn detach(self) {
        drop(self.child);
    }
}

/// Production launcher: spawns `params.executable` with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl InstanceLauncher for ProcessLauncher {
    fn launch(&self, params: &LaunchParams) -> Result<InstanceHandle, LaunchError> {
        let child = Command::new(&params.executable)
            .args(params.args())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(false)
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                executable: params.executable.clone(),
                source,
            })?;

        Ok(InstanceHandle::from_child(child))
    }
}
