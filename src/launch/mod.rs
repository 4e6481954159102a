//! External command execution.
//!
//! The [`Launcher`] trait is the process-spawning primitive supplied by the
//! surrounding build automation; [`LocalLauncher`] spawns processes on the
//! local machine. [`CommandExecutor`] wraps a launcher and turns non-zero exit
//! codes into [`Error::CommandFailed`].
mod env;
mod error;
mod executor;
#[cfg(test)]
pub(crate) mod fake;
mod launcher;

pub use env::{DOCKER_CERT_PATH, DOCKER_HOST, DOCKER_TLS_VERIFY, LaunchEnvironment};
pub use error::{Error, Result};
pub use executor::CommandExecutor;
pub use launcher::{Invocation, LaunchOutput, Launcher, LocalLauncher};
