//! Client configuration.
//!
//! | Variable              | Default  | Meaning                                   |
//! |-----------------------|----------|-------------------------------------------|
//! | `DOCKER_BINARY`       | `docker` | engine CLI to invoke                      |
//! | `PROC_ROOT`           | `/proc`  | procfs used to resolve the own container  |
//! | `DOCKER_STOP_TIMEOUT` | `1`      | seconds `docker stop` waits before a kill |
//!
//! The engine endpoint itself (`DOCKER_HOST` and friends) is part of the
//! [`LaunchEnvironment`](crate::launch::LaunchEnvironment), not of this
//! configuration.
use std::path::PathBuf;

pub const DOCKER_BINARY_VAR: &str = "DOCKER_BINARY";
pub const PROC_ROOT_VAR: &str = "PROC_ROOT";
pub const DOCKER_STOP_TIMEOUT_VAR: &str = "DOCKER_STOP_TIMEOUT";

const DEFAULT_DOCKER_BINARY: &str = "docker";
const DEFAULT_PROC_ROOT: &str = "/proc";
const DEFAULT_STOP_TIMEOUT_SECS: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Engine CLI, either a name looked up on `PATH` or an absolute path.
    pub docker_binary: String,
    pub proc_root: PathBuf,
    pub stop_timeout_secs: u32,
    /// Directory engine commands are launched in, the caller's by default.
    pub working_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            docker_binary: DEFAULT_DOCKER_BINARY.to_owned(),
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
            stop_timeout_secs: DEFAULT_STOP_TIMEOUT_SECS,
            working_dir: None,
        }
    }
}

impl ClientConfig {
    /// Loads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(binary) = lookup(DOCKER_BINARY_VAR).filter(|b| !b.is_empty()) {
            config.docker_binary = binary;
        }
        if let Some(root) = lookup(PROC_ROOT_VAR).filter(|r| !r.is_empty()) {
            config.proc_root = PathBuf::from(root);
        }
        if let Some(raw) = lookup(DOCKER_STOP_TIMEOUT_VAR) {
            match raw.trim().parse::<u32>() {
                Ok(secs) => config.stop_timeout_secs = secs,
                Err(err) => log::warn!(
                    "ignoring invalid {DOCKER_STOP_TIMEOUT_VAR}={raw:?} ({err}), using {}s",
                    config.stop_timeout_secs
                ),
            }
        }
        log::debug!("client configuration: {config:?}");
        config
    }

    pub fn with_docker_binary(mut self, binary: impl Into<String>) -> Self {
        self.docker_binary = binary.into();
        self
    }

    pub fn with_proc_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.proc_root = root.into();
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}
