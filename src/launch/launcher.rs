use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;

use super::LaunchEnvironment;

/// A single external command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub env: LaunchEnvironment,
    pub working_dir: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: LaunchEnvironment::default(),
            working_dir: None,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, env: LaunchEnvironment) -> Self {
        self.env = env;
        self
    }

    pub fn working_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }

    /// The argument vector joined with spaces, for diagnostics.
    pub fn display_args(&self) -> String {
        self.args.join(" ")
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOutput {
    /// Exit code, `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl LaunchOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Spawns processes and waits for them to finish.
///
/// Implementations must drain stdout and stderr while waiting for the exit
/// status and must terminate the child if the returned future is dropped
/// before completion.
pub trait Launcher {
    fn launch(
        &self,
        invocation: &Invocation,
    ) -> impl Future<Output = std::io::Result<LaunchOutput>> + Send;
}

/// Launches processes on the local machine through [`tokio::process`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalLauncher;

impl Launcher for LocalLauncher {
    async fn launch(&self, invocation: &Invocation) -> std::io::Result<LaunchOutput> {
        let mut command = tokio::process::Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .envs(invocation.env.iter())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &invocation.working_dir {
            command.current_dir(dir);
        }

        let child = command.spawn()?;
        log::trace!(
            "spawned `{}` (pid={})",
            invocation.program,
            child.id().unwrap_or(0)
        );
        let output = child.wait_with_output().await?;

        Ok(LaunchOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
