use std::path::Path;

use super::{Error, Invocation, LaunchEnvironment, LaunchOutput, Launcher, Result};

/// Runs external commands through a [`Launcher`] and checks their exit status.
#[derive(Debug, Clone, Default)]
pub struct CommandExecutor<L> {
    launcher: L,
}

impl<L: Launcher> CommandExecutor<L> {
    pub fn new(launcher: L) -> Self {
        Self { launcher }
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Runs `program` with `args` and returns its standard output with
    /// trailing whitespace removed.
    ///
    /// # Errors
    ///
    /// - [`Error::Spawn`] if the process cannot be started.
    /// - [`Error::CommandFailed`] if it exits with a non-zero code. The error
    ///   carries the exit code and the captured standard error.
    pub async fn execute<I, S>(
        &self,
        program: &str,
        args: I,
        env: &LaunchEnvironment,
        working_dir: Option<&Path>,
    ) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let invocation = Invocation::new(program)
            .args(args)
            .env(env.clone())
            .working_dir(working_dir.map(Path::to_path_buf));

        self.execute_invocation(&invocation).await
    }

    /// Like [`execute`](Self::execute) but for a prepared [`Invocation`].
    pub async fn execute_invocation(&self, invocation: &Invocation) -> Result<String> {
        let output = self.execute_raw(invocation).await?;
        if !output.success() {
            let stderr = output.stderr_lossy().trim().to_owned();
            log::warn!(
                "`{} {}` exited with {:?}: {}",
                invocation.program,
                invocation.display_args(),
                output.code,
                stderr
            );
            return Err(Error::CommandFailed {
                program: invocation.program.clone(),
                args: invocation.display_args(),
                code: output.code,
                stderr,
            });
        }

        Ok(output.stdout_lossy().trim_end().to_owned())
    }

    /// Runs the invocation and returns the raw output regardless of the exit code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`] if the process cannot be started.
    pub async fn execute_raw(&self, invocation: &Invocation) -> Result<LaunchOutput> {
        log::debug!(
            "launching `{} {}`",
            invocation.program,
            invocation.display_args()
        );
        self.launcher
            .launch(invocation)
            .await
            .map_err(|source| Error::Spawn {
                program: invocation.program.clone(),
                source,
            })
    }
}
