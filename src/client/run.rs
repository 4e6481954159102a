use crate::container::ContainerHandle;
use crate::launch::LaunchEnvironment;

/// Label linking a container to the build container that started it.
pub const PARENT_CONTAINER_LABEL: &str = "build.parent-container";

/// Arguments of a `docker run` invocation.
///
/// Containers are always started detached with a pseudo-TTY so that a
/// long-running `cat` keeps them alive until they are stopped.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub image: String,
    /// Extra flags passed verbatim after the standard ones.
    pub args: Vec<String>,
    pub workdir: Option<String>,
    pub entrypoint: Option<String>,
    /// `uid:gid` or user name the container process runs as.
    pub user: Option<String>,
    /// Host path to container path bind mounts.
    pub volumes: Vec<(String, String)>,
    pub volumes_from: Vec<String>,
    /// Environment of the process inside the container.
    pub container_env: LaunchEnvironment,
    /// Container this client itself runs in, recorded as the parent.
    pub caller: Option<ContainerHandle>,
    pub command: Vec<String>,
}

impl RunOptions {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn workdir(mut self, dir: impl Into<String>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    pub fn entrypoint(mut self, entrypoint: impl Into<String>) -> Self {
        self.entrypoint = Some(entrypoint.into());
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into()).filter(|u: &String| !u.is_empty());
        self
    }

    pub fn volume(mut self, host: impl Into<String>, container: impl Into<String>) -> Self {
        self.volumes.push((host.into(), container.into()));
        self
    }

    pub fn volumes_from(mut self, container: impl Into<String>) -> Self {
        self.volumes_from.push(container.into());
        self
    }

    pub fn env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.container_env.insert(name, value);
        self
    }

    pub fn caller(mut self, caller: Option<ContainerHandle>) -> Self {
        self.caller = caller;
        self
    }

    pub fn command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command = command.into_iter().map(Into::into).collect();
        self
    }

    /// Builds the `docker run` argument vector and the environment to launch it with.
    ///
    /// Container variables are passed as `-e NAME` and their values travel in
    /// the returned environment, which keeps them out of the argument vector.
    /// Variables that would shadow the launch or process environment of the
    /// CLI itself are passed inline as `-e NAME=VALUE` instead.
    pub(super) fn to_invocation_parts(
        &self,
        launch_env: &LaunchEnvironment,
        with_labels: bool,
    ) -> (Vec<String>, LaunchEnvironment) {
        let mut args: Vec<String> = vec!["run".into(), "-t".into(), "-d".into()];
        if let Some(user) = &self.user {
            args.extend(["-u".into(), user.clone()]);
        }
        args.extend(self.args.iter().cloned());
        if let Some(dir) = &self.workdir {
            args.extend(["-w".into(), dir.clone()]);
        }
        if let Some(entrypoint) = &self.entrypoint {
            args.extend(["--entrypoint".into(), entrypoint.clone()]);
        }
        for (host, container) in &self.volumes {
            args.extend(["-v".into(), format!("{host}:{container}:rw,z")]);
        }
        for container in &self.volumes_from {
            args.extend(["--volumes-from".into(), container.clone()]);
        }

        let mut injected = LaunchEnvironment::new();
        for (name, value) in self.container_env.iter() {
            args.push("-e".into());
            if launch_env.contains(name) || std::env::var_os(name).is_some() {
                args.push(format!("{name}={value}"));
            } else {
                args.push(name.to_owned());
                injected.insert(name, value);
            }
        }

        if let Some(caller) = &self.caller {
            if with_labels {
                args.extend(["--label".into(), format!("{PARENT_CONTAINER_LABEL}={caller}")]);
            } else {
                log::debug!(
                    "engine does not support labels, not recording parent container {}",
                    caller.short()
                );
            }
        }

        args.push(self.image.clone());
        args.extend(self.command.iter().cloned());

        (args, launch_env.merged_with(&injected))
    }
}
