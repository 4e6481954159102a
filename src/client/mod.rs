//! Container lifecycle operations on top of the engine CLI.
//!
//! Every operation runs exactly one engine command at a time (two for
//! [`DockerClient::stop`]) and awaits its completion. Apart from the engine
//! version, detected once, operations share no mutable state, so concurrent
//! calls on different containers do not interfere. Calls racing on the same
//! container are not serialized.
mod error;
mod run;
mod volumes;

pub use error::{Error, Result};
pub use run::{PARENT_CONTAINER_LABEL, RunOptions};

use std::sync::LazyLock;

use regex::Regex;
use tokio::sync::OnceCell;

use crate::config::ClientConfig;
use crate::container::{ContainerHandle, ContainerRecord, ContainerRecordBuilder, Volume, record};
use crate::error::ResultOkLogExt;
use crate::fingerprint::RecordSink;
use crate::launch::{self, CommandExecutor, Invocation, LaunchEnvironment, Launcher, LocalLauncher};
use crate::version::{Capability, EngineVersion, parse_version_number};

/// Output of Go templates that reference a missing key.
const NO_VALUE: &str = "<no value>";

/// Client for the container engine CLI.
///
/// The engine version is queried once per client, on the first operation
/// that depends on it, unless it was supplied through
/// [`with_version`](Self::with_version).
#[derive(Debug)]
pub struct DockerClient<L = LocalLauncher> {
    executor: CommandExecutor<L>,
    config: ClientConfig,
    version: OnceCell<Option<EngineVersion>>,
}

impl DockerClient<LocalLauncher> {
    /// Creates a client that launches the engine CLI on the local machine.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_launcher(LocalLauncher, config)
    }
}

impl<L: Launcher> DockerClient<L> {
    pub fn with_launcher(launcher: L, config: ClientConfig) -> Self {
        Self {
            executor: CommandExecutor::new(launcher),
            config,
            version: OnceCell::new(),
        }
    }

    /// Uses an already known engine version instead of detecting it.
    ///
    /// `None` pins the version as unknown, i.e. the oldest engine.
    pub fn with_version(mut self, version: Option<EngineVersion>) -> Self {
        self.version = OnceCell::new_with(Some(version));
        self
    }

    /// Queries the engine version and keeps it for the session, replacing
    /// any previously known version.
    pub async fn detect_version(&mut self, env: &LaunchEnvironment) -> Option<&EngineVersion> {
        let version = self.query_version(env).await;
        self.version = OnceCell::new_with(Some(version));
        self.engine_version()
    }

    /// The engine version, if it has been determined already.
    pub fn engine_version(&self) -> Option<&EngineVersion> {
        self.version.get().and_then(Option::as_ref)
    }

    /// Whether the engine supports `capability`, detecting its version on
    /// first use.
    pub async fn supports(&self, env: &LaunchEnvironment, capability: Capability) -> bool {
        let version = self
            .version
            .get_or_init(|| self.query_version(env))
            .await;
        capability.is_supported_by(version.as_ref())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn launcher(&self) -> &L {
        self.executor.launcher()
    }

    /// Runs `docker -v` and parses its banner.
    ///
    /// Any failure, including an unrecognized banner, yields `None`.
    pub async fn version(&self, env: &LaunchEnvironment) -> Option<EngineVersion> {
        let banner = self
            .docker(env, ["-v"])
            .await
            .ok_warn("failed to query engine version")?;
        let version = parse_version_number(&banner);
        if version.is_none() {
            log::warn!("unrecognized engine version banner {banner:?}");
        }
        version
    }

    async fn query_version(&self, env: &LaunchEnvironment) -> Option<EngineVersion> {
        let version = self.version(env).await;
        match &version {
            Some(version) => log::debug!("engine version {version}"),
            None => log::warn!("engine version unknown, assuming the oldest supported engine"),
        }
        version
    }

    /// Starts a detached container and returns its id.
    ///
    /// # Errors
    ///
    /// - [`Error::EngineInvocationFailed`] if the engine rejects the run, e.g.
    ///   because the image cannot be found or pulled.
    /// - [`Error::InvalidHandle`] if the engine printed something other than a
    ///   container id.
    pub async fn run(
        &self,
        env: &LaunchEnvironment,
        options: &RunOptions,
    ) -> Result<ContainerHandle> {
        let with_labels = self.supports(env, Capability::ContainerLabels).await;
        let (args, launch_env) = options.to_invocation_parts(env, with_labels);
        let invocation = Invocation::new(&self.config.docker_binary)
            .args(args)
            .env(launch_env)
            .working_dir(self.config.working_dir.clone());

        let out = self
            .executor
            .execute_invocation(&invocation)
            .await
            .map_err(|source| Error::EngineInvocationFailed {
                operation: "run",
                source,
            })?;
        let handle = ContainerHandle::new(out.trim())?;
        log::debug!(
            "started container {} from image `{}`",
            handle.short(),
            options.image
        );
        Ok(handle)
    }

    /// Reads one field of an object's inspection record.
    ///
    /// `field_path` is either a field path such as `.Config.Hostname` or a
    /// complete Go template.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the container or image does not exist (anymore).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Command`] for every other engine failure.
    pub async fn inspect(
        &self,
        env: &LaunchEnvironment,
        object: &str,
        field_path: &str,
    ) -> Result<Option<String>> {
        let template = if field_path.contains("{{") {
            field_path.to_owned()
        } else {
            format!("{{{{{field_path}}}}}")
        };

        match self
            .docker(env, ["inspect", "-f", template.as_str(), object])
            .await
        {
            Ok(out) => Ok(Some(out)),
            Err(err) if is_no_such_object(&err) => {
                log::debug!("`{object}` does not exist");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Like [`inspect`](Self::inspect) but the field must exist and be non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordIncomplete`] if the value is absent or empty.
    pub async fn inspect_required_field(
        &self,
        env: &LaunchEnvironment,
        object: &str,
        field_path: &str,
    ) -> Result<String> {
        match self.inspect(env, object, field_path).await? {
            Some(value) if !value.is_empty() && value != NO_VALUE => Ok(value),
            _ => Err(Error::RecordIncomplete {
                object: object.to_owned(),
                field: field_path.to_owned(),
            }),
        }
    }

    /// Stops and removes a container together with its anonymous volumes.
    ///
    /// A container that is already stopped or already removed is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineInvocationFailed`] if either step fails for any
    /// other reason.
    pub async fn stop(&self, env: &LaunchEnvironment, container: &ContainerHandle) -> Result<()> {
        let time = format!("--time={}", self.config.stop_timeout_secs);
        let id = container.as_str();

        let stopped = self.docker(env, ["stop", time.as_str(), id]).await;
        tolerate_missing("stop", container, stopped)?;
        let removed = self.docker(env, ["rm", "-f", "--volumes", id]).await;
        tolerate_missing("rm", container, removed)?;

        log::debug!("stopped and removed container {}", container.short());
        Ok(())
    }

    /// Lists the mounts of a container in the order the engine reports them.
    ///
    /// A container without mounts yields an empty list, as does a container
    /// that no longer exists.
    pub async fn get_volumes(
        &self,
        env: &LaunchEnvironment,
        container: &ContainerHandle,
    ) -> Result<Vec<Volume>> {
        let mounts = self.supports(env, Capability::MountsInspection).await;
        let template = if mounts {
            "{{json .Mounts}}"
        } else {
            "{{json .Volumes}}"
        };

        let Some(raw) = self.inspect(env, container.as_str(), template).await? else {
            return Ok(Vec::new());
        };
        let parsed = if mounts {
            volumes::parse_mounts(&raw)
        } else {
            volumes::parse_legacy_volumes(&raw)
        };

        parsed.map_err(|source| Error::Volumes {
            container: container.to_string(),
            source,
        })
    }

    /// Builds the provenance record of a container.
    ///
    /// # Errors
    ///
    /// - [`Error::RecordIncomplete`] if a required field cannot be retrieved.
    /// - [`Error::Timestamp`] if the creation time is not RFC 3339.
    /// - [`Error::Record`] if the creation time is implausibly small.
    pub async fn get_container_record(
        &self,
        env: &LaunchEnvironment,
        container: &ContainerHandle,
    ) -> Result<ContainerRecord> {
        let id = container.as_str();
        let image_id = self.inspect_required_field(env, id, ".Image").await?;
        let name = self.inspect_required_field(env, id, ".Name").await?;
        let host = self
            .inspect_required_field(env, id, ".Config.Hostname")
            .await?;
        let created = self.inspect_required_field(env, id, ".Created").await?;
        let created = chrono::DateTime::parse_from_rfc3339(&created)
            .map_err(|source| Error::Timestamp {
                value: created.clone(),
                source,
            })?
            .timestamp_millis();

        ContainerRecordBuilder::new()
            .image_id(image_id)
            .container_name(name.strip_prefix('/').unwrap_or(&name))
            .host(host)
            .created(created)
            .container_id(container.clone())
            .build()
            .map_err(|err| match err {
                record::Error::MissingField(field) => Error::RecordIncomplete {
                    object: id.to_owned(),
                    field: field.to_owned(),
                },
                other => Error::Record(other),
            })
    }

    /// Builds the record of a container and hands it to `sink`.
    pub async fn fingerprint_container<S: RecordSink>(
        &self,
        env: &LaunchEnvironment,
        container: &ContainerHandle,
        sink: &S,
    ) -> Result<ContainerRecord> {
        let record = self.get_container_record(env, container).await?;
        sink.submit(record.clone()).await?;
        Ok(record)
    }

    /// Lists the command names of the processes running in a container.
    pub async fn list_processes(
        &self,
        env: &LaunchEnvironment,
        container: &ContainerHandle,
    ) -> Result<Vec<String>> {
        let out = self
            .docker(env, ["top", container.as_str(), "-eo", "pid,comm"])
            .await?;

        Ok(out
            .lines()
            .skip(1)
            .filter_map(|line| {
                let mut fields = line.trim().splitn(2, char::is_whitespace);
                fields.next()?;
                let command = fields.next()?.trim();
                (!command.is_empty()).then(|| command.to_owned())
            })
            .collect())
    }

    /// Lists the containers started with `parent` as their caller.
    ///
    /// Engines without label support cannot know, so the list is empty.
    pub async fn list_children(
        &self,
        env: &LaunchEnvironment,
        parent: &ContainerHandle,
    ) -> Result<Vec<ContainerHandle>> {
        if !self.supports(env, Capability::ContainerLabels).await {
            log::debug!("engine does not support labels, no children of {}", parent.short());
            return Ok(Vec::new());
        }

        let filter = format!("label={PARENT_CONTAINER_LABEL}={parent}");
        let out = self
            .docker(env, ["ps", "-a", "-q", "--no-trunc", "--filter", filter.as_str()])
            .await?;

        out.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| ContainerHandle::new(line).map_err(Error::from))
            .collect()
    }

    /// Returns `uid:gid` of the user running the build, suitable for
    /// [`RunOptions::user`].
    pub async fn current_user(&self, env: &LaunchEnvironment) -> Result<String> {
        let dir = self.config.working_dir.as_deref();
        let uid = self.executor.execute("id", ["-u"], env, dir).await?;
        let gid = self.executor.execute("id", ["-g"], env, dir).await?;
        Ok(format!("{}:{}", uid.trim(), gid.trim()))
    }

    /// Determines the container this process runs in, if any.
    pub fn who_am_i(&self) -> Result<Option<ContainerHandle>> {
        Ok(crate::identity::who_am_i(&self.config.proc_root)?)
    }

    async fn docker<'a, I>(&self, env: &LaunchEnvironment, args: I) -> launch::Result<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.executor
            .execute(
                &self.config.docker_binary,
                args,
                env,
                self.config.working_dir.as_deref(),
            )
            .await
    }
}

/// Messages the engine prints for an object that does not exist.
///
/// Old engines print `Error: No such image or container: <id>`, newer ones
/// `Error: No such object: <id>` or `Error response from daemon: No such
/// container: <id>`. The phrase must start a line, so resolver and file
/// errors such as `lookup badhost: no such host` do not count.
static NO_SUCH_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^(?:error(?: response from daemon)?: )?no such (?:object|container|image or container|image): ",
    )
    .expect("no such object pattern is valid")
});

/// Whether the engine reported that the referenced object does not exist.
fn is_no_such_object(err: &launch::Error) -> bool {
    err.stderr()
        .is_some_and(|stderr| NO_SUCH_OBJECT.is_match(stderr))
}

fn tolerate_missing(
    operation: &'static str,
    container: &ContainerHandle,
    result: launch::Result<String>,
) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(err) if is_no_such_object(&err) => {
            log::debug!("container {} already gone during {operation}", container.short());
            Ok(())
        }
        Err(source) => Err(Error::EngineInvocationFailed { operation, source }),
    }
}
