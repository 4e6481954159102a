/// Client for the container engine command-line interface.
///
/// This library drives the `docker` CLI to start, inspect, and tear down the
/// containers a build runs in, builds provenance records for them, and
/// determines which container the current process itself runs inside.
pub mod client;
pub mod config;
pub mod container;
pub mod error;
pub mod fingerprint;
pub mod identity;
pub mod launch;
pub mod version;

pub use client::{DockerClient, RunOptions};
pub use config::ClientConfig;
pub use container::{ContainerHandle, ContainerRecord, Volume};
pub use launch::LaunchEnvironment;
pub use version::EngineVersion;

/// Prints the engine version and the container this process runs in.
///
/// The engine endpoint is taken from `DOCKER_HOST`, `DOCKER_TLS_VERIFY` and
/// `DOCKER_CERT_PATH`, the client configuration from
/// [`ClientConfig::from_env`].
///
/// # Errors
///
/// Returns an error if the cgroup or mountinfo listing exists but cannot be
/// read. An unreachable engine is not an error, the version is reported as
/// unknown.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env();
    let env = LaunchEnvironment::from_process();
    let mut client = DockerClient::new(config);

    match client.detect_version(&env).await {
        Some(version) => println!("engine version: {version}"),
        None => println!("engine version: unknown"),
    }

    match client.who_am_i()? {
        Some(container) => println!("running in container: {container}"),
        None => println!("running in container: none"),
    }

    Ok(())
}
