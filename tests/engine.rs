//! End-to-end tests against the container engine installed on the machine.
//!
//! Each test returns early when `docker version` cannot reach an engine.
use docker_cli_client::client::Error;
use docker_cli_client::{ClientConfig, DockerClient, LaunchEnvironment, RunOptions};

const IMAGE: &str = "busybox:latest";

async fn engine_client() -> Option<DockerClient> {
    let reachable = tokio::process::Command::new("docker")
        .arg("version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .await
        .is_ok_and(|status| status.success());
    if !reachable {
        eprintln!("no container engine reachable, skipping");
        return None;
    }

    let mut client = DockerClient::new(ClientConfig::default());
    client.detect_version(&LaunchEnvironment::from_process()).await;
    Some(client)
}

#[tokio::test]
async fn test_container_lifecycle() {
    let Some(client) = engine_client().await else {
        return;
    };
    let env = LaunchEnvironment::from_process();

    let container = client
        .run(&env, &RunOptions::new(IMAGE).command(["cat"]))
        .await
        .unwrap();

    let record = client.get_container_record(&env, &container).await;
    let volumes = client.get_volumes(&env, &container).await;
    let name = client.inspect(&env, container.as_str(), ".Name").await;
    let image_id = client.inspect(&env, IMAGE, ".Id").await;
    client.stop(&env, &container).await.unwrap();

    let record = record.unwrap();
    assert_eq!(record.container_id(), &container);
    assert_eq!(Some(record.image_id().to_owned()), image_id.unwrap());
    assert!(record.created() > 1_000_000_000_000);
    assert!(!record.container_name().starts_with('/'));
    assert!(volumes.unwrap().is_empty());
    assert!(name.unwrap().is_some());

    assert_eq!(
        client
            .inspect(&env, container.as_str(), ".Name")
            .await
            .unwrap(),
        None
    );
    client.stop(&env, &container).await.unwrap();
}

#[tokio::test]
async fn test_run_missing_image() {
    let Some(client) = engine_client().await else {
        return;
    };
    let options = RunOptions::new("docker-cli-client/does-not-exist:0").command(["cat"]);

    let err = client
        .run(&LaunchEnvironment::from_process(), &options)
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::EngineInvocationFailed { operation: "run", .. }),
        "{err:?}"
    );
}
