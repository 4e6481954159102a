/// Entry point of the `docker-cli-client` diagnostic tool.
///
/// Reports the version of the configured container engine and the id of the
/// container this process runs in, if any.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug DOCKER_HOST=tcp://127.0.0.1:2376 cargo run
/// ```
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    docker_cli_client::run().await
}
