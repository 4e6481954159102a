use std::collections::BTreeMap;
use std::path::Path;

/// Address of the engine endpoint, e.g. `tcp://192.168.99.100:2376`.
pub const DOCKER_HOST: &str = "DOCKER_HOST";
/// Enables TLS verification of the engine endpoint when set to `1`.
pub const DOCKER_TLS_VERIFY: &str = "DOCKER_TLS_VERIFY";
/// Directory holding `ca.pem`, `cert.pem` and `key.pem` for the endpoint.
pub const DOCKER_CERT_PATH: &str = "DOCKER_CERT_PATH";

const ENDPOINT_VARIABLES: [&str; 3] = [DOCKER_HOST, DOCKER_TLS_VERIFY, DOCKER_CERT_PATH];

/// Environment variables a command is launched with.
///
/// The variables are merged into the ambient environment of the spawned
/// process, they never replace it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchEnvironment(BTreeMap<String, String>);

impl LaunchEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks the engine endpoint variables from the current process environment.
    pub fn from_process() -> Self {
        let mut env = Self::new();
        for name in ENDPOINT_VARIABLES {
            if let Ok(value) = std::env::var(name) {
                env.insert(name, value);
            }
        }
        env
    }

    /// Points the environment at a remote engine endpoint.
    ///
    /// Providing a certificate directory also turns on TLS verification.
    pub fn with_endpoint(mut self, host: impl Into<String>, cert_dir: Option<&Path>) -> Self {
        self.insert(DOCKER_HOST, host);
        if let Some(dir) = cert_dir {
            self.insert(DOCKER_TLS_VERIFY, "1");
            self.insert(DOCKER_CERT_PATH, dir.display().to_string());
        }
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns a copy of `self` overlaid with `other`; `other` wins on conflicts.
    pub fn merged_with(&self, other: &LaunchEnvironment) -> LaunchEnvironment {
        let mut merged = self.clone();
        for (name, value) in other.iter() {
            merged.insert(name, value);
        }
        merged
    }
}

impl<K, V> FromIterator<(K, V)> for LaunchEnvironment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
