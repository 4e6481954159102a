//! Provenance records linking a build to a container it started.

use super::ContainerHandle;

/// 2000-01-01T00:00:00Z in epoch milliseconds.
///
/// Creation times at or below this value come from a malformed inspection
/// result rather than a real container.
pub const CREATED_FLOOR_MILLIS: i64 = 946_684_800_000;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("container record is missing `{0}`")]
    MissingField(&'static str),
    #[error("implausible creation time {0}ms, expected a value after {CREATED_FLOOR_MILLIS}ms")]
    ImplausibleCreated(i64),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fingerprint-style description of a started container.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRecord {
    image_id: String,
    container_name: String,
    host: String,
    created: i64,
    container_id: ContainerHandle,
}

impl ContainerRecord {
    pub fn image_id(&self) -> &str {
        &self.image_id
    }

    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Creation time in milliseconds since the Unix epoch.
    pub fn created(&self) -> i64 {
        self.created
    }

    pub fn container_id(&self) -> &ContainerHandle {
        &self.container_id
    }
}

#[derive(Debug, Default)]
pub struct ContainerRecordBuilder {
    image_id: Option<String>,
    container_name: Option<String>,
    host: Option<String>,
    created: Option<i64>,
    container_id: Option<ContainerHandle>,
}

impl ContainerRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image_id(mut self, image_id: impl Into<String>) -> Self {
        self.image_id = Some(image_id.into());
        self
    }

    pub fn container_name(mut self, name: impl Into<String>) -> Self {
        self.container_name = Some(name.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn created(mut self, millis: i64) -> Self {
        self.created = Some(millis);
        self
    }

    pub fn container_id(mut self, id: ContainerHandle) -> Self {
        self.container_id = Some(id);
        self
    }

    /// Assembles the record.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingField`] if a field was never set or set to an empty string.
    /// - [`Error::ImplausibleCreated`] if the creation time is not after
    ///   [`CREATED_FLOOR_MILLIS`].
    pub fn build(self) -> Result<ContainerRecord> {
        let created = self.created.ok_or(Error::MissingField("created"))?;
        if created <= CREATED_FLOOR_MILLIS {
            return Err(Error::ImplausibleCreated(created));
        }

        Ok(ContainerRecord {
            image_id: non_empty(self.image_id, "imageId")?,
            container_name: non_empty(self.container_name, "containerName")?,
            host: non_empty(self.host, "host")?,
            created,
            container_id: self.container_id.ok_or(Error::MissingField("containerId"))?,
        })
    }
}

fn non_empty(value: Option<String>, field: &'static str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(Error::MissingField(field))
}
