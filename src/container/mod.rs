use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

mod error;
pub mod record;
mod utils;

pub use error::{Error, Result};
pub use record::{CREATED_FLOOR_MILLIS, ContainerRecord, ContainerRecordBuilder};

/// The exact length of a [`ContainerHandle`].
pub const CONTAINER_HANDLE_LEN: usize = 64;

/// A validated container identifier as assigned by the engine.
///
/// # Examples
///
/// ```
/// # use docker_cli_client::container::ContainerHandle;
/// let raw = "c73619a9e285200119c6b2b0dd79cd05a467a2c73d02a732d43ec5aaafed5c1a";
/// let handle = ContainerHandle::new(raw).unwrap();
/// assert_eq!(handle.as_ref(), raw);
/// assert!(ContainerHandle::new("c73619a9e285").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerHandle(Arc<str>);

impl ContainerHandle {
    /// Creates a new `ContainerHandle` from the given raw id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidContainerHandle`] unless the input is exactly
    /// [`CONTAINER_HANDLE_LEN`] lowercase hexadecimal characters. The input is
    /// never truncated or normalized.
    pub fn new(src: impl AsRef<str>) -> Result<Self> {
        let src = src.as_ref();
        if src.len() != CONTAINER_HANDLE_LEN || !utils::is_lowercase_hex(src.as_bytes()) {
            return Err(Error::InvalidContainerHandle(src.to_owned()));
        }

        Ok(Self(src.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The twelve character prefix the engine prints in listings.
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl FromStr for ContainerHandle {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ContainerHandle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ContainerHandle {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl serde::Serialize for ContainerHandle {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

/// A mount of a running container.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Volume {
    /// Path on the engine host, absent for anonymous volumes the engine did
    /// not report a source for.
    pub source: Option<String>,
    /// Path inside the container.
    pub destination: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "c73619a9e285200119c6b2b0dd79cd05a467a2c73d02a732d43ec5aaafed5c1a";

    #[test]
    fn test_valid_handle() {
        let handle: ContainerHandle = ID.parse().unwrap();
        assert_eq!(handle.as_str(), ID);
        assert_eq!(handle.short(), "c73619a9e285");
        assert_eq!(handle.to_string(), ID);
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(ContainerHandle::new(&ID[..63]).is_err());
        assert!(ContainerHandle::new(format!("{ID}0")).is_err());
        assert!(ContainerHandle::new("").is_err());
    }

    #[test]
    fn test_rejects_non_hex_and_uppercase() {
        assert!(ContainerHandle::new(ID.to_uppercase()).is_err());
        let with_newline = format!("{}\n", &ID[..63]);
        assert!(ContainerHandle::new(with_newline).is_err());
        let mut bad = ID.to_owned();
        bad.replace_range(0..1, "g");
        match ContainerHandle::new(&bad).unwrap_err() {
            Error::InvalidContainerHandle(raw) => assert_eq!(raw, bad),
        }
    }

    #[test]
    fn test_handle_serializes_as_string() {
        let handle = ContainerHandle::new(ID).unwrap();
        assert_eq!(serde_json::to_string(&handle).unwrap(), format!("\"{ID}\""));
    }
}
