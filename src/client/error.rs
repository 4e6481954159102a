use crate::container::{self, record};
use crate::{fingerprint, identity, launch};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Command(#[from] launch::Error),
    #[error("engine failed to {operation}: {source}")]
    EngineInvocationFailed {
        operation: &'static str,
        #[source]
        source: launch::Error,
    },
    #[error("required field `{field}` of `{object}` could not be retrieved")]
    RecordIncomplete { object: String, field: String },
    #[error("engine returned an invalid container handle: {0}")]
    InvalidHandle(#[from] container::Error),
    #[error("failed to assemble container record: {0}")]
    Record(#[source] record::Error),
    #[error("invalid creation time `{value}`: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("failed to decode mounts of container `{container}`: {source}")]
    Volumes {
        container: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Identity(#[from] identity::Error),
    #[error(transparent)]
    Fingerprint(#[from] fingerprint::Error),
}

impl Error {
    /// The captured standard error of the failed engine command, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Error::Command(source) | Error::EngineInvocationFailed { source, .. } => {
                source.stderr()
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
