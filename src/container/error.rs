#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid container handle `{0}`: expected 64 lowercase hexadecimal characters")]
    InvalidContainerHandle(String),
}

pub type Result<T> = std::result::Result<T, Error>;
